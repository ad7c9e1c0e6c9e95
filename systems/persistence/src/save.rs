//! Serde model for the externally persisted save record.
//!
//! The on-store format is the stable contract shared with other frontends,
//! so field names stay camelCase and cache keys stay the `"i,j"` integer
//! grid rendering regardless of internal representations.

use geocoin_core::{CacheRecord, GeoPosition, GridCoord, WalletSnapshot};
use geocoin_world::{query, World, WorldConfig};
use serde::{Deserialize, Serialize};

/// Complete persisted game state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveGame {
    /// Cumulative points earned by the player.
    pub player_points: u64,
    /// Coins currently held in the wallet.
    pub player_coins: u32,
    /// Cumulative coins deposited into caches.
    pub total_deposited_coins: u64,
    /// Continuous position the player last reported.
    pub player_position: SavedPosition,
    /// Every cache the world knows about, active or dormant.
    pub caches: Vec<SavedCache>,
}

/// Persisted continuous position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedPosition {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

/// Persisted state of one cache.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCache {
    /// Integer grid key rendered as `"i,j"`.
    pub key: String,
    /// Latitude of the cache cell's south edge.
    pub lat: f64,
    /// Longitude of the cache cell's west edge.
    pub lng: f64,
    /// Number of coins currently held by the cache.
    pub cache_coins: u32,
    /// Lifetime mint counter of the cache.
    pub value: u32,
}

impl SaveGame {
    /// Captures the provided world as a persistable record.
    #[must_use]
    pub fn capture(world: &World) -> Self {
        let wallet = query::wallet(world);
        let position = query::player_position(world);
        let projection = query::projection(world);

        let caches = query::cache_records(world)
            .into_iter()
            .map(|record| {
                let bounds = projection.bounds_of(record.cell);
                SavedCache {
                    key: record.cell.to_string(),
                    lat: bounds.south(),
                    lng: bounds.west(),
                    cache_coins: record.coins,
                    value: record.minted,
                }
            })
            .collect();

        Self {
            player_points: wallet.points,
            player_coins: wallet.coins,
            total_deposited_coins: wallet.total_deposited,
            player_position: SavedPosition {
                lat: position.lat(),
                lng: position.lng(),
            },
            caches,
        }
    }

    /// Rebuilds a world from this record under the provided configuration.
    ///
    /// Cache entries whose key does not parse as an `"i,j"` pair are
    /// dropped; everything else restores verbatim.
    #[must_use]
    pub fn into_world(self, config: WorldConfig) -> World {
        let wallet = WalletSnapshot {
            coins: self.player_coins,
            points: self.player_points,
            total_deposited: self.total_deposited_coins,
        };
        let position = GeoPosition::new(self.player_position.lat, self.player_position.lng);
        let caches: Vec<CacheRecord> = self
            .caches
            .iter()
            .filter_map(|cache| {
                parse_key(&cache.key).map(|cell| CacheRecord {
                    cell,
                    coins: cache.cache_coins,
                    minted: cache.value,
                })
            })
            .collect();

        World::from_save(config, position, wallet, &caches)
    }
}

fn parse_key(key: &str) -> Option<GridCoord> {
    let (i, j) = key.split_once(',')?;
    Some(GridCoord::new(
        i.trim().parse().ok()?,
        j.trim().parse().ok()?,
    ))
}
