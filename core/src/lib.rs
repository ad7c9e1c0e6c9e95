#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Geocoin Carrier engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Geocoin Carrier.";

/// Edge length of a grid cell expressed in degrees.
pub const TILE_DEGREES: f64 = 1e-4;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Requests that the player advance exactly one cell in a direction.
    MovePlayer {
        /// Direction of travel for the one-cell step.
        direction: Direction,
    },
    /// Replaces the player's continuous position, typically from a sensor.
    SetPlayerPosition {
        /// New continuous position reported for the player.
        position: GeoPosition,
    },
    /// Requests that every coin held by a cache transfer to the wallet.
    Collect {
        /// Coordinate of the cache to drain.
        cell: GridCoord,
    },
    /// Requests that wallet coins transfer into a cache.
    Deposit {
        /// Coordinate of the cache receiving the coins.
        cell: GridCoord,
        /// Number of coins requested; clamped to the wallet balance.
        amount: u32,
    },
    /// Requests that the world forget all caches and zero the wallet.
    Reset,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Reports that the player's continuous position changed.
    PlayerMoved {
        /// Cell the player occupied before the move.
        from: GridCoord,
        /// Cell the player occupies after the move.
        to: GridCoord,
        /// Continuous position the player now reports.
        position: GeoPosition,
    },
    /// Confirms that a cache entered the visibility window.
    CellActivated {
        /// Coordinate of the cache that became interactable.
        cell: GridCoord,
        /// Number of coins held by the cache on activation.
        coins: u32,
        /// Whether the inventory was restored from a prior snapshot.
        restored: bool,
    },
    /// Confirms that a cache left the visibility window.
    CellDeactivated {
        /// Coordinate of the cache that became dormant.
        cell: GridCoord,
        /// Number of coins snapshotted at deactivation.
        coins: u32,
    },
    /// Confirms that coins transferred from a cache to the wallet.
    CoinsCollected {
        /// Coordinate of the drained cache.
        cell: GridCoord,
        /// Number of coins transferred to the wallet.
        amount: u32,
    },
    /// Confirms that coins transferred from the wallet into a cache.
    CoinsDeposited {
        /// Coordinate of the cache receiving the coins.
        cell: GridCoord,
        /// Number of coins actually transferred after clamping.
        amount: u32,
    },
    /// Announces that the world discarded all caches and wallet progress.
    WorldReset,
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward increasing latitude.
    North,
    /// Movement toward increasing longitude.
    East,
    /// Movement toward decreasing latitude.
    South,
    /// Movement toward decreasing longitude.
    West,
}

impl Direction {
    /// Grid offset `(di, dj)` produced by one step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Self::North => (1, 0),
            Self::East => (0, 1),
            Self::South => (-1, 0),
            Self::West => (0, -1),
        }
    }
}

/// Location of a single grid cell expressed as integer latitude and
/// longitude indices relative to the projection anchor.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridCoord {
    i: i64,
    j: i64,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(i: i64, j: i64) -> Self {
        Self { i, j }
    }

    /// Latitude index of the cell.
    #[must_use]
    pub const fn i(&self) -> i64 {
        self.i
    }

    /// Longitude index of the cell.
    #[must_use]
    pub const fn j(&self) -> i64 {
        self.j
    }

    /// Returns the coordinate offset by the provided index deltas.
    #[must_use]
    pub const fn offset(self, di: i64, dj: i64) -> Self {
        Self {
            i: self.i.wrapping_add(di),
            j: self.j.wrapping_add(dj),
        }
    }

    /// Computes the Chebyshev distance between two grid coordinates.
    #[must_use]
    pub fn chebyshev_distance(self, other: GridCoord) -> u64 {
        self.i.abs_diff(other.i).max(self.j.abs_diff(other.j))
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.i, self.j)
    }
}

/// Continuous latitude and longitude position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    lat: f64,
    lng: f64,
}

impl GeoPosition {
    /// Creates a new continuous position.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.lng
    }
}

/// Axis-aligned bounding rectangle of a single grid cell in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
}

impl GeoBounds {
    /// Constructs a rectangle from its corner coordinates.
    #[must_use]
    pub const fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Minimum latitude edge of the rectangle.
    #[must_use]
    pub const fn south(&self) -> f64 {
        self.south
    }

    /// Minimum longitude edge of the rectangle.
    #[must_use]
    pub const fn west(&self) -> f64 {
        self.west
    }

    /// Maximum latitude edge of the rectangle.
    #[must_use]
    pub const fn north(&self) -> f64 {
        self.north
    }

    /// Maximum longitude edge of the rectangle.
    #[must_use]
    pub const fn east(&self) -> f64 {
        self.east
    }

    /// Center position of the rectangle.
    #[must_use]
    pub fn center(&self) -> GeoPosition {
        GeoPosition::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }
}

/// Pure mapping between continuous positions and discrete grid cells.
///
/// The anchor and tile size are fixed once per running world so the mapping
/// stays stable for the lifetime of a game instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridProjection {
    anchor: GeoPosition,
    tile_size: f64,
}

impl GridProjection {
    /// Creates a projection anchored at the provided position.
    ///
    /// A non-finite or non-positive tile size falls back to
    /// [`TILE_DEGREES`] so the mapping stays total.
    #[must_use]
    pub fn new(anchor: GeoPosition, tile_size: f64) -> Self {
        let tile_size = if tile_size.is_finite() && tile_size > 0.0 {
            tile_size
        } else {
            TILE_DEGREES
        };
        Self { anchor, tile_size }
    }

    /// Anchor position that cell `(0, 0)` borders to its south-west.
    #[must_use]
    pub const fn anchor(&self) -> GeoPosition {
        self.anchor
    }

    /// Edge length of one cell in degrees.
    #[must_use]
    pub const fn tile_size(&self) -> f64 {
        self.tile_size
    }

    /// Maps a continuous position to the cell containing it.
    #[must_use]
    pub fn cell_at(&self, position: GeoPosition) -> GridCoord {
        let i = ((position.lat() - self.anchor.lat()) / self.tile_size).floor();
        let j = ((position.lng() - self.anchor.lng()) / self.tile_size).floor();
        GridCoord::new(i as i64, j as i64)
    }

    /// Returns the bounding rectangle of the provided cell.
    #[must_use]
    pub fn bounds_of(&self, cell: GridCoord) -> GeoBounds {
        let south = self.anchor.lat() + cell.i() as f64 * self.tile_size;
        let west = self.anchor.lng() + cell.j() as f64 * self.tile_size;
        GeoBounds::new(south, west, south + self.tile_size, west + self.tile_size)
    }
}

/// Identity of a single coin, minted by and unique within one cache.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CoinId {
    cell: GridCoord,
    serial: u32,
}

impl CoinId {
    /// Creates a coin identity minted by the provided cache.
    #[must_use]
    pub const fn new(cell: GridCoord, serial: u32) -> Self {
        Self { cell, serial }
    }

    /// Coordinate of the cache that minted the coin.
    #[must_use]
    pub const fn cell(&self) -> GridCoord {
        self.cell
    }

    /// Mint serial, unique within the minting cache.
    #[must_use]
    pub const fn serial(&self) -> u32 {
        self.serial
    }
}

impl fmt::Display for CoinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}#{}", self.cell.i(), self.cell.j(), self.serial)
    }
}

/// Immutable representation of a single active cache used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheSnapshot {
    /// Coordinate of the cache.
    pub cell: GridCoord,
    /// Coins held by the cache in deposit order.
    pub coins: Vec<CoinId>,
}

/// Read-only snapshot describing all active caches.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheView {
    snapshots: Vec<CacheSnapshot>,
}

impl CacheView {
    /// Creates a new cache view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<CacheSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.cell);
        Self { snapshots }
    }

    /// Iterator over the captured cache snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &CacheSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<CacheSnapshot> {
        self.snapshots
    }
}

/// Record of one cache known to the world, active or dormant.
///
/// `minted` is the cache's lifetime mint counter; together with `coins` it
/// pins down the exact serial run currently held, since collection always
/// drains a whole inventory and deposits append fresh serials.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheRecord {
    /// Coordinate of the cache.
    pub cell: GridCoord,
    /// Number of coins currently held.
    pub coins: u32,
    /// Total coins ever minted by the cache.
    pub minted: u32,
}

/// Immutable representation of the player's wallet and score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WalletSnapshot {
    /// Coins currently held by the player.
    pub coins: u32,
    /// Cumulative points earned by collecting; never decreases.
    pub points: u64,
    /// Cumulative coins deposited into caches; never decreases.
    pub total_deposited: u64,
}
