#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Geocoin Carrier.
//!
//! The world owns every mutable piece of game state: the player's position,
//! the wallet ledger, the flyweight cell registry, the memento store for
//! dormant inventories, and the set of currently active caches. All
//! mutations flow through [`apply`], which executes synchronously and
//! reports what changed via [`Event`] values. An embedding that introduces
//! threads must serialize every mutation behind the single owning `World`.

use std::collections::BTreeSet;

use geocoin_core::{
    CacheRecord, CoinId, Command, Event, GeoPosition, GridCoord, GridProjection, WalletSnapshot,
    TILE_DEGREES, WELCOME_BANNER,
};

pub mod generation;
mod memento;
mod registry;
mod wallet;

use memento::{CellSnapshot, MementoStore};
use registry::CellRegistry;
use wallet::Wallet;

const DEFAULT_ANCHOR: GeoPosition = GeoPosition::new(36.98949379578401, -122.06277128548504);
const NEIGHBORHOOD_RADIUS: u32 = 8;
const CACHE_SPAWN_PROBABILITY: f64 = 0.1;
const MAX_INITIAL_COINS: u32 = 10;

/// Fixed parameters that shape a running world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    projection: GridProjection,
    neighborhood_radius: u32,
    spawn_probability: f64,
    max_initial_coins: u32,
}

impl WorldConfig {
    /// Creates a configuration from explicit parameters.
    ///
    /// The spawn probability is clamped to `[0, 1]` (non-finite values fall
    /// back to the default) and the coin maximum is raised to at least one.
    #[must_use]
    pub fn new(
        projection: GridProjection,
        neighborhood_radius: u32,
        spawn_probability: f64,
        max_initial_coins: u32,
    ) -> Self {
        let spawn_probability = if spawn_probability.is_finite() {
            spawn_probability.clamp(0.0, 1.0)
        } else {
            CACHE_SPAWN_PROBABILITY
        };
        Self {
            projection,
            neighborhood_radius,
            spawn_probability,
            max_initial_coins: max_initial_coins.max(1),
        }
    }

    /// Projection mapping continuous positions to grid cells.
    #[must_use]
    pub const fn projection(&self) -> GridProjection {
        self.projection
    }

    /// Chebyshev radius of the visibility window in cells.
    #[must_use]
    pub const fn neighborhood_radius(&self) -> u32 {
        self.neighborhood_radius
    }

    /// Probability that any given cell hosts a cache.
    #[must_use]
    pub const fn spawn_probability(&self) -> f64 {
        self.spawn_probability
    }

    /// Upper bound on the coin count of a freshly spawned cache.
    #[must_use]
    pub const fn max_initial_coins(&self) -> u32 {
        self.max_initial_coins
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new(
            GridProjection::new(DEFAULT_ANCHOR, TILE_DEGREES),
            NEIGHBORHOOD_RADIUS,
            CACHE_SPAWN_PROBABILITY,
            MAX_INITIAL_COINS,
        )
    }
}

/// Represents the authoritative Geocoin Carrier world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: WorldConfig,
    position: GeoPosition,
    player_cell: GridCoord,
    wallet: Wallet,
    registry: CellRegistry,
    mementos: MementoStore,
    active: BTreeSet<GridCoord>,
}

impl World {
    /// Creates a new world with the player standing at the projection anchor.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        let position = config.projection().anchor();
        let mut world = Self::empty(config, position);
        world.refresh_active(&mut Vec::new());
        world
    }

    /// Rebuilds a world from persisted state.
    ///
    /// Every persisted cache record becomes a dormant snapshot; records
    /// inside the visibility window are restored immediately. A record whose
    /// mint counter trails its coin count is repaired by raising the counter,
    /// so malformed input can never produce duplicate serials.
    #[must_use]
    pub fn from_save(
        config: WorldConfig,
        position: GeoPosition,
        wallet: WalletSnapshot,
        caches: &[CacheRecord],
    ) -> Self {
        let mut world = Self::empty(config, position);
        world.wallet = Wallet::from_snapshot(wallet);

        for record in caches {
            let minted = record.minted.max(record.coins);
            let first_serial = minted - record.coins;
            let coins: Vec<CoinId> = (first_serial..minted)
                .map(|serial| CoinId::new(record.cell, serial))
                .collect();
            world
                .mementos
                .save(record.cell, CellSnapshot::new(coins, minted));
        }

        world.refresh_active(&mut Vec::new());
        world
    }

    fn empty(config: WorldConfig, position: GeoPosition) -> Self {
        let player_cell = config.projection().cell_at(position);
        Self {
            banner: WELCOME_BANNER,
            config,
            position,
            player_cell,
            wallet: Wallet::default(),
            registry: CellRegistry::new(),
            mementos: MementoStore::new(),
            active: BTreeSet::new(),
        }
    }

    fn set_position(&mut self, position: GeoPosition, out_events: &mut Vec<Event>) {
        let from = self.player_cell;
        self.position = position;
        self.player_cell = self.config.projection().cell_at(position);
        out_events.push(Event::PlayerMoved {
            from,
            to: self.player_cell,
            position,
        });
        self.refresh_active(out_events);
    }

    /// Diffs the visibility window against the active set.
    ///
    /// Cells leaving the window snapshot their inventory into the memento
    /// store and clear the live cell; cells entering restore a snapshot when
    /// one exists and otherwise run the deterministic spawn test. Cells that
    /// fail the spawn test are never activated.
    fn refresh_active(&mut self, out_events: &mut Vec<Event>) {
        let window = self.visibility_window();

        let departed: Vec<GridCoord> = self
            .active
            .iter()
            .copied()
            .filter(|cell| !window.contains(cell))
            .collect();
        for cell in departed {
            let _ = self.active.remove(&cell);
            if let Some(state) = self.registry.get_mut(cell) {
                let snapshot = state.snapshot();
                let coins = snapshot.coin_count();
                self.mementos.save(cell, snapshot);
                state.clear_coins();
                out_events.push(Event::CellDeactivated { cell, coins });
            }
        }

        for cell in window {
            if self.active.contains(&cell) {
                continue;
            }

            if let Some(snapshot) = self.mementos.restore(cell) {
                let coins = snapshot.coin_count();
                self.registry.get_or_create(cell).restore(snapshot);
                let _ = self.active.insert(cell);
                out_events.push(Event::CellActivated {
                    cell,
                    coins,
                    restored: true,
                });
            } else if generation::cache_spawns_at(cell, self.config.spawn_probability()) {
                let coins =
                    generation::initial_coin_count(cell, self.config.max_initial_coins());
                self.registry.get_or_create(cell).mint(cell, coins);
                let _ = self.active.insert(cell);
                out_events.push(Event::CellActivated {
                    cell,
                    coins,
                    restored: false,
                });
            }
        }
    }

    fn visibility_window(&self) -> BTreeSet<GridCoord> {
        let radius = i64::from(self.config.neighborhood_radius());
        let mut window = BTreeSet::new();
        for di in -radius..=radius {
            for dj in -radius..=radius {
                let _ = window.insert(self.player_cell.offset(di, dj));
            }
        }
        window
    }

    fn collect(&mut self, cell: GridCoord, out_events: &mut Vec<Event>) {
        if !self.active.contains(&cell) {
            return;
        }
        let Some(state) = self.registry.get_mut(cell) else {
            return;
        };

        let amount = state.drain();
        if amount == 0 {
            return;
        }

        self.wallet.credit(amount);
        out_events.push(Event::CoinsCollected { cell, amount });
    }

    fn deposit(&mut self, cell: GridCoord, requested: u32, out_events: &mut Vec<Event>) {
        if !self.active.contains(&cell) {
            return;
        }

        let amount = self.wallet.debit(requested);
        if amount == 0 {
            return;
        }

        self.registry.get_or_create(cell).mint(cell, amount);
        out_events.push(Event::CoinsDeposited { cell, amount });
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.registry.clear();
        self.mementos.clear();
        self.active.clear();
        self.wallet.reset();
        out_events.push(Event::WorldReset);
        self.refresh_active(out_events);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::MovePlayer { direction } => {
            let (di, dj) = direction.delta();
            let tile = world.config.projection().tile_size();
            let position = GeoPosition::new(
                world.position.lat() + di as f64 * tile,
                world.position.lng() + dj as f64 * tile,
            );
            world.set_position(position, out_events);
        }
        Command::SetPlayerPosition { position } => {
            world.set_position(position, out_events);
        }
        Command::Collect { cell } => {
            world.collect(cell, out_events);
        }
        Command::Deposit { cell, amount } => {
            world.deposit(cell, amount, out_events);
        }
        Command::Reset => {
            world.reset(out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use geocoin_core::{
        CacheRecord, CacheSnapshot, CacheView, GeoPosition, GridCoord, GridProjection,
        WalletSnapshot,
    };
    use std::collections::BTreeMap;

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Projection fixed for the lifetime of this world.
    #[must_use]
    pub fn projection(world: &World) -> GridProjection {
        world.config.projection()
    }

    /// Continuous position the player currently reports.
    #[must_use]
    pub fn player_position(world: &World) -> GeoPosition {
        world.position
    }

    /// Grid cell the player currently occupies.
    #[must_use]
    pub fn player_cell(world: &World) -> GridCoord {
        world.player_cell
    }

    /// Immutable snapshot of the wallet ledger.
    #[must_use]
    pub fn wallet(world: &World) -> WalletSnapshot {
        world.wallet.snapshot()
    }

    /// Coordinates of every active cache in ascending order.
    #[must_use]
    pub fn active_cells(world: &World) -> Vec<GridCoord> {
        world.active.iter().copied().collect()
    }

    /// Captures a read-only view of every active cache and its coins.
    #[must_use]
    pub fn cache_view(world: &World) -> CacheView {
        let snapshots: Vec<CacheSnapshot> = world
            .active
            .iter()
            .filter_map(|cell| {
                world.registry.get(*cell).map(|state| CacheSnapshot {
                    cell: *cell,
                    coins: state.coins().to_vec(),
                })
            })
            .collect();
        CacheView::from_snapshots(snapshots)
    }

    /// Records describing every cache known to the world, active or dormant.
    ///
    /// Dormant state comes from the memento store; active cells report their
    /// live inventory. The result is ordered by coordinate so persistence
    /// output stays deterministic.
    #[must_use]
    pub fn cache_records(world: &World) -> Vec<CacheRecord> {
        let mut records: BTreeMap<GridCoord, CacheRecord> = BTreeMap::new();

        for (cell, snapshot) in world.mementos.iter() {
            let _ = records.insert(
                *cell,
                CacheRecord {
                    cell: *cell,
                    coins: snapshot.coin_count(),
                    minted: snapshot.minted(),
                },
            );
        }

        for cell in &world.active {
            if let Some(state) = world.registry.get(*cell) {
                let _ = records.insert(
                    *cell,
                    CacheRecord {
                        cell: *cell,
                        coins: state.coins().len() as u32,
                        minted: state.minted(),
                    },
                );
            }
        }

        records.into_values().collect()
    }
}
