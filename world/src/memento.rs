//! Snapshot storage for dormant cache inventories.
//!
//! When a cell leaves the visibility window its inventory is parked here by
//! value; the live cell is cleared so the store is the single source of
//! truth for dormant state. Entries persist for the process lifetime, which
//! stays bounded by how far the player actually travels.

use std::collections::BTreeMap;

use geocoin_core::{CoinId, GridCoord};

/// Saved inventory of one cell, captured at deactivation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CellSnapshot {
    coins: Vec<CoinId>,
    minted: u32,
}

impl CellSnapshot {
    /// Creates a snapshot from an inventory and its mint counter.
    pub(crate) fn new(coins: Vec<CoinId>, minted: u32) -> Self {
        Self { coins, minted }
    }

    /// Number of coins captured by the snapshot.
    pub(crate) fn coin_count(&self) -> u32 {
        self.coins.len() as u32
    }

    /// Mint counter captured by the snapshot.
    pub(crate) fn minted(&self) -> u32 {
        self.minted
    }

    /// Consumes the snapshot, yielding the inventory and mint counter.
    pub(crate) fn into_parts(self) -> (Vec<CoinId>, u32) {
        (self.coins, self.minted)
    }
}

/// Store mapping cell coordinates to their most recent snapshot.
#[derive(Debug, Default)]
pub(crate) struct MementoStore {
    snapshots: BTreeMap<GridCoord, CellSnapshot>,
}

impl MementoStore {
    /// Creates an empty store.
    pub(crate) fn new() -> Self {
        Self {
            snapshots: BTreeMap::new(),
        }
    }

    /// Saves a snapshot, overwriting any earlier one for the same cell.
    pub(crate) fn save(&mut self, cell: GridCoord, snapshot: CellSnapshot) {
        let _ = self.snapshots.insert(cell, snapshot);
    }

    /// Returns a copy of the snapshot for the cell without removing it.
    pub(crate) fn restore(&self, cell: GridCoord) -> Option<CellSnapshot> {
        self.snapshots.get(&cell).cloned()
    }

    /// Iterates over every stored snapshot in coordinate order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&GridCoord, &CellSnapshot)> {
        self.snapshots.iter()
    }

    /// Forgets every snapshot.
    pub(crate) fn clear(&mut self) {
        self.snapshots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{CellSnapshot, MementoStore};
    use geocoin_core::{CoinId, GridCoord};

    fn snapshot_with_serials(cell: GridCoord, serials: &[u32]) -> CellSnapshot {
        let coins = serials.iter().map(|&s| CoinId::new(cell, s)).collect();
        CellSnapshot::new(coins, serials.iter().max().map_or(0, |&s| s + 1))
    }

    #[test]
    fn later_save_overwrites_earlier_snapshot() {
        let cell = GridCoord::new(3, 3);
        let mut store = MementoStore::new();

        store.save(cell, snapshot_with_serials(cell, &[0, 1]));
        store.save(cell, snapshot_with_serials(cell, &[2]));

        let restored = store.restore(cell).expect("snapshot present");
        assert_eq!(restored.coin_count(), 1);
        assert_eq!(restored.minted(), 3);
    }

    #[test]
    fn restore_is_repeatable() {
        let cell = GridCoord::new(-1, 0);
        let mut store = MementoStore::new();
        store.save(cell, snapshot_with_serials(cell, &[0, 1, 2]));

        let first = store.restore(cell).expect("first restore");
        let second = store.restore(cell).expect("second restore");
        assert_eq!(first, second);
    }

    #[test]
    fn missing_cell_restores_nothing() {
        let store = MementoStore::new();
        assert!(store.restore(GridCoord::new(9, 9)).is_none());
    }
}
