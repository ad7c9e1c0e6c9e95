//! Flyweight storage for cache cells.

use std::collections::BTreeMap;

use geocoin_core::{CoinId, GridCoord};

use crate::memento::CellSnapshot;

/// Mutable state owned by exactly one grid cell.
///
/// The `minted` counter only ever grows, so a serial is never reassigned
/// once a coin holding it has been removed from the inventory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Cell {
    coins: Vec<CoinId>,
    minted: u32,
}

impl Cell {
    /// Appends `amount` freshly minted coins to the inventory.
    pub(crate) fn mint(&mut self, cell: GridCoord, amount: u32) {
        self.coins.reserve(amount as usize);
        for _ in 0..amount {
            self.coins.push(CoinId::new(cell, self.minted));
            self.minted = self.minted.saturating_add(1);
        }
    }

    /// Removes every coin from the inventory, returning the removed count.
    pub(crate) fn drain(&mut self) -> u32 {
        let drained = self.coins.len() as u32;
        self.coins.clear();
        drained
    }

    /// Coins currently held, in deposit order.
    pub(crate) fn coins(&self) -> &[CoinId] {
        &self.coins
    }

    /// Total coins ever minted by this cell.
    pub(crate) fn minted(&self) -> u32 {
        self.minted
    }

    /// Captures the cell state by value for the memento store.
    pub(crate) fn snapshot(&self) -> CellSnapshot {
        CellSnapshot::new(self.coins.clone(), self.minted)
    }

    /// Replaces the cell state with a previously captured snapshot.
    pub(crate) fn restore(&mut self, snapshot: CellSnapshot) {
        let (coins, minted) = snapshot.into_parts();
        self.coins = coins;
        self.minted = minted;
    }

    /// Clears the live inventory once a snapshot owns the dormant state.
    pub(crate) fn clear_coins(&mut self) {
        self.coins.clear();
    }
}

/// Registry that guarantees one live [`Cell`] per coordinate.
#[derive(Debug, Default)]
pub(crate) struct CellRegistry {
    cells: BTreeMap<GridCoord, Cell>,
}

impl CellRegistry {
    /// Creates an empty registry.
    pub(crate) fn new() -> Self {
        Self {
            cells: BTreeMap::new(),
        }
    }

    /// Returns the unique cell for the coordinate, creating it lazily.
    pub(crate) fn get_or_create(&mut self, coord: GridCoord) -> &mut Cell {
        self.cells.entry(coord).or_default()
    }

    /// Returns the cell for the coordinate if it was ever created.
    pub(crate) fn get(&self, coord: GridCoord) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    /// Returns mutable access to an existing cell.
    pub(crate) fn get_mut(&mut self, coord: GridCoord) -> Option<&mut Cell> {
        self.cells.get_mut(&coord)
    }

    /// Forgets every cell, returning the registry to its initial state.
    pub(crate) fn clear(&mut self) {
        self.cells.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{Cell, CellRegistry};
    use geocoin_core::{CoinId, GridCoord};

    #[test]
    fn repeated_lookups_share_one_cell() {
        let mut registry = CellRegistry::new();
        let coord = GridCoord::new(2, -5);

        registry.get_or_create(coord).mint(coord, 3);
        assert_eq!(registry.get_or_create(coord).coins().len(), 3);
        assert_eq!(registry.get(coord).map(Cell::minted), Some(3));
    }

    #[test]
    fn mint_assigns_dense_serials() {
        let coord = GridCoord::new(0, 0);
        let mut cell = Cell::default();
        cell.mint(coord, 3);

        let serials: Vec<u32> = cell.coins().iter().map(CoinId::serial).collect();
        assert_eq!(serials, vec![0, 1, 2]);
    }

    #[test]
    fn serials_survive_drain_and_remint() {
        let coord = GridCoord::new(1, 1);
        let mut cell = Cell::default();
        cell.mint(coord, 2);
        assert_eq!(cell.drain(), 2);

        cell.mint(coord, 2);
        let serials: Vec<u32> = cell.coins().iter().map(CoinId::serial).collect();
        assert_eq!(serials, vec![2, 3]);
    }

    #[test]
    fn snapshot_and_restore_round_trip() {
        let coord = GridCoord::new(-4, 9);
        let mut cell = Cell::default();
        cell.mint(coord, 4);

        let snapshot = cell.snapshot();
        cell.clear_coins();
        assert!(cell.coins().is_empty());

        cell.restore(snapshot);
        assert_eq!(cell.coins().len(), 4);
        assert_eq!(cell.minted(), 4);
    }
}
