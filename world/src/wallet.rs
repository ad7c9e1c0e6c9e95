//! Player-held coin count and cumulative score counters.

use geocoin_core::WalletSnapshot;

/// Ledger tracking the player's coins, points, and lifetime deposits.
///
/// `coins` can never go negative: debits clamp to the balance before
/// mutating. `points` and `total_deposited` only ever grow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Wallet {
    coins: u32,
    points: u64,
    total_deposited: u64,
}

impl Wallet {
    /// Rebuilds a wallet from a persisted snapshot.
    pub(crate) fn from_snapshot(snapshot: WalletSnapshot) -> Self {
        Self {
            coins: snapshot.coins,
            points: snapshot.points,
            total_deposited: snapshot.total_deposited,
        }
    }

    /// Adds collected coins, crediting one point per coin.
    pub(crate) fn credit(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
        self.points = self.points.saturating_add(u64::from(amount));
    }

    /// Removes up to `requested` coins, returning the amount transferred.
    pub(crate) fn debit(&mut self, requested: u32) -> u32 {
        let amount = requested.min(self.coins);
        self.coins -= amount;
        self.total_deposited = self.total_deposited.saturating_add(u64::from(amount));
        amount
    }

    /// Forgets all progress, returning every counter to zero.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Captures the ledger as an immutable snapshot.
    pub(crate) fn snapshot(&self) -> WalletSnapshot {
        WalletSnapshot {
            coins: self.coins,
            points: self.points,
            total_deposited: self.total_deposited,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Wallet;

    #[test]
    fn credit_raises_coins_and_points_together() {
        let mut wallet = Wallet::default();
        wallet.credit(4);
        wallet.credit(2);

        let snapshot = wallet.snapshot();
        assert_eq!(snapshot.coins, 6);
        assert_eq!(snapshot.points, 6);
    }

    #[test]
    fn debit_clamps_to_balance() {
        let mut wallet = Wallet::default();
        wallet.credit(3);

        assert_eq!(wallet.debit(10), 3);
        let snapshot = wallet.snapshot();
        assert_eq!(snapshot.coins, 0);
        assert_eq!(snapshot.total_deposited, 3);
    }

    #[test]
    fn debit_on_empty_wallet_moves_nothing() {
        let mut wallet = Wallet::default();
        assert_eq!(wallet.debit(5), 0);
        assert_eq!(wallet.snapshot().total_deposited, 0);
    }

    #[test]
    fn points_survive_debits() {
        let mut wallet = Wallet::default();
        wallet.credit(5);
        let _ = wallet.debit(5);
        assert_eq!(wallet.snapshot().points, 5);
    }
}
