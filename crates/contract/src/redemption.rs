//! Exchanging balance for a store item.
//!
//! ```text
//! Available (exists, !redeemed) --redeem--> Redeemed (terminal)
//! ```

use serde::{Deserialize, Serialize};

use degen_core::{Amount, ItemId, LedgerError, LedgerResult, PrincipalId};
use degen_store::StoreCatalog;
use degen_token::TokenLedger;

/// A validated redemption: `account` pays `price` for `item_id`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redemption {
    pub item_id: ItemId,
    pub account: PrincipalId,
    pub price: Amount,
}

/// Joint view over the ledger and the catalog for the redemption transaction.
///
/// Holding both `&mut` borrows at once is what makes the debit and the
/// redeemed flag a single step: nothing else can observe one without the
/// other.
#[derive(Debug)]
pub struct RedemptionEngine<'a> {
    ledger: &'a mut TokenLedger,
    catalog: &'a mut StoreCatalog,
}

impl<'a> RedemptionEngine<'a> {
    pub fn new(ledger: &'a mut TokenLedger, catalog: &'a mut StoreCatalog) -> Self {
        Self { ledger, catalog }
    }

    /// Validate a redemption without touching state.
    ///
    /// Check order: existence, then redeemed flag, then balance.
    pub fn check(
        ledger: &TokenLedger,
        catalog: &StoreCatalog,
        account: PrincipalId,
        item_id: ItemId,
    ) -> LedgerResult<Redemption> {
        let entry = catalog.check_redeemable(item_id)?;
        ledger.check_debit(account, entry.price)?;

        Ok(Redemption {
            item_id,
            account,
            price: entry.price,
        })
    }

    /// Validate and commit in one go.
    pub fn redeem(&mut self, account: PrincipalId, item_id: ItemId) -> LedgerResult<Redemption> {
        let redemption = Self::check(&*self.ledger, &*self.catalog, account, item_id)?;
        self.commit(&redemption)?;
        Ok(redemption)
    }

    /// Commit a previously decided redemption.
    ///
    /// The checks are re-run against current state, and the recorded price
    /// must still match the entry, so a stale or forged `Redemption` is
    /// rejected before anything changes.
    pub fn commit(&mut self, redemption: &Redemption) -> LedgerResult<()> {
        let current = Self::check(
            &*self.ledger,
            &*self.catalog,
            redemption.account,
            redemption.item_id,
        )?;
        if current.price != redemption.price {
            return Err(LedgerError::invariant(format!(
                "price mismatch for store item {} (recorded: {}, current: {})",
                redemption.item_id, redemption.price, current.price
            )));
        }

        // Both steps were just validated against the same state.
        self.ledger.debit(redemption.account, redemption.price)?;
        self.catalog.mark_redeemed(redemption.item_id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        ledger: TokenLedger,
        catalog: StoreCatalog,
        x: PrincipalId,
    }

    fn fixture(balance: u64, prices: &[u64]) -> Fixture {
        let mut ledger = TokenLedger::new();
        let mut catalog = StoreCatalog::new();
        let x = PrincipalId::new();
        ledger.mint(x, Amount::from(balance)).unwrap();
        for (i, price) in prices.iter().enumerate() {
            catalog.add_entry(format!("item-{i}"), Amount::from(*price)).unwrap();
        }
        Fixture { ledger, catalog, x }
    }

    #[test]
    fn redeem_debits_price_and_flags_entry() {
        let mut f = fixture(200, &[200]);
        let id = ItemId::new(0);

        let r = RedemptionEngine::new(&mut f.ledger, &mut f.catalog)
            .redeem(f.x, id)
            .unwrap();

        assert_eq!(r.price, Amount::new(200));
        assert_eq!(f.ledger.balance_of(f.x), Amount::ZERO);
        assert_eq!(f.ledger.total_supply(), Amount::ZERO);
        assert!(f.catalog.get_entry(id).unwrap().redeemed);
    }

    #[test]
    fn insufficient_balance_leaves_everything_untouched() {
        let mut f = fixture(100, &[150]);
        let id = ItemId::new(0);

        let err = RedemptionEngine::new(&mut f.ledger, &mut f.catalog)
            .redeem(f.x, id)
            .unwrap_err();

        assert_eq!(err, LedgerError::insufficient(Amount::new(100), Amount::new(150)));
        assert_eq!(f.ledger.balance_of(f.x), Amount::new(100));
        assert!(!f.catalog.get_entry(id).unwrap().redeemed);
    }

    #[test]
    fn already_redeemed_wins_over_insufficient_balance() {
        let mut f = fixture(50, &[50]);
        let id = ItemId::new(0);
        RedemptionEngine::new(&mut f.ledger, &mut f.catalog)
            .redeem(f.x, id)
            .unwrap();

        // Balance is now 0 < 50, but the redeemed check runs first.
        let err = RedemptionEngine::check(&f.ledger, &f.catalog, f.x, id).unwrap_err();
        assert_eq!(err, LedgerError::ItemAlreadyRedeemed(id));
    }

    #[test]
    fn missing_item_is_not_available() {
        let f = fixture(100, &[]);
        let err = RedemptionEngine::check(&f.ledger, &f.catalog, f.x, ItemId::new(99)).unwrap_err();
        assert_eq!(err, LedgerError::ItemNotAvailable(ItemId::new(99)));
    }

    #[test]
    fn commit_rejects_a_redemption_with_a_different_price() {
        let mut f = fixture(500, &[100]);
        let forged = Redemption {
            item_id: ItemId::new(0),
            account: f.x,
            price: Amount::new(1),
        };

        let err = RedemptionEngine::new(&mut f.ledger, &mut f.catalog)
            .commit(&forged)
            .unwrap_err();

        assert!(matches!(err, LedgerError::InvariantViolation(_)));
        assert_eq!(f.ledger.balance_of(f.x), Amount::new(500));
        assert!(!f.catalog.get_entry(ItemId::new(0)).unwrap().redeemed);
    }
}
