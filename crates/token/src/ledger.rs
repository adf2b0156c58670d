use std::collections::HashMap;

use degen_core::{Amount, LedgerError, LedgerResult, PrincipalId};

/// Per-account balances for one fungible asset.
///
/// Every mutating method validates fully before writing anything, so an
/// `Err` leaves the ledger exactly as it was. Balance entries are created on
/// first credit and never removed (they may sit at zero).
///
/// Invariant: `total_supply() == sum of all balances`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenLedger {
    balances: HashMap<PrincipalId, Amount>,
    total_supply: Amount,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance; zero for accounts never seen.
    pub fn balance_of(&self, account: PrincipalId) -> Amount {
        self.balances.get(&account).copied().unwrap_or(Amount::ZERO)
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Number of accounts with a balance entry (including zero balances).
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    /// Check that `amount` can be newly created in `to`'s balance.
    pub fn check_mint(&self, to: PrincipalId, amount: Amount) -> LedgerResult<()> {
        self.credited_balance(to, amount)?;
        self.total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    /// Check that `amount` can leave `from`'s balance.
    pub fn check_debit(&self, from: PrincipalId, amount: Amount) -> LedgerResult<()> {
        self.debited_balance(from, amount).map(|_| ())
    }

    /// Check that `amount` can move from `from` to `to`.
    pub fn check_transfer(&self, from: PrincipalId, to: PrincipalId, amount: Amount) -> LedgerResult<()> {
        self.check_debit(from, amount)?;
        if from != to {
            self.credited_balance(to, amount)?;
        }
        Ok(())
    }

    /// Create `amount` new units in `to`'s balance. Zero is a no-op credit.
    pub fn mint(&mut self, to: PrincipalId, amount: Amount) -> LedgerResult<()> {
        let new_balance = self.credited_balance(to, amount)?;
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        self.balances.insert(to, new_balance);
        self.total_supply = new_supply;
        Ok(())
    }

    /// Move `amount` from `from` to `to`.
    ///
    /// A self-transfer leaves the balance unchanged but still requires
    /// `balance >= amount`.
    pub fn transfer(&mut self, from: PrincipalId, to: PrincipalId, amount: Amount) -> LedgerResult<()> {
        let new_from = self.debited_balance(from, amount)?;
        if from == to {
            return Ok(());
        }
        let new_to = self.credited_balance(to, amount)?;

        self.balances.insert(from, new_from);
        self.balances.insert(to, new_to);
        Ok(())
    }

    /// Remove `amount` from `account` and from circulation.
    pub fn debit(&mut self, account: PrincipalId, amount: Amount) -> LedgerResult<()> {
        let new_balance = self.debited_balance(account, amount)?;
        // Supply >= any single balance, so this cannot underflow.
        let new_supply = self
            .total_supply
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::invariant("total supply below account balance"))?;

        self.balances.insert(account, new_balance);
        self.total_supply = new_supply;
        Ok(())
    }

    fn credited_balance(&self, to: PrincipalId, amount: Amount) -> LedgerResult<Amount> {
        self.balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)
    }

    fn debited_balance(&self, from: PrincipalId, amount: Amount) -> LedgerResult<Amount> {
        let have = self.balance_of(from);
        have.checked_sub(amount)
            .ok_or(LedgerError::insufficient(have, amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn amount(units: u128) -> Amount {
        Amount::new(units)
    }

    fn sum_of_balances(ledger: &TokenLedger, accounts: &[PrincipalId]) -> u128 {
        accounts.iter().map(|a| ledger.balance_of(*a).units()).sum()
    }

    #[test]
    fn unseen_account_has_zero_balance() {
        let ledger = TokenLedger::new();
        assert_eq!(ledger.balance_of(PrincipalId::new()), Amount::ZERO);
        assert_eq!(ledger.holder_count(), 0);
    }

    #[test]
    fn mint_credits_balance_and_supply() {
        let mut ledger = TokenLedger::new();
        let x = PrincipalId::new();

        ledger.mint(x, amount(200)).unwrap();
        ledger.mint(x, Amount::ZERO).unwrap();

        assert_eq!(ledger.balance_of(x), amount(200));
        assert_eq!(ledger.total_supply(), amount(200));
    }

    #[test]
    fn mint_overflow_fails_closed() {
        let mut ledger = TokenLedger::new();
        let x = PrincipalId::new();
        let y = PrincipalId::new();
        ledger.mint(x, Amount::MAX).unwrap();

        // Recipient balance fits, total supply does not.
        assert_eq!(ledger.mint(y, amount(1)), Err(LedgerError::Overflow));
        assert_eq!(ledger.balance_of(y), Amount::ZERO);
        assert_eq!(ledger.total_supply(), Amount::MAX);
    }

    #[test]
    fn transfer_moves_exact_amount() {
        let mut ledger = TokenLedger::new();
        let x = PrincipalId::new();
        let y = PrincipalId::new();
        ledger.mint(x, amount(100)).unwrap();

        ledger.transfer(x, y, amount(50)).unwrap();
        assert_eq!(ledger.balance_of(x), amount(50));
        assert_eq!(ledger.balance_of(y), amount(50));

        let err = ledger.transfer(x, y, amount(150)).unwrap_err();
        assert_eq!(err, LedgerError::insufficient(amount(50), amount(150)));
        assert_eq!(ledger.balance_of(x), amount(50));
        assert_eq!(ledger.balance_of(y), amount(50));
    }

    #[test]
    fn self_transfer_is_a_no_op_but_still_checked() {
        let mut ledger = TokenLedger::new();
        let x = PrincipalId::new();
        ledger.mint(x, amount(10)).unwrap();

        ledger.transfer(x, x, amount(10)).unwrap();
        assert_eq!(ledger.balance_of(x), amount(10));

        assert!(matches!(
            ledger.transfer(x, x, amount(11)),
            Err(LedgerError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn zero_transfer_from_empty_account_is_legal() {
        let mut ledger = TokenLedger::new();
        ledger
            .transfer(PrincipalId::new(), PrincipalId::new(), Amount::ZERO)
            .unwrap();
        assert_eq!(ledger.total_supply(), Amount::ZERO);
    }

    #[test]
    fn debit_removes_from_circulation() {
        let mut ledger = TokenLedger::new();
        let x = PrincipalId::new();
        ledger.mint(x, amount(200)).unwrap();

        ledger.debit(x, amount(200)).unwrap();
        assert_eq!(ledger.balance_of(x), Amount::ZERO);
        assert_eq!(ledger.total_supply(), Amount::ZERO);
        // The entry persists at zero.
        assert_eq!(ledger.holder_count(), 1);

        assert_eq!(
            ledger.debit(x, amount(1)),
            Err(LedgerError::insufficient(Amount::ZERO, amount(1)))
        );
    }

    #[derive(Debug, Clone)]
    enum Op {
        Mint(usize, u64),
        Transfer(usize, usize, u64),
        Debit(usize, u64),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..4, 0u64..1_000).prop_map(|(a, n)| Op::Mint(a, n)),
            (0usize..4, 0usize..4, 0u64..1_500).prop_map(|(a, b, n)| Op::Transfer(a, b, n)),
            (0usize..4, 0u64..1_500).prop_map(|(a, n)| Op::Debit(a, n)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: supply always equals the sum of balances, and a failed
        /// operation leaves the ledger untouched.
        #[test]
        fn supply_is_conserved_and_failures_are_side_effect_free(
            ops in prop::collection::vec(op_strategy(), 1..40)
        ) {
            let accounts: Vec<PrincipalId> = (0..4).map(|_| PrincipalId::new()).collect();
            let mut ledger = TokenLedger::new();

            for op in ops {
                let before = ledger.clone();
                let result = match op {
                    Op::Mint(a, n) => ledger.mint(accounts[a], Amount::from(n)),
                    Op::Transfer(a, b, n) => ledger.transfer(accounts[a], accounts[b], Amount::from(n)),
                    Op::Debit(a, n) => ledger.debit(accounts[a], Amount::from(n)),
                };
                if result.is_err() {
                    prop_assert_eq!(&ledger, &before);
                }
                prop_assert_eq!(ledger.total_supply().units(), sum_of_balances(&ledger, &accounts));
            }
        }

        #[test]
        fn check_transfer_agrees_with_transfer(
            minted in 0u64..1_000,
            amt in 0u64..2_000,
            same in any::<bool>(),
        ) {
            let mut ledger = TokenLedger::new();
            let x = PrincipalId::new();
            let y = if same { x } else { PrincipalId::new() };
            ledger.mint(x, Amount::from(minted)).unwrap();

            let checked = ledger.check_transfer(x, y, Amount::from(amt));
            let applied = ledger.transfer(x, y, Amount::from(amt));
            prop_assert_eq!(checked, applied);
        }
    }
}
