//! Token amounts in the ledger's minimal unit.

use serde::{Deserialize, Serialize};

use crate::ValueObject;

/// Number of display decimals. One minimal unit is a tenth of a token.
pub const DECIMALS: u8 = 1;

const UNITS_PER_TOKEN: u128 = 10;

/// Non-negative token amount, counted in minimal units.
///
/// Negative amounts are unrepresentable. Arithmetic is checked: callers turn a
/// `None` from `checked_add` into `LedgerError::Overflow` and a `None` from
/// `checked_sub` into `LedgerError::InsufficientBalance`.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u128);

impl ValueObject for Amount {}

impl Amount {
    pub const ZERO: Amount = Amount(0);
    pub const MAX: Amount = Amount(u128::MAX);

    pub const fn new(units: u128) -> Self {
        Self(units)
    }

    pub const fn units(self) -> u128 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// Render with `DECIMALS` fractional digits, e.g. `205` -> `"20.5"`.
    ///
    /// Presentation only; the ledger never rounds.
    pub fn to_display_string(self) -> String {
        format!("{}.{}", self.0 / UNITS_PER_TOKEN, self.0 % UNITS_PER_TOKEN)
    }
}

impl core::fmt::Display for Amount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(u128::from(value))
    }
}
