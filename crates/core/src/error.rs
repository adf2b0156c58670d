//! Ledger error model.

use thiserror::Error;

use crate::{Amount, ItemId};

/// Result type used across the ledger crates.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error.
///
/// Every variant is raised before any state is touched: a failed operation
/// has no observable effect.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The caller is not the owner of the token.
    #[error("caller is not the owner")]
    NotOwner,

    /// A debit or transfer would take a balance below zero.
    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: Amount, need: Amount },

    /// The referenced catalog entry does not exist.
    #[error("store item {0} is not available")]
    ItemNotAvailable(ItemId),

    /// The referenced catalog entry has already been redeemed.
    #[error("store item {0} has already been redeemed")]
    ItemAlreadyRedeemed(ItemId),

    /// A mutation would exceed the representable amount range.
    #[error("arithmetic overflow")]
    Overflow,

    /// Malformed input (empty name, unparsable identifier, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A replayed event contradicts the current state.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl LedgerError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn insufficient(have: Amount, need: Amount) -> Self {
        Self::InsufficientBalance { have, need }
    }
}
