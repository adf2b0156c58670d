//! Token ledger module (single fungible asset).
//!
//! Pure domain logic only: no IO, no locking, no logging. Owner gating for
//! `mint` is the caller's job (see `degen-auth`).

pub mod ledger;

pub use ledger::TokenLedger;
