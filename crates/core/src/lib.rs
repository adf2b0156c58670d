//! `degen-core` — ledger foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the token amount type, the shared error model and the
//! aggregate traits the token contract is built on.

pub mod aggregate;
pub mod amount;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use amount::{Amount, DECIMALS};
pub use entity::Entity;
pub use error::{LedgerError, LedgerResult};
pub use id::{ItemId, LedgerId, PrincipalId};
pub use value_object::ValueObject;
