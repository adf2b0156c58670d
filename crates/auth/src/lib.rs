//! `degen-auth` — owner capability checks for the token contract.
//!
//! This crate is intentionally decoupled from transport and storage: the
//! calling identity is always an explicit argument, never ambient state.

pub mod access;

pub use access::AccessControl;
