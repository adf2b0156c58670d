//! `degen-contract` — the reward token: ledger + store catalog + redemption.
//!
//! `DegenToken` is the pure aggregate (decide with `handle`, commit with
//! `apply`). `TokenService` is the public operation surface: it serializes
//! every mutation behind one lock spanning ledger and catalog, and publishes
//! committed events.

pub mod config;
pub mod redemption;
pub mod service;
pub mod token;

pub use config::TokenConfig;
pub use redemption::{Redemption, RedemptionEngine};
pub use service::{TokenEnvelope, TokenService};
pub use token::{
    AddStoreItem, Burn, Burned, DegenToken, ItemRedeemed, Mint, Minted, RedeemItem,
    StoreItemAdded, TokenCommand, TokenEvent, Transfer, Transferred,
};
