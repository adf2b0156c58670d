//! Public operation surface for one token deployment.
//!
//! ```text
//! caller
//!   ↓
//! write lock (ledger + catalog together)
//!   ↓
//! handle (validate, no mutation) → apply (commit) → publish envelope
//!   ↓
//! unlock
//! ```
//!
//! Reads share the lock and therefore never see a half-applied command.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use uuid::Uuid;

use degen_core::{
    Aggregate, AggregateRoot, Amount, DECIMALS, ItemId, LedgerError, LedgerId, LedgerResult,
    PrincipalId,
};
use degen_events::{Event, EventBus, EventEnvelope, InMemoryEventBus, Subscription};
use degen_store::CatalogEntry;

use crate::config::TokenConfig;
use crate::token::{
    AddStoreItem, Burn, DegenToken, Mint, RedeemItem, TokenCommand, TokenEvent, Transfer,
};

/// Envelope type published for every committed command.
pub type TokenEnvelope = EventEnvelope<TokenEvent>;

/// Thread-safe handle to a token deployment.
///
/// Every caller identity is an explicit argument; there is no ambient
/// "current caller". Independent deployments are independent values.
#[derive(Debug)]
pub struct TokenService<B = InMemoryEventBus<TokenEnvelope>> {
    ledger_id: LedgerId,
    state: RwLock<DegenToken>,
    bus: B,
}

impl TokenService {
    /// Deploy a token with an in-memory event bus. `owner` is the deployer.
    pub fn deploy(config: &TokenConfig, owner: PrincipalId) -> LedgerResult<Self> {
        Self::with_bus(config, owner, InMemoryEventBus::new())
    }
}

impl<B> TokenService<B>
where
    B: EventBus<TokenEnvelope>,
{
    pub fn with_bus(config: &TokenConfig, owner: PrincipalId, bus: B) -> LedgerResult<Self> {
        Ok(Self::from_state(
            DegenToken::new(LedgerId::new(), config, owner)?,
            bus,
        ))
    }

    /// Serve an existing aggregate, e.g. one rebuilt with `DegenToken::rehydrate`.
    pub fn from_state(state: DegenToken, bus: B) -> Self {
        let ledger_id = state.id_typed();
        tracing::info!(
            %ledger_id,
            owner = %state.owner(),
            name = state.name(),
            symbol = state.symbol(),
            "token deployed"
        );
        Self {
            ledger_id,
            state: RwLock::new(state),
            bus,
        }
    }

    pub fn ledger_id(&self) -> LedgerId {
        self.ledger_id
    }

    pub fn name(&self) -> String {
        self.read().name().to_string()
    }

    pub fn symbol(&self) -> String {
        self.read().symbol().to_string()
    }

    pub fn decimals(&self) -> u8 {
        DECIMALS
    }

    pub fn owner(&self) -> PrincipalId {
        self.read().owner()
    }

    pub fn total_supply(&self) -> Amount {
        self.read().total_supply()
    }

    pub fn balance_of(&self, account: PrincipalId) -> Amount {
        self.read().balance_of(account)
    }

    pub fn get_store_item(&self, item_id: ItemId) -> LedgerResult<CatalogEntry> {
        self.read().store_item(item_id).cloned()
    }

    pub fn store_item_count(&self) -> usize {
        self.read().store_item_count()
    }

    pub fn list_store_items(&self) -> Vec<CatalogEntry> {
        self.read().store_items().cloned().collect()
    }

    /// Consistent copy of the whole aggregate.
    pub fn snapshot(&self) -> DegenToken {
        self.read().clone()
    }

    /// Receive every event committed after this call.
    pub fn subscribe(&self) -> Subscription<TokenEnvelope> {
        self.bus.subscribe()
    }

    pub fn mint(&self, caller: PrincipalId, to: PrincipalId, amount: Amount) -> LedgerResult<()> {
        self.execute(TokenCommand::Mint(Mint {
            caller,
            to,
            amount,
            occurred_at: Utc::now(),
        }))
        .map(|_| ())
    }

    /// Transfer from `caller` to `to`.
    pub fn transfer(&self, caller: PrincipalId, to: PrincipalId, amount: Amount) -> LedgerResult<()> {
        self.execute(TokenCommand::Transfer(Transfer {
            caller,
            to,
            amount,
            occurred_at: Utc::now(),
        }))
        .map(|_| ())
    }

    /// Destroy `amount` of the caller's own balance.
    pub fn burn(&self, caller: PrincipalId, amount: Amount) -> LedgerResult<()> {
        self.execute(TokenCommand::Burn(Burn {
            caller,
            amount,
            occurred_at: Utc::now(),
        }))
        .map(|_| ())
    }

    pub fn add_store_item(
        &self,
        caller: PrincipalId,
        name: impl Into<String>,
        price: Amount,
    ) -> LedgerResult<ItemId> {
        let events = self.execute(TokenCommand::AddStoreItem(AddStoreItem {
            caller,
            name: name.into(),
            price,
            occurred_at: Utc::now(),
        }))?;

        events
            .iter()
            .find_map(|event| match event {
                TokenEvent::StoreItemAdded(e) => Some(e.item_id),
                _ => None,
            })
            .ok_or_else(|| LedgerError::invariant("add_store_item committed no StoreItemAdded event"))
    }

    pub fn redeem_token_for_item(&self, caller: PrincipalId, item_id: ItemId) -> LedgerResult<()> {
        self.execute(TokenCommand::RedeemItem(RedeemItem {
            caller,
            item_id,
            occurred_at: Utc::now(),
        }))
        .map(|_| ())
    }

    #[tracing::instrument(
        level = "debug",
        skip(self, command),
        fields(
            ledger_id = %self.ledger_id,
            command = command.name(),
            caller = %command.caller()
        )
    )]
    fn execute(&self, command: TokenCommand) -> LedgerResult<Vec<TokenEvent>> {
        let mut state = self.write();

        let events = state.handle(&command).inspect_err(|err| {
            tracing::debug!(error = %err, "command rejected");
        })?;

        for event in &events {
            state.apply(event).inspect_err(|err| {
                tracing::error!(
                    error = %err,
                    event_type = event.event_type(),
                    "apply failed after successful handle"
                );
            })?;

            let envelope = EventEnvelope::new(
                Uuid::now_v7(),
                self.ledger_id,
                state.version(),
                event.clone(),
            );
            // Still under the write lock, so subscribers see commit order.
            if let Err(err) = self.bus.publish(envelope) {
                tracing::warn!(
                    error = ?err,
                    event_type = event.event_type(),
                    "failed to publish committed event"
                );
            }

            tracing::info!(
                event_type = event.event_type(),
                version = state.version(),
                "event committed"
            );
        }

        Ok(events)
    }

    // Every mutation validates before writing, so state behind a poisoned
    // lock is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, DegenToken> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DegenToken> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
