use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use degen_auth::AccessControl;
use degen_core::{
    Aggregate, AggregateRoot, Amount, DECIMALS, ItemId, LedgerError, LedgerId, LedgerResult,
    PrincipalId,
};
use degen_events::Event;
use degen_store::{CatalogEntry, StoreCatalog};
use degen_token::TokenLedger;

use crate::config::TokenConfig;
use crate::redemption::{Redemption, RedemptionEngine};

/// Aggregate root: one token deployment (ledger + store catalog).
///
/// All state lives here so that a single lock around a `DegenToken` covers
/// every structure a command touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegenToken {
    id: LedgerId,
    name: String,
    symbol: String,
    access: AccessControl,
    ledger: TokenLedger,
    catalog: StoreCatalog,
    version: u64,
}

impl DegenToken {
    /// Construct a fresh deployment; `owner` is the constructing caller.
    pub fn new(id: LedgerId, config: &TokenConfig, owner: PrincipalId) -> LedgerResult<Self> {
        config.validate()?;
        Ok(Self {
            id,
            name: config.name.clone(),
            symbol: config.symbol.clone(),
            access: AccessControl::new(owner),
            ledger: TokenLedger::new(),
            catalog: StoreCatalog::new(),
            version: 0,
        })
    }

    /// Rebuild a deployment from its committed event history.
    pub fn rehydrate<'e>(
        id: LedgerId,
        config: &TokenConfig,
        owner: PrincipalId,
        events: impl IntoIterator<Item = &'e TokenEvent>,
    ) -> LedgerResult<Self> {
        let mut token = Self::new(id, config, owner)?;
        for event in events {
            token.apply(event)?;
        }
        Ok(token)
    }

    pub fn id_typed(&self) -> LedgerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        DECIMALS
    }

    pub fn owner(&self) -> PrincipalId {
        self.access.owner()
    }

    pub fn balance_of(&self, account: PrincipalId) -> Amount {
        self.ledger.balance_of(account)
    }

    pub fn total_supply(&self) -> Amount {
        self.ledger.total_supply()
    }

    pub fn store_item(&self, id: ItemId) -> LedgerResult<&CatalogEntry> {
        self.catalog.get_entry(id)
    }

    pub fn store_items(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.catalog.entries()
    }

    pub fn store_item_count(&self) -> usize {
        self.catalog.len()
    }
}

impl AggregateRoot for DegenToken {
    type Id = LedgerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: Mint (owner only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mint {
    pub caller: PrincipalId,
    pub to: PrincipalId,
    pub amount: Amount,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Transfer from the caller's balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub caller: PrincipalId,
    pub to: PrincipalId,
    pub amount: Amount,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Burn from the caller's balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Burn {
    pub caller: PrincipalId,
    pub amount: Amount,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddStoreItem (owner only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddStoreItem {
    pub caller: PrincipalId,
    pub name: String,
    pub price: Amount,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RedeemItem for the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemItem {
    pub caller: PrincipalId,
    pub item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenCommand {
    Mint(Mint),
    Transfer(Transfer),
    Burn(Burn),
    AddStoreItem(AddStoreItem),
    RedeemItem(RedeemItem),
}

impl TokenCommand {
    pub fn name(&self) -> &'static str {
        match self {
            TokenCommand::Mint(_) => "mint",
            TokenCommand::Transfer(_) => "transfer",
            TokenCommand::Burn(_) => "burn",
            TokenCommand::AddStoreItem(_) => "add_store_item",
            TokenCommand::RedeemItem(_) => "redeem_item",
        }
    }

    pub fn caller(&self) -> PrincipalId {
        match self {
            TokenCommand::Mint(c) => c.caller,
            TokenCommand::Transfer(c) => c.caller,
            TokenCommand::Burn(c) => c.caller,
            TokenCommand::AddStoreItem(c) => c.caller,
            TokenCommand::RedeemItem(c) => c.caller,
        }
    }
}

/// Event: Minted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Minted {
    pub to: PrincipalId,
    pub amount: Amount,
    pub occurred_at: DateTime<Utc>,
}

/// Event: Transferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transferred {
    pub from: PrincipalId,
    pub to: PrincipalId,
    pub amount: Amount,
    pub occurred_at: DateTime<Utc>,
}

/// Event: Burned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Burned {
    pub from: PrincipalId,
    pub amount: Amount,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StoreItemAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreItemAdded {
    pub item_id: ItemId,
    pub name: String,
    pub price: Amount,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemRedeemed. `price` left circulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRedeemed {
    pub item_id: ItemId,
    pub account: PrincipalId,
    pub price: Amount,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenEvent {
    Minted(Minted),
    Transferred(Transferred),
    Burned(Burned),
    StoreItemAdded(StoreItemAdded),
    ItemRedeemed(ItemRedeemed),
}

impl Event for TokenEvent {
    fn event_type(&self) -> &'static str {
        match self {
            TokenEvent::Minted(_) => "token.minted",
            TokenEvent::Transferred(_) => "token.transferred",
            TokenEvent::Burned(_) => "token.burned",
            TokenEvent::StoreItemAdded(_) => "store.item_added",
            TokenEvent::ItemRedeemed(_) => "store.item_redeemed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            TokenEvent::Minted(e) => e.occurred_at,
            TokenEvent::Transferred(e) => e.occurred_at,
            TokenEvent::Burned(e) => e.occurred_at,
            TokenEvent::StoreItemAdded(e) => e.occurred_at,
            TokenEvent::ItemRedeemed(e) => e.occurred_at,
        }
    }
}

impl Aggregate for DegenToken {
    type Command = TokenCommand;
    type Event = TokenEvent;
    type Error = LedgerError;

    fn apply(&mut self, event: &Self::Event) -> Result<(), Self::Error> {
        match event {
            TokenEvent::Minted(e) => self.ledger.mint(e.to, e.amount)?,
            TokenEvent::Transferred(e) => self.ledger.transfer(e.from, e.to, e.amount)?,
            TokenEvent::Burned(e) => self.ledger.debit(e.from, e.amount)?,
            TokenEvent::StoreItemAdded(e) => {
                let expected = self.catalog.next_id()?;
                if expected != e.item_id {
                    return Err(LedgerError::invariant(format!(
                        "store item id out of sequence (expected: {expected}, event: {})",
                        e.item_id
                    )));
                }
                self.catalog.add_entry(e.name.clone(), e.price)?;
            }
            TokenEvent::ItemRedeemed(e) => {
                RedemptionEngine::new(&mut self.ledger, &mut self.catalog).commit(&Redemption {
                    item_id: e.item_id,
                    account: e.account,
                    price: e.price,
                })?;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
        Ok(())
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            TokenCommand::Mint(cmd) => self.handle_mint(cmd),
            TokenCommand::Transfer(cmd) => self.handle_transfer(cmd),
            TokenCommand::Burn(cmd) => self.handle_burn(cmd),
            TokenCommand::AddStoreItem(cmd) => self.handle_add_store_item(cmd),
            TokenCommand::RedeemItem(cmd) => self.handle_redeem(cmd),
        }
    }
}

impl DegenToken {
    fn handle_mint(&self, cmd: &Mint) -> LedgerResult<Vec<TokenEvent>> {
        self.access.require_owner(cmd.caller)?;
        self.ledger.check_mint(cmd.to, cmd.amount)?;

        Ok(vec![TokenEvent::Minted(Minted {
            to: cmd.to,
            amount: cmd.amount,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_transfer(&self, cmd: &Transfer) -> LedgerResult<Vec<TokenEvent>> {
        self.ledger.check_transfer(cmd.caller, cmd.to, cmd.amount)?;

        Ok(vec![TokenEvent::Transferred(Transferred {
            from: cmd.caller,
            to: cmd.to,
            amount: cmd.amount,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_burn(&self, cmd: &Burn) -> LedgerResult<Vec<TokenEvent>> {
        self.ledger.check_debit(cmd.caller, cmd.amount)?;

        Ok(vec![TokenEvent::Burned(Burned {
            from: cmd.caller,
            amount: cmd.amount,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_add_store_item(&self, cmd: &AddStoreItem) -> LedgerResult<Vec<TokenEvent>> {
        self.access.require_owner(cmd.caller)?;
        let item_id = self.catalog.check_entry(&cmd.name)?;

        Ok(vec![TokenEvent::StoreItemAdded(StoreItemAdded {
            item_id,
            name: cmd.name.clone(),
            price: cmd.price,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_redeem(&self, cmd: &RedeemItem) -> LedgerResult<Vec<TokenEvent>> {
        let redemption =
            RedemptionEngine::check(&self.ledger, &self.catalog, cmd.caller, cmd.item_id)?;

        Ok(vec![TokenEvent::ItemRedeemed(ItemRedeemed {
            item_id: redemption.item_id,
            account: redemption.account,
            price: redemption.price,
            occurred_at: cmd.occurred_at,
        })])
    }
}
