use serde::{Deserialize, Serialize};

use degen_core::{Amount, Entity, ItemId, LedgerError, LedgerResult};

/// A redeemable store item.
///
/// Immutable except for `redeemed`, which flips `false -> true` exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: ItemId,
    pub name: String,
    pub price: Amount,
    /// Always `true` for appended entries; kept so a future soft-delete can
    /// hide an entry without reusing its id.
    pub exists: bool,
    #[serde(rename = "isRedeemed")]
    pub redeemed: bool,
}

impl Entity for CatalogEntry {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Ordered list of catalog entries. Ids are positions in the list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreCatalog {
    entries: Vec<CatalogEntry>,
}

impl StoreCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in id order.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// The id the next `add_entry` call will assign.
    pub fn next_id(&self) -> LedgerResult<ItemId> {
        u64::try_from(self.entries.len())
            .map(ItemId::new)
            .map_err(|_| LedgerError::Overflow)
    }

    /// Validate a prospective entry without appending it.
    pub fn check_entry(&self, name: &str) -> LedgerResult<ItemId> {
        if name.trim().is_empty() {
            return Err(LedgerError::invalid_argument("item name cannot be empty"));
        }
        self.next_id()
    }

    /// Append a new, unredeemed entry and return its id.
    pub fn add_entry(&mut self, name: impl Into<String>, price: Amount) -> LedgerResult<ItemId> {
        let name = name.into();
        let id = self.check_entry(&name)?;

        self.entries.push(CatalogEntry {
            id,
            name,
            price,
            exists: true,
            redeemed: false,
        });
        Ok(id)
    }

    /// Look up an entry; out-of-range or non-existent ids are `ItemNotAvailable`.
    pub fn get_entry(&self, id: ItemId) -> LedgerResult<&CatalogEntry> {
        id.index()
            .and_then(|idx| self.entries.get(idx))
            .filter(|entry| entry.exists)
            .ok_or(LedgerError::ItemNotAvailable(id))
    }

    /// Look up an entry that can still be redeemed.
    ///
    /// Check order: existence first, then the redeemed flag.
    pub fn check_redeemable(&self, id: ItemId) -> LedgerResult<&CatalogEntry> {
        let entry = self.get_entry(id)?;
        if entry.redeemed {
            return Err(LedgerError::ItemAlreadyRedeemed(id));
        }
        Ok(entry)
    }

    /// Flip the redeemed flag. Fails without effect if the entry is missing or
    /// already redeemed.
    pub fn mark_redeemed(&mut self, id: ItemId) -> LedgerResult<()> {
        self.check_redeemable(id)?;
        if let Some(entry) = id.index().and_then(|idx| self.entries.get_mut(idx)) {
            entry.redeemed = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn boots() -> StoreCatalog {
        let mut catalog = StoreCatalog::new();
        for (name, price) in [("Golden Boot", 200u64), ("Silver Boot", 150), ("Bronze Boot", 100)] {
            catalog.add_entry(name, Amount::from(price)).unwrap();
        }
        catalog
    }

    #[test]
    fn entries_get_sequential_ids_in_insertion_order() {
        let catalog = boots();
        let ids: Vec<u64> = catalog.entries().map(|e| e.id.get()).collect();
        assert_eq!(ids, vec![0, 1, 2]);

        let silver = catalog.get_entry(ItemId::new(1)).unwrap();
        assert_eq!(silver.name, "Silver Boot");
        assert_eq!(silver.price, Amount::new(150));
        assert!(silver.exists);
        assert!(!silver.redeemed);
    }

    #[test]
    fn empty_name_is_rejected_before_appending() {
        let mut catalog = StoreCatalog::new();
        assert!(matches!(
            catalog.add_entry("   ", Amount::new(10)),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(catalog.is_empty());
    }

    #[test]
    fn zero_price_is_allowed() {
        let mut catalog = StoreCatalog::new();
        let id = catalog.add_entry("Sticker", Amount::ZERO).unwrap();
        assert_eq!(catalog.get_entry(id).unwrap().price, Amount::ZERO);
    }

    #[test]
    fn unknown_id_is_not_available() {
        let catalog = boots();
        assert_eq!(
            catalog.get_entry(ItemId::new(99)).unwrap_err(),
            LedgerError::ItemNotAvailable(ItemId::new(99))
        );
        assert_eq!(
            catalog.get_entry(ItemId::new(u64::MAX)).unwrap_err(),
            LedgerError::ItemNotAvailable(ItemId::new(u64::MAX))
        );
    }

    #[test]
    fn redeemed_flag_flips_exactly_once() {
        let mut catalog = boots();
        let id = ItemId::new(0);

        catalog.mark_redeemed(id).unwrap();
        assert!(catalog.get_entry(id).unwrap().redeemed);
        assert_eq!(catalog.mark_redeemed(id), Err(LedgerError::ItemAlreadyRedeemed(id)));
        assert!(!catalog.get_entry(ItemId::new(1)).unwrap().redeemed);
    }

    #[test]
    fn snapshot_uses_the_store_item_wire_shape() {
        let catalog = boots();
        let json = serde_json::to_value(catalog.get_entry(ItemId::new(2)).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 2,
                "name": "Bronze Boot",
                "price": 100,
                "exists": true,
                "isRedeemed": false,
            })
        );
    }

    proptest! {
        #[test]
        fn ids_match_positions(names in prop::collection::vec("[a-z]{1,8}", 0..20)) {
            let mut catalog = StoreCatalog::new();
            for (i, name) in names.iter().enumerate() {
                let id = catalog.add_entry(name.as_str(), Amount::from(i as u64)).unwrap();
                prop_assert_eq!(id.get(), i as u64);
            }
            prop_assert_eq!(catalog.len(), names.len());
        }
    }
}
