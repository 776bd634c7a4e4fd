//! Catalog models.

use jiff::Timestamp;
use joinery::{items::ItemReference, pricing::Amount};

/// A priced catalog item.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub item: ItemReference,
    pub name: String,
    pub price: Amount,
    pub updated_at: Timestamp,
}

/// Payload for creating or repricing a catalog item.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCatalogEntry {
    pub item: ItemReference,
    pub name: String,
    pub price: Amount,
}

/// Live unit price for a single item.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PriceRecord {
    pub item: ItemReference,
    pub price: Amount,
}
