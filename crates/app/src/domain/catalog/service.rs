//! Catalog service.

use async_trait::async_trait;
use joinery::{items::ItemReference, pricing::Amount};
use mockall::automock;
use rustc_hash::FxHashMap;

use crate::{
    database::Db,
    domain::catalog::{
        errors::CatalogError,
        models::{CatalogEntry, NewCatalogEntry},
        repository::PgCatalogRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn set_price(&self, entry: NewCatalogEntry) -> Result<CatalogEntry, CatalogError> {
        let mut tx = self.db.begin().await?;

        let entry = self.repository.upsert_entry(&mut tx, &entry).await?;

        tx.commit().await?;

        tracing::info!(item = %entry.item, price = entry.price.to_minor_units(), "catalog price set");

        Ok(entry)
    }

    async fn get_price(&self, item: ItemReference) -> Result<Amount, CatalogError> {
        let mut tx = self.db.begin().await?;

        let prices = self.repository.get_prices(&mut tx, &[item]).await?;

        tx.commit().await?;

        prices.get(&item).copied().ok_or(CatalogError::NotFound)
    }

    async fn get_prices(
        &self,
        items: Vec<ItemReference>,
    ) -> Result<FxHashMap<ItemReference, Amount>, CatalogError> {
        let mut tx = self.db.begin().await?;

        let prices = self.repository.get_prices(&mut tx, &items).await?;

        tx.commit().await?;

        Ok(prices)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Create a catalog item or change its name and price.
    async fn set_price(&self, entry: NewCatalogEntry) -> Result<CatalogEntry, CatalogError>;

    /// Live price of a single item.
    async fn get_price(&self, item: ItemReference) -> Result<Amount, CatalogError>;

    /// Live prices of several items. Unknown items are left out.
    async fn get_prices(
        &self,
        items: Vec<ItemReference>,
    ) -> Result<FxHashMap<ItemReference, Amount>, CatalogError>;
}
