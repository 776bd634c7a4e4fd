//! Catalog Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use joinery::{
    items::{ItemKind, ItemReference},
    pricing::Amount,
};
use rustc_hash::FxHashMap;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::{
    columns::try_get_item,
    currency::try_get_amount,
    domain::catalog::models::{CatalogEntry, NewCatalogEntry, PriceRecord},
};

const GET_PRICES_SQL: &str = include_str!("sql/get_prices.sql");
const UPSERT_PRODUCT_SQL: &str = include_str!("sql/upsert_product.sql");
const UPSERT_DESIGN_SQL: &str = include_str!("sql/upsert_design.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Live prices for `items`. Items that are unknown or deleted are absent
    /// from the returned map.
    pub(crate) async fn get_prices(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        items: &[ItemReference],
    ) -> Result<FxHashMap<ItemReference, Amount>, sqlx::Error> {
        if items.is_empty() {
            return Ok(FxHashMap::default());
        }

        let (products, designs): (Vec<ItemReference>, Vec<ItemReference>) = items
            .iter()
            .partition(|item| item.kind() == ItemKind::Product);

        let products: Vec<Uuid> = products.iter().map(ItemReference::uuid).collect();
        let designs: Vec<Uuid> = designs.iter().map(ItemReference::uuid).collect();

        let records = query_as::<Postgres, PriceRecord>(GET_PRICES_SQL)
            .bind(products)
            .bind(designs)
            .fetch_all(&mut **tx)
            .await?;

        Ok(records
            .into_iter()
            .map(|record| (record.item, record.price))
            .collect())
    }

    pub(crate) async fn upsert_entry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entry: &NewCatalogEntry,
    ) -> Result<CatalogEntry, sqlx::Error> {
        let sql = match entry.item {
            ItemReference::Product(_) => UPSERT_PRODUCT_SQL,
            ItemReference::Design(_) => UPSERT_DESIGN_SQL,
        };

        query_as::<Postgres, CatalogEntry>(sql)
            .bind(entry.item.uuid())
            .bind(&entry.name)
            .bind(entry.price.to_minor_units())
            .bind(entry.price.currency().iso_alpha_code)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for PriceRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            item: try_get_item(row)?,
            price: try_get_amount(row, "price", "currency")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CatalogEntry {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            item: try_get_item(row)?,
            name: row.try_get("name")?,
            price: try_get_amount(row, "price", "currency")?,
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
