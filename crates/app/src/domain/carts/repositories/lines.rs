//! Cart Lines Repository

use joinery::cart::LineKey;
use sqlx::{FromRow, Postgres, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    columns::{
        encode_customization, encode_quantity, try_get_customization, try_get_item,
        try_get_quantity,
    },
    domain::carts::repositories::CartUuid,
};

const GET_LINES_SQL: &str = include_str!("../sql/get_lines.sql");
const UPSERT_LINE_SQL: &str = include_str!("../sql/upsert_line.sql");
const DELETE_LINE_SQL: &str = include_str!("../sql/delete_line.sql");
const CLEAR_LINES_SQL: &str = include_str!("../sql/clear_lines.sql");

/// A stored line, before prices are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CartLineRecord {
    pub key: LineKey,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartLinesRepository;

impl PgCartLinesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Vec<CartLineRecord>, sqlx::Error> {
        query_as::<Postgres, CartLineRecord>(GET_LINES_SQL)
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Insert the line, or overwrite the quantity of the line with the same identity.
    pub(crate) async fn upsert_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        key: &LineKey,
        quantity: u32,
    ) -> Result<(), sqlx::Error> {
        let item = key.item();

        query(UPSERT_LINE_SQL)
            .bind(Uuid::now_v7())
            .bind(cart.into_uuid())
            .bind(item.kind().as_str())
            .bind(item.uuid())
            .bind(encode_customization(key.customization())?)
            .bind(encode_quantity(quantity)?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn delete_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        key: &LineKey,
    ) -> Result<u64, sqlx::Error> {
        let item = key.item();

        let rows_affected = query(DELETE_LINE_SQL)
            .bind(cart.into_uuid())
            .bind(item.kind().as_str())
            .bind(item.uuid())
            .bind(encode_customization(key.customization())?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn clear_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_LINES_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartLineRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            key: LineKey::new(
                try_get_item(row)?,
                try_get_customization(row, "customization")?,
            ),
            quantity: try_get_quantity(row, "quantity")?,
        })
    }
}
