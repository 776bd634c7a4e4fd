//! Column codecs shared by the repositories

use std::str::FromStr;

use joinery::{
    customization::Customization,
    items::{ItemKind, ItemReference},
};
use sqlx::{Row, postgres::PgRow};

/// Decode the `item_kind` / `item_uuid` column pair.
pub(crate) fn try_get_item(row: &PgRow) -> Result<ItemReference, sqlx::Error> {
    let kind: ItemKind = try_get_literal(row, "item_kind")?;

    Ok(ItemReference::from_parts(kind, row.try_get("item_uuid")?))
}

/// Decode a text column holding one literal of a closed set.
pub(crate) fn try_get_literal<T>(row: &PgRow, col: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.try_get(col)?;

    T::from_str(&raw).map_err(|source| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(source),
    })
}

/// Decode a non-negative `INTEGER` quantity column.
pub(crate) fn try_get_quantity(row: &PgRow, col: &str) -> Result<u32, sqlx::Error> {
    let quantity: i32 = row.try_get(col)?;

    u32::try_from(quantity).map_err(|source| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(source),
    })
}

/// Decode a customization stored as canonical JSON text.
pub(crate) fn try_get_customization(row: &PgRow, col: &str) -> Result<Customization, sqlx::Error> {
    let raw: String = row.try_get(col)?;

    serde_json::from_str(&raw).map_err(|source| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(source),
    })
}

/// Encode a customization as canonical JSON text.
///
/// Keys are written in a fixed order, so equal customizations always encode
/// to the same string and collide on unique indexes.
pub(crate) fn encode_customization(customization: &Customization) -> Result<String, sqlx::Error> {
    serde_json::to_string(customization).map_err(|error| sqlx::Error::Encode(Box::new(error)))
}

/// Narrow a line quantity to an `INTEGER` column.
pub(crate) fn encode_quantity(quantity: u32) -> Result<i32, sqlx::Error> {
    i32::try_from(quantity).map_err(|error| sqlx::Error::Encode(Box::new(error)))
}
