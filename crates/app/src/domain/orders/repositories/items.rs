//! Order Items Repository

use joinery::orders::{OrderItem, OrderUuid};
use rustc_hash::FxHashMap;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    columns::{encode_customization, encode_quantity, try_get_customization, try_get_item, try_get_quantity},
    currency::try_get_amount,
};

const INSERT_ORDER_ITEM_SQL: &str = include_str!("../sql/insert_order_item.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("../sql/get_order_items.sql");

#[derive(Debug, Clone)]
struct OrderItemRecord {
    order: Uuid,
    item: OrderItem,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderItemsRepository;

impl PgOrderItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Store the order's items in their original order. Rows are write-once.
    pub(crate) async fn insert_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        items: &[OrderItem],
    ) -> Result<(), sqlx::Error> {
        for (position, item) in items.iter().enumerate() {
            let position =
                i32::try_from(position).map_err(|error| sqlx::Error::Encode(Box::new(error)))?;

            query(INSERT_ORDER_ITEM_SQL)
                .bind(Uuid::now_v7())
                .bind(order.into_uuid())
                .bind(position)
                .bind(item.item.kind().as_str())
                .bind(item.item.uuid())
                .bind(encode_quantity(item.quantity)?)
                .bind(item.unit_price.to_minor_units())
                .bind(item.unit_price.currency().iso_alpha_code)
                .bind(encode_customization(&item.customization)?)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }

    /// Items of every order in `orders`, grouped by order and kept in position order.
    pub(crate) async fn get_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<FxHashMap<OrderUuid, Vec<OrderItem>>, sqlx::Error> {
        if orders.is_empty() {
            return Ok(FxHashMap::default());
        }

        let uuids: Vec<Uuid> = orders.iter().map(|order| order.into_uuid()).collect();

        let records = query_as::<Postgres, OrderItemRecord>(GET_ORDER_ITEMS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await?;

        let mut grouped: FxHashMap<OrderUuid, Vec<OrderItem>> = FxHashMap::default();

        for record in records {
            grouped
                .entry(OrderUuid::from_uuid(record.order))
                .or_default()
                .push(record.item);
        }

        Ok(grouped)
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            order: row.try_get("order_uuid")?,
            item: OrderItem {
                item: try_get_item(row)?,
                quantity: try_get_quantity(row, "quantity")?,
                unit_price: try_get_amount(row, "unit_price", "currency")?,
                customization: try_get_customization(row, "customization")?,
            },
        })
    }
}
