//! Orders Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use joinery::{
    authorization::UserUuid,
    orders::{
        ContactInfo, Order, OrderItem, OrderParts, OrderState, OrderStatus, OrderUuid,
        PaymentMethod, PaymentStatus, ShippingAddress,
    },
    pricing::Amount,
};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{columns::try_get_literal, currency::try_get_amount};

const INSERT_ORDER_SQL: &str = include_str!("../sql/insert_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const GET_ORDER_FOR_UPDATE_SQL: &str = include_str!("../sql/get_order_for_update.sql");
const LIST_ORDERS_BY_USER_SQL: &str = include_str!("../sql/list_orders_by_user.sql");
const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");
const UPDATE_ORDER_STATE_SQL: &str = include_str!("../sql/update_order_state.sql");

/// An order row without its items.
#[derive(Debug, Clone)]
pub(crate) struct OrderRecord {
    pub uuid: OrderUuid,
    pub user: UserUuid,
    pub shipping_address: ShippingAddress,
    pub contact_info: ContactInfo,
    pub total_amount: Amount,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub tracking_number: Option<String>,
    pub estimated_delivery: Option<Timestamp>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl OrderRecord {
    pub(crate) fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order::restore(OrderParts {
            uuid: self.uuid,
            user: self.user,
            items,
            shipping_address: self.shipping_address,
            contact_info: self.contact_info,
            total_amount: self.total_amount,
            payment_method: self.payment_method,
            payment_status: self.payment_status,
            order_status: self.order_status,
            tracking_number: self.tracking_number,
            estimated_delivery: self.estimated_delivery,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn insert_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &Order,
    ) -> Result<(), sqlx::Error> {
        let address = order.shipping_address();
        let contact = order.contact_info();

        query(INSERT_ORDER_SQL)
            .bind(order.uuid().into_uuid())
            .bind(order.user().into_uuid())
            .bind(&address.street)
            .bind(&address.city)
            .bind(&address.state)
            .bind(&address.country)
            .bind(&address.zip_code)
            .bind(&contact.phone)
            .bind(&contact.email)
            .bind(order.total_amount().to_minor_units())
            .bind(order.total_amount().currency().iso_alpha_code)
            .bind(order.payment_method().as_str())
            .bind(order.payment_status().as_str())
            .bind(order.order_status().as_str())
            .bind(order.tracking_number())
            .bind(order.estimated_delivery().map(SqlxTimestamp::from))
            .bind(order.notes())
            .bind(SqlxTimestamp::from(order.created_at()))
            .bind(SqlxTimestamp::from(order.updated_at()))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Read an order and hold its row lock until the transaction ends.
    pub(crate) async fn get_order_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_FOR_UPDATE_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// The user's orders, newest first.
    pub(crate) async fn list_orders_by_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_ORDERS_BY_USER_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Every order, newest first.
    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// Write the order's mutable fields, but only if its statuses still match
    /// `expected`. Returns the number of rows written: zero means another
    /// writer got there first.
    pub(crate) async fn update_state(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &Order,
        expected: OrderState,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_ORDER_STATE_SQL)
            .bind(order.uuid().into_uuid())
            .bind(order.order_status().as_str())
            .bind(order.payment_status().as_str())
            .bind(order.tracking_number())
            .bind(order.estimated_delivery().map(SqlxTimestamp::from))
            .bind(SqlxTimestamp::from(order.updated_at()))
            .bind(expected.order_status.as_str())
            .bind(expected.payment_status.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user: UserUuid::from_uuid(row.try_get("user_uuid")?),
            shipping_address: ShippingAddress {
                street: row.try_get("shipping_street")?,
                city: row.try_get("shipping_city")?,
                state: row.try_get("shipping_state")?,
                country: row.try_get("shipping_country")?,
                zip_code: row.try_get("shipping_zip_code")?,
            },
            contact_info: ContactInfo {
                phone: row.try_get("contact_phone")?,
                email: row.try_get("contact_email")?,
            },
            total_amount: try_get_amount(row, "total_amount", "currency")?,
            payment_method: try_get_literal(row, "payment_method")?,
            payment_status: try_get_literal(row, "payment_status")?,
            order_status: try_get_literal(row, "order_status")?,
            tracking_number: row.try_get("tracking_number")?,
            estimated_delivery: row
                .try_get::<Option<SqlxTimestamp>, _>("estimated_delivery")?
                .map(SqlxTimestamp::to_jiff),
            notes: row.try_get("notes")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
