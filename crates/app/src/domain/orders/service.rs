//! Orders service.

use async_trait::async_trait;
use jiff::Timestamp;
use joinery::{
    authorization::{AdminGrant, Authorization},
    cart::MAX_LINE_QUANTITY,
    customization::Customization,
    items::ItemReference,
    orders::{
        Order, OrderDraft, OrderItem, OrderSnapshot, OrderState, OrderUuid, StatusField,
        StatusUpdate, TransitionError, TransitionKind, ValidationError,
    },
};
use mockall::automock;
use rusty_money::iso::Currency;
use sqlx::{Postgres, Transaction};

use crate::{
    database::Db,
    domain::{
        carts::{PgCartLinesRepository, PgCartsRepository},
        catalog::PgCatalogRepository,
        orders::{
            errors::OrdersServiceError,
            models::{NewOrder, NewOrderLine, OrderSource, OrderTransition, StatusUpdateOutcome},
            repositories::{
                NewTransition, OrderRecord, PgOrderItemsRepository, PgOrderTransitionsRepository,
                PgOrdersRepository,
            },
        },
    },
};

/// An unpriced order line.
struct PendingItem {
    item: ItemReference,
    quantity: u32,
    customization: Customization,
}

impl TryFrom<NewOrderLine> for PendingItem {
    type Error = ValidationError;

    fn try_from(line: NewOrderLine) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(line.quantity)
            .ok()
            .filter(|quantity| (1..=MAX_LINE_QUANTITY).contains(quantity))
            .ok_or(ValidationError::InvalidQuantity(line.quantity))?;

        Ok(Self {
            item: line.item,
            quantity,
            customization: line.customization,
        })
    }
}

/// [`OrdersService`] over PostgreSQL.
///
/// Mutations lock the order row and then write with a compare-and-set on the
/// two status columns.
#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    currency: &'static Currency,
    orders_repository: PgOrdersRepository,
    items_repository: PgOrderItemsRepository,
    transitions_repository: PgOrderTransitionsRepository,
    carts_repository: PgCartsRepository,
    cart_lines_repository: PgCartLinesRepository,
    catalog_repository: PgCatalogRepository,
}

impl PgOrdersService {
    /// Build the service over `db`, pricing orders in `currency`.
    #[must_use]
    pub fn new(db: Db, currency: &'static Currency) -> Self {
        Self {
            db,
            currency,
            orders_repository: PgOrdersRepository::new(),
            items_repository: PgOrderItemsRepository::new(),
            transitions_repository: PgOrderTransitionsRepository::new(),
            carts_repository: PgCartsRepository::new(),
            cart_lines_repository: PgCartLinesRepository::new(),
            catalog_repository: PgCatalogRepository::new(),
        }
    }

    async fn load_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        let record = self.orders_repository.get_order(tx, uuid).await?;

        self.with_items(tx, record).await
    }

    /// Load an order for mutation. Concurrent writers queue on the row lock,
    /// so every column written back reflects the latest commit.
    async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        let record = self.orders_repository.get_order_for_update(tx, uuid).await?;

        self.with_items(tx, record).await
    }

    async fn with_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        record: OrderRecord,
    ) -> Result<Order, OrdersServiceError> {
        let uuid = record.uuid;
        let mut items = self.items_repository.get_items(tx, &[uuid]).await?;

        Ok(record.into_order(items.remove(&uuid).unwrap_or_default()))
    }

    async fn attach_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        records: Vec<OrderRecord>,
    ) -> Result<Vec<Order>, OrdersServiceError> {
        let uuids: Vec<OrderUuid> = records.iter().map(|record| record.uuid).collect();
        let mut items = self.items_repository.get_items(tx, &uuids).await?;

        Ok(records
            .into_iter()
            .map(|record| {
                let order_items = items.remove(&record.uuid).unwrap_or_default();

                record.into_order(order_items)
            })
            .collect())
    }

    /// Price `pending` at live catalog prices and freeze the result.
    async fn snapshot(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        pending: Vec<PendingItem>,
    ) -> Result<OrderSnapshot, OrdersServiceError> {
        let references: Vec<ItemReference> = pending.iter().map(|item| item.item).collect();
        let prices = self.catalog_repository.get_prices(tx, &references).await?;

        let items = pending
            .into_iter()
            .map(|pending| {
                let unit_price = prices
                    .get(&pending.item)
                    .copied()
                    .ok_or(OrdersServiceError::UnknownItem(pending.item))?;

                Ok(OrderItem {
                    item: pending.item,
                    quantity: pending.quantity,
                    unit_price,
                    customization: pending.customization,
                })
            })
            .collect::<Result<Vec<_>, OrdersServiceError>>()?;

        Ok(OrderSnapshot::new(self.currency, items)?)
    }

    /// Persist `order` only if its statuses still match what was read.
    async fn write_state(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &Order,
        expected: OrderState,
    ) -> Result<(), OrdersServiceError> {
        let rows_affected = self
            .orders_repository
            .update_state(tx, order, expected)
            .await?;

        if rows_affected == 0 {
            return Err(OrdersServiceError::IllegalTransition(
                TransitionError::Superseded,
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn create_order(
        &self,
        auth: Authorization,
        order: NewOrder,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self.carts_repository.lock_cart(&mut tx, auth.user()).await?;

        let pending = match order.source {
            OrderSource::Cart => self
                .cart_lines_repository
                .get_lines(&mut tx, cart)
                .await?
                .into_iter()
                .map(|record| PendingItem {
                    item: record.key.item(),
                    quantity: record.quantity,
                    customization: record.key.customization().clone(),
                })
                .collect(),
            OrderSource::Lines(lines) => lines
                .into_iter()
                .map(PendingItem::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map_err(OrdersServiceError::Validation)?,
        };

        let snapshot = self.snapshot(&mut tx, pending).await?;
        let now = Timestamp::now();

        let placed = Order::place(
            OrderUuid::new(),
            OrderDraft {
                user: auth.user(),
                snapshot,
                shipping_address: order.shipping_address,
                contact_info: order.contact_info,
                payment_method: order.payment_method,
                notes: order.notes,
            },
            now,
        )?;

        self.orders_repository.insert_order(&mut tx, &placed).await?;

        self.items_repository
            .insert_items(&mut tx, placed.uuid(), placed.items())
            .await?;

        self.transitions_repository
            .insert_transition(
                &mut tx,
                NewTransition {
                    order: placed.uuid(),
                    actor: auth.user(),
                    field: StatusField::OrderStatus,
                    from: None,
                    to: placed.order_status().as_str(),
                    kind: TransitionKind::Place,
                    at: now,
                },
            )
            .await?;

        self.cart_lines_repository.clear_lines(&mut tx, cart).await?;

        tx.commit().await?;

        tracing::info!(
            order_uuid = %placed.uuid(),
            user_uuid = %placed.user(),
            total_amount = placed.total_amount().to_minor_units(),
            items = placed.items().len(),
            "order placed"
        );

        Ok(placed)
    }

    async fn list_own_orders(&self, auth: Authorization) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let records = self
            .orders_repository
            .list_orders_by_user(&mut tx, auth.user())
            .await?;

        let orders = self.attach_items(&mut tx, records).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn get_order(
        &self,
        auth: Authorization,
        uuid: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.load_order(&mut tx, uuid).await?;

        tx.commit().await?;

        order.authorize(&auth)?;

        Ok(order)
    }

    async fn cancel_order(
        &self,
        auth: Authorization,
        uuid: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut order = self.lock_order(&mut tx, uuid).await?;
        let expected = order.state();
        let now = Timestamp::now();

        let change = order.cancel(&auth, now)?;

        self.write_state(&mut tx, &order, expected).await?;

        self.transitions_repository
            .insert_transition(
                &mut tx,
                NewTransition::from_change(uuid, auth.user(), &change, now),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(order_uuid = %uuid, user_uuid = %auth.user(), "order cancelled");

        Ok(order)
    }

    async fn update_status(
        &self,
        grant: AdminGrant,
        uuid: OrderUuid,
        update: StatusUpdate,
    ) -> Result<StatusUpdateOutcome, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut order = self.lock_order(&mut tx, uuid).await?;
        let expected = order.state();
        let now = Timestamp::now();

        let changes = order.update_status(grant, &update, now)?;

        self.write_state(&mut tx, &order, expected).await?;

        for change in &changes {
            self.transitions_repository
                .insert_transition(
                    &mut tx,
                    NewTransition::from_change(uuid, grant.admin(), change, now),
                )
                .await?;
        }

        tx.commit().await?;

        for change in &changes {
            if change.kind() == TransitionKind::Skip {
                tracing::warn!(
                    order_uuid = %uuid,
                    from = change.old_value(),
                    to = change.new_value(),
                    "order status skipped intermediate states"
                );
            } else {
                tracing::info!(
                    order_uuid = %uuid,
                    field = change.field().as_str(),
                    from = change.old_value(),
                    to = change.new_value(),
                    "order status changed"
                );
            }
        }

        Ok(StatusUpdateOutcome { order, changes })
    }

    async fn list_all_orders(&self, _grant: AdminGrant) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let records = self.orders_repository.list_orders(&mut tx).await?;
        let orders = self.attach_items(&mut tx, records).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn list_transitions(
        &self,
        _grant: AdminGrant,
        uuid: OrderUuid,
    ) -> Result<Vec<OrderTransition>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        // Existence check, so an unknown order is NotFound rather than an empty trail.
        self.orders_repository.get_order(&mut tx, uuid).await?;

        let transitions = self
            .transitions_repository
            .list_transitions(&mut tx, uuid)
            .await?;

        tx.commit().await?;

        Ok(transitions)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Place an order from the caller's cart or from explicit lines, priced
    /// server side. Clears the cart in the same transaction.
    async fn create_order(
        &self,
        auth: Authorization,
        order: NewOrder,
    ) -> Result<Order, OrdersServiceError>;

    /// The caller's orders, newest first.
    async fn list_own_orders(&self, auth: Authorization) -> Result<Vec<Order>, OrdersServiceError>;

    /// One order; only its owner may read it.
    async fn get_order(
        &self,
        auth: Authorization,
        uuid: OrderUuid,
    ) -> Result<Order, OrdersServiceError>;

    /// Owner cancellation of a pending order.
    async fn cancel_order(
        &self,
        auth: Authorization,
        uuid: OrderUuid,
    ) -> Result<Order, OrdersServiceError>;

    /// Privileged status and tracking update.
    async fn update_status(
        &self,
        grant: AdminGrant,
        uuid: OrderUuid,
        update: StatusUpdate,
    ) -> Result<StatusUpdateOutcome, OrdersServiceError>;

    /// Every order, newest first.
    async fn list_all_orders(&self, grant: AdminGrant) -> Result<Vec<Order>, OrdersServiceError>;

    /// The audit trail of one order, oldest first.
    async fn list_transitions(
        &self,
        grant: AdminGrant,
        uuid: OrderUuid,
    ) -> Result<Vec<OrderTransition>, OrdersServiceError>;
}
