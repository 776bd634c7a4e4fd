//! Order

use std::str::FromStr;

use jiff::Timestamp;
use smallvec::SmallVec;

use crate::{
    authorization::{AdminGrant, Authorization, UserUuid},
    orders::{
        OrderUuid,
        errors::{OrderError, TransitionError, ValidationError},
        snapshot::{ContactInfo, OrderItem, OrderSnapshot, ShippingAddress},
        status::{OrderStatus, PaymentMethod, PaymentStatus},
        transitions::{TransitionKind, admin_transition, cancel_transition, payment_transition},
    },
    pricing::Amount,
};

/// The pair of statuses a compare-and-set write is conditioned on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderState {
    /// Fulfilment status.
    pub order_status: OrderStatus,

    /// Payment status.
    pub payment_status: PaymentStatus,
}

/// Everything the owner supplies when placing an order.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    /// The owner.
    pub user: UserUuid,

    /// Priced items and their total.
    pub snapshot: OrderSnapshot,

    /// Delivery address.
    pub shipping_address: ShippingAddress,

    /// Contact details.
    pub contact_info: ContactInfo,

    /// Recorded payment method.
    pub payment_method: PaymentMethod,

    /// Optional note from the customer.
    pub notes: Option<String>,
}

/// A privileged status update. At least one field must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusUpdate {
    /// New fulfilment status.
    pub order_status: Option<OrderStatus>,

    /// New payment status.
    pub payment_status: Option<PaymentStatus>,

    /// Carrier tracking number.
    pub tracking_number: Option<String>,

    /// Expected delivery time.
    pub estimated_delivery: Option<Timestamp>,
}

impl StatusUpdate {
    /// True when the update sets nothing.
    pub fn is_empty(&self) -> bool {
        self.order_status.is_none()
            && self.payment_status.is_none()
            && self.tracking_number.is_none()
            && self.estimated_delivery.is_none()
    }
}

/// Which status column a change touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusField {
    /// `order_status`
    OrderStatus,

    /// `payment_status`
    PaymentStatus,
}

impl StatusField {
    /// Column name, also used as a metric label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OrderStatus => "order_status",
            Self::PaymentStatus => "payment_status",
        }
    }
}

impl FromStr for StatusField {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "order_status" => Ok(Self::OrderStatus),
            "payment_status" => Ok(Self::PaymentStatus),
            other => Err(ValidationError::UnknownLiteral {
                field: "statusField",
                value: other.to_string(),
            }),
        }
    }
}

/// One applied status change, as recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// Fulfilment status moved.
    Order {
        /// Previous status.
        from: OrderStatus,
        /// New status.
        to: OrderStatus,
        /// Advance, skip or cancel.
        kind: TransitionKind,
    },

    /// Payment status moved.
    Payment {
        /// Previous status.
        from: PaymentStatus,
        /// New status.
        to: PaymentStatus,
    },
}

impl StatusChange {
    /// The column that changed.
    pub const fn field(&self) -> StatusField {
        match self {
            Self::Order { .. } => StatusField::OrderStatus,
            Self::Payment { .. } => StatusField::PaymentStatus,
        }
    }

    /// How the change is classified.
    pub const fn kind(&self) -> TransitionKind {
        match self {
            Self::Order { kind, .. } => *kind,
            Self::Payment { .. } => TransitionKind::Payment,
        }
    }

    /// Previous value as a wire literal.
    pub const fn old_value(&self) -> &'static str {
        match self {
            Self::Order { from, .. } => from.as_str(),
            Self::Payment { from, .. } => from.as_str(),
        }
    }

    /// New value as a wire literal.
    pub const fn new_value(&self) -> &'static str {
        match self {
            Self::Order { to, .. } => to.as_str(),
            Self::Payment { to, .. } => to.as_str(),
        }
    }
}

/// Status changes produced by a single update: at most one per column.
pub type StatusChanges = SmallVec<[StatusChange; 2]>;

/// Every stored field of an order, used to rebuild one from persistence.
#[derive(Debug, Clone)]
pub struct OrderParts {
    /// Identifier.
    pub uuid: OrderUuid,
    /// Owner.
    pub user: UserUuid,
    /// Frozen items.
    pub items: Vec<OrderItem>,
    /// Delivery address.
    pub shipping_address: ShippingAddress,
    /// Contact details.
    pub contact_info: ContactInfo,
    /// Frozen total.
    pub total_amount: Amount,
    /// Recorded payment method.
    pub payment_method: PaymentMethod,
    /// Payment status.
    pub payment_status: PaymentStatus,
    /// Fulfilment status.
    pub order_status: OrderStatus,
    /// Carrier tracking number.
    pub tracking_number: Option<String>,
    /// Expected delivery time.
    pub estimated_delivery: Option<Timestamp>,
    /// Customer note.
    pub notes: Option<String>,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last state-affecting write.
    pub updated_at: Timestamp,
}

/// A placed order.
///
/// Items and total are fixed at creation. Status only moves through
/// [`Order::cancel`] and [`Order::update_status`], and every successful call
/// refreshes `updated_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    uuid: OrderUuid,
    user: UserUuid,
    items: Vec<OrderItem>,
    shipping_address: ShippingAddress,
    contact_info: ContactInfo,
    total_amount: Amount,
    payment_method: PaymentMethod,
    payment_status: PaymentStatus,
    order_status: OrderStatus,
    tracking_number: Option<String>,
    estimated_delivery: Option<Timestamp>,
    notes: Option<String>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Order {
    /// Place a new order: `pending` for both fulfilment and payment.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Validation`] if the address or contact details are blank.
    pub fn place(uuid: OrderUuid, draft: OrderDraft, now: Timestamp) -> Result<Self, OrderError> {
        draft.shipping_address.validate()?;
        draft.contact_info.validate()?;

        let (items, total_amount) = draft.snapshot.into_parts();

        Ok(Self {
            uuid,
            user: draft.user,
            items,
            shipping_address: draft.shipping_address,
            contact_info: draft.contact_info,
            total_amount,
            payment_method: draft.payment_method,
            payment_status: PaymentStatus::Pending,
            order_status: OrderStatus::Pending,
            tracking_number: None,
            estimated_delivery: None,
            notes: draft.notes.filter(|notes| !notes.trim().is_empty()),
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a stored order without re-running any checks.
    pub fn restore(parts: OrderParts) -> Self {
        Self {
            uuid: parts.uuid,
            user: parts.user,
            items: parts.items,
            shipping_address: parts.shipping_address,
            contact_info: parts.contact_info,
            total_amount: parts.total_amount,
            payment_method: parts.payment_method,
            payment_status: parts.payment_status,
            order_status: parts.order_status,
            tracking_number: parts.tracking_number,
            estimated_delivery: parts.estimated_delivery,
            notes: parts.notes,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
        }
    }

    /// Owner-scoped read check.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Denied`] when the caller is not the owner.
    pub fn authorize(&self, auth: &Authorization) -> Result<(), OrderError> {
        Ok(auth.authorize_owner(self.user)?)
    }

    /// Owner cancellation, allowed only while `pending`.
    ///
    /// # Errors
    ///
    /// - [`OrderError::Denied`]: the caller is not the owner.
    /// - [`OrderError::IllegalTransition`]: the order is no longer pending.
    pub fn cancel(
        &mut self,
        auth: &Authorization,
        now: Timestamp,
    ) -> Result<StatusChange, OrderError> {
        self.authorize(auth)?;

        let kind = cancel_transition(self.order_status)?;
        let change = StatusChange::Order {
            from: self.order_status,
            to: OrderStatus::Cancelled,
            kind,
        };

        self.order_status = OrderStatus::Cancelled;
        self.updated_at = now;

        Ok(change)
    }

    /// Privileged status update.
    ///
    /// The whole update is checked before anything is applied.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::EmptyUpdate`]: nothing to change.
    /// - [`OrderError::IllegalTransition`]: the order is terminal, or a requested
    ///   status is outside the transition table.
    pub fn update_status(
        &mut self,
        _grant: AdminGrant,
        update: &StatusUpdate,
        now: Timestamp,
    ) -> Result<StatusChanges, OrderError> {
        if update.is_empty() {
            return Err(ValidationError::EmptyUpdate.into());
        }

        if self.order_status.is_terminal() {
            return Err(TransitionError::Terminal(self.order_status).into());
        }

        let mut changes = StatusChanges::new();

        if let Some(to) = update.order_status {
            let kind = admin_transition(self.order_status, to)?;

            changes.push(StatusChange::Order {
                from: self.order_status,
                to,
                kind,
            });
        }

        if let Some(to) = update.payment_status {
            payment_transition(self.payment_status, to)?;

            changes.push(StatusChange::Payment {
                from: self.payment_status,
                to,
            });
        }

        for change in &changes {
            match *change {
                StatusChange::Order { to, .. } => self.order_status = to,
                StatusChange::Payment { to, .. } => self.payment_status = to,
            }
        }

        if let Some(tracking_number) = &update.tracking_number {
            self.tracking_number = Some(tracking_number.clone());
        }

        if let Some(estimated_delivery) = update.estimated_delivery {
            self.estimated_delivery = Some(estimated_delivery);
        }

        self.updated_at = now;

        Ok(changes)
    }

    /// Apply `mutate` only if the order is still in `expected`.
    ///
    /// `mutate` runs against a copy, so a failed mutation leaves the order
    /// untouched. Mirrors the conditional `UPDATE` used by persistence.
    ///
    /// # Errors
    ///
    /// - [`TransitionError::Superseded`]: the statuses moved since `expected` was read.
    /// - Any error returned by `mutate`.
    pub fn compare_and_apply<T, F>(&mut self, expected: OrderState, mutate: F) -> Result<T, OrderError>
    where
        F: FnOnce(&mut Self) -> Result<T, OrderError>,
    {
        if self.state() != expected {
            return Err(TransitionError::Superseded.into());
        }

        let mut next = self.clone();
        let output = mutate(&mut next)?;

        *self = next;

        Ok(output)
    }

    /// Current fulfilment and payment status.
    pub fn state(&self) -> OrderState {
        OrderState {
            order_status: self.order_status,
            payment_status: self.payment_status,
        }
    }

    /// Identifier.
    pub fn uuid(&self) -> OrderUuid {
        self.uuid
    }

    /// Owner.
    pub fn user(&self) -> UserUuid {
        self.user
    }

    /// Frozen items, in the order they were placed.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Delivery address.
    pub fn shipping_address(&self) -> &ShippingAddress {
        &self.shipping_address
    }

    /// Contact details.
    pub fn contact_info(&self) -> &ContactInfo {
        &self.contact_info
    }

    /// Frozen total.
    pub fn total_amount(&self) -> &Amount {
        &self.total_amount
    }

    /// Recorded payment method.
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Payment status.
    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    /// Fulfilment status.
    pub fn order_status(&self) -> OrderStatus {
        self.order_status
    }

    /// Carrier tracking number.
    pub fn tracking_number(&self) -> Option<&str> {
        self.tracking_number.as_deref()
    }

    /// Expected delivery time.
    pub fn estimated_delivery(&self) -> Option<Timestamp> {
        self.estimated_delivery
    }

    /// Customer note.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Creation time.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Last state-affecting write.
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Barrier, Mutex},
        thread,
    };

    use jiff::SignedDuration;
    use rusty_money::{Money, iso::INR};
    use testresult::TestResult;

    use super::*;
    use crate::{
        authorization::{Actor, Role},
        customization::Customization,
        items::ProductUuid,
    };

    fn owner() -> Authorization {
        Authorization::new(Actor {
            user: UserUuid::new(),
            role: Role::Customer,
        })
    }

    fn admin() -> Result<AdminGrant, OrderError> {
        Ok(Authorization::new(Actor {
            user: UserUuid::new(),
            role: Role::Admin,
        })
        .require_admin()?)
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            street: "12 Sawmill Lane".to_string(),
            city: "Jaipur".to_string(),
            state: "RJ".to_string(),
            country: "IN".to_string(),
            zip_code: "302001".to_string(),
        }
    }

    fn contact() -> ContactInfo {
        ContactInfo {
            phone: "+91 98765 43210".to_string(),
            email: "buyer@example.com".to_string(),
        }
    }

    fn item(minor: i64, quantity: u32) -> OrderItem {
        OrderItem {
            item: ProductUuid::new().into(),
            quantity,
            unit_price: Money::from_minor(minor, INR),
            customization: Customization::new().with("color", "walnut"),
        }
    }

    fn place(auth: &Authorization) -> Result<Order, OrderError> {
        let snapshot = OrderSnapshot::new(INR, vec![item(100, 2), item(50, 1)])?;

        Order::place(
            OrderUuid::new(),
            OrderDraft {
                user: auth.user(),
                snapshot,
                shipping_address: address(),
                contact_info: contact(),
                payment_method: PaymentMethod::Upi,
                notes: Some("leave with neighbour".to_string()),
            },
            Timestamp::UNIX_EPOCH,
        )
    }

    fn set_status(status: OrderStatus) -> StatusUpdate {
        StatusUpdate {
            order_status: Some(status),
            ..StatusUpdate::default()
        }
    }

    #[test]
    fn placed_order_is_pending_with_computed_total() -> TestResult {
        let order = place(&owner())?;

        assert_eq!(order.order_status(), OrderStatus::Pending);
        assert_eq!(order.payment_status(), PaymentStatus::Pending);
        assert_eq!(order.total_amount(), &Money::from_minor(250, INR));
        assert_eq!(order.created_at(), order.updated_at());

        Ok(())
    }

    #[test]
    fn blank_address_is_rejected() -> TestResult {
        let auth = owner();
        let mut address = address();
        address.city = String::new();

        let result = Order::place(
            OrderUuid::new(),
            OrderDraft {
                user: auth.user(),
                snapshot: OrderSnapshot::new(INR, vec![item(100, 1)])?,
                shipping_address: address,
                contact_info: contact(),
                payment_method: PaymentMethod::CreditCard,
                notes: None,
            },
            Timestamp::UNIX_EPOCH,
        );

        assert_eq!(
            result,
            Err(OrderError::Validation(ValidationError::MissingField("city")))
        );

        Ok(())
    }

    #[test]
    fn owner_can_cancel_pending_order() -> TestResult {
        let auth = owner();
        let mut order = place(&auth)?;
        let later = Timestamp::UNIX_EPOCH + SignedDuration::from_secs(60);

        let change = order.cancel(&auth, later)?;

        assert_eq!(order.order_status(), OrderStatus::Cancelled);
        assert_eq!(order.updated_at(), later);
        assert_eq!(change.kind(), TransitionKind::Cancel);

        Ok(())
    }

    #[test]
    fn non_owner_cannot_cancel() -> TestResult {
        let mut order = place(&owner())?;

        let result = order.cancel(&owner(), Timestamp::UNIX_EPOCH);

        assert!(matches!(result, Err(OrderError::Denied(_))));
        assert_eq!(order.order_status(), OrderStatus::Pending);

        Ok(())
    }

    #[test]
    fn cancel_after_shipping_is_illegal_and_leaves_status() -> TestResult {
        let auth = owner();
        let mut order = place(&auth)?;

        order.update_status(admin()?, &set_status(OrderStatus::Shipped), Timestamp::UNIX_EPOCH)?;

        let result = order.cancel(&auth, Timestamp::UNIX_EPOCH);

        assert!(matches!(result, Err(OrderError::IllegalTransition(_))));
        assert_eq!(order.order_status(), OrderStatus::Shipped);

        Ok(())
    }

    #[test]
    fn terminal_orders_reject_every_change() -> TestResult {
        let auth = owner();
        let grant = admin()?;

        let mut cancelled = place(&auth)?;
        cancelled.cancel(&auth, Timestamp::UNIX_EPOCH)?;

        let mut delivered = place(&auth)?;
        delivered.update_status(grant, &set_status(OrderStatus::Delivered), Timestamp::UNIX_EPOCH)?;

        let payment_only = StatusUpdate {
            payment_status: Some(PaymentStatus::Completed),
            ..StatusUpdate::default()
        };

        for order in [&mut cancelled, &mut delivered] {
            let before = order.clone();

            assert!(matches!(
                order.update_status(grant, &set_status(OrderStatus::Shipped), Timestamp::UNIX_EPOCH),
                Err(OrderError::IllegalTransition(TransitionError::Terminal(_)))
            ));
            assert!(matches!(
                order.update_status(grant, &payment_only, Timestamp::UNIX_EPOCH),
                Err(OrderError::IllegalTransition(_))
            ));
            assert!(matches!(
                order.cancel(&auth, Timestamp::UNIX_EPOCH),
                Err(OrderError::IllegalTransition(_))
            ));
            assert_eq!(*order, before);
        }

        Ok(())
    }

    #[test]
    fn total_is_unchanged_by_status_updates() -> TestResult {
        let mut order = place(&owner())?;

        order.update_status(admin()?, &set_status(OrderStatus::Processing), Timestamp::UNIX_EPOCH)?;

        assert_eq!(order.total_amount().to_minor_units(), 250);
        assert_eq!(order.items().len(), 2);

        Ok(())
    }

    #[test]
    fn skip_is_recorded_as_such() -> TestResult {
        let mut order = place(&owner())?;

        let changes =
            order.update_status(admin()?, &set_status(OrderStatus::Delivered), Timestamp::UNIX_EPOCH)?;

        assert_eq!(
            changes.as_slice(),
            [StatusChange::Order {
                from: OrderStatus::Pending,
                to: OrderStatus::Delivered,
                kind: TransitionKind::Skip,
            }]
        );

        Ok(())
    }

    #[test]
    fn combined_update_is_all_or_nothing() -> TestResult {
        let mut order = place(&owner())?;
        let before = order.clone();

        let update = StatusUpdate {
            order_status: Some(OrderStatus::Processing),
            payment_status: Some(PaymentStatus::Pending),
            tracking_number: Some("TRK-1".to_string()),
            estimated_delivery: None,
        };

        let result = order.update_status(admin()?, &update, Timestamp::UNIX_EPOCH);

        assert!(matches!(
            result,
            Err(OrderError::IllegalTransition(TransitionError::Payment { .. }))
        ));
        assert_eq!(order, before);

        Ok(())
    }

    #[test]
    fn tracking_details_update_without_status_change() -> TestResult {
        let mut order = place(&owner())?;
        let eta = Timestamp::UNIX_EPOCH + SignedDuration::from_hours(72);
        let later = Timestamp::UNIX_EPOCH + SignedDuration::from_secs(5);

        let changes = order.update_status(
            admin()?,
            &StatusUpdate {
                tracking_number: Some("TRK-42".to_string()),
                estimated_delivery: Some(eta),
                ..StatusUpdate::default()
            },
            later,
        )?;

        assert!(changes.is_empty());
        assert_eq!(order.tracking_number(), Some("TRK-42"));
        assert_eq!(order.estimated_delivery(), Some(eta));
        assert_eq!(order.updated_at(), later);

        Ok(())
    }

    #[test]
    fn empty_update_is_a_validation_error() -> TestResult {
        let mut order = place(&owner())?;

        assert_eq!(
            order.update_status(admin()?, &StatusUpdate::default(), Timestamp::UNIX_EPOCH),
            Err(OrderError::Validation(ValidationError::EmptyUpdate))
        );

        Ok(())
    }

    #[test]
    fn compare_and_apply_rejects_stale_state() -> TestResult {
        let auth = owner();
        let mut order = place(&auth)?;
        let observed = order.state();

        order.update_status(admin()?, &set_status(OrderStatus::Processing), Timestamp::UNIX_EPOCH)?;

        let result = order.compare_and_apply(observed, |order| order.cancel(&auth, Timestamp::UNIX_EPOCH));

        assert_eq!(
            result,
            Err(OrderError::IllegalTransition(TransitionError::Superseded))
        );
        assert_eq!(order.order_status(), OrderStatus::Processing);

        Ok(())
    }

    #[test]
    fn concurrent_cancel_and_ship_have_one_winner() -> TestResult {
        for _ in 0..64 {
            let auth = owner();
            let grant = admin()?;
            let shared = Arc::new(Mutex::new(place(&auth)?));
            let barrier = Arc::new(Barrier::new(2));

            let cancel = {
                let shared = Arc::clone(&shared);
                let barrier = Arc::clone(&barrier);

                thread::spawn(move || {
                    let observed = shared.lock().map_err(|_err| "poisoned")?.state();
                    barrier.wait();

                    let mut order = shared.lock().map_err(|_err| "poisoned")?;

                    Ok::<bool, &'static str>(
                        order
                            .compare_and_apply(observed, |order| order.cancel(&auth, Timestamp::now()))
                            .is_ok(),
                    )
                })
            };

            let ship = {
                let shared = Arc::clone(&shared);
                let barrier = Arc::clone(&barrier);

                thread::spawn(move || {
                    let observed = shared.lock().map_err(|_err| "poisoned")?.state();
                    barrier.wait();

                    let mut order = shared.lock().map_err(|_err| "poisoned")?;

                    Ok::<bool, &'static str>(
                        order
                            .compare_and_apply(observed, |order| {
                                order.update_status(
                                    grant,
                                    &set_status(OrderStatus::Shipped),
                                    Timestamp::now(),
                                )
                            })
                            .is_ok(),
                    )
                })
            };

            let cancelled = cancel.join().map_err(|_err| "cancel thread panicked")??;
            let shipped = ship.join().map_err(|_err| "ship thread panicked")??;

            assert!(cancelled ^ shipped, "exactly one writer must win");

            let status = shared.lock().map_err(|_err| "poisoned")?.order_status();

            if cancelled {
                assert_eq!(status, OrderStatus::Cancelled);
            } else {
                assert_eq!(status, OrderStatus::Shipped);
            }
        }

        Ok(())
    }
}
