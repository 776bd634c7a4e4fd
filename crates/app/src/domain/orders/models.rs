//! Order models.

use jiff::Timestamp;
use joinery::{
    authorization::UserUuid,
    customization::Customization,
    items::ItemReference,
    orders::{
        ContactInfo, Order, PaymentMethod, ShippingAddress, StatusChanges, StatusField,
        TransitionKind,
    },
};

/// A line supplied explicitly when placing an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderLine {
    pub item: ItemReference,
    pub quantity: i64,
    pub customization: Customization,
}

/// Where the items of a new order come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderSource {
    /// The caller's persisted cart.
    Cart,

    /// Lines supplied with the request.
    Lines(Vec<NewOrderLine>),
}

/// Everything needed to place an order. Prices and totals are never taken
/// from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub source: OrderSource,
    pub shipping_address: ShippingAddress,
    pub contact_info: ContactInfo,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

/// Result of a privileged status update.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdateOutcome {
    pub order: Order,
    pub changes: StatusChanges,
}

/// One row of an order's audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTransition {
    pub actor: UserUuid,
    pub field: StatusField,
    pub from: Option<String>,
    pub to: String,
    pub kind: TransitionKind,
    pub created_at: Timestamp,
}
