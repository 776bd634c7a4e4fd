//! Order errors

use thiserror::Error;

use crate::{
    authorization::AccessDenied,
    orders::status::{OrderStatus, PaymentStatus},
    pricing::PricingError,
};

/// Input that can never be valid, whatever state the order is in.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A literal outside its closed set.
    #[error("unknown {field} '{value}'")]
    UnknownLiteral {
        /// Field name as seen on the wire.
        field: &'static str,
        /// The rejected literal.
        value: String,
    },

    /// An order needs at least one item.
    #[error("an order needs at least one item")]
    EmptyOrder,

    /// Order items need a quantity between one and the line limit.
    #[error("item quantity {0} is out of range")]
    InvalidQuantity(i64),

    /// A status update must change something.
    #[error("status update has nothing to change")]
    EmptyUpdate,

    /// A required field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// A state change the lifecycle does not allow.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    /// Order status cannot move from `from` to `to`.
    #[error("order status cannot change from {from} to {to}")]
    Order {
        /// Current status.
        from: OrderStatus,
        /// Requested status.
        to: OrderStatus,
    },

    /// Payment status cannot move from `from` to `to`.
    #[error("payment status cannot change from {from} to {to}")]
    Payment {
        /// Current status.
        from: PaymentStatus,
        /// Requested status.
        to: PaymentStatus,
    },

    /// The order is delivered or cancelled.
    #[error("order is {0} and can no longer change")]
    Terminal(OrderStatus),

    /// Someone else changed the order between read and write.
    #[error("order was changed concurrently")]
    Superseded,
}

/// Errors raised by order operations.
#[derive(Debug, Error, PartialEq)]
pub enum OrderError {
    /// The caller may not act on this order.
    #[error(transparent)]
    Denied(#[from] AccessDenied),

    /// The lifecycle forbids the change.
    #[error(transparent)]
    IllegalTransition(#[from] TransitionError),

    /// Malformed input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The total could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}
