//! Transition table

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::orders::{
    errors::{TransitionError, ValidationError},
    status::{OrderStatus, PaymentStatus},
};

/// How a legal status change is classified in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    /// The order was placed.
    Place,

    /// One step forward on the fulfilment path.
    Advance,

    /// Forward past one or more intermediate statuses.
    Skip,

    /// Owner cancellation of a pending order.
    Cancel,

    /// Payment status change.
    Payment,
}

impl TransitionKind {
    /// Wire literal.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Place => "place",
            Self::Advance => "advance",
            Self::Skip => "skip",
            Self::Cancel => "cancel",
            Self::Payment => "payment",
        }
    }
}

impl Display for TransitionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransitionKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "place" => Ok(Self::Place),
            "advance" => Ok(Self::Advance),
            "skip" => Ok(Self::Skip),
            "cancel" => Ok(Self::Cancel),
            "payment" => Ok(Self::Payment),
            other => Err(ValidationError::UnknownLiteral {
                field: "transitionKind",
                value: other.to_string(),
            }),
        }
    }
}

/// Classify an admin order-status change.
///
/// Only forward moves along `pending → processing → shipped → delivered` are
/// allowed. Cancellation belongs to the owner and is never an admin move.
///
/// # Errors
///
/// - [`TransitionError::Terminal`]: `from` is delivered or cancelled.
/// - [`TransitionError::Order`]: any other move outside the table, including `from == to`.
pub fn admin_transition(
    from: OrderStatus,
    to: OrderStatus,
) -> Result<TransitionKind, TransitionError> {
    if from.is_terminal() {
        return Err(TransitionError::Terminal(from));
    }

    match (from.stage(), to.stage()) {
        (Some(current), Some(next)) if next == current + 1 => Ok(TransitionKind::Advance),
        (Some(current), Some(next)) if next > current + 1 => Ok(TransitionKind::Skip),
        _ => Err(TransitionError::Order { from, to }),
    }
}

/// Check an owner cancellation.
///
/// # Errors
///
/// - [`TransitionError::Terminal`]: the order is already delivered or cancelled.
/// - [`TransitionError::Order`]: the order has left `pending`.
pub fn cancel_transition(from: OrderStatus) -> Result<TransitionKind, TransitionError> {
    match from {
        OrderStatus::Pending => Ok(TransitionKind::Cancel),
        terminal if terminal.is_terminal() => Err(TransitionError::Terminal(terminal)),
        other => Err(TransitionError::Order {
            from: other,
            to: OrderStatus::Cancelled,
        }),
    }
}

/// Check a payment-status change: `pending → completed`, `pending → failed`,
/// `failed → completed`.
///
/// # Errors
///
/// Returns [`TransitionError::Payment`] for anything else, including `from == to`.
pub fn payment_transition(
    from: PaymentStatus,
    to: PaymentStatus,
) -> Result<TransitionKind, TransitionError> {
    match (from, to) {
        (PaymentStatus::Pending, PaymentStatus::Completed | PaymentStatus::Failed)
        | (PaymentStatus::Failed, PaymentStatus::Completed) => Ok(TransitionKind::Payment),
        _ => Err(TransitionError::Payment { from, to }),
    }
}
