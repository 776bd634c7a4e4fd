//! Orders

use crate::uuids::TypedUuid;

pub mod errors;
pub mod order;
pub mod snapshot;
pub mod status;
pub mod transitions;

pub use errors::{OrderError, TransitionError, ValidationError};
pub use order::{
    Order, OrderDraft, OrderParts, OrderState, StatusChange, StatusChanges, StatusField,
    StatusUpdate,
};
pub use snapshot::{ContactInfo, OrderItem, OrderSnapshot, ShippingAddress};
pub use status::{OrderStatus, PaymentMethod, PaymentStatus};
pub use transitions::TransitionKind;

/// Order identifier.
pub type OrderUuid = TypedUuid<Order>;
