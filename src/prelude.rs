//! Joinery prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    authorization::{AccessDenied, Actor, AdminGrant, Authorization, Role, User, UserUuid},
    cart::{Cart, CartChange, CartError, CartLine, LineKey},
    customization::{Customization, CustomizationOption},
    items::{Design, DesignUuid, ItemKind, ItemReference, Product, ProductUuid},
    orders::{
        ContactInfo, Order, OrderDraft, OrderError, OrderItem, OrderParts, OrderSnapshot,
        OrderState, OrderStatus, OrderUuid, PaymentMethod, PaymentStatus, ShippingAddress,
        StatusChange, StatusChanges, StatusField, StatusUpdate, TransitionError, TransitionKind,
        ValidationError,
    },
    pricing::{Amount, PricingError, line_total, total_price},
    uuids::TypedUuid,
};
