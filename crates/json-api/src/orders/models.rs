//! Order wire models.

use jiff::Timestamp;
use joinery::orders::{
    ContactInfo, Order, OrderItem, OrderStatus, PaymentMethod, PaymentStatus, ShippingAddress,
    StatusChange, StatusUpdate,
};
use joinery_app::domain::orders::models::{
    NewOrder, NewOrderLine, OrderSource, OrderTransition, StatusUpdateOutcome,
};
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    models::{
        CustomizationBody, currency_code, customization_body, customization_from_body, parse_item,
    },
};

/// Delivery address.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ShippingAddressBody {
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
}

impl From<ShippingAddressBody> for ShippingAddress {
    fn from(body: ShippingAddressBody) -> Self {
        Self {
            street: body.street,
            city: body.city,
            state: body.state,
            country: body.country,
            zip_code: body.zip_code,
        }
    }
}

impl From<&ShippingAddress> for ShippingAddressBody {
    fn from(address: &ShippingAddress) -> Self {
        Self {
            street: address.street.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            country: address.country.clone(),
            zip_code: address.zip_code.clone(),
        }
    }
}

/// How to reach the customer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct ContactInfoBody {
    pub phone: String,
    pub email: String,
}

impl From<ContactInfoBody> for ContactInfo {
    fn from(body: ContactInfoBody) -> Self {
        Self {
            phone: body.phone,
            email: body.email,
        }
    }
}

impl From<&ContactInfo> for ContactInfoBody {
    fn from(contact: &ContactInfo) -> Self {
        Self {
            phone: contact.phone.clone(),
            email: contact.email.clone(),
        }
    }
}

/// One requested order line. Prices are always looked up server side.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderLineRequest {
    /// `product` or `design`
    pub item_kind: String,

    /// The product or design identifier
    pub item_uuid: Uuid,

    /// At least one
    pub quantity: i64,

    /// Customization choices
    #[serde(default)]
    pub customization: CustomizationBody,
}

impl TryFrom<OrderLineRequest> for NewOrderLine {
    type Error = StatusError;

    fn try_from(request: OrderLineRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            item: parse_item(&request.item_kind, request.item_uuid)?,
            quantity: request.quantity,
            customization: customization_from_body(request.customization),
        })
    }
}

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateOrderRequest {
    /// Lines to order; when omitted the caller's cart is checked out
    #[serde(default)]
    pub items: Option<Vec<OrderLineRequest>>,

    /// Delivery address
    pub shipping_address: ShippingAddressBody,

    /// Contact details
    pub contact_info: ContactInfoBody,

    /// `credit-card`, `debit-card`, `upi` or `net-banking`
    pub payment_method: String,

    /// Free-form notes for the workshop
    #[serde(default)]
    pub notes: Option<String>,
}

impl TryFrom<CreateOrderRequest> for NewOrder {
    type Error = StatusError;

    fn try_from(request: CreateOrderRequest) -> Result<Self, Self::Error> {
        let source = match request.items {
            None => OrderSource::Cart,
            Some(items) => OrderSource::Lines(
                items
                    .into_iter()
                    .map(NewOrderLine::try_from)
                    .collect::<Result<_, _>>()?,
            ),
        };

        Ok(Self {
            source,
            shipping_address: request.shipping_address.into(),
            contact_info: request.contact_info.into(),
            payment_method: request.payment_method.parse::<PaymentMethod>().or_400()?,
            notes: request.notes,
        })
    }
}

/// Update Order Status Request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateStatusRequest {
    /// `pending`, `processing`, `shipped` or `delivered`
    #[serde(default)]
    pub order_status: Option<String>,

    /// `pending`, `completed` or `failed`
    #[serde(default)]
    pub payment_status: Option<String>,

    /// Carrier tracking number
    #[serde(default)]
    pub tracking_number: Option<String>,

    /// Expected delivery, RFC 3339
    #[serde(default)]
    pub estimated_delivery: Option<String>,
}

impl TryFrom<UpdateStatusRequest> for StatusUpdate {
    type Error = StatusError;

    fn try_from(request: UpdateStatusRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            order_status: request
                .order_status
                .as_deref()
                .map(str::parse::<OrderStatus>)
                .transpose()
                .or_400()?,
            payment_status: request
                .payment_status
                .as_deref()
                .map(str::parse::<PaymentStatus>)
                .transpose()
                .or_400()?,
            tracking_number: request.tracking_number,
            estimated_delivery: request
                .estimated_delivery
                .as_deref()
                .map(str::parse::<Timestamp>)
                .transpose()
                .or_400()?,
        })
    }
}

/// Order Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderItemResponse {
    /// `product` or `design`
    pub item_kind: String,

    /// The product or design identifier
    pub item_uuid: Uuid,

    /// Quantity ordered
    pub quantity: u32,

    /// Unit price paid, in minor units
    pub unit_price: i64,

    /// Customization choices
    pub customization: CustomizationBody,
}

impl From<&OrderItem> for OrderItemResponse {
    fn from(item: &OrderItem) -> Self {
        Self {
            item_kind: item.item.kind().to_string(),
            item_uuid: item.item.uuid(),
            quantity: item.quantity,
            unit_price: item.unit_price.to_minor_units(),
            customization: customization_body(&item.customization),
        }
    }
}

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderResponse {
    /// The unique identifier of the order
    pub uuid: Uuid,

    /// The owner
    pub user_uuid: Uuid,

    /// Purchased lines
    pub items: Vec<OrderItemResponse>,

    /// Delivery address
    pub shipping_address: ShippingAddressBody,

    /// Contact details
    pub contact_info: ContactInfoBody,

    /// Total computed when the order was placed, in minor units
    pub total_amount: i64,

    /// ISO 4217 code of every amount in the order
    pub currency: String,

    pub payment_method: String,
    pub payment_status: String,
    pub order_status: String,
    pub tracking_number: Option<String>,
    pub estimated_delivery: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            uuid: order.uuid().into_uuid(),
            user_uuid: order.user().into_uuid(),
            items: order.items().iter().map(OrderItemResponse::from).collect(),
            shipping_address: order.shipping_address().into(),
            contact_info: order.contact_info().into(),
            total_amount: order.total_amount().to_minor_units(),
            currency: currency_code(order.total_amount()),
            payment_method: order.payment_method().to_string(),
            payment_status: order.payment_status().to_string(),
            order_status: order.order_status().to_string(),
            tracking_number: order.tracking_number().map(ToOwned::to_owned),
            estimated_delivery: order.estimated_delivery().map(|at| at.to_string()),
            notes: order.notes().map(ToOwned::to_owned),
            created_at: order.created_at().to_string(),
            updated_at: order.updated_at().to_string(),
        }
    }
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self::from(&order)
    }
}

/// A status column that moved.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct StatusChangeResponse {
    /// `order_status` or `payment_status`
    pub field: String,
    pub from: String,
    pub to: String,

    /// `advance`, `skip`, `cancel` or `payment`
    pub kind: String,
}

impl From<&StatusChange> for StatusChangeResponse {
    fn from(change: &StatusChange) -> Self {
        Self {
            field: change.field().as_str().to_string(),
            from: change.old_value().to_string(),
            to: change.new_value().to_string(),
            kind: change.kind().to_string(),
        }
    }
}

/// Update Order Status Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct StatusUpdateResponse {
    /// The order after the update
    pub order: OrderResponse,

    /// What moved; empty when only tracking details changed
    pub changes: Vec<StatusChangeResponse>,
}

impl From<StatusUpdateOutcome> for StatusUpdateResponse {
    fn from(outcome: StatusUpdateOutcome) -> Self {
        Self {
            order: outcome.order.into(),
            changes: outcome
                .changes
                .iter()
                .map(StatusChangeResponse::from)
                .collect(),
        }
    }
}

/// Order Transition Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderTransitionResponse {
    /// Who made the change
    pub actor_uuid: Uuid,

    /// `order_status` or `payment_status`
    pub field: String,

    /// Previous value; absent for placement
    pub from: Option<String>,
    pub to: String,
    pub kind: String,
    pub created_at: String,
}

impl From<OrderTransition> for OrderTransitionResponse {
    fn from(transition: OrderTransition) -> Self {
        Self {
            actor_uuid: transition.actor.into_uuid(),
            field: transition.field.as_str().to_string(),
            from: transition.from,
            to: transition.to,
            kind: transition.kind.to_string(),
            created_at: transition.created_at.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn status_request_parses_literals() -> TestResult {
        let request: UpdateStatusRequest = serde_json::from_value(json!({
            "orderStatus": "shipped",
            "paymentStatus": "completed",
            "trackingNumber": "TRK-1",
            "estimatedDelivery": "2026-11-02T10:00:00Z",
        }))?;

        let update = StatusUpdate::try_from(request)?;

        assert_eq!(update.order_status, Some(OrderStatus::Shipped));
        assert_eq!(update.payment_status, Some(PaymentStatus::Completed));
        assert_eq!(update.tracking_number.as_deref(), Some("TRK-1"));
        assert!(update.estimated_delivery.is_some());

        Ok(())
    }

    #[test]
    fn unknown_status_literal_is_400() {
        let request = UpdateStatusRequest {
            order_status: Some("lost".to_string()),
            ..UpdateStatusRequest::default()
        };

        assert_eq!(
            StatusUpdate::try_from(request).map_err(|error| error.code),
            Err(StatusCode::BAD_REQUEST)
        );
    }

    #[test]
    fn missing_items_means_checkout_of_the_cart() -> TestResult {
        let request: CreateOrderRequest = serde_json::from_value(json!({
            "shippingAddress": {
                "street": "1 Main St",
                "city": "Pune",
                "state": "MH",
                "country": "IN",
                "zipCode": "411001",
            },
            "contactInfo": { "phone": "1", "email": "a@b.c" },
            "paymentMethod": "upi",
        }))?;

        let order = NewOrder::try_from(request)?;

        assert_eq!(order.source, OrderSource::Cart);
        assert_eq!(order.payment_method, PaymentMethod::Upi);

        Ok(())
    }

    #[test]
    fn unknown_payment_method_is_400() -> TestResult {
        let request: CreateOrderRequest = serde_json::from_value(json!({
            "items": [],
            "shippingAddress": {
                "street": "1 Main St",
                "city": "Pune",
                "state": "MH",
                "country": "IN",
                "zipCode": "411001",
            },
            "contactInfo": { "phone": "1", "email": "a@b.c" },
            "paymentMethod": "cash",
        }))?;

        assert_eq!(
            NewOrder::try_from(request).map_err(|error| error.code),
            Err(StatusCode::BAD_REQUEST)
        );

        Ok(())
    }
}
