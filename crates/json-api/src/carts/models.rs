//! Cart wire models.

use joinery::{
    cart::{Cart, CartLine, LineKey},
    pricing::PricingError,
};
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    CustomizationBody, currency_code, customization_body, customization_from_body, parse_item,
};

/// A cart line identity plus a quantity.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartLineRequest {
    /// `product` or `design`
    pub item_kind: String,

    /// The product or design identifier
    pub item_uuid: Uuid,

    /// Customization choices; lines with different choices are kept apart
    #[serde(default)]
    pub customization: CustomizationBody,

    /// Quantity to add, or the new quantity when updating
    pub quantity: i64,
}

impl CartLineRequest {
    pub(crate) fn into_parts(self) -> Result<(LineKey, i64), StatusError> {
        let item = parse_item(&self.item_kind, self.item_uuid)?;

        Ok((
            LineKey::new(item, customization_from_body(self.customization)),
            self.quantity,
        ))
    }
}

/// A cart line identity.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RemoveCartLineRequest {
    /// `product` or `design`
    pub item_kind: String,

    /// The product or design identifier
    pub item_uuid: Uuid,

    /// Customization choices of the line to remove
    #[serde(default)]
    pub customization: CustomizationBody,
}

impl TryFrom<RemoveCartLineRequest> for LineKey {
    type Error = StatusError;

    fn try_from(request: RemoveCartLineRequest) -> Result<Self, Self::Error> {
        let item = parse_item(&request.item_kind, request.item_uuid)?;

        Ok(LineKey::new(item, customization_from_body(request.customization)))
    }
}

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartResponse {
    /// ISO 4217 code of every amount in the cart
    pub currency: String,

    /// Sum of every line total, in minor units
    pub subtotal: i64,

    /// Lines in the order they were first added
    pub lines: Vec<CartLineResponse>,
}

impl TryFrom<Cart> for CartResponse {
    type Error = PricingError;

    fn try_from(cart: Cart) -> Result<Self, Self::Error> {
        Ok(Self {
            currency: currency_code(cart.subtotal()),
            subtotal: cart.subtotal().to_minor_units(),
            lines: cart
                .lines()
                .iter()
                .map(CartLineResponse::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

/// Cart Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartLineResponse {
    /// `product` or `design`
    pub item_kind: String,

    /// The product or design identifier
    pub item_uuid: Uuid,

    /// Customization choices
    pub customization: CustomizationBody,

    /// Quantity, at least one
    pub quantity: u32,

    /// Current catalog price, in minor units
    pub unit_price: i64,

    /// `unitPrice × quantity`, in minor units
    pub line_total: i64,
}

impl TryFrom<&CartLine> for CartLineResponse {
    type Error = PricingError;

    fn try_from(line: &CartLine) -> Result<Self, Self::Error> {
        let item = line.key().item();

        Ok(Self {
            item_kind: item.kind().to_string(),
            item_uuid: item.uuid(),
            customization: customization_body(line.key().customization()),
            quantity: line.quantity(),
            unit_price: line.unit_price().to_minor_units(),
            line_total: line.line_total()?.to_minor_units(),
        })
    }
}
