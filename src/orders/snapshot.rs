//! Order snapshot

use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};

use crate::{
    cart::{Cart, MAX_LINE_QUANTITY},
    customization::Customization,
    items::ItemReference,
    orders::errors::{OrderError, ValidationError},
    pricing::{Amount, line_total, total_price},
};

/// One purchased line, frozen at the price paid.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    /// Product or design.
    pub item: ItemReference,

    /// At least one, at most [`MAX_LINE_QUANTITY`].
    pub quantity: u32,

    /// Unit price at the moment the order was placed.
    pub unit_price: Amount,

    /// Customization choices.
    pub customization: Customization,
}

impl OrderItem {
    /// `unit_price × quantity`.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError::Pricing`] on overflow.
    pub fn line_total(&self) -> Result<Amount, OrderError> {
        Ok(line_total(&self.unit_price, self.quantity)?)
    }
}

/// Where to deliver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Street and number.
    pub street: String,

    /// City.
    pub city: String,

    /// State or region.
    pub state: String,

    /// Country.
    pub country: String,

    /// Postal code.
    pub zip_code: String,
}

impl ShippingAddress {
    /// Every field is required.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] naming the first blank field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        [
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("country", &self.country),
            ("zipCode", &self.zip_code),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map_or(Ok(()), |(field, _)| Err(ValidationError::MissingField(field)))
    }
}

/// How to reach the customer about the order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    /// Phone number.
    pub phone: String,

    /// Email address.
    pub email: String,
}

impl ContactInfo {
    /// Both fields are required.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] naming the first blank field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.phone.trim().is_empty() {
            return Err(ValidationError::MissingField("phone"));
        }

        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingField("email"));
        }

        Ok(())
    }
}

/// Priced, non-empty items plus their total, computed once and never again.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSnapshot {
    items: Vec<OrderItem>,
    total: Amount,
}

impl OrderSnapshot {
    /// Freeze `items` and compute their total in `currency`.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::EmptyOrder`]: `items` is empty.
    /// - [`ValidationError::InvalidQuantity`]: an item has quantity zero or
    ///   more than [`MAX_LINE_QUANTITY`].
    /// - [`OrderError::Pricing`]: currency mismatch or overflow.
    pub fn new(currency: &'static Currency, items: Vec<OrderItem>) -> Result<Self, OrderError> {
        if items.is_empty() {
            return Err(ValidationError::EmptyOrder.into());
        }

        if let Some(item) = items
            .iter()
            .find(|item| item.quantity == 0 || item.quantity > MAX_LINE_QUANTITY)
        {
            return Err(ValidationError::InvalidQuantity(i64::from(item.quantity)).into());
        }

        let total = total_price(
            currency,
            items.iter().map(|item| (&item.unit_price, item.quantity)),
        )?;

        Ok(Self { items, total })
    }

    /// Snapshot the lines of `cart` at their current prices.
    ///
    /// # Errors
    ///
    /// See [`OrderSnapshot::new`].
    pub fn from_cart(cart: &Cart) -> Result<Self, OrderError> {
        let items = cart
            .lines()
            .iter()
            .map(|line| OrderItem {
                item: line.key().item(),
                quantity: line.quantity(),
                unit_price: *line.unit_price(),
                customization: line.key().customization().clone(),
            })
            .collect();

        Self::new(cart.currency(), items)
    }

    /// The frozen items.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// `Σ unit_price × quantity`.
    pub fn total(&self) -> &Amount {
        &self.total
    }

    /// Split into items and total.
    pub fn into_parts(self) -> (Vec<OrderItem>, Amount) {
        (self.items, self.total)
    }
}
