//! Cart

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    customization::Customization,
    items::ItemReference,
    pricing::{Amount, PricingError, line_total, total_price},
};

/// Largest quantity a single line may hold, matching the `INTEGER` columns
/// that store it.
pub const MAX_LINE_QUANTITY: u32 = 2_147_483_647;

/// Errors raised by cart mutations.
///
/// A failed mutation leaves the cart exactly as it was.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// The requested quantity (or the merged quantity) does not fit a cart line.
    #[error("quantity {0} is out of range for a cart line")]
    QuantityOutOfRange(i64),

    /// The subtotal could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// What makes two cart lines "the same": the item and its customization.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineKey {
    item: ItemReference,
    customization: Customization,
}

impl LineKey {
    /// Build a line key.
    pub fn new(item: impl Into<ItemReference>, customization: Customization) -> Self {
        Self {
            item: item.into(),
            customization,
        }
    }

    /// The referenced product or design.
    pub fn item(&self) -> ItemReference {
        self.item
    }

    /// The customization choices.
    pub fn customization(&self) -> &Customization {
        &self.customization
    }
}

/// A single cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    key: LineKey,
    quantity: u32,
    unit_price: Amount,
}

impl CartLine {
    /// The identity of this line.
    pub fn key(&self) -> &LineKey {
        &self.key
    }

    /// Always at least one.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Current unit price.
    pub fn unit_price(&self) -> &Amount {
        &self.unit_price
    }

    /// `unit_price × quantity`.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the total does not fit in minor units.
    pub fn line_total(&self) -> Result<Amount, PricingError> {
        line_total(&self.unit_price, self.quantity)
    }
}

/// The effect a mutation had, so callers can persist only the changed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was appended.
    Added {
        /// Identity of the new line.
        key: LineKey,
        /// Its quantity.
        quantity: u32,
    },

    /// An existing line's quantity was incremented.
    Merged {
        /// Identity of the line.
        key: LineKey,
        /// Quantity after the merge.
        quantity: u32,
    },

    /// An existing line's quantity was overwritten.
    Updated {
        /// Identity of the line.
        key: LineKey,
        /// The new quantity.
        quantity: u32,
    },

    /// A line was deleted.
    Removed {
        /// Identity of the deleted line.
        key: LineKey,
    },

    /// Every line was deleted.
    Cleared,

    /// Nothing changed.
    Unchanged,
}

/// A shopping cart: unique lines plus a subtotal that always matches them.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    currency: &'static Currency,
    lines: Vec<CartLine>,
    subtotal: Amount,
}

impl Cart {
    /// An empty cart priced in `currency`.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            currency,
            lines: Vec::new(),
            subtotal: Money::from_minor(0, currency),
        }
    }

    /// Rebuild a cart from stored `(key, quantity, unit price)` rows.
    ///
    /// Rows go through [`Cart::add_line`], so duplicates merge and non-positive
    /// quantities are skipped.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if a quantity or the subtotal is out of range.
    pub fn from_lines<I>(currency: &'static Currency, rows: I) -> Result<Self, CartError>
    where
        I: IntoIterator<Item = (LineKey, i64, Amount)>,
    {
        let mut cart = Self::new(currency);

        for (key, quantity, unit_price) in rows {
            cart.add_line(key, quantity, unit_price)?;
        }

        Ok(cart)
    }

    /// Add `quantity` of `key`, merging into an existing line with the same identity.
    ///
    /// A non-positive quantity is a no-op. When merging, the existing line takes
    /// `unit_price` as its current price.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the merged quantity or the subtotal is out of range.
    pub fn add_line(
        &mut self,
        key: LineKey,
        quantity: i64,
        unit_price: Amount,
    ) -> Result<CartChange, CartError> {
        if quantity <= 0 {
            return Ok(CartChange::Unchanged);
        }

        let added = to_line_quantity(quantity)?;
        let mut lines = self.lines.clone();

        let change = if let Some(line) = lines.iter_mut().find(|line| line.key == key) {
            line.quantity = line
                .quantity
                .checked_add(added)
                .filter(|merged| *merged <= MAX_LINE_QUANTITY)
                .ok_or(CartError::QuantityOutOfRange(quantity))?;
            line.unit_price = unit_price;

            CartChange::Merged {
                key,
                quantity: line.quantity,
            }
        } else {
            lines.push(CartLine {
                key: key.clone(),
                quantity: added,
                unit_price,
            });

            CartChange::Added {
                key,
                quantity: added,
            }
        };

        self.commit(lines)?;

        Ok(change)
    }

    /// Delete the line with identity `key`; a no-op if there is none.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the subtotal cannot be recomputed.
    pub fn remove_line(&mut self, key: &LineKey) -> Result<CartChange, CartError> {
        let mut lines = self.lines.clone();
        let before = lines.len();

        lines.retain(|line| &line.key != key);

        if lines.len() == before {
            return Ok(CartChange::Unchanged);
        }

        self.commit(lines)?;

        Ok(CartChange::Removed { key: key.clone() })
    }

    /// Overwrite the quantity of the line with identity `key`.
    ///
    /// A non-positive quantity removes the line. Absent lines are left absent.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the quantity or the subtotal is out of range.
    pub fn set_quantity(&mut self, key: &LineKey, quantity: i64) -> Result<CartChange, CartError> {
        if quantity <= 0 {
            return self.remove_line(key);
        }

        let quantity = to_line_quantity(quantity)?;
        let mut lines = self.lines.clone();

        let Some(line) = lines.iter_mut().find(|line| &line.key == key) else {
            return Ok(CartChange::Unchanged);
        };

        if line.quantity == quantity {
            return Ok(CartChange::Unchanged);
        }

        line.quantity = quantity;
        self.commit(lines)?;

        Ok(CartChange::Updated {
            key: key.clone(),
            quantity,
        })
    }

    /// Empty the cart. The cart itself survives.
    pub fn clear(&mut self) -> CartChange {
        if self.lines.is_empty() {
            return CartChange::Unchanged;
        }

        self.lines.clear();
        self.subtotal = Money::from_minor(0, self.currency);

        CartChange::Cleared
    }

    /// Look up a line by identity.
    pub fn get(&self, key: &LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.key == key)
    }

    /// Lines in the order they were first added.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// `Σ unit_price × quantity` over the current lines.
    pub fn subtotal(&self) -> &Amount {
        &self.subtotal
    }

    /// The cart currency.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn commit(&mut self, lines: Vec<CartLine>) -> Result<(), CartError> {
        let subtotal = total_price(
            self.currency,
            lines.iter().map(|line| (&line.unit_price, line.quantity)),
        )?;

        self.lines = lines;
        self.subtotal = subtotal;

        Ok(())
    }
}

fn to_line_quantity(quantity: i64) -> Result<u32, CartError> {
    u32::try_from(quantity)
        .ok()
        .filter(|quantity| *quantity <= MAX_LINE_QUANTITY)
        .ok_or(CartError::QuantityOutOfRange(quantity))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, INR};
    use testresult::TestResult;

    use super::*;
    use crate::items::ProductUuid;

    fn price(minor: i64) -> Amount {
        Money::from_minor(minor, INR)
    }

    fn red(product: ProductUuid) -> LineKey {
        LineKey::new(product, Customization::new().with("color", "red"))
    }

    fn blue(product: ProductUuid) -> LineKey {
        LineKey::new(product, Customization::new().with("color", "blue"))
    }

    fn expected_subtotal(cart: &Cart) -> i64 {
        cart.lines()
            .iter()
            .map(|line| line.unit_price().to_minor_units() * i64::from(line.quantity()))
            .sum()
    }

    #[test]
    fn same_identity_merges_into_one_line() -> TestResult {
        let product = ProductUuid::new();
        let mut cart = Cart::new(INR);

        cart.add_line(red(product), 2, price(1_000))?;
        let change = cart.add_line(red(product), 1, price(1_000))?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&red(product)).map(CartLine::quantity), Some(3));
        assert_eq!(
            change,
            CartChange::Merged {
                key: red(product),
                quantity: 3
            }
        );
        assert_eq!(cart.subtotal(), &price(3_000));

        Ok(())
    }

    #[test]
    fn different_customization_makes_a_new_line() -> TestResult {
        let product = ProductUuid::new();
        let mut cart = Cart::new(INR);

        cart.add_line(red(product), 1, price(1_000))?;
        cart.add_line(blue(product), 1, price(1_000))?;

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.subtotal(), &price(2_000));

        Ok(())
    }

    #[test]
    fn customization_order_does_not_matter() -> TestResult {
        let product = ProductUuid::new();
        let mut cart = Cart::new(INR);

        let first = Customization::new().with("color", "red").with("size", "L");
        let second = Customization::new().with("size", "L").with("color", "red");

        cart.add_line(LineKey::new(product, first), 1, price(500))?;
        cart.add_line(LineKey::new(product, second), 1, price(500))?;

        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn non_positive_add_is_a_no_op() -> TestResult {
        let product = ProductUuid::new();
        let mut cart = Cart::new(INR);

        assert_eq!(cart.add_line(red(product), 0, price(100))?, CartChange::Unchanged);
        assert_eq!(cart.add_line(red(product), -4, price(100))?, CartChange::Unchanged);
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn remove_absent_line_is_a_no_op() -> TestResult {
        let mut cart = Cart::new(INR);

        assert_eq!(cart.remove_line(&red(ProductUuid::new()))?, CartChange::Unchanged);

        Ok(())
    }

    #[test]
    fn set_quantity_overwrites_or_removes() -> TestResult {
        let product = ProductUuid::new();
        let mut cart = Cart::new(INR);

        cart.add_line(red(product), 2, price(250))?;
        cart.add_line(blue(product), 1, price(300))?;

        cart.set_quantity(&red(product), 5)?;
        assert_eq!(cart.get(&red(product)).map(CartLine::quantity), Some(5));
        assert_eq!(cart.subtotal(), &price(1_550));

        let change = cart.set_quantity(&red(product), 0)?;
        assert_eq!(change, CartChange::Removed { key: red(product) });
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.subtotal(), &price(300));

        Ok(())
    }

    #[test]
    fn set_quantity_on_absent_line_is_a_no_op() -> TestResult {
        let mut cart = Cart::new(INR);

        assert_eq!(cart.set_quantity(&red(ProductUuid::new()), 3)?, CartChange::Unchanged);
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn clear_empties_lines_and_subtotal() -> TestResult {
        let mut cart = Cart::new(INR);

        cart.add_line(red(ProductUuid::new()), 2, price(400))?;

        assert_eq!(cart.clear(), CartChange::Cleared);
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), &price(0));
        assert_eq!(cart.clear(), CartChange::Unchanged);

        Ok(())
    }

    #[test]
    fn subtotal_tracks_every_mutation() -> TestResult {
        let products = [ProductUuid::new(), ProductUuid::new(), ProductUuid::new()];
        let mut cart = Cart::new(INR);

        for (step, product) in products.iter().cycle().take(9).enumerate() {
            let step = i64::try_from(step)?;

            cart.add_line(red(*product), step % 4, price(100 + step * 10))?;
            assert_eq!(cart.subtotal().to_minor_units(), expected_subtotal(&cart));

            cart.set_quantity(&blue(*product), step)?;
            assert_eq!(cart.subtotal().to_minor_units(), expected_subtotal(&cart));

            if step % 3 == 0 {
                cart.remove_line(&red(*product))?;
                assert_eq!(cart.subtotal().to_minor_units(), expected_subtotal(&cart));
            }
        }

        assert!(cart.lines().iter().all(|line| line.quantity() >= 1));

        Ok(())
    }

    #[test]
    fn failed_mutation_leaves_cart_untouched() -> TestResult {
        let product = ProductUuid::new();
        let mut cart = Cart::new(INR);

        cart.add_line(red(product), 1, price(100))?;
        let before = cart.clone();

        let result = cart.add_line(blue(product), 1, Money::from_minor(100, GBP));

        assert!(matches!(result, Err(CartError::Pricing(_))));
        assert_eq!(cart, before);

        Ok(())
    }

    #[test]
    fn oversized_quantity_is_rejected() {
        let mut cart = Cart::new(INR);

        let result = cart.add_line(red(ProductUuid::new()), i64::MAX, price(1));

        assert_eq!(result, Err(CartError::QuantityOutOfRange(i64::MAX)));
        assert!(cart.is_empty());
    }

    #[test]
    fn quantity_past_the_line_limit_is_rejected() {
        let mut cart = Cart::new(INR);

        let result = cart.add_line(red(ProductUuid::new()), 3_000_000_000, price(1));

        assert_eq!(result, Err(CartError::QuantityOutOfRange(3_000_000_000)));
        assert!(cart.is_empty());
    }

    #[test]
    fn merging_past_the_line_limit_is_rejected() -> TestResult {
        let product = ProductUuid::new();
        let mut cart = Cart::new(INR);

        cart.add_line(red(product), i64::from(MAX_LINE_QUANTITY), price(1))?;
        let before = cart.clone();

        let merged = cart.add_line(red(product), 1, price(1));

        assert_eq!(merged, Err(CartError::QuantityOutOfRange(1)));
        assert_eq!(cart, before);

        let set = cart.set_quantity(&red(product), i64::from(MAX_LINE_QUANTITY) + 1);

        assert!(set.is_err(), "set_quantity past the limit should fail");
        assert_eq!(cart, before);

        Ok(())
    }

    #[test]
    fn from_lines_merges_duplicates() -> TestResult {
        let product = ProductUuid::new();

        let cart = Cart::from_lines(
            INR,
            [
                (red(product), 1, price(100)),
                (red(product), 2, price(100)),
                (blue(product), 0, price(100)),
            ],
        )?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.subtotal(), &price(300));

        Ok(())
    }
}
