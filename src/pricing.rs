//! Pricing

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// A monetary amount in a static ISO currency.
pub type Amount = Money<'static, Currency>;

/// Errors that can occur while pricing lines or folding totals.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Multiplying or summing minor units overflowed.
    #[error("amount overflowed while computing a total")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// `unit_price × quantity`, in the unit price's currency.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: the product does not fit in minor units.
pub fn line_total(unit_price: &Amount, quantity: u32) -> Result<Amount, PricingError> {
    let minor = unit_price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, unit_price.currency()))
}

/// Sum `unit_price × quantity` over `lines`, starting from zero in `currency`.
///
/// An empty iterator yields zero, so a cleared cart has a well-defined subtotal.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: a line total or the running sum overflowed.
/// - [`PricingError::Money`]: a line is priced in a currency other than `currency`.
pub fn total_price<'p, I>(currency: &'static Currency, lines: I) -> Result<Amount, PricingError>
where
    I: IntoIterator<Item = (&'p Amount, u32)>,
{
    lines
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, (unit_price, quantity)| {
            if unit_price.currency() != currency {
                return Err(PricingError::Money(MoneyError::CurrencyMismatch {
                    expected: currency.iso_alpha_code,
                    actual: unit_price.currency().iso_alpha_code,
                }));
            }

            let line = line_total(unit_price, quantity)?;

            acc.to_minor_units()
                .checked_add(line.to_minor_units())
                .map(|minor| Money::from_minor(minor, currency))
                .ok_or(PricingError::Overflow)
        })
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, INR};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn line_total_multiplies_minor_units() -> TestResult {
        let price = Money::from_minor(1_250, INR);

        assert_eq!(line_total(&price, 3)?, Money::from_minor(3_750, INR));

        Ok(())
    }

    #[test]
    fn line_total_rejects_overflow() {
        let price = Money::from_minor(i64::MAX / 2, INR);

        assert_eq!(line_total(&price, 3), Err(PricingError::Overflow));
    }

    #[test]
    fn total_price_folds_lines() -> TestResult {
        let hundred = Money::from_minor(100, INR);
        let fifty = Money::from_minor(50, INR);

        let total = total_price(INR, [(&hundred, 2), (&fifty, 1)])?;

        assert_eq!(total, Money::from_minor(250, INR));

        Ok(())
    }

    #[test]
    fn total_price_of_nothing_is_zero() -> TestResult {
        let none: [(&Amount, u32); 0] = [];

        assert_eq!(total_price(INR, none)?, Money::from_minor(0, INR));

        Ok(())
    }

    #[test]
    fn total_price_rejects_currency_mismatch() {
        let pounds = Money::from_minor(100, GBP);

        assert_eq!(
            total_price(INR, [(&pounds, 1)]),
            Err(PricingError::Money(MoneyError::CurrencyMismatch {
                expected: INR.iso_alpha_code,
                actual: GBP.iso_alpha_code,
            }))
        );
    }

    #[test]
    fn total_price_rejects_sum_overflow() {
        let big = Money::from_minor(i64::MAX - 1, INR);

        assert_eq!(
            total_price(INR, [(&big, 1), (&big, 1)]),
            Err(PricingError::Overflow)
        );
    }
}
