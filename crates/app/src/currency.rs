//! Currency lookup and amount decoding

use joinery::pricing::Amount;
use rusty_money::{Findable, Money, MoneyError, iso::Currency};
use sqlx::{Row, postgres::PgRow};

/// Resolve an ISO 4217 code such as `INR`.
///
/// # Errors
///
/// Returns [`MoneyError::InvalidCurrency`] for unknown codes.
pub fn parse_currency(code: &str) -> Result<&'static Currency, MoneyError> {
    Currency::find(code.trim()).ok_or(MoneyError::InvalidCurrency)
}

/// Decode a minor-unit amount column together with its currency column.
pub(crate) fn try_get_amount(
    row: &PgRow,
    amount_col: &str,
    currency_col: &str,
) -> Result<Amount, sqlx::Error> {
    let minor: i64 = row.try_get(amount_col)?;
    let code: String = row.try_get(currency_col)?;

    let currency = parse_currency(&code).map_err(|source| sqlx::Error::ColumnDecode {
        index: currency_col.to_string(),
        source: Box::new(source),
    })?;

    Ok(Money::from_minor(minor, currency))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_known_codes() -> TestResult {
        assert_eq!(parse_currency("INR")?, iso::INR);
        assert_eq!(parse_currency(" GBP ")?, iso::GBP);

        Ok(())
    }

    #[test]
    fn rejects_unknown_codes() {
        assert_eq!(parse_currency("ABC"), Err(MoneyError::InvalidCurrency));
    }
}
