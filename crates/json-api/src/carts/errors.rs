//! Errors

use joinery::cart::CartError;
use salvo::http::StatusError;
use tracing::error;

use joinery_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::NotFound => StatusError::not_found().brief("Cart not found"),
        CartsServiceError::UnknownItem(item) => {
            StatusError::not_found().brief(format!("No catalog item {item}"))
        }
        CartsServiceError::Cart(CartError::QuantityOutOfRange(quantity)) => {
            StatusError::bad_request().brief(format!("Quantity {quantity} is out of range"))
        }
        CartsServiceError::Cart(CartError::Pricing(source)) => {
            StatusError::bad_request().brief(source.to_string())
        }
        CartsServiceError::InvalidReference
        | CartsServiceError::MissingRequiredData
        | CartsServiceError::InvalidData => StatusError::bad_request().brief("Invalid cart payload"),
        CartsServiceError::Sql(source) => {
            error!("cart storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use joinery::items::{ItemReference, ProductUuid};
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn unknown_items_are_404() {
        let item = ItemReference::from(ProductUuid::new());

        assert_eq!(
            into_status_error(CartsServiceError::UnknownItem(item)).code,
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn quantity_overflow_is_400() {
        assert_eq!(
            into_status_error(CartError::QuantityOutOfRange(i64::MAX).into()).code,
            StatusCode::BAD_REQUEST
        );
    }
}
