//! Errors

use salvo::http::StatusError;
use tracing::error;

use joinery_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::Forbidden => StatusError::unauthorized().brief("Not authorized"),
        OrdersServiceError::IllegalTransition(source) => {
            StatusError::conflict().brief(source.to_string())
        }
        OrdersServiceError::Validation(source) => StatusError::bad_request().brief(source.to_string()),
        OrdersServiceError::UnknownItem(item) => {
            StatusError::not_found().brief(format!("No catalog item {item}"))
        }
        OrdersServiceError::Pricing(source) => StatusError::bad_request().brief(source.to_string()),
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => StatusError::bad_request().brief("Invalid order payload"),
        OrdersServiceError::Sql(source) => {
            error!("order storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}
