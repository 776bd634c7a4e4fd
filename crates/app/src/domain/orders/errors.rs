//! Orders service errors.

use joinery::{
    items::ItemReference,
    orders::{OrderError, TransitionError, ValidationError},
    pricing::PricingError,
};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order not found")]
    NotFound,

    #[error("not authorized")]
    Forbidden,

    #[error(transparent)]
    IllegalTransition(TransitionError),

    #[error(transparent)]
    Validation(ValidationError),

    #[error("catalog has no price for {0}")]
    UnknownItem(ItemReference),

    #[error(transparent)]
    Pricing(PricingError),

    #[error("order already exists")]
    AlreadyExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<OrderError> for OrdersServiceError {
    fn from(error: OrderError) -> Self {
        match error {
            OrderError::Denied(_) => Self::Forbidden,
            OrderError::IllegalTransition(error) => Self::IllegalTransition(error),
            OrderError::Validation(error) => Self::Validation(error),
            OrderError::Pricing(error) => Self::Pricing(error),
        }
    }
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
