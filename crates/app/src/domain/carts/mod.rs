//! Carts

pub mod errors;
mod repositories;
pub mod service;

pub use errors::CartsServiceError;
pub(crate) use repositories::{PgCartLinesRepository, PgCartsRepository};
pub use service::*;
