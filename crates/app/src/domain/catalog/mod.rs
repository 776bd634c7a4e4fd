//! Catalog
//!
//! The priced items that cart lines and orders point at.

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::CatalogError;
pub(crate) use repository::PgCatalogRepository;
pub use service::*;
