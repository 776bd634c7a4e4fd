//! Joinery
//!
//! Cart aggregation, order lifecycle and pricing for a custom-furniture storefront.
//! Everything in this crate is pure: persistence and transport live in the
//! application crates.

pub mod authorization;
pub mod cart;
pub mod customization;
pub mod items;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod uuids;
