//! Application services and persistence for the Joinery storefront.

pub mod auth;
mod columns;
pub mod context;
pub mod currency;
pub mod database;
pub mod domain;

#[cfg(test)]
mod test;
