//! Cart Repositories

mod carts;
mod lines;

pub(crate) use carts::{CartUuid, PgCartsRepository};
pub(crate) use lines::{CartLineRecord, PgCartLinesRepository};
