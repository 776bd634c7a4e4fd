//! Order Repositories

mod items;
mod orders;
mod transitions;

pub(crate) use items::PgOrderItemsRepository;
pub(crate) use orders::{OrderRecord, PgOrdersRepository};
pub(crate) use transitions::{NewTransition, PgOrderTransitionsRepository};
