//! Order Handlers

pub(crate) mod all;
pub(crate) mod cancel;
pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod my_orders;
pub(crate) mod transitions;
pub(crate) mod update_status;
