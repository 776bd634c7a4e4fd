//! Cart Handlers

use joinery::cart::Cart;
use salvo::prelude::{Json, StatusError};

use crate::{carts::models::CartResponse, extensions::*};

pub(crate) mod add_line;
pub(crate) mod clear;
pub(crate) mod get;
pub(crate) mod remove_line;
pub(crate) mod set_quantity;

fn render(cart: Cart) -> Result<Json<CartResponse>, StatusError> {
    CartResponse::try_from(cart)
        .or_500("failed to price cart")
        .map(Json)
}
