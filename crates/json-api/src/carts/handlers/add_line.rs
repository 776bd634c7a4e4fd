//! Add Cart Line Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    carts::{
        errors::into_status_error,
        models::{CartLineRequest, CartResponse},
    },
    extensions::*,
    state::State,
};

/// Add Cart Line Handler
///
/// Adds a quantity of an item. A line with the same item and customization
/// is merged into; a non-positive quantity changes nothing.
#[endpoint(
    tags("carts"),
    summary = "Add Cart Line",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Item not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.lines.add",
    skip(json, depot),
    fields(user_uuid = tracing::field::Empty, item = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CartLineRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let auth = depot.authorization_or_401()?;
    let (key, quantity) = json.into_inner().into_parts()?;

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(auth.user()));
    span.record("item", tracing::field::display(key.item()));

    let cart = state
        .app
        .carts
        .add_line(auth, key, quantity)
        .await
        .map_err(into_status_error)?;

    super::render(cart)
}
