//! Cancel Order Handler

use std::sync::Arc;

use joinery::orders::{OrderUuid, StatusField, TransitionKind};
use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    observability::record_order_transition,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// Cancel Order Handler
///
/// The owner may cancel an order while it is still pending.
#[endpoint(
    tags("orders"),
    summary = "Cancel Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order cancelled"),
        (status_code = StatusCode::CONFLICT, description = "Order is no longer pending"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not the owner"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.cancel",
    skip(order, depot),
    fields(user_uuid = tracing::field::Empty, order_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let auth = depot.authorization_or_401()?;
    let uuid = OrderUuid::from_uuid(order.into_inner());

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(auth.user()));
    span.record("order_uuid", tracing::field::display(uuid));

    let order = state
        .app
        .orders
        .cancel_order(auth, uuid)
        .await
        .map_err(into_status_error)?;

    record_order_transition(
        StatusField::OrderStatus.as_str(),
        TransitionKind::Cancel.as_str(),
    );

    Ok(Json(order.into()))
}
