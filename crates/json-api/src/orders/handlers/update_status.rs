//! Update Order Status Handler

use std::sync::Arc;

use joinery::orders::{OrderUuid, StatusUpdate};
use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    extensions::*,
    observability::record_order_transition,
    orders::{
        errors::into_status_error,
        models::{StatusUpdateResponse, UpdateStatusRequest},
    },
    state::State,
};

/// Update Order Status Handler
///
/// Admin only. Moves the order and/or payment status forward and sets
/// tracking details.
#[endpoint(
    tags("orders"),
    summary = "Update Order Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order updated"),
        (status_code = StatusCode::CONFLICT, description = "Transition not allowed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin role required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.update_status",
    skip(order, json, depot),
    fields(user_uuid = tracing::field::Empty, order_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<UpdateStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<StatusUpdateResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let grant = depot.admin_or_403()?;
    let uuid = OrderUuid::from_uuid(order.into_inner());
    let update = StatusUpdate::try_from(json.into_inner())?;

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(grant.admin()));
    span.record("order_uuid", tracing::field::display(uuid));

    let outcome = state
        .app
        .orders
        .update_status(grant, uuid, update)
        .await
        .map_err(into_status_error)?;

    for change in &outcome.changes {
        record_order_transition(change.field().as_str(), change.kind().as_str());
    }

    Ok(Json(outcome.into()))
}
