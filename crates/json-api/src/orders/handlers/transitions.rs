//! List Order Transitions Handler

use std::sync::Arc;

use joinery::orders::OrderUuid;
use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderTransitionResponse},
    state::State,
};

/// List Order Transitions Handler
///
/// Admin only. The audit trail of one order, oldest first.
#[endpoint(
    tags("orders"),
    summary = "List Order Transitions",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Audit trail"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin role required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Vec<OrderTransitionResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let grant = depot.admin_or_403()?;

    let transitions = state
        .app
        .orders
        .list_transitions(grant, OrderUuid::from_uuid(order.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(
        transitions
            .into_iter()
            .map(OrderTransitionResponse::from)
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use joinery::orders::{StatusField, TransitionKind};
    use joinery_app::domain::orders::{MockOrdersService, models::OrderTransition};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{TEST_ADMIN_UUID, TEST_USER_UUID, admin_orders_service};

    use super::*;

    #[tokio::test]
    async fn test_placement_has_no_previous_value() -> TestResult {
        let uuid = OrderUuid::new();
        let trail = vec![
            OrderTransition {
                actor: TEST_USER_UUID,
                field: StatusField::OrderStatus,
                from: None,
                to: "pending".to_string(),
                kind: TransitionKind::Place,
                created_at: Timestamp::UNIX_EPOCH,
            },
            OrderTransition {
                actor: TEST_ADMIN_UUID,
                field: StatusField::PaymentStatus,
                from: Some("pending".to_string()),
                to: "failed".to_string(),
                kind: TransitionKind::Payment,
                created_at: Timestamp::UNIX_EPOCH,
            },
        ];

        let mut orders = MockOrdersService::new();

        orders
            .expect_list_transitions()
            .once()
            .withf(move |_, u| *u == uuid)
            .return_once(move |_, _| Ok(trail));

        let mut res = TestClient::get(format!("http://example.com/orders/{uuid}/transitions"))
            .send(&admin_orders_service(
                orders,
                Router::with_path("orders/{order}/transitions").get(handler),
            ))
            .await;

        let body: Vec<OrderTransitionResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.len(), 2);
        assert_eq!(body.first().and_then(|t| t.from.clone()), None);
        assert_eq!(body.first().map(|t| t.kind.as_str()), Some("place"));
        assert_eq!(body.last().map(|t| t.field.as_str()), Some("payment_status"));

        Ok(())
    }
}
