//! List All Orders Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// List All Orders Handler
///
/// Admin only. Every order, newest first.
#[endpoint(
    tags("orders"),
    summary = "List All Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "All orders"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin role required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<OrderResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let grant = depot.admin_or_403()?;

    let orders = state
        .app
        .orders
        .list_all_orders(grant)
        .await
        .map_err(into_status_error)?;

    Ok(Json(orders.iter().map(OrderResponse::from).collect()))
}

#[cfg(test)]
mod tests {
    use joinery::orders::{OrderStatus, OrderUuid};
    use joinery_app::domain::orders::MockOrdersService;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{TEST_ADMIN_UUID, admin_orders_service, make_order, orders_service};

    use super::*;

    #[tokio::test]
    async fn test_admin_lists_every_order() -> TestResult {
        let listed = vec![make_order(OrderUuid::new(), OrderStatus::Processing)];

        let mut orders = MockOrdersService::new();

        orders
            .expect_list_all_orders()
            .once()
            .withf(|grant| grant.admin() == TEST_ADMIN_UUID)
            .return_once(move |_| Ok(listed));

        let mut res = TestClient::get("http://example.com/orders/admin/all")
            .send(&admin_orders_service(
                orders,
                Router::with_path("orders/admin/all").get(handler),
            ))
            .await;

        let body: Vec<OrderResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_customers_get_403() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_list_all_orders().never();

        let res = TestClient::get("http://example.com/orders/admin/all")
            .send(&orders_service(
                orders,
                Router::with_path("orders/admin/all").get(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
