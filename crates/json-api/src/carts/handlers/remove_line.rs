//! Remove Cart Line Handler

use std::sync::Arc;

use joinery::cart::LineKey;
use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    carts::{
        errors::into_status_error,
        models::{CartResponse, RemoveCartLineRequest},
    },
    extensions::*,
    state::State,
};

/// Remove Cart Line Handler
///
/// Removing a line that is not in the cart is not an error.
#[endpoint(
    tags("carts"),
    summary = "Remove Cart Line",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RemoveCartLineRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let auth = depot.authorization_or_401()?;
    let key = LineKey::try_from(json.into_inner())?;

    let cart = state
        .app
        .carts
        .remove_line(auth, key)
        .await
        .map_err(into_status_error)?;

    super::render(cart)
}

#[cfg(test)]
mod tests {
    use joinery::customization::Customization;
    use joinery_app::domain::carts::MockCartsService;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{carts_service, make_cart, red_chair};

    use super::*;

    #[tokio::test]
    async fn test_remove_line_targets_exact_customization() -> TestResult {
        let plain = LineKey::new(red_chair().item(), Customization::new());
        let cart = make_cart(&[(red_chair(), 1, 900)])?;

        let mut carts = MockCartsService::new();

        carts
            .expect_remove_line()
            .once()
            .withf(move |_, k| *k == plain)
            .return_once(move |_, _| Ok(cart));

        let mut res = TestClient::delete("http://example.com/cart/lines")
            .json(&json!({
                "itemKind": "product",
                "itemUuid": red_chair().item().uuid(),
            }))
            .send(&carts_service(carts, Router::with_path("cart/lines").delete(handler)))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.lines.len(), 1);

        Ok(())
    }
}
