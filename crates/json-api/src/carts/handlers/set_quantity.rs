//! Set Cart Line Quantity Handler

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

/// Set Cart Line Quantity Handler
///
/// Overwrites a line's quantity. Zero or less removes the line.
#[endpoint(
    tags("carts"),
    summary = "Set Cart Line Quantity",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.lines.set_quantity",
    skip(json, depot),
    fields(user_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CartLineRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let auth = depot.authorization_or_401()?;
    let (key, quantity) = json.into_inner().into_parts()?;

    tracing::Span::current().record("user_uuid", tracing::field::display(auth.user()));

    let cart = state
        .app
        .carts
        .set_quantity(auth, key, quantity)
        .await
        .map_err(into_status_error)?;

    super::render(cart)
}

#[cfg(test)]
mod tests {
    use joinery_app::domain::carts::MockCartsService;
    use rusty_money::iso;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use joinery::cart::Cart;

    use crate::test_helpers::{carts_service, red_chair};

    use super::*;

    #[tokio::test]
    async fn test_zero_quantity_is_forwarded_and_empties_the_line() -> TestResult {
        let key = red_chair();

        let mut carts = MockCartsService::new();

        carts
            .expect_set_quantity()
            .once()
            .withf(move |_, k, quantity| *k == key && *quantity == 0)
            .return_once(|_, _, _| Ok(Cart::new(iso::INR)));

        let mut res = TestClient::put("http://example.com/cart/lines")
            .json(&json!({
                "itemKind": "product",
                "itemUuid": red_chair().item().uuid(),
                "customization": { "color": "red" },
                "quantity": 0,
            }))
            .send(&carts_service(carts, Router::with_path("cart/lines").put(handler)))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.lines.is_empty());

        Ok(())
    }
}
