//! App Router

use salvo::Router;

use crate::{auth, carts, orders};

/// Routes that need a bearer token.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("cart")
                .get(carts::get::handler)
                .delete(carts::clear::handler)
                .push(
                    Router::with_path("lines")
                        .post(carts::add_line::handler)
                        .put(carts::set_quantity::handler)
                        .delete(carts::remove_line::handler),
                ),
        )
        .push(
            Router::with_path("orders")
                .post(orders::create::handler)
                .push(Router::with_path("my-orders").get(orders::my_orders::handler))
                .push(Router::with_path("admin/all").get(orders::all::handler))
                .push(
                    Router::with_path("{order}")
                        .get(orders::get::handler)
                        .push(Router::with_path("cancel").put(orders::cancel::handler))
                        .push(Router::with_path("status").put(orders::update_status::handler))
                        .push(
                            Router::with_path("transitions").get(orders::transitions::handler),
                        ),
                ),
        )
}
