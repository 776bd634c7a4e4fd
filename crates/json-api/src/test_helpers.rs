//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use joinery::{
    authorization::{Actor, Authorization, Role, UserUuid},
    cart::{Cart, CartError, LineKey},
    customization::Customization,
    items::{ItemReference, ProductUuid},
    orders::{
        ContactInfo, Order, OrderItem, OrderParts, OrderStatus, OrderUuid, PaymentMethod,
        PaymentStatus, ShippingAddress,
    },
};
use joinery_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        carts::MockCartsService, catalog::MockCatalogService, orders::MockOrdersService,
    },
};
use rusty_money::{Money, iso};
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());
pub(crate) const TEST_ADMIN_UUID: UserUuid = UserUuid::from_uuid(Uuid::max());

pub(crate) const TEST_CUSTOMER: Authorization = Authorization::new(Actor {
    user: TEST_USER_UUID,
    role: Role::Customer,
});

pub(crate) const TEST_ADMIN: Authorization = Authorization::new(Actor {
    user: TEST_ADMIN_UUID,
    role: Role::Admin,
});

#[salvo::handler]
pub(crate) async fn inject_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_authorization(TEST_CUSTOMER);
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_authorization(TEST_ADMIN);
    ctrl.call_next(req, depot, res).await;
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer().never();

    auth
}

fn strict_catalog_mock() -> MockCatalogService {
    let mut catalog = MockCatalogService::new();

    catalog.expect_set_price().never();
    catalog.expect_get_price().never();
    catalog.expect_get_prices().never();

    catalog
}

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_get_cart().never();
    carts.expect_add_line().never();
    carts.expect_set_quantity().never();
    carts.expect_remove_line().never();
    carts.expect_clear_cart().never();

    carts
}

fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_create_order().never();
    orders.expect_list_own_orders().never();
    orders.expect_get_order().never();
    orders.expect_cancel_order().never();
    orders.expect_update_status().never();
    orders.expect_list_all_orders().never();
    orders.expect_list_transitions().never();

    orders
}

fn state(carts: MockCartsService, orders: MockOrdersService, auth: MockAuthService) -> Arc<State> {
    State::from_app_context(AppContext {
        catalog: Arc::new(strict_catalog_mock()),
        carts: Arc::new(carts),
        orders: Arc::new(orders),
        auth: Arc::new(auth),
    })
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    state(strict_carts_mock(), strict_orders_mock(), auth)
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(carts, strict_orders_mock(), strict_auth_mock())))
            .hoop(inject_customer)
            .push(route),
    )
}

pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(strict_carts_mock(), orders, strict_auth_mock())))
            .hoop(inject_customer)
            .push(route),
    )
}

pub(crate) fn admin_orders_service(orders: MockOrdersService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(strict_carts_mock(), orders, strict_auth_mock())))
            .hoop(inject_admin)
            .push(route),
    )
}

pub(crate) fn red_chair() -> LineKey {
    LineKey::new(
        ProductUuid::from_uuid(Uuid::from_u128(7)),
        Customization::new().with("color", "red"),
    )
}

pub(crate) fn make_cart(lines: &[(LineKey, i64, i64)]) -> Result<Cart, CartError> {
    Cart::from_lines(
        iso::INR,
        lines
            .iter()
            .map(|(key, quantity, minor)| (key.clone(), *quantity, Money::from_minor(*minor, iso::INR))),
    )
}

pub(crate) fn make_order(uuid: OrderUuid, status: OrderStatus) -> Order {
    let item: ItemReference = ProductUuid::from_uuid(Uuid::from_u128(7)).into();

    Order::restore(OrderParts {
        uuid,
        user: TEST_USER_UUID,
        items: vec![
            OrderItem {
                item,
                quantity: 2,
                unit_price: Money::from_minor(100, iso::INR),
                customization: Customization::new().with("color", "red"),
            },
            OrderItem {
                item,
                quantity: 1,
                unit_price: Money::from_minor(50, iso::INR),
                customization: Customization::new(),
            },
        ],
        shipping_address: ShippingAddress {
            street: "1 Main St".to_string(),
            city: "Pune".to_string(),
            state: "MH".to_string(),
            country: "IN".to_string(),
            zip_code: "411001".to_string(),
        },
        contact_info: ContactInfo {
            phone: "+91 98765 43210".to_string(),
            email: "buyer@example.com".to_string(),
        },
        total_amount: Money::from_minor(250, iso::INR),
        payment_method: PaymentMethod::Upi,
        payment_status: PaymentStatus::Pending,
        order_status: status,
        tracking_number: None,
        estimated_delivery: None,
        notes: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    })
}
