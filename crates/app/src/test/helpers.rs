//! Test Helpers

use joinery::{
    items::{ItemReference, ProductUuid},
    orders::{ContactInfo, PaymentMethod, ShippingAddress},
};
use rusty_money::Money;

use crate::{
    domain::{
        catalog::{CatalogError, CatalogService, models::NewCatalogEntry},
        orders::models::{NewOrder, OrderSource},
    },
    test::TestContext,
};

/// Put a new product in the catalog at `minor` units of the shop currency.
pub(crate) async fn create_product(
    ctx: &TestContext,
    minor: i64,
) -> Result<ItemReference, CatalogError> {
    let item = ItemReference::from(ProductUuid::new());

    set_price(ctx, item, minor).await?;

    Ok(item)
}

pub(crate) async fn set_price(
    ctx: &TestContext,
    item: ItemReference,
    minor: i64,
) -> Result<(), CatalogError> {
    ctx.catalog
        .set_price(NewCatalogEntry {
            item,
            name: format!("Item {item}"),
            price: Money::from_minor(minor, ctx.currency),
        })
        .await?;

    Ok(())
}

/// An order with valid delivery details.
pub(crate) fn new_order(source: OrderSource) -> NewOrder {
    NewOrder {
        source,
        shipping_address: ShippingAddress {
            street: "4 Timber Yard".to_string(),
            city: "Kochi".to_string(),
            state: "KL".to_string(),
            country: "IN".to_string(),
            zip_code: "682001".to_string(),
        },
        contact_info: ContactInfo {
            phone: "+91 90000 00000".to_string(),
            email: "customer@example.com".to_string(),
        },
        payment_method: PaymentMethod::NetBanking,
        notes: None,
    }
}
