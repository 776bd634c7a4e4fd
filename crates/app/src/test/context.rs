//! Test context for service-level integration tests.

use joinery::authorization::{AccessDenied, Actor, AdminGrant, Authorization, Role, UserUuid};
use rusty_money::iso::{self, Currency};

use crate::{
    auth::PgAuthService,
    database::Db,
    domain::{carts::PgCartsService, catalog::PgCatalogService, orders::PgOrdersService},
};

use super::db::TestDb;

pub struct TestContext {
    pub db: TestDb,
    pub currency: &'static Currency,
    pub catalog: PgCatalogService,
    pub carts: PgCartsService,
    pub orders: PgOrdersService,
    pub auth: PgAuthService,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());
        let currency = iso::INR;

        Self {
            currency,
            catalog: PgCatalogService::new(db.clone()),
            carts: PgCartsService::new(db.clone(), currency),
            orders: PgOrdersService::new(db.clone(), currency),
            auth: PgAuthService::new(db),
            db: test_db,
        }
    }

    /// A customer who has never been seen before.
    pub fn customer(&self) -> Authorization {
        Authorization::new(Actor {
            user: UserUuid::new(),
            role: Role::Customer,
        })
    }

    /// A fresh admin's grant.
    pub fn admin(&self) -> Result<AdminGrant, AccessDenied> {
        Authorization::new(Actor {
            user: UserUuid::new(),
            role: Role::Admin,
        })
        .require_admin()
    }
}
