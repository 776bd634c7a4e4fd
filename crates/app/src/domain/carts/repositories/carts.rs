//! Carts Repository

use joinery::{authorization::UserUuid, cart::Cart, uuids::TypedUuid};
use sqlx::{Postgres, Transaction, query_scalar};
use uuid::Uuid;

const LOCK_CART_SQL: &str = include_str!("../sql/lock_cart.sql");

/// Identifier of a persisted cart row.
pub(crate) type CartUuid = TypedUuid<Cart>;

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Fetch the user's cart, creating it on first use, and hold its row lock
    /// until `tx` ends.
    pub(crate) async fn lock_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<CartUuid, sqlx::Error> {
        let uuid: Uuid = query_scalar::<Postgres, Uuid>(LOCK_CART_SQL)
            .bind(Uuid::now_v7())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(CartUuid::from_uuid(uuid))
    }
}
