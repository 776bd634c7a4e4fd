//! Carts service.

use async_trait::async_trait;
use joinery::{
    authorization::{Authorization, UserUuid},
    cart::{Cart, CartChange, LineKey},
    items::ItemReference,
    pricing::Amount,
};
use mockall::automock;
use rusty_money::iso::Currency;
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};

use crate::{
    database::Db,
    domain::{
        carts::{
            errors::CartsServiceError,
            repositories::{CartUuid, PgCartLinesRepository, PgCartsRepository},
        },
        catalog::PgCatalogRepository,
    },
};

/// A locked cart hydrated with live prices.
struct LoadedCart {
    uuid: CartUuid,
    cart: Cart,
    prices: FxHashMap<ItemReference, Amount>,
}

impl LoadedCart {
    fn price_of(&self, item: ItemReference) -> Result<Amount, CartsServiceError> {
        self.prices
            .get(&item)
            .copied()
            .ok_or(CartsServiceError::UnknownItem(item))
    }
}

/// [`CartsService`] over PostgreSQL: one cart row per user, lines priced
/// from the catalog on every read.
#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    currency: &'static Currency,
    carts_repository: PgCartsRepository,
    lines_repository: PgCartLinesRepository,
    catalog_repository: PgCatalogRepository,
}

impl PgCartsService {
    /// Build the service over `db`, pricing carts in `currency`.
    #[must_use]
    pub fn new(db: Db, currency: &'static Currency) -> Self {
        Self {
            db,
            currency,
            carts_repository: PgCartsRepository::new(),
            lines_repository: PgCartLinesRepository::new(),
            catalog_repository: PgCatalogRepository::new(),
        }
    }

    /// Lock the user's cart and rebuild it from its stored lines at live prices.
    ///
    /// `extra` is priced alongside the stored lines so an incoming line costs no
    /// further round trip.
    async fn load(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        extra: Option<ItemReference>,
    ) -> Result<LoadedCart, CartsServiceError> {
        let uuid = self.carts_repository.lock_cart(tx, user).await?;

        self.hydrate(tx, uuid, extra).await
    }

    async fn hydrate(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CartUuid,
        extra: Option<ItemReference>,
    ) -> Result<LoadedCart, CartsServiceError> {
        let records = self.lines_repository.get_lines(tx, uuid).await?;

        let items: Vec<ItemReference> = records
            .iter()
            .map(|record| record.key.item())
            .chain(extra)
            .collect();

        let prices = self.catalog_repository.get_prices(tx, &items).await?;

        let rows = records
            .into_iter()
            .map(|record| {
                let item = record.key.item();
                let price = prices
                    .get(&item)
                    .copied()
                    .ok_or(CartsServiceError::UnknownItem(item))?;

                Ok((record.key, i64::from(record.quantity), price))
            })
            .collect::<Result<Vec<_>, CartsServiceError>>()?;

        Ok(LoadedCart {
            uuid,
            cart: Cart::from_lines(self.currency, rows)?,
            prices,
        })
    }

    /// Delete the stored line for `key` before pricing anything, so a line
    /// whose item has left the catalog can still be removed.
    ///
    /// The delete commits even when another remaining line cannot be priced.
    async fn remove_stored_line(
        &self,
        auth: Authorization,
        key: &LineKey,
    ) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let uuid = self.carts_repository.lock_cart(&mut tx, auth.user()).await?;
        let removed = self.lines_repository.delete_line(&mut tx, uuid, key).await?;

        tracing::debug!(user_uuid = %auth.user(), removed, "cart line removed");

        let loaded = match self.hydrate(&mut tx, uuid, None).await {
            Err(CartsServiceError::UnknownItem(item)) => {
                tx.commit().await?;

                return Err(CartsServiceError::UnknownItem(item));
            }
            loaded => loaded?,
        };

        tx.commit().await?;

        Ok(loaded.cart)
    }

    /// Write back the single line a mutation touched.
    async fn persist(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        change: CartChange,
    ) -> Result<(), CartsServiceError> {
        match change {
            CartChange::Added { key, quantity }
            | CartChange::Merged { key, quantity }
            | CartChange::Updated { key, quantity } => {
                self.lines_repository
                    .upsert_line(tx, cart, &key, quantity)
                    .await?;
            }
            CartChange::Removed { key } => {
                self.lines_repository.delete_line(tx, cart, &key).await?;
            }
            CartChange::Cleared => {
                self.lines_repository.clear_lines(tx, cart).await?;
            }
            CartChange::Unchanged => {}
        }

        Ok(())
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, auth: Authorization) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let loaded = self.load(&mut tx, auth.user(), None).await?;

        tx.commit().await?;

        Ok(loaded.cart)
    }

    async fn add_line(
        &self,
        auth: Authorization,
        key: LineKey,
        quantity: i64,
    ) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut loaded = self.load(&mut tx, auth.user(), Some(key.item())).await?;
        let price = loaded.price_of(key.item())?;

        let change = loaded.cart.add_line(key, quantity, price)?;

        tracing::debug!(user_uuid = %auth.user(), ?change, "cart line added");

        self.persist(&mut tx, loaded.uuid, change).await?;

        tx.commit().await?;

        Ok(loaded.cart)
    }

    async fn set_quantity(
        &self,
        auth: Authorization,
        key: LineKey,
        quantity: i64,
    ) -> Result<Cart, CartsServiceError> {
        if quantity <= 0 {
            return self.remove_stored_line(auth, &key).await;
        }

        let mut tx = self.db.begin().await?;

        let mut loaded = self.load(&mut tx, auth.user(), None).await?;
        let change = loaded.cart.set_quantity(&key, quantity)?;

        tracing::debug!(user_uuid = %auth.user(), ?change, "cart line quantity set");

        self.persist(&mut tx, loaded.uuid, change).await?;

        tx.commit().await?;

        Ok(loaded.cart)
    }

    async fn remove_line(
        &self,
        auth: Authorization,
        key: LineKey,
    ) -> Result<Cart, CartsServiceError> {
        self.remove_stored_line(auth, &key).await
    }

    async fn clear_cart(&self, auth: Authorization) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let uuid = self.carts_repository.lock_cart(&mut tx, auth.user()).await?;

        self.lines_repository.clear_lines(&mut tx, uuid).await?;

        tx.commit().await?;

        Ok(Cart::new(self.currency))
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The caller's cart at live prices. Created empty on first use.
    async fn get_cart(&self, auth: Authorization) -> Result<Cart, CartsServiceError>;

    /// Add `quantity` of a line, merging with an existing line of the same identity.
    async fn add_line(
        &self,
        auth: Authorization,
        key: LineKey,
        quantity: i64,
    ) -> Result<Cart, CartsServiceError>;

    /// Overwrite a line's quantity; a non-positive quantity removes it.
    async fn set_quantity(
        &self,
        auth: Authorization,
        key: LineKey,
        quantity: i64,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove a line; absent lines are ignored.
    async fn remove_line(
        &self,
        auth: Authorization,
        key: LineKey,
    ) -> Result<Cart, CartsServiceError>;

    /// Empty the caller's cart.
    async fn clear_cart(&self, auth: Authorization) -> Result<Cart, CartsServiceError>;
}
