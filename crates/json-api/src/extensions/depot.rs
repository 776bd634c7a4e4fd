//! Depot helper extensions.

use std::any::Any;

use joinery::authorization::{AdminGrant, Authorization};
use salvo::prelude::{Depot, StatusError};

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Store the authorization decision for the rest of the request.
    fn insert_authorization(&mut self, auth: Authorization) -> &mut Self;

    /// The authenticated caller, or `401` when the auth hoop did not run.
    fn authorization_or_401(&self) -> Result<Authorization, StatusError>;

    /// An admin grant for the caller, or `403` for any other role.
    fn admin_or_403(&self) -> Result<AdminGrant, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_authorization(&mut self, auth: Authorization) -> &mut Self {
        self.inject(auth)
    }

    fn authorization_or_401(&self) -> Result<Authorization, StatusError> {
        self.obtain::<Authorization>()
            .copied()
            .map_err(|_ignored| StatusError::unauthorized().brief("Not authorized"))
    }

    fn admin_or_403(&self) -> Result<AdminGrant, StatusError> {
        self.authorization_or_401()?
            .require_admin()
            .map_err(|denied| StatusError::forbidden().brief(denied.to_string()))
    }
}
