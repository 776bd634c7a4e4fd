//! Authorization

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{orders::ValidationError, uuids::TypedUuid};

/// User marker.
#[derive(Debug)]
pub struct User;

/// User identifier.
pub type UserUuid = TypedUuid<User>;

/// What an authenticated user is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Shops for themselves.
    Customer,

    /// Runs the shop.
    Admin,
}

impl Role {
    /// Wire literal.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            other => Err(ValidationError::UnknownLiteral {
                field: "role",
                value: other.to_string(),
            }),
        }
    }
}

/// An authenticated caller, as reported by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// Who.
    pub user: UserUuid,

    /// With which role.
    pub role: Role,
}

/// Why an authorization check failed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenied {
    /// The actor does not own the resource.
    #[error("not authorized")]
    Forbidden,

    /// The operation needs the admin role.
    #[error("admin role required")]
    AdminRequired,
}

/// The authorization decision for one request, passed into every owner-scoped call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authorization {
    actor: Actor,
}

impl Authorization {
    /// Authorize requests made by `actor`.
    pub const fn new(actor: Actor) -> Self {
        Self { actor }
    }

    /// The caller.
    pub const fn actor(&self) -> Actor {
        self.actor
    }

    /// The calling user.
    pub const fn user(&self) -> UserUuid {
        self.actor.user
    }

    /// Allow the call only if the caller owns the resource.
    ///
    /// Admins get no bypass here; privileged paths go through [`AdminGrant`].
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied::Forbidden`] when `owner` is someone else.
    pub fn authorize_owner(&self, owner: UserUuid) -> Result<(), AccessDenied> {
        if self.actor.user == owner {
            Ok(())
        } else {
            Err(AccessDenied::Forbidden)
        }
    }

    /// Obtain a grant for privileged operations.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied::AdminRequired`] unless the caller is an admin.
    pub fn require_admin(&self) -> Result<AdminGrant, AccessDenied> {
        match self.actor.role {
            Role::Admin => Ok(AdminGrant {
                admin: self.actor.user,
            }),
            Role::Customer => Err(AccessDenied::AdminRequired),
        }
    }
}

impl From<Actor> for Authorization {
    fn from(actor: Actor) -> Self {
        Self::new(actor)
    }
}

/// Proof that the caller is an admin. Only [`Authorization::require_admin`] makes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminGrant {
    admin: UserUuid,
}

impl AdminGrant {
    /// The admin exercising the grant.
    pub const fn admin(&self) -> UserUuid {
        self.admin
    }
}
