//! Repository permission models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Access level granted to a principal on a repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Pull only.
    #[default]
    Read,
    /// Pull and push.
    Write,
    /// Full control, including permissions and notifications.
    Admin,
}

impl Role {
    /// Returns the wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "admin" => Ok(Self::Admin),
            other => Err(ValidationError::format(
                "role",
                format!("unknown role '{other}', expected one of 'read', 'write', 'admin'"),
            )),
        }
    }
}

/// The kind of principal a permission is granted to.
///
/// Selects the `permissions/{kind}/` segment of the API path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrincipalKind {
    /// A registry user (or robot account).
    User,
    /// A team within an organisation.
    Team,
}

impl PrincipalKind {
    /// Returns the API path segment for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Team => "team",
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role granted to a user or team on a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Principal name.
    pub name: String,
    /// Granted role.
    pub role: Role,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.role)
    }
}

/// Body of `PUT .../permissions/{kind}/{name}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetPermissionRequest {
    /// Role to grant.
    pub role: Role,
}
