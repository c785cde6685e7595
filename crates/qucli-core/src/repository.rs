//! Repository models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::path::RepositoryRef;
use crate::validation::ValidationError;

/// A repository as returned by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Organisation or user owning the repository.
    pub namespace: String,

    /// Repository name.
    pub name: String,

    /// Whether the repository can be pulled anonymously.
    #[serde(default)]
    pub is_public: bool,

    /// Free-form description; the registry sends `null` for none.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

impl Repository {
    /// Returns the `namespace/name` reference of this repository.
    #[must_use]
    pub fn reference(&self) -> RepositoryRef {
        RepositoryRef::new(&self.namespace, &self.name)
    }

    /// Returns the visibility derived from `is_public`.
    #[must_use]
    pub const fn visibility(&self) -> Visibility {
        if self.is_public {
            Visibility::Public
        } else {
            Visibility::Private
        }
    }
}

/// Who may pull a repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Anyone may pull.
    #[default]
    Public,
    /// Only users with an explicit permission may pull.
    Private,
}

impl Visibility {
    /// Returns the wire name of the visibility.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            other => Err(ValidationError::format(
                "visibility",
                format!("unknown visibility '{other}', expected 'public' or 'private'"),
            )),
        }
    }
}

/// Body of `POST /api/v1/repository`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateRepositoryRequest {
    /// Namespace to create the repository in.
    pub namespace: String,
    /// Repository name.
    pub repository: String,
    /// Initial visibility.
    pub visibility: Visibility,
    /// Repository description (may be empty).
    pub description: String,
}

impl CreateRepositoryRequest {
    /// Creates a request for `repository` with an empty description.
    #[must_use]
    pub fn new(repository: &RepositoryRef, visibility: Visibility) -> Self {
        Self {
            namespace: repository.namespace.clone(),
            repository: repository.name.clone(),
            visibility,
            description: String::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Deserializes `null` as the type's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
