//! Repository path parsing.
//!
//! Commands address repositories either as `namespace/name` or, for
//! `create`, as `host/namespace/name`.

use std::fmt;

use crate::validation::ValidationError;

/// Splits a slash-delimited path and enforces the expected segment count.
///
/// Every segment must be non-empty, so `"a//b"` and `"a/b/"` are rejected.
///
/// # Errors
///
/// Returns a [`ValidationError`] for `field` when the segment count differs
/// from `arity` or any segment is empty.
///
/// # Examples
///
/// ```
/// use qucli_core::parse_segments;
///
/// assert_eq!(parse_segments("repository", "koudaiii/qucli", 2).unwrap(), ["koudaiii", "qucli"]);
/// assert!(parse_segments("repository", "a/b/c/d", 2).is_err());
/// ```
pub fn parse_segments<'a>(
    field: &str,
    path: &'a str,
    arity: usize,
) -> Result<Vec<&'a str>, ValidationError> {
    let segments: Vec<&str> = path.split('/').collect();

    if segments.len() != arity {
        return Err(ValidationError::format(
            field,
            format!(
                "expected {arity} '/'-separated segments, got {} in '{path}'",
                segments.len()
            ),
        ));
    }

    if segments.iter().any(|s| s.is_empty()) {
        return Err(ValidationError::format(
            field,
            format!("'{path}' contains an empty segment"),
        ));
    }

    Ok(segments)
}

/// A repository addressed as `namespace/name` on an already-known host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    /// Organisation or user owning the repository.
    pub namespace: String,
    /// Repository name.
    pub name: String,
}

impl RepositoryRef {
    /// Creates a reference from its parts without validation.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Parses `namespace/name`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] unless the path has exactly two
    /// non-empty segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use qucli_core::RepositoryRef;
    ///
    /// let repo = RepositoryRef::parse("koudaiii/qcli").unwrap();
    /// assert_eq!(repo.to_string(), "koudaiii/qcli");
    /// ```
    pub fn parse(path: &str) -> Result<Self, ValidationError> {
        let segments = parse_segments("repository", path, 2)?;
        Ok(Self::new(segments[0], segments[1]))
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// A repository addressed as `host/namespace/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostedRepositoryRef {
    /// Registry hostname (e.g., `quay.io`).
    pub host: String,
    /// The repository on that host.
    pub repository: RepositoryRef,
}

impl HostedRepositoryRef {
    /// Parses `host/namespace/name`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] unless the path has exactly three
    /// non-empty segments.
    pub fn parse(path: &str) -> Result<Self, ValidationError> {
        let segments = parse_segments("repository", path, 3)?;
        Ok(Self {
            host: segments[0].to_string(),
            repository: RepositoryRef::new(segments[1], segments[2]),
        })
    }
}

impl fmt::Display for HostedRepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.host, self.repository)
    }
}
