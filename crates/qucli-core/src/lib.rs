//! # qucli Core
//!
//! Domain types and request validation for the qucli Quay.io client.
//!
//! This crate holds everything that can be decided without talking to the
//! registry:
//!
//! - [`Repository`] and [`CreateRepositoryRequest`] - repository models
//! - [`Permission`] and [`Role`] - per-repository access grants
//! - [`Notification`] and [`CreateNotificationRequest`] - notification models
//! - [`RepositoryRef`] - `namespace/name` path parsing
//! - [`NotificationFlags`] - validation of `add-notification` input
//!
//! ## Example
//!
//! ```rust
//! use qucli_core::{Event, Method, NotificationFlags};
//!
//! let flags = NotificationFlags {
//!     event: "repo_push".into(),
//!     method: "webhook".into(),
//!     url: Some("http://url/goes/here".into()),
//!     ..Default::default()
//! };
//!
//! let validated = flags.validate("koudaiii/qucli").unwrap();
//! assert_eq!(validated.repository.namespace, "koudaiii");
//! assert_eq!(validated.request.event, Event::RepoPush);
//! assert_eq!(validated.request.method, Method::Webhook);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod notification;
pub mod path;
pub mod permission;
pub mod repository;
pub mod validation;


pub use notification::{
    CreateNotificationRequest, Event, Method, Notification, NotificationConfig,
    NotificationEventConfig, NotificationFlags, ValidatedNotification, VulnerabilityLevel,
};
pub use path::{parse_segments, HostedRepositoryRef, RepositoryRef};
pub use permission::{Permission, PrincipalKind, Role, SetPermissionRequest};
pub use repository::{CreateRepositoryRequest, Repository, Visibility};
pub use validation::{ValidationError, ValidationErrorKind};
