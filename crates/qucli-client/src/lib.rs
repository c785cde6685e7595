//! # qucli Client
//!
//! Client for the Quay.io REST API (`https://<hostname>/api/v1/`).
//!
//! The client covers the repository, permission, and notification
//! endpoints used by the `qucli` command line. Configuration is an explicit
//! [`QuayConfig`] value; nothing here reads the environment.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use qucli_client::{QuayClient, QuayConfig};
//! use qucli_core::{PrincipalKind, RepositoryRef, Role};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = QuayConfig::new("quay.io").with_token("token");
//!     let client = QuayClient::new(config)?;
//!
//!     let repo = RepositoryRef::parse("koudaiii/qucli")?;
//!     let permission = client
//!         .add_permission(&repo, PrincipalKind::User, "koudaiii", Role::Admin)
//!         .await?;
//!     println!("{permission}");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! Every failure is a [`ClientError`]: transport problems are
//! [`ClientError::Network`], non-2xx answers [`ClientError::Status`], and
//! unexpected bodies [`ClientError::Decode`]. Nothing is retried.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod client;
mod config;
mod error;

pub use client::QuayClient;
pub use config::{QuayConfig, API_PREFIX, DEFAULT_HOSTNAME};
pub use error::ClientError;
