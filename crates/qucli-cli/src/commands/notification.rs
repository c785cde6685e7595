//! Notification commands.
//!
//! `add-notification` runs the flag validation in `qucli-core` before any
//! client is created, so an invalid combination never reaches the network.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use qucli_core::{Notification, NotificationFlags, RepositoryRef};

use super::{connect, GlobalArgs};

/// Arguments for the list-notification command.
#[derive(Args)]
pub struct ListNotificationArgs {
    /// Repository as `namespace/name`
    #[arg(required = true)]
    pub repository: String,
}

/// Arguments for the add-notification command.
#[derive(Args)]
pub struct AddNotificationArgs {
    /// Repository as `namespace/name`
    #[arg(required = true)]
    pub repository: String,

    /// Triggering event (repo_push, build_queued, build_start, build_success,
    /// build_failure, build_cancelled, vulnerability_found)
    #[arg(long)]
    pub event: Option<String>,

    /// Minimum vulnerability severity for vulnerability_found, 0 (highest) to 6
    #[arg(long)]
    pub level: Option<String>,

    /// Git ref regex, e.g. (refs/heads/somebranch)|(refs/tags/sometag);
    /// not allowed with repo_push
    #[arg(long = "ref")]
    pub ref_regex: Option<String>,

    /// Delivery method (webhook, slack, email)
    #[arg(long)]
    pub method: Option<String>,

    /// Recipient address for the email method
    #[arg(long)]
    pub email: Option<String>,

    /// Target URL for the webhook and slack methods
    #[arg(long)]
    pub url: Option<String>,

    /// Optional human-readable title
    #[arg(long)]
    pub title: Option<String>,
}

impl AddNotificationArgs {
    /// Collects the raw flag values for validation.
    #[must_use]
    pub fn flags(&self) -> NotificationFlags {
        NotificationFlags {
            event: self.event.clone().unwrap_or_default(),
            method: self.method.clone().unwrap_or_default(),
            level: self.level.clone(),
            ref_regex: self.ref_regex.clone(),
            email: self.email.clone(),
            url: self.url.clone(),
            title: self.title.clone(),
        }
    }
}

/// Arguments for commands addressing one notification.
#[derive(Args)]
pub struct NotificationArgs {
    /// Repository as `namespace/name`
    #[arg(required = true)]
    pub repository: String,

    /// Notification UUID
    #[arg(required = true)]
    pub uuid: String,
}

/// Runs the list-notification command.
///
/// # Errors
///
/// Returns an error if the path is invalid or the notifications cannot be
/// fetched.
pub async fn list(args: &ListNotificationArgs, global: &GlobalArgs) -> Result<()> {
    let repo = RepositoryRef::parse(&args.repository)?;
    let client = connect(global.default_config())?;

    let notifications = client
        .list_notifications(&repo)
        .await
        .context("Failed to list notifications")?;

    for notification in &notifications {
        println!(
            "{}\tfailures={}",
            format_notification(notification),
            notification.number_of_failures
        );
    }
    Ok(())
}

/// Runs the add-notification command.
///
/// # Errors
///
/// Returns a validation error for an illegal flag combination, or an error
/// if the registry rejects the notification.
pub async fn add(args: &AddNotificationArgs, global: &GlobalArgs) -> Result<()> {
    let validated = args.flags().validate(&args.repository)?;
    let repo = validated.repository;

    let config = global.default_config();
    let hostname = config.hostname.clone();
    let client = connect(config)?;

    info!(
        repository = %repo,
        event = %validated.request.event,
        method = %validated.request.method,
        "Adding notification"
    );

    let notification = client
        .add_notification(&repo, &validated.request)
        .await
        .context("Failed to add notification")?;

    println!(
        "Added! \t{}\tin {hostname}/{repo}",
        format_notification(&notification)
    );
    Ok(())
}

/// Runs the delete-notification command.
///
/// # Errors
///
/// Returns an error if the path is invalid or the registry rejects the call.
pub async fn delete(args: &NotificationArgs, global: &GlobalArgs) -> Result<()> {
    let repo = RepositoryRef::parse(&args.repository)?;
    let config = global.default_config();
    let hostname = config.hostname.clone();
    let client = connect(config)?;

    client
        .delete_notification(&repo, &args.uuid)
        .await
        .context("Failed to delete notification")?;

    println!("Deleted! {} notification in {hostname}/{repo}", args.uuid);
    Ok(())
}

/// Runs the test-notification command.
///
/// # Errors
///
/// Returns an error if the path is invalid or the registry rejects the call.
pub async fn test(args: &NotificationArgs, global: &GlobalArgs) -> Result<()> {
    let repo = RepositoryRef::parse(&args.repository)?;
    let config = global.default_config();
    let hostname = config.hostname.clone();
    let client = connect(config)?;

    client
        .test_notification(&repo, &args.uuid)
        .await
        .context("Failed to test notification")?;

    println!(
        "Test Notification! {} notification in {hostname}/{repo}",
        args.uuid
    );
    Ok(())
}

fn format_notification(notification: &Notification) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        notification.uuid,
        notification.title.as_deref().unwrap_or("-"),
        notification.event,
        notification.event_config,
        notification.method,
        notification.config
    )
}
