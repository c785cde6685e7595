//! CLI commands and argument parsing.

pub mod notification;
pub mod permission;
pub mod repository;

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};

use qucli_client::{QuayClient, QuayConfig, DEFAULT_HOSTNAME};
use qucli_core::PrincipalKind;

/// qucli - manage Quay.io repositories, permissions, and notifications
#[derive(Parser)]
#[command(name = "qucli")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Registry hostname (defaults to quay.io, or the host in `create` paths)
    #[arg(long, global = true, env = "QUAY_HOSTNAME")]
    pub hostname: Option<String>,

    /// OAuth token for the Quay API
    #[arg(long, global = true, env = "QUAY_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// API root override, e.g. http://127.0.0.1:8080/api/v1/
    #[arg(long, global = true, env = "QUAY_API_URL", hide = true)]
    pub api_url: Option<String>,
}

impl GlobalArgs {
    /// Builds the client configuration.
    ///
    /// An explicit `--hostname` (or `QUAY_HOSTNAME`) wins over `default_host`.
    /// `--api-url` replaces the API root but not the hostname printed in
    /// results.
    #[must_use]
    pub fn config(&self, default_host: &str) -> QuayConfig {
        let hostname = self
            .hostname
            .as_deref()
            .filter(|h| !h.is_empty())
            .unwrap_or(default_host);

        let config =
            QuayConfig::new(hostname).with_token(self.token.clone().unwrap_or_default());
        match self.api_url.as_deref().filter(|u| !u.is_empty()) {
            Some(api_url) => config.with_base_url(api_url),
            None => config,
        }
    }

    /// Builds the configuration for commands that address `namespace/name`.
    #[must_use]
    pub fn default_config(&self) -> QuayConfig {
        self.config(DEFAULT_HOSTNAME)
    }
}

/// Creates the API client for a configuration.
///
/// # Errors
///
/// Returns an error if the configuration does not yield a usable client.
pub fn connect(config: QuayConfig) -> Result<QuayClient> {
    QuayClient::new(config).context("Failed to create Quay client")
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// List repositories in a namespace
    List(repository::ListArgs),

    /// Show a repository and its permissions
    Get(repository::GetArgs),

    /// Create a repository
    Create(repository::CreateArgs),

    /// Delete a repository
    Delete(repository::DeleteArgs),

    /// Grant a user a role on a repository
    AddUser(permission::AddPermissionArgs),

    /// Revoke a user's role on a repository
    DeleteUser(permission::DeletePermissionArgs),

    /// Grant a team a role on a repository
    AddTeam(permission::AddPermissionArgs),

    /// Revoke a team's role on a repository
    DeleteTeam(permission::DeletePermissionArgs),

    /// List notifications of a repository
    ListNotification(notification::ListNotificationArgs),

    /// Add a notification to a repository
    AddNotification(notification::AddNotificationArgs),

    /// Delete a notification from a repository
    DeleteNotification(notification::NotificationArgs),

    /// Send a test payload for a notification
    TestNotification(notification::NotificationArgs),

    /// Print version information
    Version,
}

impl Commands {
    /// Returns the subcommand name as typed on the command line.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::List(_) => "list",
            Self::Get(_) => "get",
            Self::Create(_) => "create",
            Self::Delete(_) => "delete",
            Self::AddUser(_) => "add-user",
            Self::DeleteUser(_) => "delete-user",
            Self::AddTeam(_) => "add-team",
            Self::DeleteTeam(_) => "delete-team",
            Self::ListNotification(_) => "list-notification",
            Self::AddNotification(_) => "add-notification",
            Self::DeleteNotification(_) => "delete-notification",
            Self::TestNotification(_) => "test-notification",
            Self::Version => "version",
        }
    }
}

/// Dispatches the parsed command line.
///
/// # Errors
///
/// Returns the first usage, transport, or API error encountered.
pub async fn run(cli: &Cli) -> Result<()> {
    let global = &cli.global;

    match &cli.command {
        Commands::List(args) => repository::list(args, global).await,
        Commands::Get(args) => repository::get(args, global).await,
        Commands::Create(args) => repository::create(args, global).await,
        Commands::Delete(args) => repository::delete(args, global).await,
        Commands::AddUser(args) => permission::add(args, global, PrincipalKind::User).await,
        Commands::DeleteUser(args) => permission::delete(args, global, PrincipalKind::User).await,
        Commands::AddTeam(args) => permission::add(args, global, PrincipalKind::Team).await,
        Commands::DeleteTeam(args) => permission::delete(args, global, PrincipalKind::Team).await,
        Commands::ListNotification(args) => notification::list(args, global).await,
        Commands::AddNotification(args) => notification::add(args, global).await,
        Commands::DeleteNotification(args) => notification::delete(args, global).await,
        Commands::TestNotification(args) => notification::test(args, global).await,
        Commands::Version => {
            println!("qucli {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Renders the help text of a subcommand.
#[must_use]
pub fn subcommand_help(name: &str) -> String {
    let mut command = Cli::command();
    command.build();
    command
        .find_subcommand_mut(name)
        .map(|sub| sub.render_help().to_string())
        .unwrap_or_default()
}
