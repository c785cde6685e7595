//! Repository commands: `list`, `get`, `create`, `delete`.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use qucli_core::{
    CreateRepositoryRequest, HostedRepositoryRef, Permission, PrincipalKind, Repository,
    RepositoryRef, Visibility,
};

use super::{connect, GlobalArgs};

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Namespace (user or organisation) to list
    #[arg(required = true)]
    pub namespace: String,

    /// Include public repositories without an explicit permission
    #[arg(long)]
    pub public: bool,
}

/// Arguments for the get command.
#[derive(Args)]
pub struct GetArgs {
    /// Repository as `namespace/name` (e.g., koudaiii/qucli)
    #[arg(required = true)]
    pub repository: String,
}

/// Arguments for the create command.
#[derive(Args)]
pub struct CreateArgs {
    /// Repository as `host/namespace/name` (e.g., quay.io/koudaiii/qucli)
    #[arg(required = true)]
    pub repository: String,

    /// Repository visibility (public, private)
    #[arg(long, default_value_t = Visibility::Public)]
    pub visibility: Visibility,

    /// Repository description
    #[arg(long, default_value = "")]
    pub description: String,
}

/// Arguments for the delete command.
#[derive(Args)]
pub struct DeleteArgs {
    /// Repository as `namespace/name`
    #[arg(required = true)]
    pub repository: String,
}

/// Runs the list command.
///
/// # Errors
///
/// Returns an error if the repositories cannot be listed.
pub async fn list(args: &ListArgs, global: &GlobalArgs) -> Result<()> {
    let config = global.default_config();
    let hostname = config.hostname.clone();
    let client = connect(config)?;

    let repositories = client
        .list_repositories(&args.namespace, args.public)
        .await
        .context("Failed to list repositories")?;

    for repository in &repositories {
        println!("{}", format_listed(&hostname, repository));
    }
    Ok(())
}

/// Runs the get command.
///
/// # Errors
///
/// Returns an error if the path is invalid or the registry calls fail.
pub async fn get(args: &GetArgs, global: &GlobalArgs) -> Result<()> {
    let repo = RepositoryRef::parse(&args.repository)?;
    let config = global.default_config();
    let hostname = config.hostname.clone();
    let client = connect(config)?;

    let repository = client
        .get_repository(&repo)
        .await
        .context("Failed to get repository")?;
    let users = client
        .list_permissions(&repo, PrincipalKind::User)
        .await
        .context("Failed to list user permissions")?;
    let teams = client
        .list_permissions(&repo, PrincipalKind::Team)
        .await
        .context("Failed to list team permissions")?;

    print!("{}", format_details(&hostname, &repository, &users, &teams));
    Ok(())
}

/// Runs the create command.
///
/// # Errors
///
/// Returns an error if the path is not `host/namespace/name` or the
/// registry rejects the repository.
pub async fn create(args: &CreateArgs, global: &GlobalArgs) -> Result<()> {
    let target = HostedRepositoryRef::parse(&args.repository)?;
    let config = global.config(&target.host);
    let hostname = config.hostname.clone();
    let client = connect(config)?;

    info!(repository = %target, visibility = %args.visibility, "Creating repository");

    let request = CreateRepositoryRequest::new(&target.repository, args.visibility)
        .with_description(&args.description);
    let created = client
        .create_repository(&request)
        .await
        .context("Failed to create repository")?;

    println!("Created! {hostname}/{}/{}", created.namespace, created.name);
    Ok(())
}

/// Runs the delete command.
///
/// # Errors
///
/// Returns an error if the path is invalid or the registry rejects the call.
pub async fn delete(args: &DeleteArgs, global: &GlobalArgs) -> Result<()> {
    let repo = RepositoryRef::parse(&args.repository)?;
    let config = global.default_config();
    let hostname = config.hostname.clone();
    let client = connect(config)?;

    client
        .delete_repository(&repo)
        .await
        .context("Failed to delete repository")?;

    println!("Deleted! {hostname}/{repo}");
    Ok(())
}

fn format_listed(hostname: &str, repository: &Repository) -> String {
    format!(
        "{hostname}/{}\t{}",
        repository.reference(),
        repository.visibility()
    )
}

fn format_details(
    hostname: &str,
    repository: &Repository,
    users: &[Permission],
    teams: &[Permission],
) -> String {
    let mut out = format!(
        "Repository:\n\t{hostname}/{}\nVisibility:\n\t{}\n",
        repository.reference(),
        repository.visibility()
    );

    if !repository.description.is_empty() {
        out.push_str(&format!("Description:\n\t{}\n", repository.description));
    }

    out.push_str("Permissions:\n");
    for (kind, permissions) in [(PrincipalKind::User, users), (PrincipalKind::Team, teams)] {
        for permission in permissions {
            out.push_str(&format!("\t{kind}\t{permission}\n"));
        }
    }
    out
}
