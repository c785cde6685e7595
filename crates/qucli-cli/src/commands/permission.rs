//! Permission commands: `add-user`, `delete-user`, `add-team`, `delete-team`.

use anyhow::{Context, Result};
use clap::Args;

use qucli_core::{PrincipalKind, RepositoryRef, Role};

use super::{connect, GlobalArgs};

/// Arguments for granting a role.
#[derive(Args)]
pub struct AddPermissionArgs {
    /// Repository as `namespace/name`
    #[arg(required = true)]
    pub repository: String,

    /// User or team name
    #[arg(required = true)]
    pub principal: String,

    /// Role to grant (read, write, admin)
    #[arg(long, default_value_t = Role::Read)]
    pub role: Role,
}

/// Arguments for revoking a role.
#[derive(Args)]
pub struct DeletePermissionArgs {
    /// Repository as `namespace/name`
    #[arg(required = true)]
    pub repository: String,

    /// User or team name
    #[arg(required = true)]
    pub principal: String,
}

/// Runs `add-user` or `add-team`.
///
/// # Errors
///
/// Returns an error if the path is invalid or the registry rejects the grant.
pub async fn add(args: &AddPermissionArgs, global: &GlobalArgs, kind: PrincipalKind) -> Result<()> {
    let repo = RepositoryRef::parse(&args.repository)?;
    let config = global.default_config();
    let hostname = config.hostname.clone();
    let client = connect(config)?;

    let permission = client
        .add_permission(&repo, kind, &args.principal, args.role)
        .await
        .with_context(|| format!("Failed to add {kind} '{}'", args.principal))?;

    println!("Added! {permission} in {hostname}/{repo}");
    Ok(())
}

/// Runs `delete-user` or `delete-team`.
///
/// # Errors
///
/// Returns an error if the path is invalid or the registry rejects the call.
pub async fn delete(
    args: &DeletePermissionArgs,
    global: &GlobalArgs,
    kind: PrincipalKind,
) -> Result<()> {
    let repo = RepositoryRef::parse(&args.repository)?;
    let config = global.default_config();
    let hostname = config.hostname.clone();
    let client = connect(config)?;

    client
        .delete_permission(&repo, kind, &args.principal)
        .await
        .with_context(|| format!("Failed to delete {kind} '{}'", args.principal))?;

    println!("Deleted! {} in {hostname}/{repo}", args.principal);
    Ok(())
}
