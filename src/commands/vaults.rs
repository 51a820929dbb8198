/// `vaults` and `vault` commands.
use opshim::{OpClient, OpError, Runner};

use crate::cli::OutputCtx;
use crate::cli::args::VaultArgs;
use crate::cli::output::{write_vault, write_vaults};

/// Run `opshim vaults`.
///
/// # Errors
///
/// Returns `OpError` if `op` fails or prints an unexpected shape.
pub fn list<R: Runner>(client: &OpClient<R>, ctx: &OutputCtx) -> Result<(), OpError> {
    let vaults = client.vaults()?;
    write_vaults(&vaults, ctx);
    Ok(())
}

/// Run `opshim vault <id-or-name>`.
///
/// # Errors
///
/// Returns `OpError` if the vault does not exist or `op` fails.
pub fn show<R: Runner>(args: &VaultArgs, client: &OpClient<R>, ctx: &OutputCtx) -> Result<(), OpError> {
    let vault = client.vault(&args.vault)?;
    write_vault(&vault, ctx);
    Ok(())
}
