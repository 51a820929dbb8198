/// `create-vault` and `create-item` commands.
use opshim::{
    ItemOption, OpClient, OpError, Runner, VaultOption, with_item_assignments, with_item_favorite,
    with_item_generate_password, with_item_tags, with_item_url, with_vault_allow_admins_to_manage,
    with_vault_description, with_vault_icon,
};

use crate::cli::OutputCtx;
use crate::cli::args::{CreateItemArgs, CreateVaultArgs};
use crate::cli::output::{write_item_detail, write_vault};

/// Run `opshim create-vault <name>`.
///
/// # Errors
///
/// Returns `OpError` if `op` rejects the vault.
pub fn vault<R: Runner>(args: &CreateVaultArgs, client: &OpClient<R>, ctx: &OutputCtx) -> Result<(), OpError> {
    let vault = client.create_vault(&args.name, &vault_options(args))?;
    write_vault(&vault, ctx);
    Ok(())
}

/// Run `opshim create-item`.
///
/// # Errors
///
/// Returns `OpError` if `op` rejects the item.
pub fn item<R: Runner>(args: &CreateItemArgs, client: &OpClient<R>, ctx: &OutputCtx) -> Result<(), OpError> {
    let item = client.create_item(&args.vault, &args.category, &args.title, &item_options(args))?;
    write_item_detail(&item, false, ctx);
    Ok(())
}

fn vault_options(args: &CreateVaultArgs) -> Vec<VaultOption> {
    let mut opts = Vec::new();
    if let Some(description) = &args.description {
        opts.push(with_vault_description(description));
    }
    if let Some(icon) = &args.icon {
        opts.push(with_vault_icon(icon));
    }
    if let Some(allow) = args.allow_admins_to_manage {
        opts.push(with_vault_allow_admins_to_manage(allow));
    }
    opts
}

fn item_options(args: &CreateItemArgs) -> Vec<ItemOption> {
    let mut opts = Vec::new();
    if let Some(url) = &args.url {
        opts.push(with_item_url(url));
    }
    if let Some(recipe) = &args.generate_password {
        opts.push(with_item_generate_password(recipe));
    }
    opts.push(with_item_favorite(args.favorite));
    opts.push(with_item_tags(args.tags.iter().cloned()));
    opts.push(with_item_assignments(args.assignments.iter().cloned()));
    opts
}
