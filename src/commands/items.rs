/// `items`, `item` and `get` commands.
use opshim::{OpClient, OpError, Runner, with_tags};

use crate::cli::OutputCtx;
use crate::cli::args::{GetArgs, ItemArgs, ItemsArgs};
use crate::cli::output::{field_secret, write_item_detail, write_item_details, write_items, write_secrets};

/// Run `opshim items --vault <vault>`.
///
/// # Errors
///
/// Returns `OpError` if `op` fails or prints an unexpected shape.
pub fn list<R: Runner>(args: &ItemsArgs, client: &OpClient<R>, ctx: &OutputCtx) -> Result<(), OpError> {
    let items = client.items_by_vault(&args.vault, &[with_tags(args.tags.iter().cloned())])?;
    write_items(&items, ctx);
    Ok(())
}

/// Run `opshim item <id-or-name> [--field <label>]`.
///
/// # Errors
///
/// Returns `OpError` if the item cannot be found, `op` fails, or the requested field
/// has no value.
pub fn show<R: Runner>(args: &ItemArgs, client: &OpClient<R>, ctx: &OutputCtx) -> Result<(), OpError> {
    let item = client.vault_item(&args.item, args.vault.as_deref().unwrap_or_default())?;
    match &args.field {
        Some(label) => write_secrets(&[field_secret(&item, label)?], ctx),
        None => write_item_detail(&item, args.reveal, ctx),
    }
    Ok(())
}

/// Run `opshim get <items>...`: one `op` call for all of them.
///
/// # Errors
///
/// Returns `OpError` if any item cannot be fetched; nothing is printed then.
pub fn get_many<R: Runner>(args: &GetArgs, client: &OpClient<R>, ctx: &OutputCtx) -> Result<(), OpError> {
    let items = client.vault_items(&args.items, args.vault.as_deref().unwrap_or_default())?;
    write_item_details(&items, false, ctx);
    Ok(())
}
