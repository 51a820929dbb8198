/// `edit` command: assign field values on an existing item.
use opshim::{OpClient, OpError, Runner};

use crate::cli::OutputCtx;
use crate::cli::args::EditArgs;
use crate::cli::output::write_item_detail;

/// Run `opshim edit <item> --vault <vault> name=value...`.
///
/// # Errors
///
/// Returns `OpError` if the item cannot be resolved or the edit is rejected.
pub fn run<R: Runner>(args: &EditArgs, client: &OpClient<R>, ctx: &OutputCtx) -> Result<(), OpError> {
    let item = client.edit_item_field(&args.vault, &args.item, &args.assignments)?;
    write_item_detail(&item, false, ctx);
    Ok(())
}
