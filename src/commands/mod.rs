/// Command dispatch: routes `Command` enum variants to their implementations.
pub mod create;
pub mod edit;
pub mod items;
pub mod read;
pub mod vaults;

use opshim::{OpClient, OpError, Runner};

use crate::cli::OutputCtx;
use crate::cli::args::Command;

/// Dispatch a parsed `Command` to its handler.
///
/// # Errors
///
/// Returns `OpError` on any command failure.
pub fn dispatch<R: Runner>(command: &Command, client: &OpClient<R>, ctx: &OutputCtx) -> Result<(), OpError> {
    match command {
        Command::Vaults => vaults::list(client, ctx),
        Command::Vault(args) => vaults::show(args, client, ctx),
        Command::CreateVault(args) => create::vault(args, client, ctx),
        Command::Items(args) => items::list(args, client, ctx),
        Command::Item(args) => items::show(args, client, ctx),
        Command::Get(args) => items::get_many(args, client, ctx),
        Command::CreateItem(args) => create::item(args, client, ctx),
        Command::Edit(args) => edit::run(args, client, ctx),
        Command::Read(args) => read::run(args, client, ctx),
    }
}
