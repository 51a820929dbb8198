/// Typed layer over the `op` command-line tool: argument assembly, process
/// execution, and response decoding.
pub mod args;
pub mod client;
pub mod config;
pub mod decode;
pub mod errors;
pub mod invoker;
pub mod records;
pub mod reference;

pub use args::{
    Invocation, ItemOption, ListOption, VaultOption, with_item_assignments, with_item_favorite,
    with_item_generate_password, with_item_tags, with_item_url, with_tags,
    with_vault_allow_admins_to_manage, with_vault_description, with_vault_icon,
};
pub use client::OpClient;
pub use config::{CancelToken, ClientConfig};
pub use errors::OpError;
pub use invoker::{ProcessRunner, Runner};
pub use records::{Assignment, Field, Item, ItemUrl, Vault, VaultRef};
pub use reference::SecretReference;
