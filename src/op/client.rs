/// `OpClient`: the typed operations, one `op` invocation each.
use std::collections::BTreeMap;

use serde::de::DeserializeOwned;

use super::args::{self, Invocation, ItemOption, ListOption, VaultOption};
use super::config::ClientConfig;
use super::decode::{decode, decode_batch, decode_injected, decode_text};
use super::errors::OpError;
use super::invoker::{ProcessRunner, Runner};
use super::records::{Assignment, Item, Vault};
use super::reference::SecretReference;

/// Client for the `op` command-line tool.
///
/// Holds only configuration, so it is cheap to clone and safe to share between
/// threads; every call spawns its own process.
#[derive(Debug, Clone, Default)]
pub struct OpClient<R = ProcessRunner> {
    runner: R,
}

impl OpClient<ProcessRunner> {
    /// A client running `op` from `PATH` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            runner: ProcessRunner::new(config),
        }
    }
}

impl<R: Runner> OpClient<R> {
    /// A client that executes through a custom [`Runner`].
    #[must_use]
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    #[must_use]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn run(&self, invocation: &Invocation) -> Result<Vec<u8>, OpError> {
        self.runner.run(invocation)
    }

    fn run_decode<T: DeserializeOwned>(&self, invocation: &Invocation) -> Result<T, OpError> {
        decode(&self.run(invocation)?)
    }

    /// All vaults in the current account.
    ///
    /// # Errors
    ///
    /// Returns `OpError` if `op` fails or prints something other than a vault list.
    pub fn vaults(&self) -> Result<Vec<Vault>, OpError> {
        self.run_decode(&args::list_vaults())
    }

    /// A vault by id or name ("Private" works as well as its id).
    ///
    /// # Errors
    ///
    /// Returns `OpError` if `op` fails or the output is not a vault.
    pub fn vault(&self, vault_id_or_name: &str) -> Result<Vault, OpError> {
        self.run_decode(&args::get_vault(vault_id_or_name))
    }

    /// An item by id or name, searched across every vault the user can access.
    ///
    /// # Errors
    ///
    /// Returns `OpError` if `op` fails or the output is not an item.
    pub fn item(&self, item_id_or_name: &str) -> Result<Item, OpError> {
        self.vault_item(item_id_or_name, "")
    }

    /// An item by id or name within one vault. An empty vault searches all of them.
    ///
    /// # Errors
    ///
    /// Returns `OpError` if `op` fails or the output is not an item.
    pub fn vault_item(&self, item_id_or_name: &str, vault_id_or_name: &str) -> Result<Item, OpError> {
        self.run_decode(&args::get_item(item_id_or_name, vault_id_or_name))
    }

    /// Several items across all vaults, fetched with a single `op` call.
    ///
    /// # Errors
    ///
    /// Returns `OpError::EmptyInput` without running anything if `items` is empty,
    /// otherwise any invocation or decode failure. No partial results.
    pub fn items<S: AsRef<str>>(&self, items: &[S]) -> Result<Vec<Item>, OpError> {
        self.vault_items(items, "")
    }

    /// Several items within one vault, fetched with a single `op` call.
    ///
    /// # Errors
    ///
    /// Same as [`items`](Self::items).
    pub fn vault_items<S: AsRef<str>>(&self, items: &[S], vault_id_or_name: &str) -> Result<Vec<Item>, OpError> {
        let invocation = args::get_items(items, vault_id_or_name)?;
        decode_batch(&self.run(&invocation)?)
    }

    /// Item summaries in a vault, optionally filtered by tag. Fields are not populated.
    ///
    /// # Errors
    ///
    /// Returns `OpError` if `op` fails or prints something other than an item list.
    pub fn items_by_vault(&self, vault_id_or_name: &str, options: &[ListOption]) -> Result<Vec<Item>, OpError> {
        self.run_decode(&args::list_items(vault_id_or_name, options))
    }

    /// Create a vault.
    ///
    /// # Errors
    ///
    /// Returns `OpError` if `op` rejects the vault or its output is not a vault.
    pub fn create_vault(&self, name: &str, options: &[VaultOption]) -> Result<Vault, OpError> {
        tracing::info!(name, "creating vault");
        self.run_decode(&args::create_vault(name, options))
    }

    /// Create an item in a vault.
    ///
    /// # Errors
    ///
    /// Returns `OpError` if `op` rejects the item or its output is not an item.
    pub fn create_item(
        &self,
        vault_id_or_name: &str,
        category: &str,
        title: &str,
        options: &[ItemOption],
    ) -> Result<Item, OpError> {
        tracing::info!(vault = vault_id_or_name, category, title, "creating item");
        self.run_decode(&args::create_item(vault_id_or_name, category, title, options))
    }

    /// Apply field assignments to an item and return the updated item.
    ///
    /// The item is resolved first so the edit targets its canonical id even when
    /// called with a name.
    ///
    /// # Errors
    ///
    /// Returns `OpError::EmptyInput` without running anything if `assignments` is
    /// empty, otherwise any lookup, edit or decode failure.
    pub fn edit_item_field(
        &self,
        vault_id_or_name: &str,
        item_id_or_name: &str,
        assignments: &[Assignment],
    ) -> Result<Item, OpError> {
        if assignments.is_empty() {
            return Err(OpError::EmptyInput { what: "assignments" });
        }
        let item = self.vault_item(item_id_or_name, vault_id_or_name)?;
        tracing::info!(item = %item.id, fields = assignments.len(), "editing item");
        self.run_decode(&args::edit_item(&item.id, assignments)?)
    }

    /// The plaintext of one field, addressed as `op://<vault>/<item>/<field>`.
    ///
    /// # Errors
    ///
    /// Returns `OpError` if `op` cannot resolve the reference.
    pub fn read(&self, reference: &str) -> Result<String, OpError> {
        Ok(decode_text(&self.run(&args::read(reference))?))
    }

    /// [`read`](Self::read) with the reference built from its parts.
    ///
    /// # Errors
    ///
    /// Same as [`read`](Self::read).
    pub fn read_item_field(&self, vault_id_or_name: &str, item_id_or_name: &str, field: &str) -> Result<String, OpError> {
        let reference = SecretReference::new(vault_id_or_name, item_id_or_name, field);
        self.read(&reference.to_string())
    }

    /// Read many references with one `op inject` call, keyed by reference.
    ///
    /// # Errors
    ///
    /// Returns `OpError::EmptyInput` or `OpError::InvalidReference` before running
    /// anything, and `OpError::MissingSecret` if any value is absent from the output.
    pub fn read_multi<S: AsRef<str>>(&self, references: &[S]) -> Result<BTreeMap<String, String>, OpError> {
        let invocation = args::read_many(references)?;
        decode_injected(&self.run(&invocation)?, references)
    }
}
