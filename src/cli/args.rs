/// CLI argument definitions via clap derive.
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use opshim::{Assignment, ClientConfig};

/// Environment variable that turns on command echo when non-empty.
pub const DEBUG_ENV: &str = "OP_GO_DEBUG";

/// opshim — typed access to 1Password vaults and items through `op`.
#[derive(Debug, Parser)]
#[command(
    name = "opshim",
    about = "Typed access to 1Password vaults and items through the op CLI",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output format. Auto-detects: table when TTY, json when piped.
    #[arg(long, global = true, value_name = "FORMAT", default_value = "auto")]
    pub output: OutputFormat,

    /// Shorthand for --output json.
    #[arg(long, global = true, conflicts_with = "output")]
    pub json: bool,

    /// Comma-separated column names to include in table output.
    #[arg(long, global = true, value_name = "FIELDS")]
    pub fields: Option<String>,

    /// Omit table headers (useful for awk/cut processing).
    #[arg(long, global = true)]
    pub no_header: bool,

    /// Echo each op command line (and a stdin preview) to stderr.
    /// Also enabled by a non-empty OP_GO_DEBUG.
    #[arg(long, global = true)]
    pub debug: bool,

    /// Path to the op binary.
    #[arg(long, global = true, env = "OPSHIM_OP_PATH", default_value = "op", value_name = "PATH")]
    pub op_path: String,

    /// Account to use when several are signed in.
    #[arg(long, global = true, env = "OP_ACCOUNT", value_name = "ACCOUNT")]
    pub account: Option<String>,

    /// Kill op if a call takes longer than this many seconds.
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// `--debug`, or `OP_GO_DEBUG` set to anything non-empty.
    #[must_use]
    pub fn debug_enabled(&self) -> bool {
        self.debug || std::env::var_os(DEBUG_ENV).is_some_and(|v| !v.is_empty())
    }

    /// Client settings derived from the global flags.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new()
            .program(&self.op_path)
            .debug(self.debug_enabled());
        if let Some(account) = &self.account {
            config = config.account(account);
        }
        if let Some(secs) = self.timeout {
            config = config.timeout(Duration::from_secs(secs));
        }
        config
    }
}

/// Output format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Auto-detect: table when stdout is a TTY, json when piped.
    #[default]
    Auto,
    /// JSON array or object (pretty-printed).
    Json,
    /// Compact single-line JSON.
    Compact,
    /// Newline-delimited JSON (one object per line).
    Ndjson,
    /// Aligned table with headers (human-readable).
    Table,
    /// IDs only (secret values for `read`), one per line.
    Id,
}

/// All subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all vaults.
    Vaults,
    /// Show one vault by ID or name.
    Vault(VaultArgs),
    /// Create a vault.
    CreateVault(CreateVaultArgs),
    /// List items in a vault (fields are not included).
    Items(ItemsArgs),
    /// Show one item with its fields.
    Item(ItemArgs),
    /// Fetch several items with a single op call.
    Get(GetArgs),
    /// Create an item.
    CreateItem(CreateItemArgs),
    /// Assign new values to fields of an existing item.
    Edit(EditArgs),
    /// Read secret values by op:// reference.
    Read(ReadArgs),
}

/// Arguments for `opshim vault`.
#[derive(Debug, Parser)]
pub struct VaultArgs {
    /// Vault ID or name.
    pub vault: String,
}

/// Arguments for `opshim create-vault`.
#[derive(Debug, Parser)]
pub struct CreateVaultArgs {
    /// Name of the new vault.
    pub name: String,

    #[arg(long)]
    pub description: Option<String>,

    /// Icon name, e.g. "treasure-chest".
    #[arg(long)]
    pub icon: Option<String>,

    /// Whether administrators may manage access to the vault.
    #[arg(long, value_name = "BOOL")]
    pub allow_admins_to_manage: Option<bool>,
}

/// Arguments for `opshim items`.
#[derive(Debug, Parser)]
pub struct ItemsArgs {
    /// Vault ID or name.
    #[arg(long)]
    pub vault: String,

    /// Only items carrying all of these tags (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,
}

/// Arguments for `opshim item`.
#[derive(Debug, Parser)]
pub struct ItemArgs {
    /// Item ID or name.
    pub item: String,

    /// Restrict the lookup to this vault.
    #[arg(long)]
    pub vault: Option<String>,

    /// Show concealed field values in table output.
    #[arg(long)]
    pub reveal: bool,

    /// Print only this field's value, matched by label or ID.
    #[arg(long, value_name = "LABEL")]
    pub field: Option<String>,
}

/// Arguments for `opshim get`.
#[derive(Debug, Parser)]
pub struct GetArgs {
    /// Item IDs or names.
    #[arg(required = true)]
    pub items: Vec<String>,

    /// Restrict the lookup to this vault.
    #[arg(long)]
    pub vault: Option<String>,
}

/// Arguments for `opshim create-item`.
#[derive(Debug, Parser)]
pub struct CreateItemArgs {
    /// Vault ID or name.
    #[arg(long)]
    pub vault: String,

    /// Item category, e.g. "login" or "password".
    #[arg(long)]
    pub category: String,

    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub url: Option<String>,

    /// Password recipe, e.g. "20,letters,digits".
    #[arg(long, value_name = "RECIPE")]
    pub generate_password: Option<String>,

    /// Mark the item as a favorite.
    #[arg(long)]
    pub favorite: bool,

    /// Comma-separated tags.
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Field assignments as name=value.
    #[arg(value_name = "NAME=VALUE")]
    pub assignments: Vec<Assignment>,
}

/// Arguments for `opshim edit`.
#[derive(Debug, Parser)]
pub struct EditArgs {
    /// Item ID or name.
    pub item: String,

    /// Vault ID or name.
    #[arg(long)]
    pub vault: String,

    /// Field assignments as name=value.
    #[arg(value_name = "NAME=VALUE", required = true)]
    pub assignments: Vec<Assignment>,
}

/// Arguments for `opshim read`.
#[derive(Debug, Parser)]
pub struct ReadArgs {
    /// References of the form op://vault/item/field. Several are read in one call.
    #[arg(required = true, value_name = "REFERENCE")]
    pub references: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_item() {
        let cli = Cli::try_parse_from([
            "opshim",
            "create-item",
            "--vault",
            "Private",
            "--category",
            "login",
            "--title",
            "GitHub",
            "--tags",
            "work,dev",
            "--favorite",
            "username=octocat",
            "notes=a=b",
        ])
        .unwrap();
        let Command::CreateItem(args) = cli.command else {
            panic!("expected create-item");
        };
        assert_eq!(args.tags, ["work", "dev"]);
        assert!(args.favorite);
        assert_eq!(
            args.assignments,
            [Assignment::new("username", "octocat"), Assignment::new("notes", "a=b")]
        );
    }

    #[test]
    fn test_parse_item_field() {
        let cli = Cli::try_parse_from(["opshim", "item", "GitHub", "--vault", "Private", "--field", "password"]).unwrap();
        let Command::Item(args) = cli.command else {
            panic!("expected item");
        };
        assert_eq!(args.field.as_deref(), Some("password"));
        assert_eq!(args.vault.as_deref(), Some("Private"));

        let cli = Cli::try_parse_from(["opshim", "item", "GitHub"]).unwrap();
        let Command::Item(args) = cli.command else {
            panic!("expected item");
        };
        assert!(args.field.is_none());
    }

    #[test]
    fn test_edit_requires_assignment() {
        assert!(Cli::try_parse_from(["opshim", "edit", "GitHub", "--vault", "Private"]).is_err());
        assert!(Cli::try_parse_from(["opshim", "edit", "GitHub", "--vault", "Private", "bad"]).is_err());
    }

    #[test]
    fn test_client_config_from_flags() {
        let cli = Cli::try_parse_from([
            "opshim",
            "--op-path",
            "/usr/local/bin/op",
            "--account",
            "team",
            "--timeout",
            "30",
            "--debug",
            "vaults",
        ])
        .unwrap();
        let config = cli.client_config();
        assert_eq!(config.program, std::path::PathBuf::from("/usr/local/bin/op"));
        assert_eq!(config.account.as_deref(), Some("team"));
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert!(config.debug);
    }
}
