#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! opshim — a typed client over the 1Password `op` command-line tool.
//!
//! Every operation runs `op` once with `--format json` and decodes what it prints:
//!
//! ```no_run
//! use opshim::{OpClient, with_tags};
//!
//! let client = OpClient::new();
//! for vault in client.vaults()? {
//!     let items = client.items_by_vault(&vault.id, &[with_tags(["work"])])?;
//!     println!("{}: {} items", vault.name, items.len());
//! }
//! # Ok::<(), opshim::OpError>(())
//! ```

pub mod op;

pub use op::*;
