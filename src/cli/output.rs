/// Output formatting: JSON, table, id modes. TTY detection.
use std::io::{IsTerminal, Write};

use comfy_table::{Cell, Table, presets::UTF8_BORDERS_ONLY};
use opshim::{Field, Item, ItemUrl, OpError, Vault};
use serde::Serialize;

use super::args::OutputFormat;
use crate::types::{ErrorOutput, SecretOutput};

/// Shown in place of concealed values unless `--reveal` is given.
const MASK: &str = "********";

/// Resolve the effective output format, handling `--json` flag and TTY auto-detection.
#[must_use]
pub fn resolve_format(fmt: OutputFormat, json_flag: bool) -> OutputFormat {
    if json_flag {
        return OutputFormat::Json;
    }
    if fmt == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        fmt
    }
}

/// Output context passed to all formatters.
pub struct OutputCtx {
    pub format: OutputFormat,
    pub fields: Option<Vec<String>>,
    pub no_header: bool,
}

impl OutputCtx {
    /// Construct from CLI args.
    #[must_use]
    pub fn new(fmt: OutputFormat, json_flag: bool, fields: Option<&str>, no_header: bool) -> Self {
        let format = resolve_format(fmt, json_flag);
        let fields = fields.map(|f| f.split(',').map(str::trim).map(str::to_owned).collect());
        Self {
            format,
            fields,
            no_header,
        }
    }

    /// Whether a column should be included in table output.
    fn include_field(&self, name: &str) -> bool {
        self.fields
            .as_ref()
            .is_none_or(|f| f.iter().any(|n| n == name))
    }
}

// --- Vaults ---

/// Write a list of vaults to stdout.
pub fn write_vaults(vaults: &[Vault], ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Json => print_json(vaults),
        OutputFormat::Compact => print_compact_json(vaults),
        OutputFormat::Ndjson => print_ndjson(vaults),
        OutputFormat::Id => {
            for v in vaults {
                println!("{}", v.id);
            }
        }
        OutputFormat::Table | OutputFormat::Auto => write_vaults_table(vaults, ctx),
    }
}

/// Write one vault to stdout (an object rather than a one-element array in JSON modes).
pub fn write_vault(vault: &Vault, ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Json => print_json(vault),
        OutputFormat::Compact => print_compact_json(vault),
        _ => write_vaults(std::slice::from_ref(vault), ctx),
    }
}

fn write_vaults_table(vaults: &[Vault], ctx: &OutputCtx) {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    if !ctx.no_header {
        table.set_header(["ID", "NAME", "CONTENT VERSION"]);
    }
    for v in vaults {
        table.add_row([v.id.as_str(), v.name.as_str(), &v.content_version.to_string()]);
    }
    println!("{table}");
}

// --- Item summaries ---

/// Write item summaries (as returned by `item list`) to stdout.
pub fn write_items(items: &[Item], ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Json => print_json(items),
        OutputFormat::Compact => print_compact_json(items),
        OutputFormat::Ndjson => print_ndjson(items),
        OutputFormat::Id => {
            for item in items {
                println!("{}", item.id);
            }
        }
        OutputFormat::Table | OutputFormat::Auto => write_items_table(items, ctx),
    }
}

fn write_items_table(items: &[Item], ctx: &OutputCtx) {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);

    let columns: Vec<(&str, &str)> = [
        ("id", "ID"),
        ("title", "TITLE"),
        ("category", "CATEGORY"),
        ("vault", "VAULT"),
        ("tags", "TAGS"),
        ("url", "URL"),
        ("updated", "UPDATED"),
    ]
    .into_iter()
    .filter(|(name, _)| ctx.include_field(name))
    .collect();

    if !ctx.no_header {
        table.set_header(columns.iter().map(|(_, header)| Cell::new(header)));
    }

    for item in items {
        let row: Vec<Cell> = columns
            .iter()
            .map(|(name, _)| match *name {
                "id" => Cell::new(&item.id),
                "title" => Cell::new(&item.title),
                "category" => Cell::new(&item.category),
                "vault" => Cell::new(&item.vault.name),
                "tags" => Cell::new(item.tags.join(", ")),
                "url" => Cell::new(primary_href(item)),
                _ => Cell::new(
                    item.updated_at
                        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_default(),
                ),
            })
            .collect();
        table.add_row(row);
    }

    println!("{table}");
}

fn primary_href(item: &Item) -> &str {
    item.primary_url().map_or("", |u| u.href.as_str())
}

// --- Item details ---

/// Write full items, fields included, to stdout.
///
/// Concealed values are masked in table output unless `reveal` is set; JSON modes
/// always carry what `op` returned.
pub fn write_item_details(items: &[Item], reveal: bool, ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Json => print_json(items),
        OutputFormat::Compact => print_compact_json(items),
        OutputFormat::Ndjson => print_ndjson(items),
        OutputFormat::Id => {
            for item in items {
                println!("{}", item.id);
            }
        }
        OutputFormat::Table | OutputFormat::Auto => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                write_item_table(item, reveal, ctx);
            }
        }
    }
}

/// Write one full item; an object rather than an array in JSON modes.
pub fn write_item_detail(item: &Item, reveal: bool, ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Json => print_json(item),
        OutputFormat::Compact => print_compact_json(item),
        _ => write_item_details(std::slice::from_ref(item), reveal, ctx),
    }
}

fn write_item_table(item: &Item, reveal: bool, ctx: &OutputCtx) {
    let star = if item.favorite { " ★" } else { "" };
    println!("{} [{}] {}{star}", item.title, item.category, item.id);
    println!("vault: {} ({})  version: {}", item.vault.name, item.vault.id, item.version);
    if !item.tags.is_empty() {
        println!("tags: {}", item.tags.join(", "));
    }
    for url in &item.urls {
        let label = url.label.as_deref().map(|l| format!(" ({l})")).unwrap_or_default();
        let primary = if url.primary { " [primary]" } else { "" };
        println!("url: {}{label}{primary}", url.href);
    }

    if item.fields.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    if !ctx.no_header {
        table.set_header(["LABEL", "TYPE", "VALUE", "REFERENCE"]);
    }
    for field in &item.fields {
        table.add_row([
            field.label.as_str(),
            field.kind.as_str(),
            display_value(field, reveal),
            field.reference.as_str(),
        ]);
    }
    println!("{table}");
}

fn display_value(field: &Field, reveal: bool) -> &str {
    match field.value.as_deref() {
        Some(_) if field.kind == "CONCEALED" && !reveal => MASK,
        Some(value) => value,
        None => "",
    }
}

// --- Secrets ---

/// The value of one field of `item`, looked up by label or id.
///
/// # Errors
///
/// Returns `OpError::MissingSecret` under `<item>/<field>` when the field is absent
/// or carries no value.
pub fn field_secret(item: &Item, label_or_id: &str) -> Result<SecretOutput, OpError> {
    let missing = || OpError::MissingSecret {
        reference: format!("{}/{label_or_id}", item.title),
    };
    let field = item.field(label_or_id).ok_or_else(missing)?;
    let value = field.value.clone().ok_or_else(missing)?;
    Ok(SecretOutput {
        reference: field.reference.clone(),
        value,
    })
}

/// Write secret values to stdout. `id` mode prints bare values, one per line.
pub fn write_secrets(secrets: &[SecretOutput], ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Json => print_json(secrets),
        OutputFormat::Compact => print_compact_json(secrets),
        OutputFormat::Ndjson => print_ndjson(secrets),
        OutputFormat::Id => {
            for s in secrets {
                println!("{}", s.value);
            }
        }
        OutputFormat::Table | OutputFormat::Auto => {
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            if !ctx.no_header {
                table.set_header(["REFERENCE", "VALUE"]);
            }
            for s in secrets {
                table.add_row([s.reference.as_str(), s.value.as_str()]);
            }
            println!("{table}");
        }
    }
}

// --- Error output ---

/// Write a structured error to stderr.
pub fn write_error(err: &ErrorOutput, format: OutputFormat, json_flag: bool) {
    let fmt = resolve_format(format, json_flag);
    let stderr = std::io::stderr();
    let mut out = stderr.lock();
    match fmt {
        OutputFormat::Json | OutputFormat::Compact | OutputFormat::Ndjson => {
            let s = serde_json::to_string_pretty(err).unwrap_or_default();
            let _ = writeln!(out, "{s}");
        }
        _ => {
            let _ = writeln!(out, "Error: {}", err.error.message.trim_end());
        }
    }
}

// --- Generic JSON helpers ---

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("JSON serialization error: {e}"),
    }
}

fn print_compact_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("JSON serialization error: {e}"),
    }
}

fn print_ndjson<T: Serialize>(values: &[T]) {
    for v in values {
        match serde_json::to_string(v) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("JSON serialization error: {e}"),
        }
    }
}
