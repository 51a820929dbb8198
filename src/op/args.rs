/// Argument assembly: logical operation + ordered options -> `op` argument vector.
///
/// Options are plain values applied in the order the caller supplied them. Each one
/// only ever appends to the accumulator, so they compose independently and never
/// overwrite each other.
use serde::Serialize;

use super::errors::OpError;
use super::records::Assignment;
use super::reference::SecretReference;

/// Flag pair appended to every invocation.
pub const FORMAT_ARGS: [&str; 2] = ["--format", "json"];

/// Stdin placeholder telling `op item get` to read specifiers from stdin.
const STDIN_MARKER: &str = "-";

/// A fully assembled call: subcommand, its arguments, and an optional stdin payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Top-level `op` subcommand: `vault`, `item`, `read` or `inject`.
    pub subcommand: &'static str,
    /// Arguments after the subcommand, excluding `--format json`.
    pub args: Vec<String>,
    /// Bytes to feed on standard input.
    pub stdin: Option<Vec<u8>>,
}

impl Invocation {
    fn new(subcommand: &'static str, args: Vec<String>) -> Self {
        Self {
            subcommand,
            args,
            stdin: None,
        }
    }

    fn with_stdin(mut self, stdin: Vec<u8>) -> Self {
        self.stdin = Some(stdin);
        self
    }

    /// The complete argument vector: subcommand, arguments, then `--format json`.
    #[must_use]
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 3);
        argv.push(self.subcommand.to_owned());
        argv.extend(self.args.iter().cloned());
        argv.extend(FORMAT_ARGS.iter().map(|s| (*s).to_owned()));
        argv
    }
}

// --- Options ---

/// Optional settings for `vault create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultOption {
    Description(String),
    Icon(String),
    AllowAdminsToManage(bool),
}

/// Optional settings for `item create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOption {
    Url(String),
    /// Password recipe, passed through verbatim (e.g. `20,letters,digits`).
    GeneratePassword(String),
    Favorite(bool),
    Tags(Vec<String>),
    Assignments(Vec<Assignment>),
}

/// Optional filters for `item list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOption {
    Tags(Vec<String>),
}

#[must_use]
pub fn with_vault_description(description: impl Into<String>) -> VaultOption {
    VaultOption::Description(description.into())
}

#[must_use]
pub fn with_vault_icon(icon: impl Into<String>) -> VaultOption {
    VaultOption::Icon(icon.into())
}

#[must_use]
pub fn with_vault_allow_admins_to_manage(allow: bool) -> VaultOption {
    VaultOption::AllowAdminsToManage(allow)
}

#[must_use]
pub fn with_item_url(url: impl Into<String>) -> ItemOption {
    ItemOption::Url(url.into())
}

#[must_use]
pub fn with_item_generate_password(recipe: impl Into<String>) -> ItemOption {
    ItemOption::GeneratePassword(recipe.into())
}

/// `true` appends a bare `--favorite`; `false` appends nothing.
#[must_use]
pub fn with_item_favorite(favorite: bool) -> ItemOption {
    ItemOption::Favorite(favorite)
}

#[must_use]
pub fn with_item_tags<I, S>(tags: I) -> ItemOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ItemOption::Tags(tags.into_iter().map(Into::into).collect())
}

#[must_use]
pub fn with_item_assignments(assignments: impl IntoIterator<Item = Assignment>) -> ItemOption {
    ItemOption::Assignments(assignments.into_iter().collect())
}

/// Tag filter for [`items_by_vault`](super::OpClient::items_by_vault).
#[must_use]
pub fn with_tags<I, S>(tags: I) -> ListOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ListOption::Tags(tags.into_iter().map(Into::into).collect())
}

fn push_pair(args: &mut Vec<String>, flag: &str, value: impl Into<String>) {
    args.push(flag.to_owned());
    args.push(value.into());
}

fn push_tags(args: &mut Vec<String>, tags: &[String]) {
    if !tags.is_empty() {
        push_pair(args, "--tags", tags.join(","));
    }
}

impl VaultOption {
    fn apply(&self, args: &mut Vec<String>) {
        match self {
            Self::Description(d) => push_pair(args, "--description", d.as_str()),
            Self::Icon(i) => push_pair(args, "--icon", i.as_str()),
            Self::AllowAdminsToManage(allow) => {
                push_pair(args, "--allow-admins-to-manage", allow.to_string());
            }
        }
    }
}

impl ItemOption {
    fn apply(&self, args: &mut Vec<String>) {
        match self {
            Self::Url(url) => push_pair(args, "--url", url.as_str()),
            // The recipe is an optional flag value, so op only accepts the `=` form.
            Self::GeneratePassword(recipe) => args.push(format!("--generate-password={recipe}")),
            Self::Favorite(true) => args.push("--favorite".to_owned()),
            Self::Favorite(false) => {}
            Self::Tags(tags) => push_tags(args, tags),
            Self::Assignments(assignments) => args.extend(assignments.iter().map(Assignment::to_arg)),
        }
    }
}

impl ListOption {
    fn apply(&self, args: &mut Vec<String>) {
        match self {
            Self::Tags(tags) => push_tags(args, tags),
        }
    }
}

// --- Operations ---

pub fn list_vaults() -> Invocation {
    Invocation::new("vault", vec!["list".to_owned()])
}

pub fn get_vault(vault: &str) -> Invocation {
    Invocation::new("vault", vec!["get".to_owned(), vault.to_owned()])
}

/// `item get <item> [--vault <vault>]`; an empty vault searches every vault.
pub fn get_item(item: &str, vault: &str) -> Invocation {
    let mut args = vec!["get".to_owned(), item.to_owned()];
    if !vault.is_empty() {
        push_pair(&mut args, "--vault", vault);
    }
    Invocation::new("item", args)
}

#[derive(Serialize)]
struct Specifier<'a> {
    id: &'a str,
}

/// `item get - [--vault <vault>]` with `[{"id": ...}, ...]` on stdin.
///
/// # Errors
///
/// Returns `OpError::EmptyInput` when `items` is empty.
pub fn get_items<S: AsRef<str>>(items: &[S], vault: &str) -> Result<Invocation, OpError> {
    if items.is_empty() {
        return Err(OpError::EmptyInput {
            what: "item identifiers",
        });
    }
    let specifiers: Vec<Specifier<'_>> = items.iter().map(|s| Specifier { id: s.as_ref() }).collect();
    let stdin = serde_json::to_vec(&specifiers)?;

    let mut args = vec!["get".to_owned(), STDIN_MARKER.to_owned()];
    if !vault.is_empty() {
        push_pair(&mut args, "--vault", vault);
    }
    Ok(Invocation::new("item", args).with_stdin(stdin))
}

pub fn list_items(vault: &str, options: &[ListOption]) -> Invocation {
    let mut args = vec!["list".to_owned()];
    push_pair(&mut args, "--vault", vault);
    for opt in options {
        opt.apply(&mut args);
    }
    Invocation::new("item", args)
}

pub fn create_vault(name: &str, options: &[VaultOption]) -> Invocation {
    let mut args = vec!["create".to_owned(), name.to_owned()];
    for opt in options {
        opt.apply(&mut args);
    }
    Invocation::new("vault", args)
}

pub fn create_item(vault: &str, category: &str, title: &str, options: &[ItemOption]) -> Invocation {
    let mut args = vec!["create".to_owned()];
    push_pair(&mut args, "--vault", vault);
    push_pair(&mut args, "--category", category);
    push_pair(&mut args, "--title", title);
    for opt in options {
        opt.apply(&mut args);
    }
    Invocation::new("item", args)
}

/// `item edit <id> name=value...`. `item_id` should already be the canonical id.
///
/// # Errors
///
/// Returns `OpError::EmptyInput` when `assignments` is empty.
pub fn edit_item(item_id: &str, assignments: &[Assignment]) -> Result<Invocation, OpError> {
    if assignments.is_empty() {
        return Err(OpError::EmptyInput { what: "assignments" });
    }
    let mut args = Vec::with_capacity(assignments.len() + 2);
    args.push("edit".to_owned());
    args.push(item_id.to_owned());
    args.extend(assignments.iter().map(Assignment::to_arg));
    Ok(Invocation::new("item", args))
}

pub fn read(reference: &str) -> Invocation {
    Invocation::new("read", vec![reference.to_owned()])
}

// --- Batched reads via `op inject` ---

pub(crate) fn begin_marker(index: usize) -> String {
    format!("<<opshim:{index}>>")
}

pub(crate) fn end_marker(index: usize) -> String {
    format!("<</opshim:{index}>>")
}

/// `inject` with a template holding one delimited `{{ reference }}` per input.
///
/// # Errors
///
/// Returns `OpError::EmptyInput` when `references` is empty, and
/// `OpError::InvalidReference` for anything that is not an `op://` reference.
pub fn read_many<S: AsRef<str>>(references: &[S]) -> Result<Invocation, OpError> {
    if references.is_empty() {
        return Err(OpError::EmptyInput {
            what: "secret references",
        });
    }
    let mut template = String::new();
    for (i, reference) in references.iter().enumerate() {
        let reference = reference.as_ref();
        if reference.contains("}}") {
            return Err(OpError::InvalidReference {
                reference: reference.to_owned(),
            });
        }
        let parsed: SecretReference = reference.parse()?;
        template.push_str(&format!("{}{{{{ {parsed} }}}}{}\n", begin_marker(i), end_marker(i)));
    }
    Ok(Invocation::new("inject", Vec::new()).with_stdin(template.into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tail(inv: &Invocation) -> Vec<String> {
        let argv = inv.argv();
        argv[argv.len() - 2..].to_vec()
    }

    fn format_count(inv: &Invocation) -> usize {
        inv.argv().iter().filter(|a| *a == "--format").count()
    }

    #[test]
    fn test_format_json_once_for_every_operation() {
        let all = vec![
            list_vaults(),
            get_vault("Private"),
            get_item("GitHub", ""),
            get_item("GitHub", "Private"),
            get_items(&["a", "b"], "Private").unwrap(),
            list_items("Private", &[with_tags(["x"])]),
            create_vault("New", &[with_vault_icon("gears")]),
            create_item("v", "login", "t", &[with_item_favorite(true)]),
            edit_item("id1", &[Assignment::new("a", "b")]).unwrap(),
            read("op://a/b/c"),
            read_many(&["op://a/b/c"]).unwrap(),
        ];
        for inv in &all {
            assert_eq!(tail(inv), ["--format", "json"], "{inv:?}");
            assert_eq!(format_count(inv), 1, "{inv:?}");
        }
    }

    #[test]
    fn test_list_vaults_fixed_args() {
        assert_eq!(list_vaults().argv(), ["vault", "list", "--format", "json"]);
    }

    #[test]
    fn test_get_item_vault_scope_only_when_given() {
        assert_eq!(get_item("GitHub", "").args, ["get", "GitHub"]);
        assert_eq!(get_item("GitHub", "Work").args, ["get", "GitHub", "--vault", "Work"]);
    }

    #[test]
    fn test_get_items_stdin_payload() {
        let inv = get_items(&["abc", "My \"Login\""], "").unwrap();
        assert_eq!(inv.args, ["get", "-"]);
        let stdin = String::from_utf8(inv.stdin.unwrap()).unwrap();
        assert_eq!(stdin, r#"[{"id":"abc"},{"id":"My \"Login\""}]"#);

        let scoped = get_items(&["abc"], "Ops").unwrap();
        assert_eq!(scoped.args, ["get", "-", "--vault", "Ops"]);
    }

    #[test]
    fn test_get_items_empty_is_rejected() {
        let empty: [&str; 0] = [];
        assert!(matches!(get_items(&empty, "v"), Err(OpError::EmptyInput { .. })));
    }

    #[test]
    fn test_list_items_tags_comma_joined() {
        let inv = list_items("v1", &[with_tags(["personal", "work"])]);
        assert_eq!(inv.args, ["list", "--vault", "v1", "--tags", "personal,work"]);
        let none = list_items("v1", &[with_tags(Vec::<String>::new())]);
        assert_eq!(none.args, ["list", "--vault", "v1"]);
    }

    #[test]
    fn test_create_vault_options_in_order() {
        let inv = create_vault(
            "My Vault",
            &[
                with_vault_description("desc"),
                with_vault_icon("treasure-chest"),
                with_vault_allow_admins_to_manage(true),
            ],
        );
        assert_eq!(
            inv.args,
            [
                "create",
                "My Vault",
                "--description",
                "desc",
                "--icon",
                "treasure-chest",
                "--allow-admins-to-manage",
                "true"
            ]
        );
    }

    #[test]
    fn test_create_vault_repeated_options_both_appended() {
        let inv = create_vault("V", &[with_vault_icon("a"), with_vault_icon("b")]);
        assert_eq!(inv.args, ["create", "V", "--icon", "a", "--icon", "b"]);
    }

    #[test]
    fn test_create_item_full() {
        let inv = create_item(
            "v1",
            "login",
            "My Login",
            &[
                with_item_url("https://example.com"),
                with_item_generate_password("20,letters,digits"),
                with_item_favorite(true),
                with_item_tags(["personal", "work"]),
                with_item_assignments([
                    Assignment::new("username", "user@example.com"),
                    Assignment::new("notes", "Some notes"),
                ]),
            ],
        );
        assert_eq!(
            inv.argv(),
            [
                "item",
                "create",
                "--vault",
                "v1",
                "--category",
                "login",
                "--title",
                "My Login",
                "--url",
                "https://example.com",
                "--generate-password=20,letters,digits",
                "--favorite",
                "--tags",
                "personal,work",
                "username=user@example.com",
                "notes=Some notes",
                "--format",
                "json"
            ]
        );
    }

    #[test]
    fn test_favorite_flag() {
        let off = create_item("v", "c", "t", &[with_item_favorite(false)]);
        assert!(!off.args.iter().any(|a| a.contains("favorite")));
        let on = create_item("v", "c", "t", &[with_item_favorite(true)]);
        assert_eq!(on.args.iter().filter(|a| *a == "--favorite").count(), 1);
        assert_eq!(on.args.last().unwrap(), "--favorite");
    }

    #[test]
    fn test_tags_and_assignments_keep_caller_order() {
        let inv = create_item(
            "v",
            "c",
            "t",
            &[
                with_item_tags(["a"]),
                with_item_assignments([Assignment::new("x", "1")]),
                with_item_tags(["b", "c"]),
                with_item_assignments([Assignment::new("y", "2")]),
            ],
        );
        assert_eq!(
            &inv.args[7..],
            ["--tags", "a", "x=1", "--tags", "b,c", "y=2"]
        );
    }

    #[test]
    fn test_edit_item_assignments() {
        let inv = edit_item(
            "id9",
            &[Assignment::new("username", "new"), Assignment::new("password", "p=w")],
        )
        .unwrap();
        assert_eq!(inv.args, ["edit", "id9", "username=new", "password=p=w"]);
        assert!(matches!(edit_item("id9", &[]), Err(OpError::EmptyInput { what: "assignments" })));
    }

    #[test]
    fn test_read_many_template() {
        let inv = read_many(&["op://a/b/c", "op://x/y/z"]).unwrap();
        assert_eq!(inv.subcommand, "inject");
        assert!(inv.args.is_empty());
        let template = String::from_utf8(inv.stdin.unwrap()).unwrap();
        assert_eq!(
            template,
            "<<opshim:0>>{{ op://a/b/c }}<</opshim:0>>\n<<opshim:1>>{{ op://x/y/z }}<</opshim:1>>\n"
        );
    }

    #[test]
    fn test_read_many_rejects_bad_input() {
        let empty: [&str; 0] = [];
        assert!(matches!(read_many(&empty), Err(OpError::EmptyInput { .. })));
        assert!(matches!(read_many(&["nope"]), Err(OpError::InvalidReference { .. })));
        assert!(matches!(
            read_many(&["op://a/b/c}} {{ op://d/e/f"]),
            Err(OpError::InvalidReference { .. })
        ));
    }
}
