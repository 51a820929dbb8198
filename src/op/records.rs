/// Typed records mirroring the JSON that `op` prints with `--format json`.
///
/// Keys `op` adds that are not modelled here are ignored on decode. Optional keys
/// that are absent decode to `None`, `false`, `0` or an empty `Vec`, and are skipped
/// again on encode so a record survives a round trip unchanged.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

fn is_false(b: &bool) -> bool {
    !*b
}

/// An explicit `null` decodes to the zero value, same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A vault in the current account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    /// Globally unique identifier.
    pub id: String,
    /// Display name. Unique within an account, so usable as a lookup key.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Counter bumped whenever the vault's contents change.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content_version: u64,
}

/// The `{id, name}` snapshot of the vault an item lives in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// One URL attached to an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUrl {
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "is_false")]
    pub primary: bool,
}

/// A single named value within an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    /// Field type tag, e.g. `STRING` or `CONCEALED`.
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    /// Purpose tag, e.g. `USERNAME`, `PASSWORD` or `NOTES`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
    /// `op://vault/item/field` reference to this field.
    #[serde(default, deserialize_with = "null_as_default")]
    pub reference: String,
    /// Plaintext value. Present on reads, absent on list operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// A secret record belonging to exactly one vault.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Category tag, e.g. `LOGIN` or `PASSWORD`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "is_false")]
    pub favorite: bool,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<ItemUrl>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vault: VaultRef,
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: u64,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
    /// Summary line `op` shows in listings (usually the username).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_information: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_by: Option<String>,
}

impl Item {
    /// Look up a field by label or id (labels compared case-insensitively).
    #[must_use]
    pub fn field(&self, label_or_id: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| f.id == label_or_id || f.label.eq_ignore_ascii_case(label_or_id))
    }

    /// The URL flagged primary, falling back to the first one.
    #[must_use]
    pub fn primary_url(&self) -> Option<&ItemUrl> {
        self.urls.iter().find(|u| u.primary).or_else(|| self.urls.first())
    }
}

/// A `name=value` field assignment, input to create and edit operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub name: String,
    pub value: String,
}

impl Assignment {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The positional token `op` expects: `name=value`.
    #[must_use]
    pub fn to_arg(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

impl std::str::FromStr for Assignment {
    type Err = String;

    /// Split on the first `=`; the value may itself contain `=`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, value)) if !name.is_empty() => Ok(Self::new(name, value)),
            _ => Err(format!("expected name=value, got '{s}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_item() -> Item {
        Item {
            id: "abc123".to_owned(),
            title: "GitHub".to_owned(),
            category: "LOGIN".to_owned(),
            created_at: Some("2024-03-01T10:00:00Z".parse().unwrap()),
            updated_at: Some("2024-06-15T08:30:00Z".parse().unwrap()),
            favorite: true,
            tags: vec!["work".to_owned(), "dev".to_owned()],
            urls: vec![
                ItemUrl {
                    href: "https://github.com".to_owned(),
                    label: Some("website".to_owned()),
                    primary: true,
                },
                ItemUrl {
                    href: "https://gist.github.com".to_owned(),
                    label: None,
                    primary: false,
                },
            ],
            vault: VaultRef {
                id: "v1".to_owned(),
                name: "Private".to_owned(),
            },
            version: 7,
            fields: vec![
                Field {
                    id: "username".to_owned(),
                    kind: "STRING".to_owned(),
                    purpose: Some("USERNAME".to_owned()),
                    label: "username".to_owned(),
                    reference: "op://Private/GitHub/username".to_owned(),
                    value: Some("octocat".to_owned()),
                },
                Field {
                    id: "password".to_owned(),
                    kind: "CONCEALED".to_owned(),
                    purpose: Some("PASSWORD".to_owned()),
                    label: "password".to_owned(),
                    reference: "op://Private/GitHub/password".to_owned(),
                    value: Some("hunter2".to_owned()),
                },
            ],
            additional_information: Some("octocat".to_owned()),
            last_edited_by: Some("USER1".to_owned()),
        }
    }

    #[test]
    fn test_item_round_trip_all_optionals() {
        let item = full_item();
        let json = serde_json::to_string(&item).unwrap();
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_item_all_optionals_absent() {
        let item: Item = serde_json::from_str(r#"{"id":"x1"}"#).unwrap();
        assert_eq!(item.id, "x1");
        assert!(item.created_at.is_none());
        assert!(!item.favorite);
        assert!(item.tags.is_empty());
        assert!(item.urls.is_empty());
        assert!(item.fields.is_empty());
        assert_eq!(item.version, 0);
        assert_eq!(item.vault, VaultRef::default());
    }

    #[test]
    fn test_null_values_decode_as_empty() {
        let item: Item = serde_json::from_str(
            r#"{"id":"x","title":null,"favorite":null,"tags":null,"urls":null,"fields":null,"vault":null,"version":null}"#,
        )
        .unwrap();
        assert_eq!(item, Item {
            id: "x".to_owned(),
            ..Item::default()
        });

        let vault: Vault = serde_json::from_str(r#"{"id":"v","name":null,"content_version":null}"#).unwrap();
        assert_eq!(vault.name, "");
        assert_eq!(vault.content_version, 0);

        let field: Field =
            serde_json::from_str(r#"{"id":"f","type":null,"label":null,"reference":null,"value":null}"#).unwrap();
        assert_eq!(field, Field {
            id: "f".to_owned(),
            ..Field::default()
        });
    }

    #[test]
    fn test_batch_with_null_lists_decodes() {
        let items: Vec<Item> =
            crate::op::decode::decode_batch(br#"[{"id":"a","tags":null},{"id":"b","urls":null,"fields":null}]"#)
                .unwrap();
        assert_eq!(items.len(), 2);
        assert!(items[1].fields.is_empty());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let json = r#"{
            "id": "x1",
            "title": "Server",
            "category": "SERVER",
            "sections": [{"id": "s1"}],
            "vault": {"id": "v", "name": "Ops", "type": "USER_CREATED"},
            "fields": [{"id": "f", "type": "STRING", "label": "host", "reference": "op://Ops/Server/host", "section": {"id": "s1"}}]
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.vault.name, "Ops");
        assert_eq!(item.fields[0].kind, "STRING");
        assert!(item.fields[0].value.is_none());
    }

    #[test]
    fn test_field_lookup_by_label() {
        let item = full_item();
        assert_eq!(item.field("Password").unwrap().id, "password");
        assert!(item.field("otp").is_none());
        assert_eq!(item.primary_url().unwrap().href, "https://github.com");
    }

    #[test]
    fn test_assignment_parse() {
        let a: Assignment = "password=a=b".parse().unwrap();
        assert_eq!(a, Assignment::new("password", "a=b"));
        assert_eq!(a.to_arg(), "password=a=b");
        assert!("=oops".parse::<Assignment>().is_err());
        assert!("novalue".parse::<Assignment>().is_err());
    }
}
