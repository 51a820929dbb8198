/// `op://<vault>/<item>/<field>` secret references.
use std::fmt;
use std::str::FromStr;

use super::errors::OpError;

const SCHEME: &str = "op://";

/// A reference to a single field, as accepted by `op read`.
///
/// The field part may contain further `/` segments (`section/field`); they are kept
/// together as the field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretReference {
    pub vault: String,
    pub item: String,
    pub field: String,
}

impl SecretReference {
    #[must_use]
    pub fn new(vault: impl Into<String>, item: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            vault: vault.into(),
            item: item.into(),
            field: field.into(),
        }
    }
}

impl fmt::Display for SecretReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}{}/{}/{}", self.vault, self.item, self.field)
    }
}

impl FromStr for SecretReference {
    type Err = OpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || OpError::InvalidReference {
            reference: s.to_owned(),
        };
        let rest = s.strip_prefix(SCHEME).ok_or_else(invalid)?;
        let mut parts = rest.splitn(3, '/');
        let vault = parts.next().filter(|p| !p.is_empty()).ok_or_else(invalid)?;
        let item = parts.next().filter(|p| !p.is_empty()).ok_or_else(invalid)?;
        let field = parts
            .next()
            .filter(|p| !p.is_empty() && !p.ends_with('/'))
            .ok_or_else(invalid)?;
        Ok(Self::new(vault, item, field))
    }
}
