//! Record Keys
//!
//! A record is addressed by an ordered list of key parts. Two string forms
//! are derived from it:
//!
//! - the record key, parts joined with `:` (`Bob:00002`), prefixed with
//!   the type tag by [`RecordKey::derive`] (`org.gamenet.playerupdate:Bob:00002`)
//! - the ledger composite key, every `:` component of the derived key
//!   framed by U+0000 behind a collection namespace
//!
//! Neither delimiter may appear inside a part, so distinct part lists never
//! map to the same string.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::error::{ContractError, Result};

/// Delimiter between key parts in a record key.
pub const KEY_DELIMITER: char = ':';

/// Separator between components of a ledger composite key.
pub const COMPOSITE_SEPARATOR: char = '\u{0}';

/// Check that a single key part is usable.
pub fn validate_key_part(part: &str) -> Result<()> {
    if part.is_empty() {
        return Err(ContractError::InvalidKey("empty key part".into()));
    }
    if part.contains(KEY_DELIMITER) || part.contains(COMPOSITE_SEPARATOR) {
        return Err(ContractError::InvalidKey(format!(
            "key part {:?} contains a reserved delimiter",
            part
        )));
    }
    Ok(())
}

/// Ordered, non-empty list of validated key parts.
///
/// Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordKey(Vec<String>);

impl RecordKey {
    /// Build a key from its parts.
    pub fn new<I, S>(parts: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let parts: Vec<String> = parts.into_iter().map(Into::into).collect();
        if parts.is_empty() {
            return Err(ContractError::InvalidKey("key has no parts".into()));
        }
        for part in &parts {
            validate_key_part(part)?;
        }
        Ok(Self(parts))
    }

    /// Parse the `:`-joined form.
    pub fn parse(key: &str) -> Result<Self> {
        Self::new(key.split(KEY_DELIMITER))
    }

    /// Key parts in order.
    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// Type tag followed by the key parts, `:`-joined.
    pub fn derive(&self, type_tag: &str) -> String {
        let mut key = String::from(type_tag);
        for part in &self.0 {
            key.push(KEY_DELIMITER);
            key.push_str(part);
        }
        key
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let delimiter = KEY_DELIMITER.to_string();
        f.write_str(&self.0.join(&delimiter))
    }
}

impl TryFrom<String> for RecordKey {
    type Error = ContractError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<RecordKey> for String {
    fn from(key: RecordKey) -> Self {
        key.to_string()
    }
}

/// Build a ledger key from a namespace and a derived record key.
///
/// Layout: `\0namespace\0component\0component\0...`
pub fn composite_key(namespace: &str, derived_key: &str) -> String {
    let mut key = String::with_capacity(namespace.len() + derived_key.len() + 4);
    key.push(COMPOSITE_SEPARATOR);
    key.push_str(namespace);
    key.push(COMPOSITE_SEPARATOR);
    for component in derived_key.split(KEY_DELIMITER) {
        key.push_str(component);
        key.push(COMPOSITE_SEPARATOR);
    }
    key
}

/// Render a composite key for logs (separators shown as `/`).
pub fn printable(ledger_key: &str) -> String {
    ledger_key
        .trim_matches(COMPOSITE_SEPARATOR)
        .replace(COMPOSITE_SEPARATOR, "/")
}
