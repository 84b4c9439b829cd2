/*!
 * Localization keys and catalogs.
 *
 * - `LocalizationKey`: deterministic `<modpack>.<chapter>.<field><index>` keys
 * - `Catalog`: ordered key to string mapping persisted as a language file
 * - `rewriter`: placeholder substitution in chapter text
 * - `store`: serialized read-merge-write of catalog files
 */

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::CatalogError;
use crate::quest_processor::FieldKind;

pub mod rewriter;
pub mod store;

pub use self::rewriter::ChapterRewriter;
pub use self::store::CatalogStore;

/// Key identifying one localizable string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalizationKey {
    pub modpack: String,
    pub chapter_id: String,
    pub kind: FieldKind,
    pub index: usize,
}

impl LocalizationKey {
    pub fn new(modpack: impl Into<String>, chapter_id: impl Into<String>, kind: FieldKind, index: usize) -> Self {
        Self {
            modpack: modpack.into(),
            chapter_id: chapter_id.into(),
            kind,
            index,
        }
    }

    /// Placeholder token written into the chapter in place of the literal
    pub fn placeholder(&self) -> String {
        format!("{{{}}}", self)
    }
}

impl fmt::Display for LocalizationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}{}", self.modpack, self.chapter_id, self.kind.as_str(), self.index)
    }
}

/// Flat key to string mapping, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: IndexMap<String, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entry, returning the value it replaced
    ///
    /// Last write wins; an overwritten key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge `other` into this catalog; entries of `other` win on collision
    ///
    /// Returns the number of keys that were not present before.
    pub fn merge(&mut self, other: &Catalog) -> usize {
        let mut added = 0;
        for (key, value) in &other.entries {
            if self.entries.insert(key.clone(), value.clone()).is_none() {
                added += 1;
            }
        }
        added
    }

    /// Parse a catalog from the JSON of a language file
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Pretty-printed JSON with two-space indentation
    pub fn to_json_pretty(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl FromIterator<(String, String)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
