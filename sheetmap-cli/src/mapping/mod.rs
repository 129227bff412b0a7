//! Target-to-source column mapping
//!
//! The mapping is keyed by target column, so a target can have at most one
//! source while a source may feed any number of targets. A target with no
//! entry is emitted as NULL by the script generator.

mod matching;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use matching::match_case_insensitive;

/// How an entry came into the mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingOrigin {
    /// Drawn by the user or given explicitly
    Manual,
    /// Created by the case-insensitive auto-map helper
    Auto,
}

impl MappingOrigin {
    /// Get display label for the origin
    pub fn label(&self) -> &'static str {
        match self {
            MappingOrigin::Manual => "[Manual]",
            MappingOrigin::Auto => "[Auto]",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MappingEntry {
    source: String,
    origin: MappingOrigin,
}

/// Dictionary from target column name to source column name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct Mapping {
    entries: BTreeMap<String, MappingEntry>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) the source for `target`
    ///
    /// Returns the source previously mapped to `target`, if any.
    pub fn set(&mut self, target: impl Into<String>, source: impl Into<String>) -> Option<String> {
        self.insert(target.into(), source.into(), MappingOrigin::Manual)
    }

    fn insert(&mut self, target: String, source: String, origin: MappingOrigin) -> Option<String> {
        self.entries
            .insert(target, MappingEntry { source, origin })
            .map(|previous| previous.source)
    }

    /// Delete the entry for `target`; a missing target is a no-op
    pub fn remove(&mut self, target: &str) -> Option<String> {
        self.entries.remove(target).map(|entry| entry.source)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replace the mapping with case-insensitive name matches
    ///
    /// Previous entries are discarded first. Targets without a
    /// case-insensitive match among `sources` stay unmapped. Returns the
    /// number of entries created.
    pub fn auto_map<T, S>(&mut self, targets: &[T], sources: &[S]) -> usize
    where
        T: AsRef<str>,
        S: AsRef<str>,
    {
        self.entries.clear();
        for (target, source) in match_case_insensitive(targets, sources) {
            self.insert(target, source, MappingOrigin::Auto);
        }
        self.entries.len()
    }

    /// Source mapped to `target`
    pub fn source_for(&self, target: &str) -> Option<&str> {
        self.entries.get(target).map(|e| e.source.as_str())
    }

    /// Targets fed by `source`, sorted by target name
    pub fn targets_for<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(_, e)| e.source == source)
            .map(|(t, _)| t.as_str())
    }

    pub fn origin(&self, target: &str) -> Option<MappingOrigin> {
        self.entries.get(target).map(|e| e.origin)
    }

    pub fn contains(&self, target: &str) -> bool {
        self.entries.contains_key(target)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (target, source) pairs sorted by target name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(t, e)| (t.as_str(), e.source.as_str()))
    }
}

impl From<BTreeMap<String, String>> for Mapping {
    fn from(map: BTreeMap<String, String>) -> Self {
        let mut mapping = Mapping::new();
        for (target, source) in map {
            mapping.insert(target, source, MappingOrigin::Manual);
        }
        mapping
    }
}

impl From<Mapping> for BTreeMap<String, String> {
    fn from(mapping: Mapping) -> Self {
        mapping
            .entries
            .into_iter()
            .map(|(t, e)| (t, e.source))
            .collect()
    }
}

impl std::fmt::Display for Mapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (target, source)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", target, source)?;
        }
        write!(f, "}}")
    }
}
