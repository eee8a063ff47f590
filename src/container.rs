//! The sequence container: batched, read-only stage input.
//!
//! A [`SequenceContainer`] holds one scalar context record (including the
//! required record identifier) and any number of named modality feature
//! lists. It is handed to a stage exactly once before stepping begins and
//! is never mutated afterwards, so stages can share one instance behind
//! an `Arc` without locking.

use bytes::Bytes;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Context key under which the record identifier is stored.
pub const ID_KEY: &str = "id";

/// One step's encoded payload within a modality's feature list.
///
/// Well-formed entries hold exactly one byte-string value. Entries with
/// any other value count are malformed; consuming them is a contract
/// violation ([`FeatureEntry::sole_value`] panics), because the upstream
/// writer already broke the format before this stage ran.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeatureEntry {
    values: SmallVec<[Bytes; 1]>,
}

impl FeatureEntry {
    /// Create a well-formed entry holding one value.
    pub fn from_value(value: impl Into<Bytes>) -> Self {
        let mut values = SmallVec::new();
        values.push(value.into());
        Self { values }
    }

    /// Create an entry with no values (malformed; for writers and tests).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a value.
    pub fn push(&mut self, value: impl Into<Bytes>) {
        self.values.push(value.into());
    }

    /// Get all values held by this entry.
    pub fn values(&self) -> &[Bytes] {
        &self.values
    }

    /// Get the entry's single value.
    ///
    /// # Panics
    ///
    /// Panics unless the entry holds exactly one value.
    pub fn sole_value(&self) -> &Bytes {
        assert_eq!(
            self.values.len(),
            1,
            "feature entry must hold exactly one value, got {}",
            self.values.len()
        );
        &self.values[0]
    }
}

/// Batched, read-only input for an unpacking stage.
///
/// Holds scalar context metadata plus a mapping from modality name to an
/// ordered feature list. Construct one with [`SequenceContainer::builder`].
#[derive(Clone, Debug, Default)]
pub struct SequenceContainer {
    context: HashMap<String, String>,
    feature_lists: HashMap<String, Vec<FeatureEntry>>,
}

impl SequenceContainer {
    /// Start building a container.
    pub fn builder() -> SequenceContainerBuilder {
        SequenceContainerBuilder::default()
    }

    /// Get the record identifier.
    ///
    /// # Panics
    ///
    /// Panics if the container carries no identifier. Containers are
    /// assumed well-formed by the time a stage reads them; a missing
    /// identifier means upstream validation already failed.
    pub fn identifier(&self) -> &str {
        self.context
            .get(ID_KEY)
            .unwrap_or_else(|| panic!("sequence container has no '{ID_KEY}' context value"))
    }

    /// Look up a scalar context value by key.
    pub fn context(&self, key: &str) -> Option<&str> {
        self.context.get(key).map(String::as_str)
    }

    /// Get a modality's feature list, if present.
    ///
    /// An absent list is `None`, distinct from a present-but-empty one;
    /// readers with required modalities must check presence explicitly
    /// rather than defaulting.
    pub fn feature_list(&self, modality: &str) -> Option<&[FeatureEntry]> {
        self.feature_lists.get(modality).map(Vec::as_slice)
    }

    /// Iterate over the modality names present in this container.
    pub fn modalities(&self) -> impl Iterator<Item = &str> {
        self.feature_lists.keys().map(String::as_str)
    }
}

/// Builder for [`SequenceContainer`].
#[derive(Debug, Default)]
pub struct SequenceContainerBuilder {
    context: HashMap<String, String>,
    feature_lists: HashMap<String, Vec<FeatureEntry>>,
}

impl SequenceContainerBuilder {
    /// Set the record identifier.
    pub fn identifier(self, id: impl Into<String>) -> Self {
        self.context(ID_KEY, id)
    }

    /// Set a scalar context value.
    pub fn context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Append a well-formed single-value entry to a modality's list.
    pub fn push_value(self, modality: impl Into<String>, value: impl Into<Bytes>) -> Self {
        self.push_entry(modality, FeatureEntry::from_value(value))
    }

    /// Append a raw entry to a modality's list.
    pub fn push_entry(mut self, modality: impl Into<String>, entry: FeatureEntry) -> Self {
        self.feature_lists
            .entry(modality.into())
            .or_default()
            .push(entry);
        self
    }

    /// Declare a modality with an empty feature list.
    pub fn empty_modality(mut self, modality: impl Into<String>) -> Self {
        self.feature_lists.entry(modality.into()).or_default();
        self
    }

    /// Finish building.
    pub fn build(self) -> SequenceContainer {
        SequenceContainer {
            context: self.context,
            feature_lists: self.feature_lists,
        }
    }
}
