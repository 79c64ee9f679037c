//! Immutable fact snapshots.

use crate::Fact;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An immutable set of facts captured together for one evaluation.
///
/// Snapshots are only produced by [`SnapshotBuilder::build`]; there is no way
/// to change a fact once the snapshot exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    captured_at: DateTime<Utc>,
    facts: BTreeMap<String, Fact>,
}

impl Snapshot {
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn get(&self, key: &str) -> Option<&Fact> {
        self.facts.get(key)
    }

    /// Boolean fact, or `None` when absent or of another type.
    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Fact::as_bool)
    }

    /// Integer fact, or `None` when absent or of another type.
    pub fn int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Fact::as_int)
    }

    /// Text fact, or `None` when absent or of another type.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Fact::as_text)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Facts ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Fact)> {
        self.facts.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Accumulates facts before freezing them into a [`Snapshot`].
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    facts: BTreeMap<String, Fact>,
}

impl SnapshotBuilder {
    /// Record a fact, replacing any earlier value for the same key.
    pub fn fact(mut self, key: impl Into<String>, value: impl Into<Fact>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Fact>) {
        self.facts.insert(key.into(), value.into());
    }

    pub fn build(self) -> Snapshot {
        Snapshot {
            captured_at: Utc::now(),
            facts: self.facts,
        }
    }
}
