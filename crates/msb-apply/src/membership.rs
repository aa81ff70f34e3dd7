//! Validator membership
//!
//! The membership set lives in the replication substrate, not in the view.
//! The engine never mutates it: it reads the set it was handed and reports
//! the changes its committed operations imply as a [`MembershipDiff`], which
//! the host applies in the same step that commits the view batch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use msb_core::WriterKey;

/// One member of the validator set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipEntry {
    /// Writing key of the indexer's append log
    pub key: WriterKey,
    /// Length of the member's log as seen by the substrate
    pub length: u64,
}

/// Snapshot of the validator set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipSet {
    members: BTreeMap<WriterKey, u64>,
}

impl MembershipSet {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from substrate entries
    pub fn from_entries(entries: impl IntoIterator<Item = MembershipEntry>) -> Self {
        Self {
            members: entries.into_iter().map(|e| (e.key, e.length)).collect(),
        }
    }

    /// Whether `key` is a member
    pub fn contains(&self, key: &WriterKey) -> bool {
        self.members.contains_key(key)
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when there are no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in key order
    pub fn entries(&self) -> impl Iterator<Item = MembershipEntry> + '_ {
        self.members
            .iter()
            .map(|(key, length)| MembershipEntry { key: *key, length: *length })
    }

    /// Apply a single change; added members start with an empty log
    pub fn apply(&mut self, change: &MembershipChange) {
        match change {
            MembershipChange::Add(key) => {
                self.members.entry(*key).or_insert(0);
            }
            MembershipChange::Remove(key) => {
                self.members.remove(key);
            }
        }
    }

    /// Apply every change of `diff` in order
    pub fn apply_diff(&mut self, diff: &MembershipDiff) {
        for change in diff.changes() {
            self.apply(change);
        }
    }
}

/// Addition or removal of a validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipChange {
    /// Key joins the validator set
    Add(WriterKey),
    /// Key leaves the validator set
    Remove(WriterKey),
}

impl MembershipChange {
    /// Key affected by the change
    pub fn key(&self) -> &WriterKey {
        match self {
            MembershipChange::Add(key) | MembershipChange::Remove(key) => key,
        }
    }
}

/// Ordered membership changes produced by one apply invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipDiff {
    changes: Vec<MembershipChange>,
}

impl MembershipDiff {
    /// Empty diff
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a change
    pub fn push(&mut self, change: MembershipChange) {
        self.changes.push(change);
    }

    /// Changes in apply order
    pub fn changes(&self) -> &[MembershipChange] {
        &self.changes
    }

    /// True when no change was produced
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
