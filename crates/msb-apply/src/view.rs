//! Transactional key-value view
//!
//! Three layers, each reading through to the one below:
//!
//! - a [`KvStore`] holding committed state
//! - a [`ViewBatch`] collecting the writes of one apply invocation
//! - an [`OperationScope`] collecting the writes of one operation
//!
//! An operation only ever writes into its scope. The engine merges the scope
//! into the batch after every check has passed, and the caller commits the
//! batch to the store in one step. A rejected operation therefore leaves no
//! trace in the batch.

use std::collections::BTreeMap;

use thiserror::Error;

use msb_core::{CodecError, ErrorCode};

/// Backend failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("store failure: {0}")]
pub struct StoreError(pub String);

/// Failure while reading typed values out of a view
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// Backend failed
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Stored bytes do not decode
    #[error("corrupt stored value: {0}")]
    Codec(#[from] CodecError),
}

impl ErrorCode for ViewError {
    fn code(&self) -> &'static str {
        match self {
            ViewError::Store(_) => "view_store",
            ViewError::Codec(_) => "view_codec",
        }
    }
}

/// Read access to a key-value view
pub trait ReadView {
    /// Value stored under `key`
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
}

/// Ordered set of pending writes
pub type WriteSet = BTreeMap<String, Vec<u8>>;

/// Committed key-value state owned by the replica
pub trait KvStore: ReadView {
    /// Write every entry atomically
    fn commit(&mut self, writes: WriteSet) -> Result<(), StoreError>;
}

/// In-memory store, ordered so that snapshots compare byte for byte
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Every committed entry in key order
    pub fn entries(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.entries
    }

    /// Number of committed entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was committed yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ReadView for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }
}

impl KvStore for MemoryStore {
    fn commit(&mut self, writes: WriteSet) -> Result<(), StoreError> {
        self.entries.extend(writes);
        Ok(())
    }
}

/// Writes of one apply invocation layered over committed state
pub struct ViewBatch<'s, S: ReadView + ?Sized> {
    base: &'s S,
    overlay: WriteSet,
}

impl<'s, S: ReadView + ?Sized> ViewBatch<'s, S> {
    /// Start a batch over `base`
    pub fn new(base: &'s S) -> Self {
        Self {
            base,
            overlay: WriteSet::new(),
        }
    }

    /// Fold an operation's writes into the batch
    pub fn merge(&mut self, writes: WriteSet) {
        self.overlay.extend(writes);
    }

    /// Pending writes, in key order
    pub fn pending(&self) -> &WriteSet {
        &self.overlay
    }

    /// Finish the batch, yielding the writes to commit
    pub fn into_writes(self) -> WriteSet {
        self.overlay
    }
}

impl<S: ReadView + ?Sized> ReadView for ViewBatch<'_, S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match self.overlay.get(key) {
            Some(value) => Ok(Some(value.clone())),
            None => self.base.get(key),
        }
    }
}

/// Staged writes of a single operation
pub struct OperationScope<'a> {
    base: &'a dyn ReadView,
    staged: WriteSet,
}

impl<'a> OperationScope<'a> {
    /// Start staging over `base`
    pub fn new(base: &'a dyn ReadView) -> Self {
        Self {
            base,
            staged: WriteSet::new(),
        }
    }

    /// Stage a write
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.staged.insert(key.into(), value.into());
    }

    /// Staged writes, consumed at the commit point
    pub fn into_writes(self) -> WriteSet {
        self.staged
    }
}

impl ReadView for OperationScope<'_> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match self.staged.get(key) {
            Some(value) => Ok(Some(value.clone())),
            None => self.base.get(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_read_through_and_shadow() {
        let mut store = MemoryStore::new();
        store
            .commit(WriteSet::from([
                ("a".to_string(), vec![1]),
                ("b".to_string(), vec![2]),
            ]))
            .unwrap();

        let mut batch = ViewBatch::new(&store);
        batch.merge(WriteSet::from([("b".to_string(), vec![20])]));

        let mut scope = OperationScope::new(&batch);
        scope.put("c", vec![30]);

        assert_eq!(scope.get("a").unwrap(), Some(vec![1]));
        assert_eq!(scope.get("b").unwrap(), Some(vec![20]));
        assert_eq!(scope.get("c").unwrap(), Some(vec![30]));
        assert_eq!(batch.get("c").unwrap(), None);
        assert_eq!(store.get("b").unwrap(), Some(vec![2]));
    }

    #[test]
    fn dropped_scope_leaves_batch_untouched() {
        let store = MemoryStore::new();
        let batch = ViewBatch::new(&store);
        {
            let mut scope = OperationScope::new(&batch);
            scope.put("x", vec![1]);
        }
        assert!(batch.pending().is_empty());
    }

    #[test]
    fn batch_commits_in_one_step() {
        let mut store = MemoryStore::new();
        let writes = {
            let mut batch = ViewBatch::new(&store);
            let writes = {
                let mut scope = OperationScope::new(&batch);
                scope.put("k", vec![9]);
                scope.into_writes()
            };
            batch.merge(writes);
            batch.into_writes()
        };
        assert!(store.is_empty());
        store.commit(writes).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(vec![9]));
    }
}
