//! In-memory replica harness
//!
//! Plays the host: opens a batch over committed state, runs the engine,
//! then commits the batch and the membership diff together.

use msb_apply::{
    ApplyContext, ApplyEngine, ApplyReport, DeliveredOperation, KvStore, LedgerConfig, LedgerReader,
    MembershipEntry, MembershipSet, MemoryStore, ViewBatch,
};
use msb_core::{Address, Balance, Hash32, NodeRecord, WriterKey};

/// One replica of the ledger
#[derive(Debug, Clone)]
pub struct Replica {
    engine: ApplyEngine,
    store: MemoryStore,
    bootstrap: WriterKey,
    tx_validity: Hash32,
    membership: MembershipSet,
}

impl Replica {
    /// Fresh replica whose only indexer is `bootstrap`
    pub fn new(bootstrap: WriterKey, tx_validity: Hash32) -> Self {
        Self::with_config(bootstrap, tx_validity, LedgerConfig::default())
    }

    /// Fresh replica running `config`
    pub fn with_config(bootstrap: WriterKey, tx_validity: Hash32, config: LedgerConfig) -> Self {
        Self {
            engine: ApplyEngine::new(config).expect("valid test config"),
            store: MemoryStore::new(),
            bootstrap,
            tx_validity,
            membership: MembershipSet::from_entries([MembershipEntry {
                key: bootstrap,
                length: 0,
            }]),
        }
    }

    /// Context the next batch runs under
    pub fn context(&self) -> ApplyContext {
        ApplyContext {
            bootstrap: self.bootstrap,
            tx_validity: self.tx_validity,
            membership: self.membership.clone(),
        }
    }

    /// Apply `operations` as one batch and commit it
    pub fn apply(&mut self, operations: &[DeliveredOperation]) -> ApplyReport {
        let context = self.context();
        let (writes, report) = {
            let mut batch = ViewBatch::new(&self.store);
            let report = self.engine.apply(operations, &mut batch, &context);
            (batch.into_writes(), report)
        };
        self.store.commit(writes).expect("memory store commits");
        self.membership.apply_diff(&report.membership);
        report
    }

    /// Apply a single operation
    pub fn apply_one(&mut self, operation: DeliveredOperation) -> ApplyReport {
        self.apply(std::slice::from_ref(&operation))
    }

    /// Change the membership digest operations must name
    pub fn set_tx_validity(&mut self, tx_validity: Hash32) {
        self.tx_validity = tx_validity;
    }

    /// Typed reads over committed state
    pub fn reader(&self) -> LedgerReader<'_, MemoryStore> {
        LedgerReader::new(&self.store)
    }

    /// Committed key-value state
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Current validator set
    pub fn membership(&self) -> &MembershipSet {
        &self.membership
    }

    /// Node record of `address`
    pub fn node(&self, address: &Address) -> Option<NodeRecord> {
        self.reader().node(address).expect("node record decodes")
    }

    /// Spendable balance of `address`, zero when it has no record
    pub fn balance(&self, address: &Address) -> Balance {
        self.node(address).map_or(Balance::ZERO, |node| node.balance)
    }

    /// Spendable plus staked balance of `address`
    pub fn holdings(&self, address: &Address) -> Balance {
        self.node(address).map_or(Balance::ZERO, |node| {
            node.balance.add(node.staked_balance).expect("holdings fit")
        })
    }
}
