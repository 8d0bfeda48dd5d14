use crate::error::Result;
use crate::registry::SymbolRegistry;
use crate::snapshot::{Snapshot, SnapshotStore};
use crate::types::symbol::Symbol;
use std::sync::Arc;

/// Explicit, owned home for everything a poll cycle reads and writes: the
/// symbol watch-list and the persisted snapshot.
///
/// The registry handle is shared (the display service mutates it out-of-band);
/// snapshot writes go through this type only, keeping the snapshot file
/// single-writer.
pub struct PollerState {
    registry: Arc<SymbolRegistry>,
    store: SnapshotStore,
}

impl PollerState {
    pub fn new(registry: Arc<SymbolRegistry>, store: SnapshotStore) -> Self {
        PollerState { registry, store }
    }

    pub fn registry(&self) -> &SymbolRegistry {
        &self.registry
    }

    /// The symbol set for one cycle, captured at cycle start. Registry
    /// mutations after this call land in the next cycle.
    pub fn capture_symbols(&self) -> Result<Vec<Symbol>> {
        self.registry.list()
    }

    /// Raw text of the previous persisted snapshot, for the change comparison.
    pub async fn last_snapshot_raw(&self) -> Result<String> {
        self.store.load_last().await
    }

    /// Persist the cycle's snapshot wholesale and return the serialized text.
    pub async fn commit_snapshot(&self, snapshot: &Snapshot) -> Result<String> {
        self.store.save(snapshot).await
    }
}
