//! The active table.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::table::Table;

/// Holds at most one published table.
///
/// Readers receive a shared handle to a complete table; replacing the table
/// swaps the handle under a write lock.
#[derive(Debug, Default)]
pub struct RecordStore {
    active: RwLock<Option<Arc<Table>>>,
}

impl RecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The active table, if one has been loaded.
    pub fn active_table(&self) -> Option<Arc<Table>> {
        self.active.read().clone()
    }

    /// Publish `table` as the active table, discarding the previous one.
    pub fn replace(&self, table: impl Into<Arc<Table>>) {
        let table = table.into();
        debug!(records = table.len(), "replacing active table");
        *self.active.write() = Some(table);
    }

    /// Drop the active table.
    pub fn clear(&self) {
        *self.active.write() = None;
    }

    /// Returns true if a table is active.
    pub fn is_loaded(&self) -> bool {
        self.active.read().is_some()
    }

    /// Number of records in the active table, 0 if none.
    pub fn record_count(&self) -> usize {
        self.active_table().map_or(0, |t| t.len())
    }
}
