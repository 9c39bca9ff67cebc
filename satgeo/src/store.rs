//! Contracts for the external collaborators the core reads from and
//! writes to, plus in-memory implementations used by tests and the CLI.
//!
//! The core tolerates collaborator failure: a sink write error degrades
//! to log-and-continue and never affects the value returned to the
//! caller.

use chrono::Duration;
use satgeo_types::prelude::ObjectRecord;
use std::{collections::HashMap, sync::Mutex};

use crate::graph::GraphFilter;

#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("metadata store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SinkError {
    #[error("sink write failed: {0}")]
    WriteFailed(String),
}

/// Graph-shaped object metadata source. Queried by attribute predicate;
/// returns per-object attributes and typed outgoing relationships.
pub trait MetadataStore {
    fn fetch(&self, filter: &GraphFilter) -> Result<Vec<ObjectRecord>, StoreError>;
}

/// Document-shaped result sink with delete-all-then-insert semantics:
/// one `replace` call atomically swaps the whole named collection, so a
/// concurrent reader never observes a partial snapshot.
pub trait SnapshotSink {
    fn replace(&self, collection: &str, document: serde_json::Value) -> Result<(), SinkError>;
}

/// Key-value cache holding a single "next event" message per user with
/// a time-to-live.
pub trait AlertCache {
    fn put(&self, key: &str, message: &str, ttl: Duration) -> Result<(), SinkError>;
}

/// In-memory metadata store: applies the filter predicate over a fixed
/// record list, the way the production store queries by attribute.
#[derive(Default)]
pub struct MemoryMetadataStore {
    records: Vec<ObjectRecord>,
}

impl MemoryMetadataStore {
    pub fn new(records: Vec<ObjectRecord>) -> Self {
        Self { records }
    }
}

impl MetadataStore for MemoryMetadataStore {
    fn fetch(&self, filter: &GraphFilter) -> Result<Vec<ObjectRecord>, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|r| filter.matches(&r.attributes))
            .cloned()
            .collect())
    }
}

/// In-memory document sink; the mutex makes the replace atomic for
/// concurrent readers
#[derive(Default)]
pub struct MemorySnapshotSink {
    collections: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemorySnapshotSink {
    /// A poisoned lock reads as an empty sink rather than panicking
    pub fn get(&self, collection: &str) -> Option<serde_json::Value> {
        self.collections.lock().ok()?.get(collection).cloned()
    }
}

impl SnapshotSink for MemorySnapshotSink {
    fn replace(&self, collection: &str, document: serde_json::Value) -> Result<(), SinkError> {
        let mut collections = self
            .collections
            .lock()
            .map_err(|e| SinkError::WriteFailed(e.to_string()))?;
        collections.insert(collection.to_string(), document);
        Ok(())
    }
}

/// In-memory alert cache storing the message alongside the requested
/// time-to-live
#[derive(Default)]
pub struct MemoryAlertCache {
    entries: Mutex<HashMap<String, (String, Duration)>>,
}

impl MemoryAlertCache {
    /// A poisoned lock reads as an empty cache rather than panicking
    pub fn get(&self, key: &str) -> Option<(String, Duration)> {
        self.entries.lock().ok()?.get(key).cloned()
    }
}

impl AlertCache for MemoryAlertCache {
    fn put(&self, key: &str, message: &str, ttl: Duration) -> Result<(), SinkError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| SinkError::WriteFailed(e.to_string()))?;
        entries.insert(key.to_string(), (message.to_string(), ttl));
        Ok(())
    }
}
