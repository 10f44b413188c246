//! Durable cart storage.
//!
//! The cart and the checkout session token outlive the process: an explicit
//! store trait with a JSON-file implementation for real use and an
//! in-memory implementation for tests and ephemeral sessions.

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::CartLineItem;

/// Errors raised by a cart store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The stored record could not be (de)serialized.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The in-memory store's lock was poisoned.
    #[error("store lock poisoned")]
    Poisoned,
}

/// The durable cart record.
///
/// The line items and the session token are fields of one record so that
/// `clear()` drops both in a single write - there is no window where the
/// store holds a token for an already-emptied cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartRecord {
    /// Line items in insertion order.
    pub items: Vec<CartLineItem>,
    /// Active checkout session token, if one has been created.
    pub checkout_token: Option<String>,
}

/// Durable key-value storage for the cart record.
///
/// Loaded once at startup; rewritten after every cart mutation.
pub trait CartStore {
    /// Load the stored record. A store with no record yet returns the
    /// default (empty) record.
    fn load(&self) -> Result<CartRecord, StoreError>;

    /// Replace the stored record.
    fn save(&self, record: &CartRecord) -> Result<(), StoreError>;
}

// =============================================================================
// JsonFileStore
// =============================================================================

/// File-backed store holding the record as a single JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by the given file path. The file is created on
    /// first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CartStore for JsonFileStore {
    fn load(&self) -> Result<CartRecord, StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(CartRecord::default());
            }
            Err(e) => return Err(StoreError::Io(e)),
        };
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&self, record: &CartRecord) -> Result<(), StoreError> {
        // Write-then-rename so a crash mid-write cannot truncate the record
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(record)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-memory store.
///
/// Cloning shares the underlying record, so tests can hand one clone to a
/// cart manager and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    record: Arc<Mutex<CartRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of the currently stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn snapshot(&self) -> Result<CartRecord, StoreError> {
        Ok(self.record.lock().map_err(|_| StoreError::Poisoned)?.clone())
    }
}

impl CartStore for MemoryStore {
    fn load(&self) -> Result<CartRecord, StoreError> {
        self.snapshot()
    }

    fn save(&self, record: &CartRecord) -> Result<(), StoreError> {
        *self.record.lock().map_err(|_| StoreError::Poisoned)? = record.clone();
        Ok(())
    }
}
