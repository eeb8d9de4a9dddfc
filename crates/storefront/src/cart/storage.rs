//! Durable storage adapters for cart state.
//!
//! The store treats storage as an opaque durable mirror: it is read once
//! when the store opens and written after every mutation. The persisted
//! layout is versioned so the schema can evolve; a record with an
//! unknown version is treated the same as an absent one.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::store::{CartLine, CartState};

/// Version written into every persisted cart record.
pub const CART_SCHEMA_VERSION: u32 = 1;

/// Errors a storage adapter can produce.
///
/// These never propagate past the cart store - they exist so adapters
/// can report failures for logging.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// The durable mirror the cart store writes through to.
///
/// `load` is called once when a store opens; `save` after every
/// mutation. Implementations own the serialization format and medium.
pub trait CartStorage {
    /// Read the persisted state, or `None` if absent or unreadable.
    fn load(&self) -> Option<CartState>;

    /// Write the full state.
    fn save(&self, state: &CartState) -> Result<(), StorageError>;
}

/// On-disk JSON layout: `{ "version": 1, "items": [ { product, quantity } ] }`.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedCart {
    version: u32,
    items: Vec<CartLine>,
}

impl PersistedCart {
    fn from_state(state: &CartState) -> Self {
        Self {
            version: CART_SCHEMA_VERSION,
            items: state.lines().cloned().collect(),
        }
    }
}

/// Cart storage backed by a single JSON file.
///
/// Each browsing session gets its own file under the cart data
/// directory, named by cart ID. Multiple writers to the same file are
/// last-writer-wins with no conflict detection.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Storage at an explicit file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage for the cart `cart_id` under `dir`.
    #[must_use]
    pub fn for_cart(dir: &Path, cart_id: &str) -> Self {
        Self::new(dir.join(format!("{cart_id}.json")))
    }

    /// The file this adapter reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStorage for JsonFileStorage {
    fn load(&self) -> Option<CartState> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read cart file {:?}: {e}", self.path);
                return None;
            }
        };

        let persisted: PersistedCart = match serde_json::from_str(&raw) {
            Ok(persisted) => persisted,
            Err(e) => {
                tracing::warn!("Discarding corrupt cart file {:?}: {e}", self.path);
                return None;
            }
        };

        if persisted.version != CART_SCHEMA_VERSION {
            tracing::warn!(
                "Discarding cart file {:?} with unknown schema version {}",
                self.path,
                persisted.version
            );
            return None;
        }

        Some(CartState::from_lines(persisted.items))
    }

    fn save(&self, state: &CartState) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&PersistedCart::from_state(state))?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory cart storage for tests.
///
/// Clones of the same adapter share one slot, so a test can hand the
/// adapter to a store and still inspect what was persisted.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    slot: Arc<Mutex<Option<CartState>>>,
}

impl InMemoryStorage {
    /// The most recently saved state, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<CartState> {
        self.slot.lock().ok()?.clone()
    }
}

impl CartStorage for InMemoryStorage {
    fn load(&self) -> Option<CartState> {
        self.snapshot()
    }

    fn save(&self, state: &CartState) -> Result<(), StorageError> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(state.clone());
        }
        Ok(())
    }
}
