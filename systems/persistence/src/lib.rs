#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Persistence gateway for Geocoin Carrier.
//!
//! A pure system that mirrors the authoritative world into an external
//! key-value store after every mutation, and reads it back on startup.
//! Writes are best-effort: a failing store is reported and otherwise
//! ignored, so persistence can never block or fail an in-memory mutation.

use std::collections::BTreeMap;

use geocoin_core::Event;
use geocoin_world::World;
use thiserror::Error;

mod save;

pub use save::{SaveGame, SavedCache, SavedPosition};

/// Key under which the save record is stored.
pub const SAVE_KEY: &str = "geocoin.save";

/// Contract of the external key-value store backing persistence.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any prior value.
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Failure reported by a key-value store write.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("store rejected write: {reason}")]
pub struct StoreError {
    reason: String,
}

impl StoreError {
    /// Creates a store error carrying the backend's reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while persisting the world.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The save record could not be encoded as JSON.
    #[error("could not encode save record: {0}")]
    Encode(#[from] serde_json::Error),
    /// The key-value store rejected the write.
    #[error("could not persist save record: {0}")]
    Store(#[from] StoreError),
}

/// Pure system that mirrors world mutations into the key-value store.
#[derive(Debug, Default)]
pub struct Persistence;

impl Persistence {
    /// Creates a new persistence system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Writes the world to the store when the events report any mutation.
    ///
    /// Failures are logged at warn level and swallowed; the triggering
    /// mutation has already committed in memory and must stand.
    pub fn handle(&mut self, events: &[Event], world: &World, store: &mut dyn KeyValueStore) {
        if events.is_empty() {
            return;
        }

        if let Err(error) = persist(world, store) {
            tracing::warn!(%error, "best-effort save failed");
        }
    }
}

/// Encodes the world and writes it under [`SAVE_KEY`].
pub fn persist(world: &World, store: &mut dyn KeyValueStore) -> Result<(), SaveError> {
    let record = SaveGame::capture(world);
    let json = serde_json::to_string(&record)?;
    store.set(SAVE_KEY, json)?;
    Ok(())
}

/// Reads the save record from the store.
///
/// Absent or malformed records yield `None` so callers fall back to fresh
/// world generation instead of failing.
#[must_use]
pub fn load(store: &dyn KeyValueStore) -> Option<SaveGame> {
    let raw = store.get(SAVE_KEY)?;
    match serde_json::from_str(&raw) {
        Ok(record) => Some(record),
        Err(error) => {
            tracing::warn!(%error, "ignoring malformed save record");
            None
        }
    }
}

/// In-memory key-value store for tests and embeddings without a backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        let _ = self.entries.insert(key.to_owned(), value);
        Ok(())
    }
}
