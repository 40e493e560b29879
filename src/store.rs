//! The artifact store: shared, append/overwrite key-value state.
//!
//! The store is owned exclusively by the bus. Reactors never hold a reference
//! to it beyond the dispatch call they are invoked in; they read it through
//! the [`DispatchContext`](crate::reactor::DispatchContext) and mutate it only
//! via `publish_artifact`. The contract here is single-threaded but written so
//! it stays sound if the store is later wrapped in a mutex or handed to an
//! actor-style exclusive owner.

use chrono::{DateTime, Utc};
use miette::Diagnostic;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Provenance attached to every stored artifact.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArtifactMeta {
    /// Name of the reactor (or seed source) that produced the value.
    pub produced_by: String,
    /// Wall-clock production time; informational only, never part of equality.
    pub produced_at: DateTime<Utc>,
}

/// A named, machine-readable output produced by a reactor.
///
/// Reactors do not share state directly; they communicate through artifacts
/// in the store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Artifact {
    /// Unique key within the store. A later `put` under the same key
    /// overwrites the prior value (last-write-wins).
    pub key: String,
    /// Opaque JSON payload.
    pub value: Value,
    /// Provenance metadata.
    pub meta: ArtifactMeta,
}

impl Artifact {
    /// Creates an artifact stamped with the producer name and the current time.
    #[must_use]
    pub fn new(key: impl Into<String>, value: Value, produced_by: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value,
            meta: ArtifactMeta {
                produced_by: produced_by.into(),
                produced_at: Utc::now(),
            },
        }
    }
}

/// Errors surfaced by the store's read contract.
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    /// `require` was called for an absent key.
    ///
    /// Reactors must check [`ArtifactStore::has`] first; a miss here is a
    /// programming-contract violation, not a recoverable condition, and it
    /// aborts the run.
    #[error("missing required artifact: {key}")]
    #[diagnostic(
        code(pageloom::store::missing_artifact),
        help("Check `has` before `require`; report a MissingDependency instead of requiring blindly.")
    )]
    NotFound { key: String },
}

/// Central registry of produced artifacts, owned by the bus.
#[derive(Debug, Default)]
pub struct ArtifactStore {
    artifacts: FxHashMap<String, Artifact>,
}

impl ArtifactStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff a value is currently stored under `key`.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.artifacts.contains_key(key)
    }

    /// Non-throwing lookup.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Artifact> {
        self.artifacts.get(key)
    }

    /// Lookup that treats absence as a contract violation.
    pub fn require(&self, key: &str) -> Result<&Artifact, StoreError> {
        self.get(key).ok_or_else(|| StoreError::NotFound {
            key: key.to_string(),
        })
    }

    /// Inserts or overwrites by key. No versioning; the only side effect is
    /// the stored value changing.
    pub fn put(&mut self, artifact: Artifact) {
        self.artifacts.insert(artifact.key.clone(), artifact);
    }

    /// Sorted listing of present keys: the caller-facing read surface for
    /// inspecting a finished run.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.artifacts.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of stored artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// True iff nothing has been stored yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}
