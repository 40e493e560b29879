//! The dependency coordinator: parks blocked work items and releases them
//! when their full dependency set becomes satisfied.
//!
//! The coordinator is a privileged reactor subscribed to both
//! `MissingDependency` and `ArtifactProduced`. Its state is private to the
//! value; no other component reads or writes `waiting`/`seen`.
//!
//! State machine per blocked item w.r.t. a missing key `k`:
//!
//! - **Unseen → Waiting**: first `MissingDependency(item, k)` for the pair
//!   `(identity(item), k)` parks the item under `waiting[k]`.
//! - **Seen duplicate → no-op**: the same pair again is dropped silently.
//! - **Waiting → Ready** on `ArtifactProduced(k)`: the whole `waiting[k]`
//!   list is popped. Items with every `requires` key now present are
//!   re-emitted as `Work` messages; items still missing something are
//!   re-blocked under their first still-missing key, if that pair is unseen.
//!
//! Dedup is per `(identity, key)` pair, not per item: the same logical item
//! legitimately blocks on different keys at different times as the store
//! fills in. `seen` only grows within a run, which bounds total blocking
//! events to O(distinct pairs) and prevents infinite blocking loops for the
//! same missing cause.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::message::{Message, WorkItem, WorkItemId};
use crate::reactor::{DispatchContext, Reactor, ReactorError};

/// Parks and releases work items based on artifact availability.
#[derive(Debug, Default)]
pub struct DependencyCoordinator {
    /// missing key -> work items waiting on that artifact, in arrival order.
    waiting: FxHashMap<String, Vec<WorkItem>>,
    /// Every `(item identity, missing key)` pair ever registered. Monotonic.
    seen: FxHashSet<(WorkItemId, String)>,
}

impl DependencyCoordinator {
    /// Creates an empty coordinator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items currently parked under `key`.
    #[must_use]
    pub fn blocked_on(&self, key: &str) -> usize {
        self.waiting.get(key).map_or(0, Vec::len)
    }

    /// Total parked items across all keys. Items left here after a drained
    /// run had unsatisfiable dependencies. That is not an error; the caller
    /// detects incompleteness by checking for expected final artifacts.
    #[must_use]
    pub fn total_blocked(&self) -> usize {
        self.waiting.values().map(Vec::len).sum()
    }

    /// Parks `item` under `key` unless the pair was already registered.
    fn park(&mut self, key: &str, item: WorkItem) {
        let pair = (item.identity(), key.to_string());
        if self.seen.contains(&pair) {
            tracing::trace!(key, item = %item.name, "duplicate blocking event dropped");
            return;
        }
        tracing::debug!(key, item = %item.name, "work item parked");
        self.seen.insert(pair);
        self.waiting.entry(key.to_string()).or_default().push(item);
    }

    /// Handles `ArtifactProduced(key)`: releases fully-satisfied items and
    /// re-blocks the rest.
    fn rewake(&mut self, key: &str, ctx: &DispatchContext<'_>) -> Vec<Message> {
        let Some(blocked) = self.waiting.remove(key) else {
            return Vec::new();
        };

        let mut ready = Vec::new();
        for item in blocked {
            if item.requires.iter().all(|req| ctx.store().has(req)) {
                tracing::debug!(key, item = %item.name, "work item ready, requeueing");
                ready.push(Message::Work(item));
                continue;
            }

            // Still missing something: re-register under the first absent
            // key. If that pair was already seen the item is dropped here,
            // a known stranding edge case, kept deliberately.
            let next_missing = item.requires.iter().find(|req| !ctx.store().has(req));
            if let Some(next_key) = next_missing {
                let pair = (item.identity(), next_key.clone());
                if self.seen.contains(&pair) {
                    tracing::warn!(
                        item = %item.name,
                        key = %next_key,
                        "re-block suppressed by dedup; item is now stranded"
                    );
                } else {
                    tracing::debug!(item = %item.name, key = %next_key, "re-blocked on next missing key");
                    self.seen.insert(pair);
                    self.waiting
                        .entry(next_key.clone())
                        .or_default()
                        .push(item);
                }
            }
        }
        ready
    }
}

impl Reactor for DependencyCoordinator {
    fn name(&self) -> &'static str {
        "dependency_coordinator"
    }

    fn react(
        &mut self,
        message: &Message,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<Vec<Message>, ReactorError> {
        match message {
            Message::MissingDependency(need) => {
                self.park(&need.missing_key, need.blocked.clone());
                Ok(Vec::new())
            }
            Message::ArtifactProduced { key } => Ok(self.rewake(key, ctx)),
            _ => Ok(Vec::new()),
        }
    }
}
