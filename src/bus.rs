//! The message bus: FIFO queue, subscriber registry, and the run loop.
//!
//! The bus owns the [`ArtifactStore`] and is the only component that mutates
//! it, always on behalf of the reactor whose dispatch turn is running, which
//! rules out concurrent-write races by construction (no two reactors ever
//! execute at once; see the crate docs for the scheduling model).
//!
//! Dispatch semantics for one popped message:
//!
//! - subscribers of that message's kind are invoked in subscription order;
//! - everything they emit (returned messages and `publish_artifact` /
//!   `terminate` events) is collected into one batch and appended to the
//!   queue tail only after ALL subscribers for that message have run;
//! - a reactor failure is not caught; it aborts the run and propagates.
//!
//! Termination is cooperative: the terminal flag is re-checked before popping
//! the next message, never mid-batch, and the remaining queue is not cleared.

use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use miette::Diagnostic;
use thiserror::Error;

use crate::message::{Message, MessageKind};
use crate::reactor::{DispatchContext, Reactor, ReactorError};
use crate::store::ArtifactStore;

/// A registered reactor. The mutex exists because one reactor value may be
/// subscribed under several kinds (the coordinator listens on two); dispatch
/// itself is single-threaded and never contends.
pub type Subscriber = Arc<Mutex<dyn Reactor>>;

/// Why a run loop stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The queue emptied with no termination requested.
    Drained,
    /// A reactor (or the caller) requested termination.
    Terminated { reason: String },
}

/// Result of a completed [`MessageBus::run`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    /// Dispatch iterations performed (popped messages).
    pub steps: u64,
    /// How the loop ended.
    pub outcome: RunOutcome,
}

/// Errors surfaced by the run loop.
#[derive(Debug, Error, Diagnostic)]
pub enum BusError {
    /// The configured iteration bound was exceeded: the system's only guard
    /// against unbounded feedback loops, surfaced distinctly so callers can
    /// tell a cycle from an ordinary failure.
    #[error("step limit exceeded after {limit} dispatch iterations")]
    #[diagnostic(
        code(pageloom::bus::step_limit),
        help(
            "A reactor is likely re-emitting the message it received; \
             inspect the dispatch log for a feedback cycle."
        )
    )]
    StepLimitExceeded { limit: u64 },

    /// A subscriber failed. Contract violations by reactors are fatal, not
    /// recoverable; the source error is surfaced unmodified.
    #[error("reactor {reactor} failed while handling a {kind} message")]
    #[diagnostic(code(pageloom::bus::reactor))]
    Reactor {
        reactor: &'static str,
        kind: MessageKind,
        #[source]
        source: ReactorError,
    },
}

/// Central queue + publish/subscribe dispatcher. Owns the store.
pub struct MessageBus {
    store: ArtifactStore,
    queue: VecDeque<Message>,
    subscribers: FxHashMap<MessageKind, Vec<Subscriber>>,
    shutdown: Option<String>,
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new(ArtifactStore::new())
    }
}

impl MessageBus {
    /// Creates a bus around a (possibly pre-seeded) store. Seeding the store
    /// before construction does not emit `ArtifactProduced` events; that is
    /// how the external seed input arrives.
    #[must_use]
    pub fn new(store: ArtifactStore) -> Self {
        Self {
            store,
            queue: VecDeque::new(),
            subscribers: FxHashMap::default(),
            shutdown: None,
        }
    }

    /// Registers `reactor` for all future messages of `kind`. Reactors are
    /// dispatched in registration order per kind.
    pub fn subscribe(&mut self, kind: MessageKind, reactor: Subscriber) {
        self.subscribers.entry(kind).or_default().push(reactor);
    }

    /// Registers one reactor under several kinds (e.g. the coordinator).
    pub fn subscribe_all(&mut self, kinds: &[MessageKind], reactor: Subscriber) {
        for kind in kinds {
            self.subscribe(*kind, Arc::clone(&reactor));
        }
    }

    /// Appends a message to the tail of the queue. Queue order is global
    /// FIFO across all message kinds.
    pub fn publish(&mut self, message: Message) {
        self.queue.push_back(message);
    }

    /// Appends several messages, preserving their order.
    pub fn publish_many(&mut self, messages: impl IntoIterator<Item = Message>) {
        for message in messages {
            self.publish(message);
        }
    }

    /// Stores an artifact AND emits the matching `ArtifactProduced` event.
    /// The write happens before the event is enqueued, so any observer of the
    /// event sees the post-write store state.
    pub fn publish_artifact(
        &mut self,
        key: impl Into<String>,
        value: serde_json::Value,
        produced_by: impl Into<String>,
    ) {
        let key = key.into();
        self.store
            .put(crate::store::Artifact::new(key.clone(), value, produced_by));
        self.publish(Message::artifact_produced(key));
    }

    /// Flags the run as terminal and publishes a `Terminate` message. The
    /// remaining queue is not cleared; the loop stops at the next iteration
    /// check.
    pub fn terminate(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        self.publish(Message::terminate(reason.clone()));
        self.shutdown = Some(reason);
    }

    /// True once termination has been flagged.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.shutdown.is_some()
    }

    /// Read access to the bus-owned store.
    #[must_use]
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Consumes the bus and releases the store for post-run inspection.
    #[must_use]
    pub fn into_store(self) -> ArtifactStore {
        self.store
    }

    /// Messages currently queued (undelivered).
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drives the dispatch loop until the queue drains or termination is
    /// flagged.
    ///
    /// Fails with [`BusError::StepLimitExceeded`] if more than `max_steps`
    /// dispatch iterations occur first, and with [`BusError::Reactor`] if a
    /// subscriber fails.
    pub fn run(&mut self, max_steps: u64) -> Result<RunReport, BusError> {
        let mut steps: u64 = 0;

        let outcome = loop {
            // Terminal flag is checked between pops, never mid-batch.
            if let Some(reason) = &self.shutdown {
                break RunOutcome::Terminated {
                    reason: reason.clone(),
                };
            }
            let Some(message) = self.queue.pop_front() else {
                break RunOutcome::Drained;
            };

            steps += 1;
            if steps > max_steps {
                return Err(BusError::StepLimitExceeded { limit: max_steps });
            }

            self.dispatch(message, steps)?;
        };

        match &outcome {
            RunOutcome::Drained => {
                tracing::info!(steps, pending = self.queue.len(), "queue drained")
            }
            RunOutcome::Terminated { reason } => {
                tracing::info!(steps, pending = self.queue.len(), reason = %reason, "run terminated")
            }
        }

        Ok(RunReport { steps, outcome })
    }

    /// Delivers one popped message to every subscriber of its kind and
    /// appends the whole emitted batch afterwards.
    fn dispatch(&mut self, message: Message, step: u64) -> Result<(), BusError> {
        let kind = message.kind();
        let subscribers = self.subscribers.get(&kind).cloned().unwrap_or_default();
        tracing::debug!(step, %kind, subscribers = subscribers.len(), "dispatching");

        let mut batch: Vec<Message> = Vec::new();
        let mut shutdown: Option<String> = None;

        for subscriber in &subscribers {
            let mut reactor = subscriber.lock().expect("reactor mutex poisoned");
            let name = reactor.name();
            let mut ctx = DispatchContext::new(&mut self.store, &mut batch, &mut shutdown, step);
            let emitted = reactor
                .react(&message, &mut ctx)
                .map_err(|source| BusError::Reactor {
                    reactor: name,
                    kind,
                    source,
                })?;
            batch.extend(emitted);
        }

        if !batch.is_empty() {
            tracing::trace!(step, enqueued = batch.len(), "batch appended");
        }
        self.queue.extend(batch);
        if shutdown.is_some() {
            self.shutdown = shutdown;
        }
        Ok(())
    }
}
