//! The reactor contract: the uniform interface every pluggable worker
//! implements, plus the capability object the bus hands to a reactor for the
//! duration of one dispatch.
//!
//! Reactors are independent. They never call each other; they receive a
//! message and a [`DispatchContext`] (read-only store view + publish
//! capability) and return only new messages. A reactor that does not
//! recognize a message returns an empty result; that is how several reactors
//! can share one message kind without interfering.
//!
//! # Worker contract
//!
//! Given a work item it recognizes by name, a worker:
//!
//! 1. checks `ctx.store().has(key)` for every element of `requires`, in the
//!    item's declared order;
//! 2. on the FIRST missing key, returns exactly one
//!    [`MissingDependency`](crate::message::MissingDependency) message and
//!    performs no other side effect (no partial artifact writes);
//! 3. if all requires are present, performs its pure computation, calls
//!    [`DispatchContext::publish_artifact`] for each produced key, and returns
//!    no further messages (a designated last item may call
//!    [`DispatchContext::terminate`] instead).

use miette::Diagnostic;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

use crate::message::Message;
use crate::product::ProductError;
use crate::store::{Artifact, ArtifactStore, StoreError};
use crate::templates::TemplateError;

/// A stateless-per-call handler invoked with a message and a dispatch
/// context. Implementations needing memory across calls (the coordinator)
/// keep it as exclusively-owned private state.
pub trait Reactor: Send {
    /// Stable name, used in logs and error reports.
    fn name(&self) -> &'static str;

    /// Handle one message and return any messages to enqueue.
    ///
    /// An `Err` is a contract violation: the bus does not catch it, the run
    /// aborts and the error reaches the caller unmodified.
    fn react(
        &mut self,
        message: &Message,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<Vec<Message>, ReactorError>;
}

/// Capability object scoped to a single dispatch turn.
///
/// Holds the only route from a reactor to the bus-owned store: reads go
/// through [`store`](Self::store), writes only through
/// [`publish_artifact`](Self::publish_artifact), which stores the value and
/// emits the matching `ArtifactProduced` event synchronously, so an observer of
/// that event always sees the post-write store state.
pub struct DispatchContext<'a> {
    store: &'a mut ArtifactStore,
    outbox: &'a mut Vec<Message>,
    shutdown: &'a mut Option<String>,
    step: u64,
}

impl<'a> DispatchContext<'a> {
    pub(crate) fn new(
        store: &'a mut ArtifactStore,
        outbox: &'a mut Vec<Message>,
        shutdown: &'a mut Option<String>,
        step: u64,
    ) -> Self {
        Self {
            store,
            outbox,
            shutdown,
            step,
        }
    }

    /// Current dispatch iteration number (1-based).
    #[must_use]
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Read-only view of the artifact store.
    #[must_use]
    pub fn store(&self) -> &ArtifactStore {
        self.store
    }

    /// Stores `value` under `key` and emits `ArtifactProduced(key)` into the
    /// current dispatch batch. The write happens immediately; the event is
    /// delivered after this dispatch batch completes.
    pub fn publish_artifact(
        &mut self,
        key: impl Into<String>,
        value: Value,
        produced_by: impl Into<String>,
    ) {
        let key = key.into();
        tracing::debug!(step = self.step, key = %key, "artifact produced");
        self.store
            .put(Artifact::new(key.clone(), value, produced_by));
        self.outbox.push(Message::artifact_produced(key));
    }

    /// Flags the run as terminal and emits a `Terminate` message.
    ///
    /// Cooperative: the loop re-checks the flag before popping the next
    /// message, so the in-flight dispatch batch still completes.
    pub fn terminate(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::info!(step = self.step, reason = %reason, "termination requested");
        self.outbox.push(Message::terminate(reason.clone()));
        *self.shutdown = Some(reason);
    }
}

/// Fatal errors a reactor can raise during a dispatch.
///
/// All of these abort the run; there is no retry inside the core. The only
/// retry-shaped mechanism is the coordinator's re-blocking, which is designed
/// control flow, not error recovery.
#[derive(Debug, Error, Diagnostic)]
pub enum ReactorError {
    /// A reactor observed state that its contract rules out.
    #[error("contract violation in {reactor}: {detail}")]
    #[diagnostic(code(pageloom::reactor::contract))]
    ContractViolation {
        reactor: &'static str,
        detail: String,
    },

    /// Seed validation or product-model shape failure.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Product(#[from] ProductError),

    /// Template rendering failure.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Template(#[from] TemplateError),

    /// `require` on an absent key: a broken `has`-before-`require` contract.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    /// JSON (de)serialization failure.
    #[error(transparent)]
    #[diagnostic(code(pageloom::reactor::serde_json))]
    Serde(#[from] serde_json::Error),

    /// Output file could not be written.
    #[error("failed to write output file {path}")]
    #[diagnostic(
        code(pageloom::reactor::io),
        help("Check that the configured output directory is writable.")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
