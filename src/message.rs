//! Message types for the pageloom dispatch engine.
//!
//! Everything that moves through the bus is a [`Message`]: a closed tagged
//! enum with one variant per event kind. Subscriptions are keyed by the
//! parallel field-less [`MessageKind`] tag, so dispatch is a map lookup plus
//! a loop, with no runtime type inspection.
//!
//! # Examples
//!
//! ```
//! use pageloom::message::{Message, MessageKind, WorkItem};
//!
//! let item = WorkItem::new("ParseProduct", ["raw_product_input"], ["product_model"]);
//! let msg = Message::Work(item);
//! assert_eq!(msg.kind(), MessageKind::Work);
//!
//! let done = Message::terminate("all outputs written");
//! assert_eq!(done.kind(), MessageKind::Terminate);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Subscription tag for a [`Message`] variant.
///
/// The bus keys its subscriber registry by `MessageKind`; reactors receive
/// every future message whose kind they subscribed to, in registration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    /// Kick-off event; the planner reacts to this.
    Start,
    /// A unit of declared work for worker reactors.
    Work,
    /// An artifact was stored (insert or overwrite).
    ArtifactProduced,
    /// A worker could not proceed; carries the blocked work item.
    MissingDependency,
    /// Cooperative shutdown signal.
    Terminate,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Work => write!(f, "work"),
            Self::ArtifactProduced => write!(f, "artifact_produced"),
            Self::MissingDependency => write!(f, "missing_dependency"),
            Self::Terminate => write!(f, "terminate"),
        }
    }
}

/// A message on the bus. Immutable once constructed; delivery is global FIFO
/// across all kinds, with no priority.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Message {
    /// Kick-off. The goal string lets planners ignore runs they don't own.
    Start { goal: String },
    /// Work to be done at runtime. Work items are created dynamically by a
    /// planning reactor, never hard-coded call chains.
    Work(WorkItem),
    /// Emitted whenever an artifact is stored; enables reactive unblocking.
    ArtifactProduced { key: String },
    /// Emitted by a worker that cannot proceed.
    MissingDependency(MissingDependency),
    /// Completion signal. The run loop re-checks its terminal flag before
    /// popping the next message, so this is cooperative, not preemptive.
    Terminate { reason: String },
}

impl Message {
    /// Creates a `Start` message with the given goal.
    #[must_use]
    pub fn start(goal: impl Into<String>) -> Self {
        Self::Start { goal: goal.into() }
    }

    /// Creates an `ArtifactProduced` message for `key`.
    #[must_use]
    pub fn artifact_produced(key: impl Into<String>) -> Self {
        Self::ArtifactProduced { key: key.into() }
    }

    /// Creates a `Terminate` message with the given reason.
    #[must_use]
    pub fn terminate(reason: impl Into<String>) -> Self {
        Self::Terminate {
            reason: reason.into(),
        }
    }

    /// The subscription tag for this message.
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Start { .. } => MessageKind::Start,
            Self::Work(_) => MessageKind::Work,
            Self::ArtifactProduced { .. } => MessageKind::ArtifactProduced,
            Self::MissingDependency(_) => MessageKind::MissingDependency,
            Self::Terminate { .. } => MessageKind::Terminate,
        }
    }
}

/// A unit of declared work with explicit input/output artifact keys.
///
/// `requires` and `produces` are ordered: workers check `requires` in the
/// declared order and report the first missing key, and the coordinator
/// re-blocks items under the first still-missing key in the same order.
///
/// Two work items with identical `(name, requires, produces)` are the same
/// logical unit for dedup purposes even if they are distinct values; see
/// [`WorkItem::identity`]. The payload is deliberately excluded from identity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Name a worker reactor recognizes (e.g. `"ParseProduct"`).
    pub name: String,
    /// Artifact keys that must exist in the store before the item can run.
    pub requires: Vec<String>,
    /// Artifact keys the item will publish when it runs.
    pub produces: Vec<String>,
    /// Opaque extra data for the worker; not part of the item's identity.
    #[serde(default)]
    pub payload: Value,
}

impl WorkItem {
    /// Creates a work item with a null payload.
    #[must_use]
    pub fn new<R, P>(name: impl Into<String>, requires: R, produces: P) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            name: name.into(),
            requires: requires.into_iter().map(Into::into).collect(),
            produces: produces.into_iter().map(Into::into).collect(),
            payload: Value::Null,
        }
    }

    /// Attaches an opaque payload.
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    /// Deterministic identity derived from `(name, requires, produces)`.
    ///
    /// The encoding is stable across runs so the coordinator can dedup
    /// blocking events per `(identity, missing_key)` pair.
    #[must_use]
    pub fn identity(&self) -> WorkItemId {
        WorkItemId(format!(
            "{}|{}|{}",
            self.name,
            self.requires.join("+"),
            self.produces.join("+"),
        ))
    }
}

/// Stable identity of a [`WorkItem`], usable as a map/set key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkItemId(String);

impl WorkItemId {
    /// The encoded identity string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Report that a worker cannot proceed because a required artifact is absent.
///
/// Carries the blocked item itself so the coordinator can park it and
/// re-deliver it later without the worker keeping any state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MissingDependency {
    /// Name of the work item that reported the miss.
    pub origin: String,
    /// The first required key found absent, in the item's declared order.
    pub missing_key: String,
    /// The blocked work item, verbatim.
    pub blocked: WorkItem,
}

impl MissingDependency {
    /// Creates a missing-dependency report for `blocked` on `missing_key`.
    #[must_use]
    pub fn new(missing_key: impl Into<String>, blocked: WorkItem) -> Self {
        Self {
            origin: blocked.name.clone(),
            missing_key: missing_key.into(),
            blocked,
        }
    }
}

impl From<MissingDependency> for Message {
    fn from(need: MissingDependency) -> Self {
        Message::MissingDependency(need)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    /// Identity is derived from name/requires/produces and nothing else.
    fn identity_ignores_payload() {
        let a = WorkItem::new("W", ["x", "y"], ["z"]);
        let b = WorkItem::new("W", ["x", "y"], ["z"]).with_payload(json!({"attempt": 2}));
        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    /// Distinct require sets yield distinct identities.
    fn identity_distinguishes_requires() {
        let a = WorkItem::new("W", ["x"], ["z"]);
        let b = WorkItem::new("W", ["y"], ["z"]);
        assert_ne!(a.identity(), b.identity());
    }

    #[test]
    fn kind_matches_variant() {
        let item = WorkItem::new("W", ["x"], ["z"]);
        assert_eq!(Message::start("build_pages").kind(), MessageKind::Start);
        assert_eq!(Message::Work(item.clone()).kind(), MessageKind::Work);
        assert_eq!(
            Message::artifact_produced("x").kind(),
            MessageKind::ArtifactProduced
        );
        assert_eq!(
            Message::from(MissingDependency::new("x", item)).kind(),
            MessageKind::MissingDependency
        );
        assert_eq!(Message::terminate("done").kind(), MessageKind::Terminate);
    }

    #[test]
    fn missing_dependency_records_origin_from_item() {
        let item = WorkItem::new("ComposeFaq", ["product_model"], ["faq_content"]);
        let need = MissingDependency::new("product_model", item);
        assert_eq!(need.origin, "ComposeFaq");
        assert_eq!(need.missing_key, "product_model");
    }

    #[test]
    fn serialization_round_trip() {
        let msg =
            Message::Work(WorkItem::new("W", ["a"], ["b"]).with_payload(json!({"hint": true})));
        let encoded = serde_json::to_string(&msg).expect("serialize");
        let decoded: Message = serde_json::from_str(&encoded).expect("deserialize");
        assert_eq!(msg, decoded);
    }
}
