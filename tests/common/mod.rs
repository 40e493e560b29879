//! Shared scripted reactors for the integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use pageloom::message::{Message, MessageKind, MissingDependency};
use pageloom::reactor::{DispatchContext, Reactor, ReactorError};

/// Human-readable tag for a dispatched message, used to compare dispatch
/// orders across runs.
pub fn describe(message: &Message) -> String {
    match message {
        Message::Start { goal } => format!("start:{goal}"),
        Message::Work(item) => format!("work:{}", item.name),
        Message::ArtifactProduced { key } => format!("produced:{key}"),
        Message::MissingDependency(need) => {
            format!("missing:{}:{}", need.origin, need.missing_key)
        }
        Message::Terminate { reason } => format!("terminate:{reason}"),
    }
}

/// Records every message it receives; subscribe it under several kinds to
/// capture the full dispatch order.
pub struct Recorder {
    log: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        (Self { log: log.clone() }, log)
    }
}

impl Reactor for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn react(
        &mut self,
        message: &Message,
        _ctx: &mut DispatchContext<'_>,
    ) -> Result<Vec<Message>, ReactorError> {
        self.log.lock().expect("log poisoned").push(describe(message));
        Ok(Vec::new())
    }
}

/// Returns a fixed batch of messages whenever it sees the given kind.
pub struct StaticEmitter {
    pub on_kind: MessageKind,
    pub emits: Vec<Message>,
}

impl Reactor for StaticEmitter {
    fn name(&self) -> &'static str {
        "static_emitter"
    }

    fn react(
        &mut self,
        message: &Message,
        _ctx: &mut DispatchContext<'_>,
    ) -> Result<Vec<Message>, ReactorError> {
        if message.kind() == self.on_kind {
            Ok(self.emits.clone())
        } else {
            Ok(Vec::new())
        }
    }
}

/// Worker following the reactor contract for a single work item name:
/// gates on requires in order, then publishes every produced key.
pub struct ScriptedWorker {
    pub item_name: &'static str,
    pub runs: Arc<Mutex<u32>>,
}

impl ScriptedWorker {
    pub fn new(item_name: &'static str) -> (Self, Arc<Mutex<u32>>) {
        let runs = Arc::new(Mutex::new(0));
        (
            Self {
                item_name,
                runs: runs.clone(),
            },
            runs,
        )
    }
}

impl Reactor for ScriptedWorker {
    fn name(&self) -> &'static str {
        "scripted_worker"
    }

    fn react(
        &mut self,
        message: &Message,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<Vec<Message>, ReactorError> {
        let Message::Work(item) = message else {
            return Ok(Vec::new());
        };
        if item.name != self.item_name {
            return Ok(Vec::new());
        }

        for required in &item.requires {
            if !ctx.store().has(required) {
                return Ok(vec![MissingDependency::new(required.clone(), item.clone()).into()]);
            }
        }

        *self.runs.lock().expect("runs poisoned") += 1;
        for produced in &item.produces {
            ctx.publish_artifact(
                produced.clone(),
                json!({ "by": self.item_name }),
                self.name(),
            );
        }
        Ok(Vec::new())
    }
}

/// Asserts that every produced event it observes refers to a key that is
/// already present in the store (post-write visibility).
pub struct ProducedObserver;

impl Reactor for ProducedObserver {
    fn name(&self) -> &'static str {
        "produced_observer"
    }

    fn react(
        &mut self,
        message: &Message,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<Vec<Message>, ReactorError> {
        if let Message::ArtifactProduced { key } = message {
            if !ctx.store().has(key) {
                return Err(ReactorError::ContractViolation {
                    reactor: "produced_observer",
                    detail: format!("produced event for {key} arrived before the store write"),
                });
            }
        }
        Ok(Vec::new())
    }
}

/// Publishes a fixed artifact when it sees `Start`.
pub struct ArtifactPublisher {
    pub key: &'static str,
    pub value: Value,
    pub times: usize,
}

impl Reactor for ArtifactPublisher {
    fn name(&self) -> &'static str {
        "artifact_publisher"
    }

    fn react(
        &mut self,
        message: &Message,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<Vec<Message>, ReactorError> {
        if matches!(message, Message::Start { .. }) {
            for _ in 0..self.times {
                ctx.publish_artifact(self.key, self.value.clone(), self.name());
            }
        }
        Ok(Vec::new())
    }
}

/// Re-emits every message it receives: the canonical feedback cycle.
pub struct EchoForever;

impl Reactor for EchoForever {
    fn name(&self) -> &'static str {
        "echo_forever"
    }

    fn react(
        &mut self,
        message: &Message,
        _ctx: &mut DispatchContext<'_>,
    ) -> Result<Vec<Message>, ReactorError> {
        Ok(vec![message.clone()])
    }
}

/// Calls `terminate` as soon as it sees `Start`.
pub struct Terminator;

impl Reactor for Terminator {
    fn name(&self) -> &'static str {
        "terminator"
    }

    fn react(
        &mut self,
        message: &Message,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<Vec<Message>, ReactorError> {
        if matches!(message, Message::Start { .. }) {
            ctx.terminate("scripted stop");
        }
        Ok(Vec::new())
    }
}

/// Fails on everything it receives.
pub struct AlwaysFails;

impl Reactor for AlwaysFails {
    fn name(&self) -> &'static str {
        "always_fails"
    }

    fn react(
        &mut self,
        _message: &Message,
        _ctx: &mut DispatchContext<'_>,
    ) -> Result<Vec<Message>, ReactorError> {
        Err(ReactorError::ContractViolation {
            reactor: "always_fails",
            detail: "scripted failure".to_string(),
        })
    }
}

/// Wraps a reactor in the `Arc<Mutex<…>>` the bus expects.
pub fn subscriber<R: Reactor + 'static>(reactor: R) -> Arc<Mutex<R>> {
    Arc::new(Mutex::new(reactor))
}
