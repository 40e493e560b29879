mod common;

use std::sync::Arc;

use serde_json::json;

use common::{
    subscriber, AlwaysFails, ArtifactPublisher, EchoForever, ProducedObserver, Recorder,
    StaticEmitter, Terminator,
};
use pageloom::bus::{BusError, MessageBus, RunOutcome};
use pageloom::message::{Message, MessageKind, WorkItem};
use pageloom::reactor::ReactorError;

const ALL_KINDS: [MessageKind; 5] = [
    MessageKind::Start,
    MessageKind::Work,
    MessageKind::ArtifactProduced,
    MessageKind::MissingDependency,
    MessageKind::Terminate,
];

#[test]
fn drained_run_counts_each_popped_message() {
    let mut bus = MessageBus::default();
    for _ in 0..5 {
        bus.publish(Message::start("nobody listens"));
    }
    let report = bus.run(100).expect("run");
    assert_eq!(report.steps, 5);
    assert_eq!(report.outcome, RunOutcome::Drained);
}

#[test]
fn fixed_inputs_and_registration_order_give_identical_runs() {
    let run_once = || {
        let mut bus = MessageBus::default();
        let (recorder, log) = Recorder::new();
        bus.subscribe_all(&ALL_KINDS, subscriber(recorder));
        bus.subscribe(
            MessageKind::Start,
            subscriber(StaticEmitter {
                on_kind: MessageKind::Start,
                emits: vec![
                    Message::Work(WorkItem::new("A", ["x"], ["y"])),
                    Message::artifact_produced("x"),
                ],
            }),
        );
        bus.subscribe(
            MessageKind::Start,
            subscriber(ArtifactPublisher {
                key: "b_key",
                value: json!(1),
                times: 1,
            }),
        );
        bus.publish(Message::start("determinism"));
        bus.publish(Message::artifact_produced("pre_queued"));
        let report = bus.run(100).expect("run");
        let order = log.lock().expect("log").clone();
        (order, report.steps, bus.into_store().keys())
    };

    let first = run_once();
    let second = run_once();
    assert_eq!(first, second);
}

#[test]
fn batch_is_appended_in_subscriber_order_after_all_subscribers_ran() {
    let mut bus = MessageBus::default();
    let (recorder, log) = Recorder::new();

    // Two emitters on Start; their emissions must land in subscription
    // order, after both have run, ahead of nothing that was already queued.
    bus.subscribe(
        MessageKind::Start,
        subscriber(StaticEmitter {
            on_kind: MessageKind::Start,
            emits: vec![Message::Work(WorkItem::new("first", ["a"], ["b"]))],
        }),
    );
    bus.subscribe(
        MessageKind::Start,
        subscriber(StaticEmitter {
            on_kind: MessageKind::Start,
            emits: vec![Message::Work(WorkItem::new("second", ["a"], ["b"]))],
        }),
    );
    bus.subscribe(MessageKind::Work, subscriber(recorder));

    bus.publish(Message::start("batching"));
    // Pre-queued message must be delivered before the Start batch's output.
    bus.publish(Message::Work(WorkItem::new("pre_queued", ["a"], ["b"])));

    bus.run(100).expect("run");
    assert_eq!(
        log.lock().expect("log").clone(),
        vec!["work:pre_queued", "work:first", "work:second"]
    );
}

#[test]
fn produced_event_observers_see_post_write_store_state() {
    let mut bus = MessageBus::default();
    bus.subscribe(
        MessageKind::Start,
        subscriber(ArtifactPublisher {
            key: "fresh",
            value: json!({"n": 1}),
            times: 1,
        }),
    );
    bus.subscribe(MessageKind::ArtifactProduced, subscriber(ProducedObserver));

    bus.publish(Message::start("visibility"));
    bus.run(100).expect("observer never fires before the write");
    assert!(bus.store().has("fresh"));
}

#[test]
fn overwriting_put_emits_a_fresh_produced_event() {
    let mut bus = MessageBus::default();
    let (recorder, log) = Recorder::new();
    bus.subscribe(
        MessageKind::Start,
        subscriber(ArtifactPublisher {
            key: "same_key",
            value: json!("v"),
            times: 2,
        }),
    );
    bus.subscribe(MessageKind::ArtifactProduced, subscriber(recorder));

    bus.publish(Message::start("overwrite"));
    bus.run(100).expect("run");
    assert_eq!(
        log.lock().expect("log").clone(),
        vec!["produced:same_key", "produced:same_key"]
    );
}

#[test]
fn cyclic_reemission_hits_the_step_limit() {
    let mut bus = MessageBus::default();
    bus.subscribe(MessageKind::Start, subscriber(EchoForever));
    bus.publish(Message::start("loop"));

    let err = bus.run(10).unwrap_err();
    assert!(matches!(err, BusError::StepLimitExceeded { limit: 10 }));
}

#[test]
fn terminate_stops_before_the_next_pop_without_clearing_the_queue() {
    let mut bus = MessageBus::default();
    let (recorder, log) = Recorder::new();
    bus.subscribe(MessageKind::Start, subscriber(Terminator));
    bus.subscribe(MessageKind::ArtifactProduced, subscriber(recorder));

    bus.publish(Message::start("stop now"));
    // Queued before the terminating dispatch; must never be delivered.
    bus.publish(Message::artifact_produced("never_seen"));

    let report = bus.run(100).expect("run");
    assert_eq!(report.steps, 1);
    assert_eq!(
        report.outcome,
        RunOutcome::Terminated {
            reason: "scripted stop".to_string()
        }
    );
    assert!(log.lock().expect("log").is_empty());
    // The undelivered event and the Terminate message both remain queued.
    assert_eq!(bus.pending(), 2);
}

#[test]
fn reactor_failure_aborts_the_run_unmodified() {
    let mut bus = MessageBus::default();
    bus.subscribe(MessageKind::Start, subscriber(AlwaysFails));
    bus.publish(Message::start("fail"));

    let err = bus.run(100).unwrap_err();
    match err {
        BusError::Reactor {
            reactor,
            kind,
            source: ReactorError::ContractViolation { detail, .. },
        } => {
            assert_eq!(reactor, "always_fails");
            assert_eq!(kind, MessageKind::Start);
            assert_eq!(detail, "scripted failure");
        }
        other => panic!("expected reactor contract violation, got: {other:?}"),
    }
}

#[test]
fn failure_in_first_subscriber_skips_the_rest_of_the_batch() {
    let mut bus = MessageBus::default();
    let (recorder, log) = Recorder::new();
    bus.subscribe(MessageKind::Start, subscriber(AlwaysFails));
    bus.subscribe(MessageKind::Start, subscriber(recorder));

    bus.publish(Message::start("fail fast"));
    assert!(bus.run(100).is_err());
    assert!(log.lock().expect("log").is_empty());
}

#[test]
fn subscribe_all_delivers_to_one_reactor_for_each_kind() {
    let mut bus = MessageBus::default();
    let (recorder, log) = Recorder::new();
    bus.subscribe_all(
        &[MessageKind::Start, MessageKind::ArtifactProduced],
        Arc::new(std::sync::Mutex::new(recorder)),
    );
    bus.publish(Message::start("multi"));
    bus.publish(Message::artifact_produced("k"));
    bus.run(100).expect("run");
    assert_eq!(
        log.lock().expect("log").clone(),
        vec!["start:multi", "produced:k"]
    );
}
