//! The run harness: wires the standard reactors to a bus, seeds the store,
//! drives the loop, and summarizes the outcome.
//!
//! Registration order is fixed (planner, parser, questions, faq, pages,
//! writer, coordinator) so that for a given seed and shuffle policy two runs
//! produce identical dispatch order and identical final store contents.

use std::sync::{Arc, Mutex};

use miette::Diagnostic;
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use crate::bus::{BusError, MessageBus, RunReport};
use crate::config::RunConfig;
use crate::coordinator::DependencyCoordinator;
use crate::keys;
use crate::message::{Message, MessageKind};
use crate::reactors::{
    FaqComposer, OutputWriter, PageRenderer, Planner, ProductParser, QuestionGenerator,
};
use crate::store::{Artifact, ArtifactStore};

/// Harness errors. Everything underneath is already diagnostic-rich; this
/// only adds the run scope.
#[derive(Debug, Error, Diagnostic)]
pub enum PipelineError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Bus(#[from] BusError),
}

/// A finished run: the bus report plus the released store for inspection.
#[derive(Debug)]
pub struct PipelineRun {
    /// Identifier stamped on the run's log events.
    pub run_id: Uuid,
    /// Steps taken and how the loop ended.
    pub report: RunReport,
    /// The final store; read it with `has`/`require`/`keys`.
    pub store: ArtifactStore,
}

impl PipelineRun {
    /// Final keys (see [`keys::FINAL_KEYS`]) that were never produced.
    /// Non-empty means some dependency was unsatisfiable; the run itself
    /// still ended cleanly.
    #[must_use]
    pub fn missing_outputs(&self) -> Vec<&'static str> {
        keys::FINAL_KEYS
            .into_iter()
            .filter(|key| !self.store.has(key))
            .collect()
    }

    /// True iff every designated final artifact exists.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_outputs().is_empty()
    }
}

/// Builds and drives the standard page pipeline.
#[derive(Clone, Debug, Default)]
pub struct PipelineRunner {
    config: RunConfig,
}

impl PipelineRunner {
    /// Creates a runner with the given configuration.
    #[must_use]
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Runs the pipeline over one seed record.
    ///
    /// The seed is placed in the store under `raw_product_input` before the
    /// bus starts; no produced event is emitted for it.
    #[instrument(skip(self, seed), fields(run_id = tracing::field::Empty), err)]
    pub fn run(&self, seed: Value) -> Result<PipelineRun, PipelineError> {
        let run_id = Uuid::new_v4();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));
        tracing::info!(goal = %self.config.goal, "pipeline run started");

        let mut store = ArtifactStore::new();
        store.put(Artifact::new(keys::RAW_PRODUCT_INPUT, seed, "seed"));

        let mut bus = MessageBus::new(store);
        self.register_defaults(&mut bus);

        bus.publish(Message::start(self.config.goal.clone()));
        let report = bus.run(self.config.max_steps)?;

        let run = PipelineRun {
            run_id,
            report,
            store: bus.into_store(),
        };
        if run.is_complete() {
            tracing::info!(steps = run.report.steps, "pipeline run complete");
        } else {
            tracing::warn!(
                steps = run.report.steps,
                missing = ?run.missing_outputs(),
                "pipeline run ended with missing outputs"
            );
        }
        Ok(run)
    }

    /// Subscribes the standard reactor set in the canonical order.
    fn register_defaults(&self, bus: &mut MessageBus) {
        bus.subscribe(
            MessageKind::Start,
            Arc::new(Mutex::new(Planner::new(
                self.config.goal.clone(),
                self.config.shuffle,
            ))),
        );
        bus.subscribe(MessageKind::Work, Arc::new(Mutex::new(ProductParser)));
        bus.subscribe(MessageKind::Work, Arc::new(Mutex::new(QuestionGenerator)));
        bus.subscribe(MessageKind::Work, Arc::new(Mutex::new(FaqComposer)));
        bus.subscribe(MessageKind::Work, Arc::new(Mutex::new(PageRenderer)));
        bus.subscribe(
            MessageKind::Work,
            Arc::new(Mutex::new(OutputWriter::new(self.config.out_dir.clone()))),
        );
        bus.subscribe_all(
            &[MessageKind::MissingDependency, MessageKind::ArtifactProduced],
            Arc::new(Mutex::new(DependencyCoordinator::new())),
        );
    }
}
