//! # Pageloom: Event-Driven Page Generation Engine
//!
//! Pageloom derives a set of JSON documents (FAQ page, product page,
//! comparison page) from one seed record using a dependency-driven dataflow:
//! independent reactors consume events from a FIFO message bus, produce named
//! artifacts into a shared store, and a dedicated coordinator resolves
//! ordering by watching which artifacts exist.
//!
//! ## Core Concepts
//!
//! - **Messages**: A closed tagged enum; subscriptions key on the message
//!   kind and dispatch is a lookup plus a loop
//! - **Artifact store**: Bus-owned key-value state; insert-or-overwrite with
//!   a produced event on every write
//! - **Reactors**: Independent handlers invoked with a message and a
//!   dispatch-scoped capability; they never call each other
//! - **Coordinator**: Parks blocked work items per missing key and releases
//!   them when their full dependency set is satisfied
//! - **Harness**: Wires the standard pipeline, seeds the store, runs the bus
//!
//! ## Scheduling model
//!
//! Strictly single-threaded, cooperative, non-preemptive: each dispatch runs
//! to completion before the next begins, and message delivery order is
//! deterministic FIFO for a fixed seed and registration order. The planner's
//! initial work-item shuffle is explicit and seedable, so nothing may assume
//! any particular inter-item execution order, only that an item's requires
//! are satisfied before it is marked ready. Cancellation is cooperative: the
//! run loop re-checks the terminal flag between queue pops, never mid-batch.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pageloom::config::RunConfig;
//! use pageloom::reactors::ShufflePolicy;
//! use pageloom::runner::PipelineRunner;
//! use serde_json::json;
//!
//! fn main() -> miette::Result<()> {
//!     let config = RunConfig::default()
//!         .with_shuffle(ShufflePolicy::Seeded(42))
//!         .with_out_dir("out");
//!
//!     let run = PipelineRunner::new(config).run(json!({
//!         "product_name": "GlowBoost Vitamin C Serum",
//!         "concentration": "10% Vitamin C",
//!         "skin_type": ["Oily", "Combination", "Normal"],
//!         "key_ingredients": ["Vitamin C", "Hyaluronic Acid", "Vitamin E"],
//!         "benefits": ["Brightening", "Fades dark spots", "Hydration"],
//!         "how_to_use": "Apply 2-3 drops in the morning before sunscreen.",
//!         "side_effects": "Mild tingling for first-time users.",
//!         "price_inr": 899
//!     }))?;
//!
//!     assert!(run.is_complete());
//!     println!("store keys: {:?}", run.store.keys());
//!     Ok(())
//! }
//! ```
//!
//! ## Building custom reactors
//!
//! ```rust
//! use pageloom::message::{Message, MissingDependency};
//! use pageloom::reactor::{DispatchContext, Reactor, ReactorError};
//! use serde_json::json;
//!
//! struct Echo;
//!
//! impl Reactor for Echo {
//!     fn name(&self) -> &'static str {
//!         "echo"
//!     }
//!
//!     fn react(
//!         &mut self,
//!         message: &Message,
//!         ctx: &mut DispatchContext<'_>,
//!     ) -> Result<Vec<Message>, ReactorError> {
//!         let Message::Work(item) = message else {
//!             return Ok(Vec::new());
//!         };
//!         if item.name != "Echo" {
//!             return Ok(Vec::new()); // not ours; other reactors may share the kind
//!         }
//!         if !ctx.store().has("echo_input") {
//!             return Ok(vec![MissingDependency::new("echo_input", item.clone()).into()]);
//!         }
//!         let value = ctx.store().require("echo_input")?.value.clone();
//!         ctx.publish_artifact("echo_output", json!({ "echoed": value }), self.name());
//!         Ok(Vec::new())
//!     }
//! }
//! ```
//!
//! ## Module Guide
//!
//! - [`message`] - Message kinds, work items, and identity
//! - [`store`] - The artifact store and its read/write contract
//! - [`bus`] - FIFO queue, subscriber registry, run loop, step limit
//! - [`reactor`] - The reactor contract and dispatch capability
//! - [`coordinator`] - Blocking/requeue dependency resolution
//! - [`reactors`] - The pluggable page-pipeline workers
//! - [`templates`] - Structured page templates and rendering
//! - [`product`] - Product model, seed validation, comparison analysis
//! - [`config`] - Run configuration and environment overrides
//! - [`runner`] - The run harness and result inspection
//! - [`keys`] - Canonical artifact keys and work item names

pub mod bus;
pub mod config;
pub mod coordinator;
pub mod keys;
pub mod message;
pub mod product;
pub mod reactor;
pub mod reactors;
pub mod runner;
pub mod store;
pub mod templates;
