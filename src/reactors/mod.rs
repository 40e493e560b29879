//! The pluggable worker reactors of the page pipeline.
//!
//! Each worker is an independent [`Reactor`](crate::reactor::Reactor)
//! following the contract in [`crate::reactor`]: recognize work items by
//! name, gate on required artifacts in declared order, report the first miss
//! as a `MissingDependency`, publish produced artifacts, and ignore
//! everything else. None of them holds state about the run; the only
//! stateful reactor is the [coordinator](crate::coordinator).

pub mod faq;
pub mod pages;
pub mod parser;
pub mod planner;
pub mod questions;
pub mod writer;

pub use faq::FaqComposer;
pub use pages::PageRenderer;
pub use parser::ProductParser;
pub use planner::{Planner, ShufflePolicy};
pub use questions::{QuestionBank, QuestionCategory, QuestionGenerator};
pub use writer::OutputWriter;
