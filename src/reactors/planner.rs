//! The planning reactor: turns `Start` into the page pipeline's work items.
//!
//! Work items are created dynamically at runtime, not hard-coded call chains;
//! the dependency coordinator sorts out whatever order they end up running
//! in. The initial ordering is deliberately shuffleable to keep downstream
//! code honest about that, and the shuffle is explicit and seedable so
//! determinism tests can pin or disable it. The dispatch engine itself never
//! sees the policy.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::keys::{self, work};
use crate::message::{Message, WorkItem};
use crate::reactor::{DispatchContext, Reactor, ReactorError};

/// How the planner orders the initial work item batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShufflePolicy {
    /// Keep the declared plan order.
    Disabled,
    /// Shuffle with a fixed seed; identical seeds give identical batches.
    Seeded(u64),
    /// Shuffle from OS entropy.
    Entropy,
}

impl Default for ShufflePolicy {
    fn default() -> Self {
        Self::Entropy
    }
}

/// Reacts to `Start` by emitting the seven work items of the page pipeline.
#[derive(Debug)]
pub struct Planner {
    goal: String,
    shuffle: ShufflePolicy,
}

impl Planner {
    /// Creates a planner that answers `Start` messages carrying `goal`.
    #[must_use]
    pub fn new(goal: impl Into<String>, shuffle: ShufflePolicy) -> Self {
        Self {
            goal: goal.into(),
            shuffle,
        }
    }

    /// The declared plan, before any shuffle.
    #[must_use]
    pub fn plan() -> Vec<WorkItem> {
        vec![
            WorkItem::new(
                work::PARSE_PRODUCT,
                [keys::RAW_PRODUCT_INPUT],
                [keys::PRODUCT_MODEL],
            ),
            WorkItem::new(
                work::GENERATE_QUESTIONS,
                [keys::PRODUCT_MODEL],
                [keys::QUESTION_BANK],
            ),
            WorkItem::new(
                work::COMPOSE_FAQ,
                [keys::PRODUCT_MODEL, keys::QUESTION_BANK],
                [keys::FAQ_CONTENT],
            ),
            WorkItem::new(
                work::RENDER_FAQ_PAGE,
                [keys::PRODUCT_MODEL, keys::FAQ_CONTENT],
                [keys::FAQ_PAGE_JSON],
            ),
            WorkItem::new(
                work::RENDER_PRODUCT_PAGE,
                [keys::PRODUCT_MODEL],
                [keys::PRODUCT_PAGE_JSON],
            ),
            WorkItem::new(
                work::BUILD_COMPARISON,
                [keys::PRODUCT_MODEL],
                [keys::PRODUCT_B_MODEL, keys::COMPARISON_PAGE_JSON],
            ),
            WorkItem::new(
                work::WRITE_OUTPUTS,
                [
                    keys::FAQ_PAGE_JSON,
                    keys::PRODUCT_PAGE_JSON,
                    keys::COMPARISON_PAGE_JSON,
                ],
                [keys::WRITTEN_FILES],
            ),
        ]
    }
}

impl Reactor for Planner {
    fn name(&self) -> &'static str {
        "planner"
    }

    fn react(
        &mut self,
        message: &Message,
        _ctx: &mut DispatchContext<'_>,
    ) -> Result<Vec<Message>, ReactorError> {
        let Message::Start { goal } = message else {
            return Ok(Vec::new());
        };
        if *goal != self.goal {
            return Ok(Vec::new());
        }

        let mut items = Self::plan();
        match self.shuffle {
            ShufflePolicy::Disabled => {}
            ShufflePolicy::Seeded(seed) => items.shuffle(&mut StdRng::seed_from_u64(seed)),
            ShufflePolicy::Entropy => items.shuffle(&mut rand::rng()),
        }
        tracing::debug!(count = items.len(), shuffle = ?self.shuffle, "plan created");

        Ok(items.into_iter().map(Message::Work).collect())
    }
}
