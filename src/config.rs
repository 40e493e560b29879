//! Run configuration: defaults, builder-style overrides, and environment
//! resolution.

use std::path::PathBuf;

use crate::reactors::planner::ShufflePolicy;

/// The goal string the default planner answers to.
pub const DEFAULT_GOAL: &str = "build_pages";
/// Default dispatch iteration bound.
pub const DEFAULT_MAX_STEPS: u64 = 10_000;
/// Default output directory for the written page documents.
pub const DEFAULT_OUT_DIR: &str = "out";

/// Configuration for one pipeline run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Positive bound on total dispatch iterations; exceeding it is a
    /// reported failure, never a silent truncation.
    pub max_steps: u64,
    /// Initial work-item ordering policy (planner-only concern).
    pub shuffle: ShufflePolicy,
    /// Directory the writer puts page documents in.
    pub out_dir: PathBuf,
    /// Goal published in the `Start` message.
    pub goal: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            shuffle: ShufflePolicy::default(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            goal: DEFAULT_GOAL.to_string(),
        }
    }
}

impl RunConfig {
    /// Defaults overridden from the environment (a `.env` file is honored):
    ///
    /// - `PAGELOOM_MAX_STEPS`: dispatch iteration bound;
    /// - `PAGELOOM_SHUFFLE_SEED`: an integer seed, or `off` to keep plan
    ///   order;
    /// - `PAGELOOM_OUT_DIR`: output directory.
    ///
    /// Unparseable values are logged and ignored.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("PAGELOOM_MAX_STEPS") {
            match raw.parse::<u64>() {
                Ok(limit) if limit > 0 => config.max_steps = limit,
                _ => tracing::warn!(value = %raw, "ignoring invalid PAGELOOM_MAX_STEPS"),
            }
        }
        if let Ok(raw) = std::env::var("PAGELOOM_SHUFFLE_SEED") {
            if raw.eq_ignore_ascii_case("off") {
                config.shuffle = ShufflePolicy::Disabled;
            } else {
                match raw.parse::<u64>() {
                    Ok(seed) => config.shuffle = ShufflePolicy::Seeded(seed),
                    Err(_) => {
                        tracing::warn!(value = %raw, "ignoring invalid PAGELOOM_SHUFFLE_SEED")
                    }
                }
            }
        }
        if let Ok(dir) = std::env::var("PAGELOOM_OUT_DIR") {
            config.out_dir = PathBuf::from(dir);
        }

        config
    }

    /// Overrides the step limit.
    #[must_use]
    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Overrides the shuffle policy.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: ShufflePolicy) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Overrides the output directory.
    #[must_use]
    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    /// Overrides the goal string.
    #[must_use]
    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = goal.into();
        self
    }
}
