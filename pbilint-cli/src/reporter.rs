//! Run-and-report wrapper around a single linter invocation
//!
//! `report` runs a deferred linter call, classifies the score, logs one line
//! for the item and records the outcome in `RunState`. Linter errors are
//! caught here and never travel further up.

use crate::errors::LintError;
use crate::models::{LinterResult, ScoreTier};
use crate::scoring::classify_score;
use std::fmt::Display;
use tracing::{error, info, warn};

/// Per-tier counts of the items checked so far
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunTally {
    pub excellent: usize,
    pub needs_attention: usize,
    pub poor: usize,
    /// Linter runs that did not produce a result
    pub failed: usize,
}

impl RunTally {
    pub fn checked(&self) -> usize {
        self.excellent + self.needs_attention + self.poor + self.failed
    }

    fn record(&mut self, tier: ScoreTier) {
        match tier {
            ScoreTier::Excellent => self.excellent += 1,
            ScoreTier::NeedsAttention => self.needs_attention += 1,
            ScoreTier::Poor => self.poor += 1,
        }
    }
}

/// Process-wide success flag.
///
/// Starts successful and flips to failed on the first error-level event.
/// It never flips back.
#[derive(Debug)]
pub struct RunState {
    success: bool,
    tally: RunTally,
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

impl RunState {
    pub fn new() -> Self {
        Self {
            success: true,
            tally: RunTally::default(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn mark_failed(&mut self) {
        self.success = false;
    }

    /// Log an error-level event and fail the run
    pub fn log_error(&mut self, message: impl Display) {
        error!("{}", message);
        self.mark_failed();
    }

    /// Log a failed operation with its error and fail the run
    pub fn log_exception(&mut self, context: impl Display, err: &LintError) {
        error!("{} failed with error: {}", context, err);
        self.mark_failed();
    }

    pub fn tally(&self) -> RunTally {
        self.tally
    }

    /// Process exit status: 0 while successful, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.success {
            0
        } else {
            1
        }
    }

    pub fn log_summary(&self) {
        let t = &self.tally;
        info!(
            "Checked {} item(s): {} excellent, {} need attention, {} poor, {} failed",
            t.checked(),
            t.excellent,
            t.needs_attention,
            t.poor,
            t.failed
        );
    }
}

/// Run `produce` for the item `label` and report the outcome.
///
/// Returns the score tier, or `None` when the linter failed.
pub fn report<F>(state: &mut RunState, label: &str, linter: &str, produce: F) -> Option<ScoreTier>
where
    F: FnOnce() -> Result<LinterResult, LintError>,
{
    let result = match produce() {
        Ok(result) => result,
        Err(e) => {
            state.tally.failed += 1;
            state.log_exception(format_args!("{} on '{}'", linter, label), &e);
            return None;
        }
    };

    let tier = classify_score(result.score);
    let details = result.details_json();
    match tier {
        ScoreTier::Excellent => {
            info!("'{}' - Score: {} - {} Details: {}", label, result.score, tier, details)
        }
        ScoreTier::NeedsAttention => {
            warn!("'{}' - Score: {} - {} Details: {}", label, result.score, tier, details)
        }
        ScoreTier::Poor => state.log_error(format_args!(
            "'{}' - Score: {} - {} Details: {}",
            label, result.score, tier, details
        )),
    }

    state.tally.record(tier);
    Some(tier)
}
