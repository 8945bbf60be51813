//! Progress notifications from a running procedure
//!
//! The engine reports each benchmark invocation before it starts and each
//! run verdict as soon as it is decided, so a console front end can print
//! the narrative while grading is still under way.

use labgrade_common::BenchmarkParameters;

use crate::runner::invocation_flags;

use super::verdict::RunVerdict;

/// Receives progress from the grading engine. Every method defaults to a
/// no-op.
pub trait GradingCallback: Send + Sync {
    /// A benchmark invocation is about to start
    fn on_run_started(&self, _run: usize, _params: &BenchmarkParameters) {}

    /// A collected run was evaluated
    fn on_run_evaluated(&self, _verdict: &RunVerdict) {}
}

/// Discards every notification
pub struct NoOpCallback;

impl GradingCallback for NoOpCallback {}

/// Progress line printed before each benchmark invocation
pub fn progress_line(params: &BenchmarkParameters) -> String {
    format!("Running tester with {}...", invocation_flags(params))
}
