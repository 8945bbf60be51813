//! Error types for the grading pipeline.

use thiserror::Error;

use crate::types::Variant;

/// Main error type used across the grading pipeline.
///
/// Every variant aborts the grading procedure that produced it. Messages
/// carry the offending values so a failing run can be diagnosed from logs.
#[derive(Error, Debug)]
pub enum GradeError {
    /// Build action did not finish with a zero exit status
    #[error("Setup failed: build did not succeed: {0}")]
    BuildFailure(String),

    /// Benchmark executable was missing, crashed or exited nonzero
    #[error("Execution error: {0}")]
    Execution(String),

    /// Benchmark output did not match the expected report format
    #[error("Malformed benchmark report:\n{raw}")]
    MalformedReport { raw: String },

    /// A hash table variant lost entries
    #[error("Run {run}: {} missing entries should be 0 but got {missing}", variant.label())]
    CorrectnessViolation {
        run: usize,
        variant: Variant,
        missing: u64,
    },

    /// v1 was expected to be strictly slower than the base table
    #[error(
        "Run {run}: V1 must be slower than Base but got V1={v1_usec} usec vs Base={base_usec} usec"
    )]
    PerformanceExpectationViolation {
        run: usize,
        v1_usec: u64,
        base_usec: u64,
    },

    /// Benchmark parameters rejected at construction
    #[error("Invalid benchmark parameters: {0}")]
    InvalidParameters(String),
}

impl GradeError {
    /// Returns the error code string for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            GradeError::BuildFailure(_) => "BUILD_FAILURE",
            GradeError::Execution(_) => "EXECUTION_ERROR",
            GradeError::MalformedReport { .. } => "MALFORMED_REPORT",
            GradeError::CorrectnessViolation { .. } => "CORRECTNESS_VIOLATION",
            GradeError::PerformanceExpectationViolation { .. } => {
                "PERFORMANCE_EXPECTATION_VIOLATION"
            }
            GradeError::InvalidParameters(_) => "INVALID_PARAMETERS",
        }
    }

    /// Whether a completed run failed one of its assertions. Every other
    /// error means the lab could not be graded at all.
    pub fn is_grading_failure(&self) -> bool {
        matches!(
            self,
            GradeError::CorrectnessViolation { .. }
                | GradeError::PerformanceExpectationViolation { .. }
        )
    }
}

/// Result type alias using GradeError
pub type GradeResult<T> = Result<T, GradeError>;
