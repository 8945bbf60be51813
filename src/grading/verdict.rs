//! Verdict types for grading procedures

use labgrade_common::{GradeError, GradeResult, MetricsRecord, Variant};
use serde::Serialize;

use super::tier::{PerformanceTier, Thresholds};

/// Grading procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Procedure {
    /// v1 must lose no entries and be strictly slower than base
    V1Performance,
    /// v2 must lose no entries; its speed is tiered against base
    V2Performance,
}

impl Procedure {
    /// Variant graded by this procedure
    pub fn variant(&self) -> Variant {
        match self {
            Procedure::V1Performance => Variant::V1,
            Procedure::V2Performance => Variant::V2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Procedure::V1Performance => "test_v1_performance",
            Procedure::V2Performance => "test_v2_performance",
        }
    }
}

impl std::fmt::Display for Procedure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Outcome of evaluating one run
#[derive(Debug, Clone, Serialize)]
pub struct RunVerdict {
    /// Run number (1-indexed)
    pub run: usize,

    /// No entries were missing
    pub correct: bool,

    /// Duration relation held. Always true for tiered grading.
    pub performance_ok: bool,

    /// Tier reached (tiered grading only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<PerformanceTier>,

    /// Targets the tier was computed from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<Thresholds>,

    /// Human-readable explanation, one entry per line
    pub narrative: Vec<String>,
}

impl RunVerdict {
    /// Check if the run passed every assertion
    pub fn passed(&self) -> bool {
        self.correct && self.performance_ok
    }
}

/// Aggregated result of one grading procedure
#[derive(Debug)]
pub struct ProcedureReport {
    pub procedure: Procedure,

    /// Records collected before evaluation
    pub records: Vec<MetricsRecord>,

    /// Verdicts for every evaluated run, up to and including the first failure
    pub verdicts: Vec<RunVerdict>,

    /// Closing narrative, present only when every run passed
    pub summary: Vec<String>,

    /// First violated assertion or pipeline error
    pub failure: Option<GradeError>,
}

impl ProcedureReport {
    /// Report for a procedure that failed before any run was evaluated
    pub fn aborted(procedure: Procedure, records: Vec<MetricsRecord>, error: GradeError) -> Self {
        Self {
            procedure,
            records,
            verdicts: Vec::new(),
            summary: Vec::new(),
            failure: Some(error),
        }
    }

    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }

    /// First failing run number, if a run assertion failed
    pub fn first_failure(&self) -> Option<usize> {
        self.verdicts.iter().find(|v| !v.passed()).map(|v| v.run)
    }

    /// Every narrative line in print order
    pub fn narrative(&self) -> impl Iterator<Item = &str> {
        self.verdicts
            .iter()
            .flat_map(|v| v.narrative.iter())
            .chain(self.summary.iter())
            .map(String::as_str)
    }

    /// Convert into a result, surfacing the failure as the error
    pub fn into_result(self) -> GradeResult<Self> {
        match self.failure {
            Some(error) => Err(error),
            None => Ok(self),
        }
    }
}
