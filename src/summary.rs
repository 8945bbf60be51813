//! Machine-readable summary of one grading session

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use labgrade_common::{BenchmarkParameters, MetricsRecord, Variant};
use serde::Serialize;
use uuid::Uuid;

use crate::build::BuildOutcome;
use crate::constants::{EXIT_GRADING_FAILED, EXIT_NOT_GRADED};
use crate::grading::{Procedure, ProcedureReport, RunVerdict};
use crate::utils::now_utc;

/// Summary printed after grading when JSON output is requested
#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub lab_dir: PathBuf,
    pub parameters: BenchmarkParameters,
    pub cores: u32,
    pub build: BuildSummary,
    pub procedures: Vec<ProcedureSummary>,
    pub passed: bool,
    /// A procedure stopped before its runs could be judged
    pub ungraded: bool,
}

#[derive(Debug, Serialize)]
pub struct BuildSummary {
    pub succeeded: bool,
    pub exit_code: Option<i32>,
    pub elapsed_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct ProcedureSummary {
    pub procedure: Procedure,
    pub variant: Variant,
    pub passed: bool,
    /// First run whose assertions failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_run: Option<usize>,
    pub records: Vec<MetricsRecord>,
    pub verdicts: Vec<RunVerdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&ProcedureReport> for ProcedureSummary {
    fn from(report: &ProcedureReport) -> Self {
        Self {
            procedure: report.procedure,
            variant: report.procedure.variant(),
            passed: report.passed(),
            failed_run: report.first_failure(),
            records: report.records.clone(),
            verdicts: report.verdicts.clone(),
            error_code: report.failure.as_ref().map(|e| e.error_code()),
            error: report.failure.as_ref().map(|e| e.to_string()),
        }
    }
}

impl SessionSummary {
    /// Start a summary for a session whose build has finished
    pub fn new(
        lab_dir: PathBuf,
        parameters: BenchmarkParameters,
        cores: u32,
        build: &BuildOutcome,
    ) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            started_at: now_utc(),
            lab_dir,
            parameters,
            cores,
            build: BuildSummary {
                succeeded: build.succeeded(),
                exit_code: build.exit_code,
                elapsed_ms: build.elapsed.as_millis() as u64,
            },
            procedures: Vec::new(),
            passed: true,
            ungraded: false,
        }
    }

    /// Record a finished procedure
    pub fn push(&mut self, report: &ProcedureReport) {
        self.passed &= report.passed();
        if let Some(error) = &report.failure {
            self.ungraded |= !error.is_grading_failure();
        }
        self.procedures.push(ProcedureSummary::from(report));
    }

    /// Process exit status: zero when every procedure passed
    pub fn exit_status(&self) -> u8 {
        if self.passed {
            0
        } else if self.ungraded {
            EXIT_NOT_GRADED
        } else {
            EXIT_GRADING_FAILED
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::engine::evaluate;
    use labgrade_common::GradeError;
    use std::time::Duration;

    fn summary() -> SessionSummary {
        let params = BenchmarkParameters::new(4, 50_000).unwrap();
        let build = BuildOutcome {
            exit_code: Some(0),
            diagnostics: String::new(),
            elapsed: Duration::from_millis(1200),
        };
        SessionSummary::new(PathBuf::from("lab3"), params, 4, &build)
    }

    fn passing_report(procedure: Procedure) -> ProcedureReport {
        ProcedureReport {
            procedure,
            records: vec![MetricsRecord::default()],
            verdicts: Vec::new(),
            summary: Vec::new(),
            failure: None,
        }
    }

    /// Report whose only run lost three v1 entries
    fn failing_v1_report() -> ProcedureReport {
        let record = MetricsRecord {
            base_usec: 2000,
            v1_usec: 3000,
            v1_missing: 3,
            ..Default::default()
        };
        let (verdict, failure) = evaluate(Procedure::V1Performance, 1, &record, 4);
        ProcedureReport {
            procedure: Procedure::V1Performance,
            records: vec![record],
            verdicts: vec![verdict],
            summary: Vec::new(),
            failure,
        }
    }

    #[test]
    fn test_summary_json() {
        let mut summary = summary();

        summary.push(&passing_report(Procedure::V1Performance));
        assert!(summary.passed);

        summary.push(&ProcedureReport::aborted(
            Procedure::V2Performance,
            Vec::new(),
            GradeError::Execution("Benchmark exited with code 139".into()),
        ));
        assert!(!summary.passed);

        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(json["parameters"]["threads"], 4);
        assert_eq!(json["build"]["succeeded"], true);
        assert_eq!(json["build"]["elapsed_ms"], 1200);
        assert_eq!(json["procedures"][0]["procedure"], "v1_performance");
        assert_eq!(json["procedures"][0]["variant"], "v1");
        assert!(json["procedures"][0].get("error").is_none());
        assert_eq!(json["procedures"][1]["error_code"], "EXECUTION_ERROR");
        assert_eq!(json["passed"], false);
        assert_eq!(json["ungraded"], true);
    }

    #[test]
    fn test_exit_status_when_all_passed() {
        let mut summary = summary();
        summary.push(&passing_report(Procedure::V1Performance));
        summary.push(&passing_report(Procedure::V2Performance));
        assert_eq!(summary.exit_status(), 0);
    }

    #[test]
    fn test_exit_status_for_failed_assertion() {
        let mut summary = summary();
        summary.push(&failing_v1_report());
        summary.push(&passing_report(Procedure::V2Performance));

        assert_eq!(summary.exit_status(), EXIT_GRADING_FAILED);
        assert_eq!(summary.procedures[0].failed_run, Some(1));
        assert_eq!(summary.procedures[1].failed_run, None);
    }

    #[test]
    fn test_exit_status_when_lab_could_not_be_graded() {
        let mut summary = summary();
        summary.push(&failing_v1_report());
        summary.push(&ProcedureReport::aborted(
            Procedure::V2Performance,
            Vec::new(),
            GradeError::BuildFailure("exit code 2".into()),
        ));

        assert_eq!(summary.exit_status(), EXIT_NOT_GRADED);
    }
}
