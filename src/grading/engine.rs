//! Grading engine
//!
//! Each procedure collects every repetition first, then evaluates the runs
//! in order. The first violated assertion ends the procedure; a failure in
//! any repetition fails the whole procedure.

use std::sync::Arc;

use labgrade_common::{BenchmarkParameters, GradeError, MetricsRecord, Variant};

use crate::constants::BENCHMARK_AVERAGED_RUNS;
use crate::metrics::RunCollector;
use crate::report;
use crate::runner::ReportSource;
use crate::session::GradingSession;
use crate::utils::format::{rounded_with_thousands, with_thousands};

use super::callback::{GradingCallback, NoOpCallback};
use super::tier::{PerformanceTier, Thresholds};
use super::verdict::{Procedure, ProcedureReport, RunVerdict};

/// Verdict of one run and, when an assertion failed, the error describing it
pub type Evaluation = (RunVerdict, Option<GradeError>);

/// Runs grading procedures with fixed parameters
#[derive(Clone)]
pub struct GradingEngine {
    params: BenchmarkParameters,
    repetitions: u32,
    cores: u32,
    callback: Arc<dyn GradingCallback>,
}

impl GradingEngine {
    /// Create a new engine. `cores` is the assumed core count, not a
    /// detected one.
    pub fn new(params: BenchmarkParameters, repetitions: u32, cores: u32) -> Self {
        Self {
            params,
            repetitions,
            cores,
            callback: Arc::new(NoOpCallback),
        }
    }

    /// Report progress to `callback` while grading
    pub fn with_callback(mut self, callback: Arc<dyn GradingCallback>) -> Self {
        self.callback = callback;
        self
    }

    /// Run one grading procedure end to end
    pub async fn grade(
        &self,
        procedure: Procedure,
        session: &GradingSession,
        source: &dyn ReportSource,
    ) -> ProcedureReport {
        tracing::info!(
            procedure = procedure.name(),
            repetitions = self.repetitions,
            "Starting procedure"
        );

        if let Err(e) = session.ensure_built() {
            tracing::error!(procedure = procedure.name(), error = %e, "Skipping procedure");
            return ProcedureReport::aborted(procedure, Vec::new(), e);
        }

        let mut collector = RunCollector::with_capacity(self.repetitions as usize);
        for run in 1..=self.repetitions as usize {
            self.callback.on_run_started(run, &self.params);
            match source.collect(&self.params).await {
                Ok(record) => {
                    tracing::debug!(run, ?record, "Run parsed");
                    collector.add_run(record);
                }
                Err(e) => {
                    tracing::error!(run, error = %e, "Run aborted");
                    return ProcedureReport::aborted(procedure, collector.into_records(), e);
                }
            }
        }

        let mut verdicts = Vec::with_capacity(collector.run_count());
        let mut failure = None;

        for (run, record) in collector.numbered() {
            let (verdict, error) = evaluate(procedure, run, record, self.cores);
            self.callback.on_run_evaluated(&verdict);
            verdicts.push(verdict);

            if let Some(e) = error {
                tracing::warn!(run, error = %e, "Run failed");
                tracing::debug!(run, report = %report::render(record), "Failing report");
                failure = Some(e);
                break;
            }
        }

        let summary = match (procedure, &failure) {
            (Procedure::V1Performance, None) => {
                vec!["Result: PASSED Test 1 (High Performance Criteria Met)".to_string()]
            }
            _ => Vec::new(),
        };

        ProcedureReport {
            procedure,
            records: collector.into_records(),
            verdicts,
            summary,
            failure,
        }
    }
}

/// Evaluate one run of a procedure. The graded variant must have lost no
/// entries before its speed is looked at.
pub fn evaluate(
    procedure: Procedure,
    run: usize,
    record: &MetricsRecord,
    cores: u32,
) -> Evaluation {
    let variant = procedure.variant();
    let missing = record.missing(variant);
    let verdict = RunVerdict {
        run,
        correct: missing == 0,
        performance_ok: true,
        tier: None,
        thresholds: None,
        narrative: run_header(run, record, variant),
    };

    if !verdict.correct {
        let error = GradeError::CorrectnessViolation {
            run,
            variant,
            missing,
        };
        return failed(verdict, error);
    }

    match procedure {
        Procedure::V1Performance => check_v1_slower(verdict, record),
        Procedure::V2Performance => classify_v2(verdict, record, cores),
    }
}

fn run_header(run: usize, record: &MetricsRecord, variant: Variant) -> Vec<String> {
    vec![
        String::new(),
        format!("Run {}:", run),
        format!(
            "Average Times over {} runs: Base={} usec, {}={} usec",
            BENCHMARK_AVERAGED_RUNS,
            with_thousands(record.base_usec),
            variant.label(),
            with_thousands(record.usec(variant))
        ),
        format!(
            "{} Performance Grade (based on average) ---",
            variant.label()
        ),
    ]
}

fn failed(mut verdict: RunVerdict, error: GradeError) -> Evaluation {
    verdict.narrative.push(format!("FAILED: {}", error));
    (verdict, Some(error))
}

/// v1 must be strictly slower than base
fn check_v1_slower(mut verdict: RunVerdict, record: &MetricsRecord) -> Evaluation {
    verdict.performance_ok = record.v1_usec > record.base_usec;
    if !verdict.performance_ok {
        let error = GradeError::PerformanceExpectationViolation {
            run: verdict.run,
            v1_usec: record.v1_usec,
            base_usec: record.base_usec,
        };
        return failed(verdict, error);
    }

    let line = "PASSED: V1 was slower than Base, as expected.";
    verdict.narrative.push(line.to_string());
    (verdict, None)
}

/// v2 speed is classified into a tier. Every tier passes.
fn classify_v2(mut verdict: RunVerdict, record: &MetricsRecord, cores: u32) -> Evaluation {
    // Recomputed per run, the baseline varies between runs
    let thresholds = Thresholds::derive(record.base_usec, cores);
    let tier = PerformanceTier::classify(record.v2_usec, &thresholds);

    tracing::info!(
        run = verdict.run,
        v2_usec = record.v2_usec,
        high_target = thresholds.high_target,
        weak_target = thresholds.weak_target,
        %tier,
        "Classified run"
    );

    verdict.narrative.extend([
        format!("Number of cores detected: {}", thresholds.cores),
        format!(
            "High performance target (Test 1: base / (cores - 1)): <= {} usec",
            rounded_with_thousands(thresholds.high_target)
        ),
        format!(
            "Weak performance target (Test 2: base / (cores / 2)): <= {} usec",
            rounded_with_thousands(thresholds.weak_target)
        ),
        format!(
            "Result: PASSED Test {} ({} Performance Criteria Met)",
            tier.test_number(),
            tier.criteria_label()
        ),
    ]);
    verdict.tier = Some(tier);
    verdict.thresholds = Some(thresholds);

    (verdict, None)
}
