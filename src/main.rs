//! labgrade - Application Entry Point
//!
//! Builds the lab, runs the selected grading procedures and exits nonzero
//! if any of them failed.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

use labgrade::{
    BenchmarkParameters, GradingSession,
    config::Config,
    grading::{GradingCallback, GradingEngine, Procedure, RunVerdict, callback::progress_line},
    runner::BenchmarkRunner,
    summary::SessionSummary,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProcedureArg {
    /// v1 must be correct and slower than base
    V1,
    /// v2 must be correct; speed is graded in tiers
    V2,
    /// Both procedures, v1 first
    All,
}

impl ProcedureArg {
    fn procedures(self) -> &'static [Procedure] {
        match self {
            ProcedureArg::V1 => &[Procedure::V1Performance],
            ProcedureArg::V2 => &[Procedure::V2Performance],
            ProcedureArg::All => &[Procedure::V1Performance, Procedure::V2Performance],
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "labgrade")]
#[command(about = "Build, benchmark and grade a concurrent hash table lab")]
struct Args {
    /// Which grading procedure(s) to run.
    #[arg(long, value_enum, default_value_t = ProcedureArg::All)]
    procedure: ProcedureArg,

    /// Lab directory; overrides LABGRADE_LAB_DIR.
    #[arg(long, value_name = "DIR")]
    lab_dir: Option<PathBuf>,

    /// Print a JSON summary on stdout instead of the narrative.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, default_value_t = false)]
    log_json: bool,
}

/// Prints the narrative on stdout while the runs happen
struct ConsoleCallback;

impl GradingCallback for ConsoleCallback {
    fn on_run_started(&self, _run: usize, params: &BenchmarkParameters) {
        println!("{}", progress_line(params));
    }

    fn on_run_evaluated(&self, verdict: &RunVerdict) {
        for line in &verdict.narrative {
            println!("{}", line);
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::from_env()?;
    if let Some(lab_dir) = args.lab_dir {
        config.lab.lab_dir = lab_dir;
    }

    // Initialize tracing
    let fmt_layer = if args.log_json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(fmt_layer)
        .init();

    tracing::info!("Starting labgrade");
    tracing::info!(
        cores = config.benchmark.cores,
        "Core count is configured, not detected from hardware"
    );

    let params = config.benchmark.parameters()?;
    let mut engine = GradingEngine::new(
        params,
        config.benchmark.repetitions,
        config.benchmark.cores,
    );
    if !args.json {
        engine = engine.with_callback(Arc::new(ConsoleCallback));
    }
    let runner = BenchmarkRunner::new(&config.lab, config.benchmark.run_timeout);

    // Setup: build once for every procedure
    let session = GradingSession::setup(config.lab.clone()).await;
    let mut summary = SessionSummary::new(
        config.lab.lab_dir.clone(),
        params,
        config.benchmark.cores,
        session.build_outcome(),
    );

    for &procedure in args.procedure.procedures() {
        let report = engine.grade(procedure, &session, &runner).await;
        summary.push(&report);
        if args.json {
            continue;
        }

        // Run narratives were printed as each run was evaluated
        for line in &report.summary {
            println!("{}", line);
        }
        match report.into_result() {
            Ok(_) => println!("{} ... ok", procedure),
            Err(e) => println!("{} ... FAIL\n{}", procedure, e),
        }
    }

    // Teardown: clean once, never fails
    session.teardown().await;

    if args.json {
        println!("{}", summary.to_json()?);
    }

    if summary.passed {
        tracing::info!("All grading procedures passed");
    } else if summary.ungraded {
        tracing::error!("The lab could not be graded");
    } else {
        tracing::warn!("One or more grading procedures failed");
    }
    Ok(ExitCode::from(summary.exit_status()))
}
