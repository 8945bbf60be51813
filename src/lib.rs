//! labgrade - grading harness for a concurrent hash table lab
//!
//! Builds the lab, runs its benchmark a fixed number of times, parses the
//! seven-line report it prints and grades every run:
//!
//! - **build**: build and clean actions (`make`, `make clean`)
//! - **report**: parser for the benchmark's text report
//! - **runner**: spawns the benchmark and hands its output to the parser
//! - **grading**: correctness checks and tiered performance classification
//! - **session**: setup/teardown context shared by the procedures

pub mod build;
pub mod config;
pub mod constants;
pub mod grading;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod session;
pub mod summary;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use labgrade_common::{BenchmarkParameters, GradeError, GradeResult, MetricsRecord, Variant};
pub use session::GradingSession;
