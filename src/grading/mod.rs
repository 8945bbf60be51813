//! Grading procedures and their verdicts
//!
//! - **v1 performance**: v1 must lose no entries and must be slower than the
//!   base table in every run.
//! - **v2 performance**: v2 must lose no entries; its speed is classified into
//!   High/Weak/Low tiers against targets derived from the base table and an
//!   assumed core count. Every tier passes.

pub mod callback;
pub mod engine;
pub mod tier;
pub mod verdict;

pub use callback::{GradingCallback, NoOpCallback};
pub use engine::GradingEngine;
pub use tier::{PerformanceTier, Thresholds};
pub use verdict::{Procedure, ProcedureReport, RunVerdict};
