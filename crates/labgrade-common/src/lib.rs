//! Common types and errors shared across the labgrade workspace.

pub mod error;
pub mod types;

pub use error::{GradeError, GradeResult};
pub use types::*;
