//! Utility functions

pub mod format;
pub mod time;

pub use format::{rounded_with_thousands, with_thousands};
pub use time::{describe_elapsed, now_utc};
