//! Application-wide constants
//!
//! Defaults for every configurable value, plus the literal text of the
//! benchmark report.

// =============================================================================
// LAB DEFAULTS
// =============================================================================

/// Default lab directory (where the Makefile lives)
pub const DEFAULT_LAB_DIR: &str = ".";

/// Default build action
pub const DEFAULT_BUILD_COMMAND: &str = "make";

/// Default clean action
pub const DEFAULT_CLEAN_COMMAND: &str = "make clean";

/// Default benchmark executable, relative to the lab directory
pub const DEFAULT_EXECUTABLE: &str = "./hash-table-tester";

// =============================================================================
// BENCHMARK DEFAULTS
// =============================================================================

/// Default thread count passed to the benchmark
pub const DEFAULT_THREADS: u32 = 4;

/// Default entry count passed to the benchmark
pub const DEFAULT_ENTRIES: u32 = 50_000;

/// Default number of repetitions per grading procedure
pub const DEFAULT_REPETITIONS: u32 = 3;

/// Assumed core count used to derive performance targets.
///
/// Not detected from hardware.
pub const DEFAULT_CORES: u32 = 4;

/// Smallest core count for which both targets are defined
pub const MIN_CORES: u32 = 2;

/// Flag carrying the thread count
pub const THREADS_FLAG: &str = "-t";

/// Flag carrying the entry count
pub const ENTRIES_FLAG: &str = "-s";

/// Maximum number of stderr characters kept in error messages
pub const STDERR_EXCERPT_CHARS: usize = 500;

// =============================================================================
// REPORT FORMAT
// =============================================================================

/// Iteration count the benchmark averages over, as quoted in the narrative
pub const BENCHMARK_AVERAGED_RUNS: u32 = 30;

// =============================================================================
// EXIT STATUS
// =============================================================================

/// A completed run failed a correctness or performance assertion
pub const EXIT_GRADING_FAILED: u8 = 1;

/// A procedure stopped before its runs could be judged
pub const EXIT_NOT_GRADED: u8 = 2;

// =============================================================================
// LOGGING
// =============================================================================

/// Default tracing filter when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "labgrade=info";
