//! Benchmark report parsing
//!
//! The benchmark prints a fixed seven-line report on stdout:
//!
//! ```text
//! Generation: 1,000 usec
//! Hash table base: 2,000 usec
//!   - 0 missing
//! Hash table v1: 3,000 usec
//!   - 0 missing
//! Hash table v2: 500 usec
//!   - 0 missing
//! ```
//!
//! Counts may carry `,` thousands separators. Anything else, including
//! extra lines before or after the report, is rejected.

use std::sync::LazyLock;

use labgrade_common::{GradeError, GradeResult, MetricsRecord, Variant};
use regex::Regex;

use crate::utils::format::with_thousands;

static REPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\AGeneration: ([0-9,]+) usec\n",
        r"Hash table base: ([0-9,]+) usec\n",
        r"  - ([0-9,]+) missing\n",
        r"Hash table v1: ([0-9,]+) usec\n",
        r"  - ([0-9,]+) missing\n",
        r"Hash table v2: ([0-9,]+) usec\n",
        r"  - ([0-9,]+) missing\n?\z",
    ))
    .expect("Failed to compile report pattern")
});

/// Parse a raw benchmark report into a metrics record
pub fn parse(raw: &str) -> GradeResult<MetricsRecord> {
    let malformed = || GradeError::MalformedReport {
        raw: raw.to_string(),
    };

    let caps = REPORT_RE.captures(raw).ok_or_else(malformed)?;

    let mut values = [0u64; 7];
    for (slot, group) in values.iter_mut().zip(1..) {
        let text = caps.get(group).ok_or_else(malformed)?.as_str();
        *slot = parse_count(text).ok_or_else(malformed)?;
    }

    let [
        generation_usec,
        base_usec,
        base_missing,
        v1_usec,
        v1_missing,
        v2_usec,
        v2_missing,
    ] = values;

    Ok(MetricsRecord {
        generation_usec,
        base_usec,
        base_missing,
        v1_usec,
        v1_missing,
        v2_usec,
        v2_missing,
    })
}

/// Strip thousands separators and convert. `None` for an empty numeral or
/// one that overflows `u64`.
fn parse_count(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|c| *c != ',').collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Render a record in the benchmark's own report format
pub fn render(record: &MetricsRecord) -> String {
    let mut out = format!(
        "Generation: {} usec\n",
        with_thousands(record.generation_usec)
    );
    for variant in [Variant::Base, Variant::V1, Variant::V2] {
        out.push_str(&format!(
            "Hash table {}: {} usec\n  - {} missing\n",
            variant.report_label(),
            with_thousands(record.usec(variant)),
            with_thousands(record.missing(variant)),
        ));
    }
    out
}
