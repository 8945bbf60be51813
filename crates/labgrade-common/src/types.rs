//! Data model shared between the runner and the grading engine.

use serde::Serialize;

use crate::error::{GradeError, GradeResult};

/// Inputs to a single benchmark invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BenchmarkParameters {
    threads: u32,
    entries: u32,
}

impl BenchmarkParameters {
    /// Create parameters, rejecting zero thread or entry counts
    pub fn new(threads: u32, entries: u32) -> GradeResult<Self> {
        if threads == 0 {
            return Err(GradeError::InvalidParameters(
                "threads must be positive".to_string(),
            ));
        }
        if entries == 0 {
            return Err(GradeError::InvalidParameters(
                "entries must be positive".to_string(),
            ));
        }
        Ok(Self { threads, entries })
    }

    pub fn threads(&self) -> u32 {
        self.threads
    }

    pub fn entries(&self) -> u32 {
        self.entries
    }
}

/// Hash table implementation measured by the benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Reference implementation
    Base,
    /// First alternative implementation
    V1,
    /// Second alternative implementation
    V2,
}

impl Variant {
    /// Label used in narrative output
    pub fn label(&self) -> &'static str {
        match self {
            Variant::Base => "Base",
            Variant::V1 => "V1",
            Variant::V2 => "V2",
        }
    }

    /// Label used in the benchmark's own report
    pub fn report_label(&self) -> &'static str {
        match self {
            Variant::Base => "base",
            Variant::V1 => "v1",
            Variant::V2 => "v2",
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Parsed benchmark report. Durations are in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MetricsRecord {
    pub generation_usec: u64,
    pub base_usec: u64,
    pub base_missing: u64,
    pub v1_usec: u64,
    pub v1_missing: u64,
    pub v2_usec: u64,
    pub v2_missing: u64,
}

impl MetricsRecord {
    /// Measured duration of a variant
    pub fn usec(&self, variant: Variant) -> u64 {
        match variant {
            Variant::Base => self.base_usec,
            Variant::V1 => self.v1_usec,
            Variant::V2 => self.v2_usec,
        }
    }

    /// Missing entry count of a variant
    pub fn missing(&self, variant: Variant) -> u64 {
        match variant {
            Variant::Base => self.base_missing,
            Variant::V1 => self.v1_missing,
            Variant::V2 => self.v2_missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_reject_zero() {
        assert!(BenchmarkParameters::new(0, 10).is_err());
        assert!(BenchmarkParameters::new(4, 0).is_err());

        let params = BenchmarkParameters::new(4, 50_000).unwrap();
        assert_eq!(params.threads(), 4);
        assert_eq!(params.entries(), 50_000);
    }

    #[test]
    fn test_record_accessors() {
        let record = MetricsRecord {
            base_usec: 2000,
            v1_usec: 3000,
            v1_missing: 3,
            v2_usec: 500,
            ..Default::default()
        };
        assert_eq!(record.usec(Variant::Base), 2000);
        assert_eq!(record.usec(Variant::V1), 3000);
        assert_eq!(record.missing(Variant::V1), 3);
        assert_eq!(record.missing(Variant::V2), 0);
    }

    #[test]
    fn test_variant_serializes_lowercase() {
        let json = serde_json::to_string(&Variant::V2).unwrap();
        assert_eq!(json, "\"v2\"");
    }
}
