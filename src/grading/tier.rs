//! Performance tiers and the thresholds that separate them

use serde::Serialize;

/// How a measured duration compares to baseline-derived targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceTier {
    /// At or under the high performance target
    High,
    /// Over the high target, at or under the weak target
    Weak,
    /// Over both targets. Still a pass.
    Low,
}

impl PerformanceTier {
    /// Classify a duration. Every value maps to exactly one tier.
    pub fn classify(usec: u64, thresholds: &Thresholds) -> Self {
        let usec = usec as f64;
        if usec <= thresholds.high_target {
            PerformanceTier::High
        } else if usec <= thresholds.weak_target {
            PerformanceTier::Weak
        } else {
            PerformanceTier::Low
        }
    }

    /// Test number quoted in the narrative
    pub fn test_number(&self) -> u8 {
        match self {
            PerformanceTier::High => 1,
            PerformanceTier::Weak => 2,
            PerformanceTier::Low => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceTier::High => "High",
            PerformanceTier::Weak => "Weak",
            PerformanceTier::Low => "Low",
        }
    }

    /// Criteria named on the narrative result line. Test 2 is reported
    /// under the high performance criteria.
    pub fn criteria_label(&self) -> &'static str {
        match self {
            PerformanceTier::High | PerformanceTier::Weak => "High",
            PerformanceTier::Low => "Low",
        }
    }
}

impl std::fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Targets derived from one run's baseline duration
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    pub cores: u32,
    /// `base / (cores - 1)`
    pub high_target: f64,
    /// `base / (cores / 2)`
    pub weak_target: f64,
}

impl Thresholds {
    /// Derive both targets. `cores` must be at least 2, which config
    /// validation guarantees; for such values `high_target <= weak_target`.
    pub fn derive(base_usec: u64, cores: u32) -> Self {
        let base = base_usec as f64;
        let cores_f = cores as f64;
        Self {
            cores,
            high_target: base / (cores_f - 1.0),
            weak_target: base / (cores_f / 2.0),
        }
    }
}
