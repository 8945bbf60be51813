//! Collection of metrics records across the repetitions of one procedure

use labgrade_common::MetricsRecord;

/// Collects the records produced by repeated benchmark runs
pub struct RunCollector {
    runs: Vec<MetricsRecord>,
}

impl RunCollector {
    /// Create a new collector sized for the expected repetitions
    pub fn with_capacity(repetitions: usize) -> Self {
        Self {
            runs: Vec::with_capacity(repetitions),
        }
    }

    /// Add a run
    pub fn add_run(&mut self, record: MetricsRecord) {
        self.runs.push(record);
    }

    /// Get number of runs
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Runs paired with their 1-indexed run number
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &MetricsRecord)> {
        self.runs.iter().enumerate().map(|(i, r)| (i + 1, r))
    }

    pub fn into_records(self) -> Vec<MetricsRecord> {
        self.runs
    }
}
