//! Application configuration management
//!
//! Configuration is loaded from environment variables (a `.env` file is
//! honoured) and validated before any grading starts.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use labgrade_common::{BenchmarkParameters, GradeResult};

use crate::constants::{
    DEFAULT_BUILD_COMMAND, DEFAULT_CLEAN_COMMAND, DEFAULT_CORES, DEFAULT_ENTRIES,
    DEFAULT_EXECUTABLE, DEFAULT_LAB_DIR, DEFAULT_LOG_FILTER, DEFAULT_REPETITIONS, DEFAULT_THREADS,
    MIN_CORES,
};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub lab: LabConfig,
    pub benchmark: BenchmarkConfig,
    pub log_filter: String,
}

/// Where the lab lives and how to build, clean and run it
#[derive(Debug, Clone)]
pub struct LabConfig {
    pub lab_dir: PathBuf,
    pub build_command: CommandLine,
    pub clean_command: CommandLine,
    pub executable: PathBuf,
}

/// Benchmark invocation and grading parameters
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    pub threads: u32,
    pub entries: u32,
    /// Runs per grading procedure
    pub repetitions: u32,
    /// Assumed core count used to derive performance targets
    pub cores: u32,
    /// Per-run limit; `None` waits for the benchmark indefinitely
    pub run_timeout: Option<Duration>,
}

/// An external command split into program and arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Split a command on whitespace. Returns `None` for a blank string.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl std::fmt::Display for CommandLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            lab: LabConfig::from_lookup(&lookup)?,
            benchmark: BenchmarkConfig::from_lookup(&lookup)?,
            log_filter: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}

impl LabConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            lab_dir: PathBuf::from(
                lookup("LABGRADE_LAB_DIR").unwrap_or_else(|| DEFAULT_LAB_DIR.to_string()),
            ),
            build_command: command_var(lookup, "LABGRADE_BUILD_COMMAND", DEFAULT_BUILD_COMMAND)?,
            clean_command: command_var(lookup, "LABGRADE_CLEAN_COMMAND", DEFAULT_CLEAN_COMMAND)?,
            executable: PathBuf::from(
                lookup("LABGRADE_EXECUTABLE").unwrap_or_else(|| DEFAULT_EXECUTABLE.to_string()),
            ),
        })
    }
}

impl BenchmarkConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let run_timeout = optional_var(lookup, "LABGRADE_RUN_TIMEOUT_SECS")?;
        let config = Self {
            threads: parsed_var(lookup, "LABGRADE_THREADS", DEFAULT_THREADS)?,
            entries: parsed_var(lookup, "LABGRADE_ENTRIES", DEFAULT_ENTRIES)?,
            repetitions: parsed_var(lookup, "LABGRADE_REPETITIONS", DEFAULT_REPETITIONS)?,
            cores: parsed_var(lookup, "LABGRADE_CORES", DEFAULT_CORES)?,
            run_timeout: run_timeout.map(Duration::from_secs),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::InvalidValue("LABGRADE_THREADS".to_string()));
        }
        if self.entries == 0 {
            return Err(ConfigError::InvalidValue("LABGRADE_ENTRIES".to_string()));
        }
        if self.repetitions == 0 {
            return Err(ConfigError::InvalidValue("LABGRADE_REPETITIONS".to_string()));
        }
        if self.cores < MIN_CORES {
            return Err(ConfigError::InvalidValue("LABGRADE_CORES".to_string()));
        }
        // A zero limit would time out every run before it starts
        if self.run_timeout.is_some_and(|limit| limit.is_zero()) {
            return Err(ConfigError::InvalidValue("LABGRADE_RUN_TIMEOUT_SECS".to_string()));
        }
        Ok(())
    }

    /// Parameters passed to every benchmark invocation
    pub fn parameters(&self) -> GradeResult<BenchmarkParameters> {
        BenchmarkParameters::new(self.threads, self.entries)
    }
}

fn optional_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

fn parsed_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    Ok(optional_var(lookup, key)?.unwrap_or(default))
}

fn command_var<F>(lookup: &F, key: &str, default: &str) -> Result<CommandLine, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    CommandLine::parse(&raw).ok_or_else(|| ConfigError::Missing(key.to_string()))
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
