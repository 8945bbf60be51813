//! Benchmark runner - invokes the compiled benchmark and parses its report

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use labgrade_common::{BenchmarkParameters, GradeError, GradeResult, MetricsRecord};
use tokio::fs;
use tokio::process::Command;
use tokio::time::timeout;

use crate::config::LabConfig;
use crate::constants::{ENTRIES_FLAG, STDERR_EXCERPT_CHARS, THREADS_FLAG};
use crate::report;

/// Something that yields one metrics record per benchmark invocation.
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Run the benchmark once and return its parsed report.
    async fn collect(&self, params: &BenchmarkParameters) -> GradeResult<MetricsRecord>;
}

/// Runs the benchmark executable as a child process
pub struct BenchmarkRunner {
    lab_dir: PathBuf,
    executable: PathBuf,
    run_timeout: Option<Duration>,
}

impl BenchmarkRunner {
    /// Create a new runner for the given lab
    pub fn new(lab: &LabConfig, run_timeout: Option<Duration>) -> Self {
        Self {
            lab_dir: lab.lab_dir.clone(),
            executable: lab.executable.clone(),
            run_timeout,
        }
    }

    /// Run the benchmark once with the given parameters.
    ///
    /// Blocks on the child until it exits (or the optional timeout fires),
    /// then parses everything it wrote to stdout.
    pub async fn run(&self, params: &BenchmarkParameters) -> GradeResult<MetricsRecord> {
        let binary_path = self.resolve_executable().await?;
        tracing::debug!(
            executable = %binary_path.display(),
            flags = %invocation_flags(params),
            "Spawning benchmark"
        );

        let start = Instant::now();
        let stdout = self.execute(&binary_path, params).await?;
        tracing::debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Benchmark finished"
        );

        report::parse(&stdout)
    }

    /// Absolute path of the executable. The child runs inside the lab
    /// directory, so a relative path must not be resolved again there.
    async fn resolve_executable(&self) -> GradeResult<PathBuf> {
        let candidate = self.lab_dir.join(&self.executable);
        fs::canonicalize(&candidate).await.map_err(|e| {
            GradeError::Execution(format!(
                "Benchmark executable not found at {}: {}",
                candidate.display(),
                e
            ))
        })
    }

    async fn execute(
        &self,
        binary_path: &Path,
        params: &BenchmarkParameters,
    ) -> GradeResult<String> {
        let child = Command::new(binary_path)
            .arg(THREADS_FLAG)
            .arg(params.threads().to_string())
            .arg(ENTRIES_FLAG)
            .arg(params.entries().to_string())
            .current_dir(&self.lab_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                GradeError::Execution(format!(
                    "Failed to execute {}: {}",
                    binary_path.display(),
                    e
                ))
            })?;

        let output = match self.run_timeout {
            Some(limit) => timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| {
                    GradeError::Execution(format!("Benchmark did not finish within {:?}", limit))
                })?,
            None => child.wait_with_output().await,
        }
        .map_err(|e| GradeError::Execution(format!("Failed to wait for benchmark: {}", e)))?;

        if !output.status.success() {
            let stderr: String = String::from_utf8_lossy(&output.stderr)
                .chars()
                .take(STDERR_EXCERPT_CHARS)
                .collect();

            #[cfg(unix)]
            {
                use std::os::unix::process::ExitStatusExt;
                if let Some(signal) = output.status.signal() {
                    return Err(GradeError::Execution(format!(
                        "Benchmark killed by signal {}: {}",
                        signal, stderr
                    )));
                }
            }

            let exit_code = output.status.code().unwrap_or(-1);
            return Err(GradeError::Execution(if stderr.is_empty() {
                format!("Benchmark exited with code {}", exit_code)
            } else {
                format!("Benchmark exited with code {}: {}", exit_code, stderr)
            }));
        }

        String::from_utf8(output.stdout).map_err(|e| GradeError::MalformedReport {
            raw: String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }
}

/// Command-line flags of one invocation, e.g. `-t 4 -s 50000`
pub fn invocation_flags(params: &BenchmarkParameters) -> String {
    format!(
        "{} {} {} {}",
        THREADS_FLAG,
        params.threads(),
        ENTRIES_FLAG,
        params.entries()
    )
}

#[async_trait]
impl ReportSource for BenchmarkRunner {
    async fn collect(&self, params: &BenchmarkParameters) -> GradeResult<MetricsRecord> {
        self.run(params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CommandLine;
    use std::os::unix::fs::PermissionsExt;

    fn write_script(dir: &Path, name: &str, body: &str) {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn sample() -> MetricsRecord {
        MetricsRecord {
            generation_usec: 1000,
            base_usec: 2000,
            base_missing: 0,
            v1_usec: 3000,
            v1_missing: 0,
            v2_usec: 500,
            v2_missing: 0,
        }
    }

    /// Shell line that prints the report of `record`
    fn printf_report(record: &MetricsRecord) -> String {
        format!("printf '{}'", report::render(record).replace('\n', "\\n"))
    }

    fn runner(dir: &Path, timeout: Option<Duration>) -> BenchmarkRunner {
        let lab = LabConfig {
            lab_dir: dir.to_path_buf(),
            build_command: CommandLine::parse("true").unwrap(),
            clean_command: CommandLine::parse("true").unwrap(),
            executable: PathBuf::from("./hash-table-tester"),
        };
        BenchmarkRunner::new(&lab, timeout)
    }

    fn params() -> BenchmarkParameters {
        BenchmarkParameters::new(4, 50_000).unwrap()
    }

    #[tokio::test]
    async fn test_run_parses_report() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "hash-table-tester", &printf_report(&sample()));

        let record = runner(dir.path(), None).run(&params()).await.unwrap();
        assert_eq!(record, sample());
    }

    #[tokio::test]
    async fn test_run_passes_flags() {
        let dir = tempfile::tempdir().unwrap();
        // Fails unless invoked as `-t 4 -s 50000`
        let body = format!(
            "[ \"$*\" = \"-t 4 -s 50000\" ] || exit 3\n{}",
            printf_report(&sample())
        );
        write_script(dir.path(), "hash-table-tester", &body);

        assert!(runner(dir.path(), None).run(&params()).await.is_ok());
    }

    #[test]
    fn test_invocation_flags() {
        assert_eq!(invocation_flags(&params()), "-t 4 -s 50000");
    }

    #[tokio::test]
    async fn test_missing_executable() {
        let dir = tempfile::tempdir().unwrap();
        let err = runner(dir.path(), None).run(&params()).await.unwrap_err();
        assert!(matches!(err, GradeError::Execution(msg) if msg.contains("not found")));
    }

    #[tokio::test]
    async fn test_nonzero_exit() {
        let dir = tempfile::tempdir().unwrap();
        write_script(
            dir.path(),
            "hash-table-tester",
            "echo 'segfault-ish' >&2\nexit 2",
        );

        let err = runner(dir.path(), None).run(&params()).await.unwrap_err();
        match err {
            GradeError::Execution(msg) => {
                assert!(msg.contains("code 2"));
                assert!(msg.contains("segfault-ish"));
            }
            other => panic!("expected execution error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_output() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "hash-table-tester", "echo 'Generation: soon'");

        let err = runner(dir.path(), None).run(&params()).await.unwrap_err();
        assert!(matches!(err, GradeError::MalformedReport { raw } if raw == "Generation: soon\n"));
    }

    #[tokio::test]
    async fn test_timeout_kills_benchmark() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "hash-table-tester", "sleep 5");

        let err = runner(dir.path(), Some(Duration::from_millis(200)))
            .run(&params())
            .await
            .unwrap_err();
        assert!(matches!(err, GradeError::Execution(msg) if msg.contains("did not finish")));
    }
}
