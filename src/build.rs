//! Build and clean actions for the lab under test.
//!
//! The lab is built once when a grading session starts and cleaned once
//! when it ends. Only the exit status of the build matters; its output is
//! kept for diagnostics.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;

use crate::config::{CommandLine, LabConfig};
use crate::constants::STDERR_EXCERPT_CHARS;
use crate::utils::describe_elapsed;

/// Outcome of one build action
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// Exit code, `None` if the process never started or was killed by a signal
    pub exit_code: Option<i32>,
    /// Leading part of stderr, or the spawn error
    pub diagnostics: String,
    /// Wall time spent building
    pub elapsed: Duration,
}

impl BuildOutcome {
    /// Whether the build finished with a zero exit status
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs the configured build and clean commands in the lab directory.
pub struct BuildController {
    lab: LabConfig,
}

impl BuildController {
    /// Create a new build controller
    pub fn new(lab: LabConfig) -> Self {
        Self { lab }
    }

    /// Run the build action.
    ///
    /// A command that cannot be started is reported as a failed build.
    pub async fn build(&self) -> BuildOutcome {
        let start = Instant::now();
        tracing::info!(
            command = %self.lab.build_command,
            lab_dir = %self.lab.lab_dir.display(),
            "Building lab"
        );

        let outcome = match self.invoke(&self.lab.build_command).await {
            Ok(output) => BuildOutcome {
                exit_code: output.status.code(),
                diagnostics: String::from_utf8_lossy(&output.stderr)
                    .chars()
                    .take(STDERR_EXCERPT_CHARS)
                    .collect(),
                elapsed: start.elapsed(),
            },
            Err(e) => BuildOutcome {
                exit_code: None,
                diagnostics: format!("Failed to start `{}`: {}", self.lab.build_command, e),
                elapsed: start.elapsed(),
            },
        };

        if outcome.succeeded() {
            tracing::info!(elapsed = %describe_elapsed(outcome.elapsed), "Build succeeded");
        } else {
            tracing::error!(
                exit_code = ?outcome.exit_code,
                diagnostics = %outcome.diagnostics,
                "Build failed"
            );
        }

        outcome
    }

    /// Run the clean action. Failures are logged and otherwise ignored.
    pub async fn clean(&self) {
        tracing::info!(command = %self.lab.clean_command, "Cleaning lab");

        match self.invoke(&self.lab.clean_command).await {
            Ok(output) if output.status.success() => {
                tracing::debug!("Clean finished");
            }
            Ok(output) => {
                tracing::warn!(
                    exit_code = ?output.status.code(),
                    "Clean exited with failure status"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to run clean command");
            }
        }
    }

    async fn invoke(&self, command: &CommandLine) -> std::io::Result<std::process::Output> {
        Command::new(&command.program)
            .args(&command.args)
            .current_dir(&self.lab.lab_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
    }
}
