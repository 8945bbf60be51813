//! Grading session: build once on setup, clean once on teardown.
//!
//! The build outcome is held here and handed to every grading procedure,
//! so a failed build short-circuits all of them.

use labgrade_common::{GradeError, GradeResult};

use crate::build::{BuildController, BuildOutcome};
use crate::config::LabConfig;

/// Setup/teardown context shared by the grading procedures of one run of
/// the harness
pub struct GradingSession {
    controller: BuildController,
    build: BuildOutcome,
}

impl GradingSession {
    /// Build the lab and open a session around the outcome
    pub async fn setup(lab: LabConfig) -> Self {
        let controller = BuildController::new(lab);
        let build = controller.build().await;
        Self { controller, build }
    }

    /// Open a session around an already known build outcome
    #[cfg(test)]
    pub(crate) fn with_outcome(lab: LabConfig, build: BuildOutcome) -> Self {
        Self {
            controller: BuildController::new(lab),
            build,
        }
    }

    pub fn build_outcome(&self) -> &BuildOutcome {
        &self.build
    }

    /// Fail with `BuildFailure` unless the setup build succeeded
    pub fn ensure_built(&self) -> GradeResult<()> {
        if self.build.succeeded() {
            return Ok(());
        }

        let status = match self.build.exit_code {
            Some(code) => format!("exit code {}", code),
            None => "did not run to completion".to_string(),
        };
        let detail = match self.build.diagnostics.as_str() {
            "" => status,
            diagnostics => format!("{}: {}", status, diagnostics),
        };
        Err(GradeError::BuildFailure(detail))
    }

    /// Clean the lab. Never fails.
    pub async fn teardown(self) {
        self.controller.clean().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CommandLine;
    use std::path::PathBuf;

    fn lab(dir: PathBuf, build: &str) -> LabConfig {
        LabConfig {
            lab_dir: dir,
            build_command: CommandLine::parse(build).unwrap(),
            clean_command: CommandLine::parse("rm -f built").unwrap(),
            executable: PathBuf::from("./hash-table-tester"),
        }
    }

    #[tokio::test]
    async fn test_setup_and_teardown() {
        let dir = tempfile::tempdir().unwrap();
        let lab = lab(dir.path().to_path_buf(), "touch built");
        let session = GradingSession::setup(lab).await;

        assert!(session.ensure_built().is_ok());
        assert!(dir.path().join("built").exists());

        session.teardown().await;
        assert!(!dir.path().join("built").exists());
    }

    #[tokio::test]
    async fn test_failed_build_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let lab = lab(dir.path().to_path_buf(), "false");
        let session = GradingSession::setup(lab).await;

        let err = session.ensure_built().unwrap_err();
        assert!(matches!(err, GradeError::BuildFailure(msg) if msg.contains("exit code 1")));
        assert!(err_is_setup(&session));
    }

    fn err_is_setup(session: &GradingSession) -> bool {
        session
            .ensure_built()
            .unwrap_err()
            .to_string()
            .starts_with("Setup failed")
    }
}
