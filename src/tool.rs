//! The external vector inspection command.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{Result, ValidatorError};

pub const DEFAULT_PROGRAM: &str = "ogrinfo";

/// Raw output of one command run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspectionReport {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// Something that can run the inspection command with a list of arguments.
pub trait InspectionTool {
    fn program(&self) -> String;

    fn run(&self, args: &[OsString]) -> io::Result<InspectionReport>;

    /// Confirm the tool answers `--version` cleanly.
    fn probe(&self) -> Result<String> {
        let unavailable = |detail: Option<String>| ValidatorError::ToolUnavailable {
            program: self.program(),
            detail,
        };

        let report = self
            .run(&[OsString::from("--version")])
            .map_err(|e| unavailable(Some(e.to_string())))?;

        if !report.success || !report.stderr.trim().is_empty() {
            return Err(unavailable(Some(report.stderr)));
        }

        let version = report.stdout.trim();
        if version.is_empty() {
            return Err(unavailable(None));
        }

        Ok(version.to_string())
    }

    /// Run the inspection with the built arguments and return its report text.
    fn inspect(&self, args: &[OsString]) -> Result<String> {
        let failed = |stderr: String| ValidatorError::CommandFailed {
            program: self.program(),
            stderr,
        };

        let report = self.run(args).map_err(|e| failed(e.to_string()))?;
        if !report.success || !report.stderr.trim().is_empty() {
            return Err(failed(report.stderr));
        }

        Ok(report.stdout)
    }
}

/// `ogrinfo` run as a child process.
#[derive(Debug, Clone)]
pub struct OgrInfo {
    program: PathBuf,
}

impl OgrInfo {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for OgrInfo {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl InspectionTool for OgrInfo {
    fn program(&self) -> String {
        self.program.display().to_string()
    }

    fn run(&self, args: &[OsString]) -> io::Result<InspectionReport> {
        debug!(program = %self.program.display(), ?args, "running inspection command");

        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;

        Ok(InspectionReport {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
        })
    }
}
