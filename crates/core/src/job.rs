//! Script jobs and their execution status.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Timestamp format used in log file names (`YYYYMMDD_HHMMSS`).
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// One configured script, identified by its position in the run order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptJob {
    /// File name as configured, e.g. `download.ps1`.
    pub name: String,
    /// Absolute or base-relative path to the script file.
    pub path: PathBuf,
}

impl ScriptJob {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Whether the script file is present right now.
    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// File stem used in the log file name.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }

    /// Log file for a run started at `started_at`:
    /// `<log_dir>/Log_<stem>_<YYYYMMDD_HHMMSS>.txt`.
    pub fn log_path(&self, log_dir: &Path, started_at: DateTime<Local>) -> PathBuf {
        log_dir.join(format!(
            "Log_{}_{}.txt",
            self.stem(),
            started_at.format(LOG_TIMESTAMP_FORMAT)
        ))
    }
}

/// Lifecycle of a single job.
///
/// `NotStarted -> Running -> {Succeeded, FailedExitCode, FailedMissing,
/// FailedException}`. Terminal states never change and there are no retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    NotStarted,
    Running,
    /// The interpreter exited with code 0.
    Succeeded,
    /// The interpreter exited with a non-zero code (`-1` if killed by a signal).
    FailedExitCode(i32),
    /// The script file did not exist; no process was spawned.
    FailedMissing,
    /// Spawning or reading the process failed.
    FailedException(String),
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::NotStarted | Self::Running)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(&self, next: &JobStatus) -> bool {
        match self {
            Self::NotStarted => matches!(next, Self::Running | Self::FailedMissing),
            Self::Running => next.is_terminal(),
            _ => false,
        }
    }

    /// Move to `next`, tracing the transition. Illegal transitions are a bug
    /// in the executor.
    pub fn advance(&mut self, script: &str, next: JobStatus) {
        debug_assert!(
            self.can_transition_to(&next),
            "illegal job transition {self} -> {next}"
        );
        tracing::debug!(script, from = %self, to = %next, "Job status changed");
        *self = next;
    }

    /// Map a process exit code to the terminal status it represents.
    pub fn from_exit_code(code: i32) -> Self {
        if code == 0 {
            Self::Succeeded
        } else {
            Self::FailedExitCode(code)
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not started"),
            Self::Running => write!(f, "running"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::FailedExitCode(code) => write!(f, "failed with exit code {code}"),
            Self::FailedMissing => write!(f, "failed: script missing"),
            Self::FailedException(msg) => write!(f, "failed: {msg}"),
        }
    }
}
