//! Runs the runner binary as a child process and captures its output.
//!
//! Each call spawns an independent process. There is no locking between
//! concurrent calls: two runs may race on the same log and archive
//! directories.

use std::process::Stdio;

use serde::Serialize;
use tokio::process::Command;

/// Binary name of the runner, looked up next to the API executable.
pub const RUNNER_BIN_NAME: &str = "scriptline-runner";

/// Errors that prevent the runner from producing any result at all.
#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    #[error("failed to start runner '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Program, arguments and working directory used to start the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerCommand {
    pub program: String,
    pub args: Vec<String>,
    pub working_directory: Option<String>,
}

impl RunnerCommand {
    /// Read `RUNNER_PROGRAM`, `RUNNER_ARGS` and `RUNNER_WORKDIR`.
    pub fn from_env() -> Self {
        let program = std::env::var("RUNNER_PROGRAM")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(default_runner_program);

        let args: Vec<String> = std::env::var("RUNNER_ARGS")
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        let working_directory = std::env::var("RUNNER_WORKDIR")
            .ok()
            .filter(|s| !s.trim().is_empty());

        Self {
            program,
            args,
            working_directory,
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.working_directory {
            cmd.current_dir(dir);
        }
        cmd
    }
}

/// `scriptline-runner` in the directory of the current executable, falling
/// back to a `PATH` lookup.
fn default_runner_program() -> String {
    let file_name = format!("{RUNNER_BIN_NAME}{}", std::env::consts::EXE_SUFFIX);
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(&file_name)))
        .filter(|path| path.is_file())
        .map(|path| path.to_string_lossy().into_owned())
        .unwrap_or(file_name)
}

/// Coarse outcome of a run, serialized as `"ok"` or `"error"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Ok,
    Error,
}

/// Body of a `POST /run-script` response.
#[derive(Debug, Clone, Serialize)]
pub struct RunScriptResponse {
    pub status: RunStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Start the runner, wait for it to exit and capture both streams.
///
/// A non-zero exit is not an error here; it yields [`RunStatus::Error`] with
/// whatever the child printed.
pub async fn run_runner(runner: &RunnerCommand) -> Result<RunScriptResponse, TriggerError> {
    let mut cmd = runner.command();
    cmd.stdin(Stdio::null());

    tracing::info!(program = %runner.program, "Starting runner process");
    let output = cmd.output().await.map_err(|source| TriggerError::Spawn {
        program: runner.program.clone(),
        source,
    })?;

    let status = if output.status.success() {
        RunStatus::Ok
    } else {
        RunStatus::Error
    };
    tracing::info!(
        exit_code = output.status.code().unwrap_or(-1),
        ?status,
        "Runner process finished"
    );

    Ok(RunScriptResponse {
        status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
