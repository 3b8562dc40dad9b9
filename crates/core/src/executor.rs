//! Single-job execution with tee logging.
//!
//! [`JobExecutor::execute_job`] runs one script through the configured
//! interpreter, copies each output line to the console and to the job's log
//! file as it arrives, and appends a status trailer. It never fails: every
//! problem ends up in the log and in the returned [`JobStatus`].

use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::Stdio;

use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

use crate::config::Interpreter;
use crate::error::RunError;
use crate::job::{JobStatus, ScriptJob};
use crate::tee::Tee;

/// Trailer appended to the log when the interpreter exits with code 0.
pub const SUCCESS_TRAILER: &str = "\nScript completed successfully.";

/// Buffered lines between the pipe reader and the tee.
const LINE_CHANNEL_CAPACITY: usize = 256;

/// Runs scripts one at a time through a fixed interpreter.
#[derive(Debug, Clone)]
pub struct JobExecutor {
    interpreter: Interpreter,
    echo: bool,
}

impl JobExecutor {
    pub fn new(interpreter: Interpreter) -> Self {
        Self {
            interpreter,
            echo: true,
        }
    }

    /// Write captured output to the log file only.
    pub fn without_console(mut self) -> Self {
        self.echo = false;
        self
    }

    /// Run `job`, writing its log to `log_path`.
    ///
    /// Exactly one log file is created regardless of the outcome (unless the
    /// log file itself cannot be created). Blocks until the child's output is
    /// exhausted and the child has exited; there is no timeout.
    pub async fn execute_job(&self, job: &ScriptJob, log_path: &Path) -> JobStatus {
        let mut status = JobStatus::NotStarted;

        if !job.exists().await {
            let err = RunError::MissingScript {
                name: job.name.clone(),
                path: job.path.clone(),
            };
            let msg = err.to_string();
            tracing::info!(script = %job.name, log = %log_path.display(), "{msg}");
            if let Err(e) = tokio::fs::write(log_path, msg.as_bytes()).await {
                tracing::error!(log = %log_path.display(), error = %e, "Failed to write log file");
            }
            status.advance(&job.name, JobStatus::FailedMissing);
            return status;
        }

        tracing::info!(script = %job.name, "Starting {} ...", job.name);
        status.advance(&job.name, JobStatus::Running);

        let mut log = match File::create(log_path).await {
            Ok(file) => file,
            Err(e) => {
                tracing::error!(log = %log_path.display(), error = %e, "Failed to create log file");
                status.advance(&job.name, JobStatus::FailedException(e.to_string()));
                return status;
            }
        };

        let result = {
            let mut stdout = tokio::io::stdout();
            let mut tee = Tee::new();
            if self.echo {
                tee = tee.with_sink(&mut stdout);
            }
            let mut tee = tee.with_sink(&mut log);
            self.stream(job, &mut tee).await
        };

        let (outcome, trailer) = match result {
            Ok(code) => {
                let outcome = JobStatus::from_exit_code(code);
                let trailer = if outcome.is_success() {
                    SUCCESS_TRAILER.to_string()
                } else {
                    format!("\nError: script exited with code {code}.")
                };
                (outcome, trailer)
            }
            Err(err) => {
                let msg = format!("Error while running {}:\n{err}", job.name);
                tracing::error!(script = %job.name, "{msg}");
                (JobStatus::FailedException(err.to_string()), format!("{msg}\n"))
            }
        };
        status.advance(&job.name, outcome);

        if let Err(e) = write_trailer(&mut log, &trailer).await {
            tracing::error!(log = %log_path.display(), error = %e, "Failed to finish log file");
        }

        tracing::info!(script = %job.name, status = %status, "{} finished.", job.name);
        status
    }

    /// Spawn the interpreter and pump its merged output through `tee`.
    ///
    /// Stdout and stderr share one pipe, so lines reach the tee in the order
    /// the child wrote them. Returns the exit code (`-1` when terminated by a
    /// signal). Write errors stop the copying but the child is still waited for.
    async fn stream(&self, job: &ScriptJob, tee: &mut Tee<'_>) -> Result<i32, RunError> {
        let (reader, writer) = std::io::pipe()?;
        let writer_err = writer.try_clone()?;

        let mut cmd = self.interpreter.command(&job.path);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::from(writer))
            .stderr(Stdio::from(writer_err));

        let spawned = cmd.spawn();
        // The command holds the parent's copies of the write end; the reader
        // only sees EOF once they are closed.
        drop(cmd);
        let mut child = spawned.map_err(|source| RunError::Spawn {
            program: self.interpreter.program.clone(),
            source,
        })?;

        let (tx, mut rx) = mpsc::channel(LINE_CHANNEL_CAPACITY);
        let reader_task = tokio::task::spawn_blocking(move || forward_lines(reader, tx));

        let mut copy_error = None;
        while let Some(line) = rx.recv().await {
            if copy_error.is_some() {
                continue;
            }
            let written = match line {
                Ok(line) => tee.write_line(&line).await,
                Err(e) => Err(e),
            };
            if let Err(e) = written {
                copy_error = Some(e);
            }
        }

        let _ = reader_task.await;
        let status = child.wait().await?;

        match copy_error {
            Some(e) => Err(RunError::Io(e)),
            None => Ok(status.code().unwrap_or(-1)),
        }
    }
}

/// Read `stream` line by line (terminators kept) and send each line, decoded
/// lossily as UTF-8, to `tx`. Ends at EOF, on a read error, or when the
/// receiver is gone. Blocking; run it on the blocking pool.
fn forward_lines(stream: impl Read, tx: mpsc::Sender<std::io::Result<String>>) {
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf).into_owned();
                if tx.blocking_send(Ok(line)).is_err() {
                    break;
                }
            }
            Err(e) => {
                let _ = tx.blocking_send(Err(e));
                break;
            }
        }
    }
}

async fn write_trailer(log: &mut File, trailer: &str) -> std::io::Result<()> {
    log.write_all(trailer.as_bytes()).await?;
    log.flush().await
}
