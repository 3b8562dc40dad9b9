//! Sequential runner: all configured scripts, then the archive step.

use std::path::PathBuf;

use chrono::Local;

use crate::archive::{self, ArchiveEntry};
use crate::config::RunnerConfig;
use crate::error::RunError;
use crate::executor::JobExecutor;
use crate::job::{JobStatus, ScriptJob};

/// Result of one job.
#[derive(Debug, Clone)]
pub struct JobReport {
    pub job: ScriptJob,
    pub log_path: PathBuf,
    pub status: JobStatus,
}

/// Result of a complete run.
#[derive(Debug)]
pub struct RunReport {
    pub jobs: Vec<JobReport>,
    pub archived: Vec<ArchiveEntry>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.jobs.iter().filter(|j| j.status.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.jobs.len() - self.succeeded()
    }
}

pub struct Runner {
    config: RunnerConfig,
    executor: JobExecutor,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Self {
        let executor = JobExecutor::new(config.interpreter.clone());
        Self { config, executor }
    }

    /// Use a custom executor (e.g. one that does not echo to the console).
    pub fn with_executor(config: RunnerConfig, executor: JobExecutor) -> Self {
        Self { config, executor }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run every configured script, then archive the configured files.
    pub async fn run(&self) -> Result<RunReport, RunError> {
        let jobs = self.run_all(&self.config.jobs()).await?;
        let archived = archive::archive_known_files(
            &self.config.archive_files,
            &self.config.base_dir,
            &self.config.archive_dir(),
        )
        .await?;
        Ok(RunReport { jobs, archived })
    }

    /// Execute `jobs` strictly in order, one at a time.
    ///
    /// A failing job never stops the loop. Only failure to create the log
    /// directory is returned as an error.
    pub async fn run_all(&self, jobs: &[ScriptJob]) -> Result<Vec<JobReport>, RunError> {
        let log_dir = self.config.log_dir();
        tokio::fs::create_dir_all(&log_dir)
            .await
            .map_err(|source| RunError::CreateDir {
                path: log_dir.clone(),
                source,
            })?;

        let mut reports = Vec::with_capacity(jobs.len());
        for job in jobs {
            let log_path = job.log_path(&log_dir, Local::now());
            let status = self.executor.execute_job(job, &log_path).await;
            reports.push(JobReport {
                job: job.clone(),
                log_path,
                status,
            });
        }

        tracing::info!(jobs = reports.len(), "All scripts processed.");
        Ok(reports)
    }
}
