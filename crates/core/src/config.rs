//! Runner configuration.
//!
//! The script list and the archive list are fixed constants. They are copied
//! into a [`RunnerConfig`] at startup so the runner never reads globals and
//! tests can point it at a scratch directory with a different interpreter.

use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::job::ScriptJob;

/// Default working directory holding the scripts and their data files.
pub const DEFAULT_BASE_DIR: &str = r"C:\Users\RDP9\Documents\Buntler";

/// Environment variable overriding [`DEFAULT_BASE_DIR`].
pub const BASE_DIR_ENV: &str = "SCRIPTLINE_BASE_DIR";

/// Log directory, relative to the base directory.
pub const LOG_DIR_NAME: &str = "Logs";

/// Archive directory, relative to the base directory.
pub const ARCHIVE_DIR_NAME: &str = "alt";

/// Scripts executed on every run, in this order.
pub const SCRIPTS: &[&str] = &[
    "download.ps1",
    "Zusammenführen.ps1",
    "MerkmalwerteTausch.ps1",
    "importbase.ps1",
    "importcomponent.ps1",
    "importcustomFields.ps1",
    "importproperties.ps1",
    "importtexte.ps1",
    "importbilder.ps1",
];

/// Data files moved into the archive directory after all scripts ran.
pub const ARCHIVE_FILES: &[&str] = &[
    "Artikelnummern.csv",
    "base-alle.csv",
    "bilder-alle.csv",
    "category-alle.csv",
    "component-alle.csv",
    "customFields-alle.csv",
    "Merkmal.csv",
    "properties-alle.csv",
    "Shortname.csv",
    "texte-alle.csv",
];

/// Program used to run each script, plus its fixed leading arguments.
///
/// The script path is always appended as the final argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    pub program: String,
    pub args: Vec<String>,
}

impl Interpreter {
    /// Non-interactive PowerShell with the execution policy bypassed.
    pub fn powershell() -> Self {
        Self {
            program: "powershell".to_string(),
            args: ["-NoLogo", "-ExecutionPolicy", "Bypass", "-File"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Build the command that runs `script`. Pipes are configured by the caller.
    pub fn command(&self, script: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).arg(script);
        cmd
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::powershell()
    }
}

/// Everything the runner needs to know about one installation.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Directory containing the scripts and the files to archive.
    pub base_dir: PathBuf,
    /// Log directory name below `base_dir`.
    pub log_dir_name: String,
    /// Archive directory name below `base_dir`.
    pub archive_dir_name: String,
    /// Script file names, executed in order.
    pub scripts: Vec<String>,
    /// File names moved into the archive directory.
    pub archive_files: Vec<String>,
    pub interpreter: Interpreter,
}

impl RunnerConfig {
    /// Build the standard configuration rooted at `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            log_dir_name: LOG_DIR_NAME.to_string(),
            archive_dir_name: ARCHIVE_DIR_NAME.to_string(),
            scripts: SCRIPTS.iter().map(|s| s.to_string()).collect(),
            archive_files: ARCHIVE_FILES.iter().map(|s| s.to_string()).collect(),
            interpreter: Interpreter::default(),
        }
    }

    /// Load the standard configuration, honouring `SCRIPTLINE_BASE_DIR`.
    ///
    /// | Env Var               | Default                              |
    /// |-----------------------|--------------------------------------|
    /// | `SCRIPTLINE_BASE_DIR` | `C:\Users\RDP9\Documents\Buntler`    |
    pub fn from_env() -> Self {
        let base_dir = std::env::var(BASE_DIR_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_DIR.into());
        Self::with_base_dir(base_dir)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.base_dir.join(&self.log_dir_name)
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.base_dir.join(&self.archive_dir_name)
    }

    /// The configured scripts resolved against `base_dir`, in run order.
    pub fn jobs(&self) -> Vec<ScriptJob> {
        self.scripts
            .iter()
            .map(|name| ScriptJob::new(name, self.base_dir.join(name)))
            .collect()
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::with_base_dir(DEFAULT_BASE_DIR)
    }
}
