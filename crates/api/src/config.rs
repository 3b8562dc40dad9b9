use crate::trigger::RunnerCommand;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// How the runner child process is started.
    pub runner: RunnerCommand,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                |
    /// |------------------------|----------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                              |
    /// | `PORT`                 | `3000`                                 |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`                |
    /// | `RUNNER_PROGRAM`       | `scriptline-runner` beside this binary |
    /// | `RUNNER_ARGS`          | (none, whitespace separated)           |
    /// | `RUNNER_WORKDIR`       | (inherit)                              |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let runner = RunnerCommand::from_env();

        Self {
            host,
            port,
            cors_origins,
            runner,
        }
    }
}
