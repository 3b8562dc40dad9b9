use std::path::PathBuf;

/// Failures that can occur while running scripts or archiving files.
///
/// Only [`RunError::CreateDir`] aborts a run. Every other variant is caught at
/// the job or file level and turned into a log line and a terminal status.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Error: {name} not found at {}", path.display())]
    MissingScript { name: String, path: PathBuf },

    #[error("could not start interpreter '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file {name} was not found and could not be moved")]
    ArchiveMissingSource { name: String },

    #[error("failed to move {name}: {source}")]
    ArchiveMove {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_script_mentions_name_and_path() {
        let err = RunError::MissingScript {
            name: "download.ps1".to_string(),
            path: PathBuf::from("/work/download.ps1"),
        };
        assert_eq!(
            err.to_string(),
            "Error: download.ps1 not found at /work/download.ps1"
        );
    }

    #[test]
    fn spawn_error_keeps_source() {
        let err = RunError::Spawn {
            program: "powershell".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().contains("powershell"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn archive_missing_source_display() {
        let err = RunError::ArchiveMissingSource {
            name: "Merkmal.csv".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "file Merkmal.csv was not found and could not be moved"
        );
    }
}
