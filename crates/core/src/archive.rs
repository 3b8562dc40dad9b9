//! Archive step: move known data files into the archive directory.
//!
//! The archive keeps exactly one copy per file name. An existing archived
//! copy is deleted before the new one is moved in; nothing is versioned.

use std::io;
use std::path::Path;

use tokio::fs;

use crate::error::RunError;

/// What happened to one configured file during the archive step.
#[derive(Debug)]
pub enum ArchiveOutcome {
    /// The file was moved, replacing any earlier archived copy.
    Moved,
    /// The file was not present in the source directory.
    MissingSource,
    /// Removing the old copy or moving the file failed.
    Failed(RunError),
}

#[derive(Debug)]
pub struct ArchiveEntry {
    pub name: String,
    pub outcome: ArchiveOutcome,
}

impl ArchiveEntry {
    pub fn is_moved(&self) -> bool {
        matches!(self.outcome, ArchiveOutcome::Moved)
    }
}

/// Move each of `names` from `source_dir` into `archive_dir`.
///
/// `archive_dir` is created if needed; failing to create it is the only error
/// returned. Missing sources and per-file move failures are reported and
/// skipped.
pub async fn archive_known_files(
    names: &[String],
    source_dir: &Path,
    archive_dir: &Path,
) -> Result<Vec<ArchiveEntry>, RunError> {
    fs::create_dir_all(archive_dir)
        .await
        .map_err(|source| RunError::CreateDir {
            path: archive_dir.to_path_buf(),
            source,
        })?;

    let mut entries = Vec::with_capacity(names.len());
    for name in names {
        let src = source_dir.join(name);
        let dst = archive_dir.join(name);

        let outcome = match fs::try_exists(&src).await {
            Ok(false) => {
                let err = RunError::ArchiveMissingSource { name: name.clone() };
                tracing::info!(file = %name, "Note: {err}");
                ArchiveOutcome::MissingSource
            }
            Ok(true) => match relocate(&src, &dst).await {
                Ok(()) => {
                    tracing::info!(
                        file = %name,
                        archive = %archive_dir.display(),
                        "File {name} moved to archive (replacing any previous copy)"
                    );
                    ArchiveOutcome::Moved
                }
                Err(source) => move_failed(name, source),
            },
            // The source could not even be inspected (e.g. permissions).
            Err(source) => move_failed(name, source),
        };

        entries.push(ArchiveEntry {
            name: name.clone(),
            outcome,
        });
    }

    Ok(entries)
}

fn move_failed(name: &str, source: io::Error) -> ArchiveOutcome {
    let err = RunError::ArchiveMove {
        name: name.to_string(),
        source,
    };
    tracing::error!(file = %name, "{err}");
    ArchiveOutcome::Failed(err)
}

/// Replace `dst` with `src`. Falls back to copy + delete across filesystems.
async fn relocate(src: &Path, dst: &Path) -> io::Result<()> {
    if fs::try_exists(dst).await? {
        fs::remove_file(dst).await?;
    }
    match fs::rename(src, dst).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(src, dst).await?;
            fs::remove_file(src).await
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn moves_present_files_and_reports_missing_ones() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let archive = dir.path().join("alt");
        std::fs::write(dir.path().join("a.csv"), "a").expect("write");

        let entries = archive_known_files(&names(&["a.csv", "b.csv"]), dir.path(), &archive)
            .await
            .expect("archive");

        assert_eq!(entries.len(), 2);
        assert_matches!(entries[0].outcome, ArchiveOutcome::Moved);
        assert_matches!(entries[1].outcome, ArchiveOutcome::MissingSource);
        assert!(!dir.path().join("a.csv").exists());
        assert_eq!(std::fs::read_to_string(archive.join("a.csv")).unwrap(), "a");
        assert!(!archive.join("b.csv").exists());
    }

    #[tokio::test]
    async fn existing_archived_copy_is_replaced() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let archive = dir.path().join("alt");
        std::fs::create_dir(&archive).expect("mkdir");
        std::fs::write(archive.join("Merkmal.csv"), "old").expect("write");
        std::fs::write(dir.path().join("Merkmal.csv"), "new").expect("write");

        let entries = archive_known_files(&names(&["Merkmal.csv"]), dir.path(), &archive)
            .await
            .expect("archive");

        assert!(entries[0].is_moved());
        assert_eq!(
            std::fs::read_to_string(archive.join("Merkmal.csv")).unwrap(),
            "new"
        );
        assert_eq!(std::fs::read_dir(&archive).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn second_run_reports_not_found_and_keeps_archive() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let archive = dir.path().join("alt");
        let files = names(&["x.csv", "y.csv"]);
        std::fs::write(dir.path().join("x.csv"), "x1").expect("write");
        std::fs::write(dir.path().join("y.csv"), "y1").expect("write");

        archive_known_files(&files, dir.path(), &archive)
            .await
            .expect("first archive");
        let second = archive_known_files(&files, dir.path(), &archive)
            .await
            .expect("second archive");

        assert!(second
            .iter()
            .all(|e| matches!(e.outcome, ArchiveOutcome::MissingSource)));
        assert_eq!(std::fs::read_dir(&archive).unwrap().count(), 2);
        assert_eq!(std::fs::read_to_string(archive.join("x.csv")).unwrap(), "x1");
        assert_eq!(std::fs::read_to_string(archive.join("y.csv")).unwrap(), "y1");
    }

    #[tokio::test]
    async fn uninspectable_source_is_a_move_failure_not_missing() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let archive = dir.path().join("alt");
        std::fs::write(dir.path().join("free.csv"), "f").expect("write");

        // An interior NUL makes the existence check itself fail.
        let entries =
            archive_known_files(&names(&["bad\0name.csv", "free.csv"]), dir.path(), &archive)
                .await
                .expect("archive");

        assert_matches!(
            entries[0].outcome,
            ArchiveOutcome::Failed(RunError::ArchiveMove { .. })
        );
        assert!(entries[1].is_moved());
    }

    #[tokio::test]
    async fn move_failure_does_not_stop_remaining_files() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let archive = dir.path().join("alt");
        // A directory at the destination cannot be removed with remove_file.
        std::fs::create_dir_all(archive.join("blocked.csv")).expect("mkdir");
        std::fs::write(dir.path().join("blocked.csv"), "b").expect("write");
        std::fs::write(dir.path().join("free.csv"), "f").expect("write");

        let entries =
            archive_known_files(&names(&["blocked.csv", "free.csv"]), dir.path(), &archive)
                .await
                .expect("archive");

        assert_matches!(
            entries[0].outcome,
            ArchiveOutcome::Failed(RunError::ArchiveMove { .. })
        );
        assert!(entries[1].is_moved());
        assert!(dir.path().join("blocked.csv").exists());
    }
}
