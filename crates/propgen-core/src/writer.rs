//! Atomic, per-file output writing.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use propgen_types::{WriteFailure, WrittenFile};

use crate::error::PropgenError;
use crate::pipeline::RenderedFile;

/// blake3 hex digest of `bytes`.
pub fn content_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Write `contents` to `dir/name` via a temporary file in `dir` and a rename,
/// so readers never observe a partially written file.
pub fn write_atomic(dir: &Path, name: &str, contents: &[u8]) -> Result<()> {
    let target = dir.join(name);
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(contents)
        .with_context(|| format!("failed to write {}", target.display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("failed to sync {}", target.display()))?;
    tmp.persist(&target)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to move output into place at {}", target.display()))?;
    Ok(())
}

fn display_path(dir: &Path, name: &str) -> String {
    dir.join(name).display().to_string().replace('\\', "/")
}

fn write_failure(path: String, err: impl std::fmt::Display) -> WriteFailure {
    let err = PropgenError::output_write_failure(&path, err);
    WriteFailure {
        path,
        message: err.message,
    }
}

/// Write every rendered file. A failure affects only its own file.
///
/// With `dry_run`, nothing touches the disk but the returned entries are the
/// same as for a real write.
pub fn write_files(
    dir: &Path,
    files: &[RenderedFile],
    dry_run: bool,
) -> (Vec<WrittenFile>, Vec<WriteFailure>) {
    let mut written = Vec::new();
    let mut failures = Vec::new();

    if !dry_run
        && !files.is_empty()
        && let Err(err) = std::fs::create_dir_all(dir)
    {
        warn!(dir = %dir.display(), "cannot create output directory: {err}");
        for file in files {
            failures.push(write_failure(
                display_path(dir, &file.name),
                format!("cannot create output directory: {err}"),
            ));
        }
        return (written, failures);
    }

    for file in files {
        let path = display_path(dir, &file.name);
        let bytes = file.contents.as_bytes();
        let outcome = if dry_run {
            Ok(())
        } else {
            write_atomic(dir, &file.name, bytes)
        };
        match outcome {
            Ok(()) => {
                info!(path = %path, units = file.units, bytes = bytes.len(), dry_run, "wrote test module");
                written.push(WrittenFile {
                    path,
                    units: file.units,
                    bytes: bytes.len(),
                    blake3: content_hash(bytes),
                });
            }
            Err(err) => {
                warn!(path = %path, "write failed: {err:#}");
                failures.push(write_failure(path, format!("{err:#}")));
            }
        }
    }
    (written, failures)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_hex_blake3() {
        let h = content_hash(b"");
        assert_eq!(h.len(), 64);
        assert_eq!(
            h,
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
        );
    }

    #[test]
    fn atomic_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("test_a.py"), "old").unwrap();
        write_atomic(dir.path(), "test_a.py", b"new").unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("test_a.py")).unwrap(),
            "new"
        );
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn blocked_output_directory_fails_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("out");
        std::fs::write(&blocker, "not a directory").unwrap();
        let files = vec![
            RenderedFile {
                name: "test_a.py".to_string(),
                contents: "pass\n".to_string(),
                units: 1,
            },
            RenderedFile {
                name: "test_b.py".to_string(),
                contents: "pass\n".to_string(),
                units: 2,
            },
        ];

        let (written, failures) = write_files(&blocker, &files, false);

        assert!(written.is_empty());
        assert_eq!(failures.len(), 2);
        assert!(failures[0].path.ends_with("test_a.py"));
        for failure in &failures {
            assert!(failure.message.starts_with("Cannot write output: "));
            assert!(failure.message.contains("cannot create output directory"));
        }
    }
}
