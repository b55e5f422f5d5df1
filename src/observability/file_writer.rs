//! Append-only trace file with size-based rotation.
//!
//! When the live file grows past its limit it is renamed to
//! `<stem>.<UTC timestamp>.<ext>` and a fresh file is started. Only the newest
//! backups are kept.

use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Default rotation threshold (5 MB).
pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Default number of rotated files kept next to the live file.
pub const DEFAULT_MAX_BACKUPS: usize = 3;

/// Thread-safe line writer. The file is opened lazily on the first write.
pub struct RotatingWriter {
    path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    file: Mutex<Option<File>>,
}

impl RotatingWriter {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self::with_limits(path, DEFAULT_MAX_BYTES, DEFAULT_MAX_BACKUPS)
    }

    #[must_use]
    pub const fn with_limits(path: PathBuf, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            path,
            max_bytes,
            max_backups,
            file: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `line` plus a newline and flushes.
    ///
    /// # Errors
    ///
    /// Returns I/O errors from rotating, opening, or writing the file, and an
    /// error if the lock was poisoned.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|e| io::Error::other(format!("trace writer lock poisoned: {e}")))?;

        if self.needs_rotation() {
            *guard = None;
            self.rotate()?;
        }

        if guard.is_none() {
            *guard = Some(OpenOptions::new().create(true).append(true).open(&self.path)?);
        }
        let Some(file) = guard.as_mut() else {
            return Err(io::Error::other("trace file unavailable"));
        };

        writeln!(file, "{line}")?;
        file.flush()
    }

    fn needs_rotation(&self) -> bool {
        fs::metadata(&self.path).is_ok_and(|meta| meta.len() > self.max_bytes)
    }

    fn rotate(&self) -> io::Result<()> {
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.6fZ").to_string();
        let mut backup = self.backup_path(&stamp);
        let mut attempt = 1;
        while backup.exists() {
            backup = self.backup_path(&format!("{stamp}-{attempt}"));
            attempt += 1;
        }

        fs::rename(&self.path, &backup)?;
        self.prune_backups()
    }

    fn backup_path(&self, stamp: &str) -> PathBuf {
        let (stem, ext) = self.name_parts();
        let name = if ext.is_empty() {
            format!("{stem}.{stamp}")
        } else {
            format!("{stem}.{stamp}.{ext}")
        };
        self.path.with_file_name(name)
    }

    fn name_parts(&self) -> (String, String) {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = self
            .path
            .extension()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        (stem, ext)
    }

    /// Timestamps sort lexicographically, so the newest backups come last by name.
    fn prune_backups(&self) -> io::Result<()> {
        let Some(dir) = self.path.parent() else {
            return Ok(());
        };
        let (stem, _) = self.name_parts();
        let prefix = format!("{stem}.");

        let mut backups: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| *path != self.path)
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&prefix))
            })
            .collect();

        backups.sort();
        let excess = backups.len().saturating_sub(self.max_backups);
        for old in backups.iter().take(excess) {
            let _ = fs::remove_file(old);
        }
        Ok(())
    }
}

impl std::fmt::Debug for RotatingWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingWriter")
            .field("path", &self.path)
            .field("max_bytes", &self.max_bytes)
            .field("max_backups", &self.max_backups)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backups(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_name() != "trace.jsonl")
            .count()
    }

    #[test]
    fn lines_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RotatingWriter::new(dir.path().join("trace.jsonl"));
        writer.write_line("{\"a\":1}").unwrap();
        writer.write_line("{\"b\":2}").unwrap();

        let content = fs::read_to_string(writer.path()).unwrap();
        assert_eq!(content, "{\"a\":1}\n{\"b\":2}\n");
    }

    #[test]
    fn oversized_file_is_rotated_and_backups_are_capped() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RotatingWriter::with_limits(dir.path().join("trace.jsonl"), 8, 2);

        for i in 0..6 {
            writer.write_line(&format!("line number {i}")).unwrap();
        }

        assert_eq!(backups(dir.path()), 2);
        let live = fs::read_to_string(writer.path()).unwrap();
        assert_eq!(live, "line number 5\n");
    }
}
