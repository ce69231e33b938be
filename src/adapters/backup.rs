// SPDX-License-Identifier: MIT OR Apache-2.0

//! Timestamped backup snapshots for the settings file.
//!
//! This module provides the `BackupManager` type, which copies the live
//! settings file into a sibling backup directory and restores it from there.
//! Snapshots are plain byte-for-byte copies named after their creation time,
//! so they stay readable with any text editor and survive format changes.

use crate::domain::{Result, StoreError};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the backup directory created next to the settings file.
pub const BACKUP_DIR_NAME: &str = "appBackup";

/// Prefix of every snapshot file name.
const FILE_PREFIX: &str = "backup-";

/// Timestamp layout used in snapshot file names: month, day, year, then time.
const TIMESTAMP_FORMAT: &str = "%m-%d-%Y-%H-%M-%S";

/// Creates, lists, and restores snapshots of a settings file.
///
/// Snapshots live in an `appBackup` directory next to the live file and are
/// named `backup-MM-DD-YYYY-HH-MM-SS.<ext>`, where the extension is taken from
/// the live file. Two snapshots within the same second share a name, and the
/// later one overwrites the earlier.
///
/// # Examples
///
/// ```rust,no_run
/// use appsave::adapters::BackupManager;
///
/// let manager = BackupManager::new("/home/ana/appConfig.json", "json");
/// let snapshot = manager.backup().unwrap();
/// println!("snapshot written to {}", snapshot.display());
///
/// for timestamp in manager.list().unwrap() {
///     println!("available: {}", timestamp);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BackupManager {
    /// The live settings file snapshots are taken of.
    live_path: PathBuf,
    /// Directory snapshots are written into.
    backup_dir: PathBuf,
    /// File extension used for snapshot names, without the dot.
    extension: String,
}

impl BackupManager {
    /// Creates a manager for the given live file.
    ///
    /// The backup directory defaults to an `appBackup` directory next to the
    /// live file. Snapshot names reuse the live file's extension, falling back
    /// to `fallback_extension` when the live file has none.
    pub fn new(live_path: impl Into<PathBuf>, fallback_extension: &str) -> Self {
        let live_path = live_path.into();
        let backup_dir = live_path
            .parent()
            .map(|parent| parent.join(BACKUP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(BACKUP_DIR_NAME));
        let extension = live_path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or(fallback_extension)
            .to_string();
        BackupManager {
            live_path,
            backup_dir,
            extension,
        }
    }

    /// Replaces the default backup directory.
    pub fn with_backup_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backup_dir = dir.into();
        self
    }

    /// Returns the directory snapshots are written into.
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Copies the live file into a snapshot named after the current local time.
    ///
    /// The backup directory is created if it does not exist yet. Returns the
    /// path of the snapshot that was written.
    pub fn backup(&self) -> Result<PathBuf> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        self.backup_as(&timestamp)
    }

    /// Copies the live file into a snapshot for the given timestamp.
    fn backup_as(&self, timestamp: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.backup_dir)?;
        let snapshot = self.snapshot_path(timestamp);
        fs::copy(&self.live_path, &snapshot)?;
        tracing::info!(snapshot = %snapshot.display(), "backup created");
        Ok(snapshot)
    }

    /// Copies the snapshot for `timestamp` back over the live file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::BackupNotFound`] when no snapshot exists for the
    /// timestamp.
    pub fn restore(&self, timestamp: &str) -> Result<()> {
        let snapshot = self.snapshot_path(timestamp);
        if !snapshot.is_file() {
            return Err(StoreError::BackupNotFound {
                timestamp: timestamp.to_string(),
            });
        }
        fs::copy(&snapshot, &self.live_path)?;
        tracing::info!(snapshot = %snapshot.display(), "backup restored");
        Ok(())
    }

    /// Lists the timestamps of every snapshot, sorted lexicographically.
    ///
    /// Files that do not follow the snapshot naming pattern are ignored. A
    /// missing backup directory yields an empty list rather than an error.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.backup_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let suffix = format!(".{}", self.extension);
        let mut timestamps = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Some(timestamp) = name
                .strip_prefix(FILE_PREFIX)
                .and_then(|rest| rest.strip_suffix(&suffix))
            {
                timestamps.push(timestamp.to_string());
            }
        }
        timestamps.sort();
        Ok(timestamps)
    }

    /// Returns the path a snapshot for `timestamp` lives at.
    fn snapshot_path(&self, timestamp: &str) -> PathBuf {
        self.backup_dir
            .join(format!("{}{}.{}", FILE_PREFIX, timestamp, self.extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn live_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_backup_copies_live_file() {
        let dir = TempDir::new().unwrap();
        let live = live_file(&dir, "settings.json", r#"{"name":"Rhyan"}"#);
        let manager = BackupManager::new(&live, "json");

        let snapshot = manager.backup().unwrap();
        assert!(snapshot.starts_with(dir.path().join(BACKUP_DIR_NAME)));
        assert_eq!(fs::read_to_string(snapshot).unwrap(), r#"{"name":"Rhyan"}"#);
    }

    #[test]
    fn test_snapshot_name_pattern() {
        let dir = TempDir::new().unwrap();
        let live = live_file(&dir, "settings.json", "{}");
        let snapshot = BackupManager::new(&live, "json").backup().unwrap();

        let name = snapshot.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("backup-"));
        assert!(name.ends_with(".json"));
        // backup-MM-DD-YYYY-HH-MM-SS.json
        let timestamp = &name["backup-".len()..name.len() - ".json".len()];
        let pieces: Vec<&str> = timestamp.split('-').collect();
        assert_eq!(pieces.len(), 6);
        assert_eq!(pieces[2].len(), 4);
        assert!(pieces.iter().all(|p| p.chars().all(|c| c.is_ascii_digit())));
    }

    #[test]
    fn test_restore_round_trip() {
        let dir = TempDir::new().unwrap();
        let live = live_file(&dir, "settings.json", "first");
        let manager = BackupManager::new(&live, "json");

        let snapshot = manager.backup().unwrap();
        let timestamp = snapshot
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .trim_start_matches("backup-")
            .trim_end_matches(".json")
            .to_string();

        fs::write(&live, "second").unwrap();
        manager.restore(&timestamp).unwrap();
        assert_eq!(fs::read_to_string(&live).unwrap(), "first");
    }

    #[test]
    fn test_restore_missing_timestamp() {
        let dir = TempDir::new().unwrap();
        let live = live_file(&dir, "settings.json", "{}");
        let manager = BackupManager::new(&live, "json");

        let err = manager.restore("01-15-2025-10-30-00").unwrap_err();
        assert!(matches!(err, StoreError::BackupNotFound { .. }));
        assert!(err.to_string().contains("01-15-2025-10-30-00"));
    }

    #[test]
    fn test_same_second_snapshot_overwrites() {
        let dir = TempDir::new().unwrap();
        let live = live_file(&dir, "settings.json", "one");
        let manager = BackupManager::new(&live, "json");

        manager.backup_as("01-15-2025-10-30-00").unwrap();
        fs::write(&live, "two").unwrap();
        let snapshot = manager.backup_as("01-15-2025-10-30-00").unwrap();

        assert_eq!(fs::read_to_string(snapshot).unwrap(), "two");
        assert_eq!(manager.list().unwrap().len(), 1);
    }

    #[test]
    fn test_list_ignores_foreign_files() {
        let dir = TempDir::new().unwrap();
        let live = live_file(&dir, "settings.json", "{}");
        let manager = BackupManager::new(&live, "json");

        manager.backup_as("01-15-2025-10-30-00").unwrap();
        manager.backup_as("02-20-2025-08-00-00").unwrap();
        fs::write(manager.backup_dir().join("notes.txt"), "hi").unwrap();
        fs::write(manager.backup_dir().join("backup-zzz.yaml"), "{}").unwrap();

        assert_eq!(
            manager.list().unwrap(),
            vec!["01-15-2025-10-30-00", "02-20-2025-08-00-00"]
        );
    }

    #[test]
    fn test_list_without_backup_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let live = live_file(&dir, "settings.json", "{}");
        assert!(BackupManager::new(&live, "json").list().unwrap().is_empty());
    }

    #[test]
    fn test_extension_follows_live_file() {
        let manager = BackupManager::new("/tmp/app/settings.yaml", "json");
        assert_eq!(manager.snapshot_path("t").to_str().unwrap(), "/tmp/app/appBackup/backup-t.yaml");
    }

    #[test]
    fn test_extension_fallback_without_one() {
        let manager = BackupManager::new("/tmp/app/settings", "json");
        assert!(manager.snapshot_path("t").to_str().unwrap().ends_with("backup-t.json"));
    }

    #[test]
    fn test_custom_backup_dir() {
        let dir = TempDir::new().unwrap();
        let live = live_file(&dir, "settings.json", "{}");
        let custom = dir.path().join("elsewhere");
        let manager = BackupManager::new(&live, "json").with_backup_dir(&custom);

        let snapshot = manager.backup().unwrap();
        assert!(snapshot.starts_with(&custom));
        assert_eq!(manager.list().unwrap().len(), 1);
    }
}
