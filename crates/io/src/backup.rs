// Backup lifecycle for the library directory

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};

const BACKUP_PREFIX: &str = "library_backup_";

/// The on-disk layout around one library file:
/// `<base>/library.json`, `<base>/backups/`, `<base>/exports/`.
#[derive(Debug, Clone)]
pub struct LibraryDir {
    base: PathBuf,
}

/// One rotated backup, newest first in listings.
#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub filename: String,
    pub modified: String,
    pub size: u64,
}

impl LibraryDir {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    /// Explicit override, else the platform data directory, else the
    /// working directory.
    pub fn resolve(override_dir: Option<PathBuf>) -> Self {
        let base = override_dir
            .or_else(|| dirs::data_dir().map(|d| d.join("canon")))
            .unwrap_or_else(|| PathBuf::from("canon"));
        Self { base }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn library_file(&self) -> PathBuf {
        self.base.join("library.json")
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.base.join("backups")
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.base.join("exports")
    }

    pub fn ensure_dirs(&self) -> Result<(), String> {
        fs::create_dir_all(&self.base).map_err(|e| e.to_string())?;
        fs::create_dir_all(self.backups_dir()).map_err(|e| e.to_string())?;
        fs::create_dir_all(self.exports_dir()).map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Copy the live library file to a timestamped backup and rotate,
    /// keeping the newest `max_backups`. Returns the backup filename.
    pub fn create_backup(&self, max_backups: usize) -> Result<String, String> {
        self.ensure_dirs()?;
        let source = self.library_file();
        if !source.is_file() {
            return Err("no library file to back up".into());
        }
        let filename = format!(
            "{BACKUP_PREFIX}{}.json",
            Utc::now().format("%Y%m%d_%H%M%S")
        );
        fs::copy(&source, self.backups_dir().join(&filename)).map_err(|e| e.to_string())?;
        self.rotate(max_backups)?;
        Ok(filename)
    }

    /// Backups newest first. Filenames embed a sortable timestamp, so
    /// lexicographic order is chronological.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, String> {
        let dir = self.backups_dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names: Vec<String> = fs::read_dir(&dir)
            .map_err(|e| e.to_string())?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with(BACKUP_PREFIX) && name.ends_with(".json"))
            .collect();
        names.sort();
        names.reverse();

        let mut backups = Vec::with_capacity(names.len());
        for filename in names {
            let meta = fs::metadata(dir.join(&filename)).map_err(|e| e.to_string())?;
            let modified = meta
                .modified()
                .map(|t| DateTime::<Local>::from(t).format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default();
            backups.push(BackupInfo {
                filename,
                modified,
                size: meta.len(),
            });
        }
        Ok(backups)
    }

    pub fn restore_backup(&self, filename: &str) -> Result<(), String> {
        let path = self.backup_path(filename)?;
        if !path.is_file() {
            return Err(format!("backup '{filename}' not found"));
        }
        fs::copy(&path, self.library_file()).map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn delete_backup(&self, filename: &str) -> Result<(), String> {
        let path = self.backup_path(filename)?;
        if !path.is_file() {
            return Err(format!("backup '{filename}' not found"));
        }
        fs::remove_file(&path).map_err(|e| e.to_string())
    }

    /// Replace the live library file byte-for-byte from an external
    /// snapshot. Trusted: no per-record validation here.
    pub fn restore_from(&self, source: &Path) -> Result<(), String> {
        self.ensure_dirs()?;
        fs::copy(source, self.library_file()).map_err(|e| e.to_string())?;
        Ok(())
    }

    fn rotate(&self, max_backups: usize) -> Result<(), String> {
        let backups = self.list_backups()?;
        for old in backups.iter().skip(max_backups) {
            fs::remove_file(self.backups_dir().join(&old.filename)).map_err(|e| e.to_string())?;
        }
        Ok(())
    }

    /// Backup filenames are bare: anything with path components is
    /// rejected before touching the filesystem.
    fn backup_path(&self, filename: &str) -> Result<PathBuf, String> {
        let bare = Path::new(filename)
            .file_name()
            .map(|n| n == filename)
            .unwrap_or(false);
        if !bare {
            return Err(format!("invalid backup filename '{filename}'"));
        }
        Ok(self.backups_dir().join(filename))
    }
}
