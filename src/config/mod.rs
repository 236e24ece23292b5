//! Configuration file management with atomic writes and backup support.
//!
//! This module provides safe, transactional operations for the mod's flat
//! `key:value` config files. Key features:
//!
//! - **Atomic writes**: Uses temp-file-then-rename to prevent corruption
//! - **Automatic backups**: Every write creates a timestamped backup
//! - **Rollback safety**: Failed transactions leave original config untouched
//! - **Exchange files**: JSON export/import of keybindings (see `exchange`)
//!
//! # Example
//!
//! ```no_run
//! use cfg_keybind_manager::config::{ConfigManager, ConfigTransaction};
//! use cfg_keybind_manager::core::{merge_keybinds, FeatureKeybind, ModificationHistory};
//!
//! let manager = ConfigManager::new("/home/user/mod/config.cfg".into())?;
//! let mut store = manager.load_store()?;
//!
//! let mut history = ModificationHistory::new();
//! merge_keybinds(&mut store, &[FeatureKeybind::new("Jump", 32, false)], &mut history);
//!
//! // Backup first, then atomic write
//! ConfigTransaction::begin(&manager)?.commit_store(&store)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod exchange;
pub mod transaction;

pub use exchange::{read_exchange_file, write_exchange_file, ExchangeError};
pub use transaction::ConfigTransaction;

use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::core::{ConfigStore, ParseError};

/// Errors that can occur during configuration management.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Backup directory cannot be created or written to.
    #[error("Backup directory not writable: {0}")]
    BackupDirNotWritable(PathBuf),

    /// Failed to create or restore a backup file.
    #[error("Failed to create backup: {0}")]
    BackupFailed(String),

    /// Atomic write operation failed.
    #[error("Atomic write failed: {0}")]
    WriteFailed(String),

    /// Config content could not be parsed.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] ParseError),

    /// Generic I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Manages one config file with safe atomic operations.
///
/// The ConfigManager provides read-only access and transactional writes
/// with automatic backup creation. All writes go through the transaction
/// API to ensure atomicity and recoverability.
#[derive(Debug)]
pub struct ConfigManager {
    /// Path to the config file.
    config_path: PathBuf,
    /// `backups/` directory next to the config.
    backup_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a new ConfigManager for the given config file.
    ///
    /// This validates that the config file exists and creates the backup
    /// directory if it doesn't exist. A symlinked config is allowed but
    /// logged as a warning.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the config file doesn't exist.
    /// Returns `ConfigError::BackupDirNotWritable` if the backup directory
    /// cannot be created.
    pub fn new(config_path: PathBuf) -> Result<Self, ConfigError> {
        if !config_path.is_file() {
            return Err(ConfigError::NotFound(config_path));
        }

        if config_path.read_link().is_ok() {
            warn!(path = %config_path.display(), "config file is a symlink");
        }

        // e.g., ~/mod/config.cfg → ~/mod/backups/
        let backup_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::BackupDirNotWritable(config_path.clone()))?
            .join("backups");

        if !backup_dir.exists() {
            fs::create_dir_all(&backup_dir)
                .map_err(|_| ConfigError::BackupDirNotWritable(backup_dir.clone()))?;
        }

        if backup_dir.metadata()?.permissions().readonly() {
            return Err(ConfigError::BackupDirNotWritable(backup_dir));
        }

        Ok(Self {
            config_path,
            backup_dir,
        })
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Reads the current configuration file content.
    ///
    /// This is a read-only operation that does not require a transaction.
    pub fn read_config(&self) -> Result<String, ConfigError> {
        Ok(fs::read_to_string(&self.config_path)?)
    }

    /// Reads and parses the config into an in-memory store.
    ///
    /// Changes made to the returned store only reach disk through
    /// `ConfigTransaction::commit_store`.
    pub fn load_store(&self) -> Result<ConfigStore, ConfigError> {
        let bytes = fs::read(&self.config_path)?;
        Ok(ConfigStore::from_bytes(&bytes)?)
    }

    /// Lists this config's backups, newest first.
    pub fn list_backups(&self) -> Result<Vec<PathBuf>, ConfigError> {
        let prefix = format!("{}.", self.file_name()?);

        let mut backups: Vec<PathBuf> = fs::read_dir(&self.backup_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(&prefix))
            })
            .collect();

        // Timestamp suffix sorts lexicographically
        backups.sort();
        backups.reverse();
        Ok(backups)
    }

    pub(crate) fn create_timestamped_backup(&self) -> Result<PathBuf, ConfigError> {
        let content = fs::read(&self.config_path)?;

        // YYYY-MM-DD_HHMMSS
        let timestamp = Local::now().format("%Y-%m-%d_%H%M%S");

        let backup_filename = format!("{}.{}", self.file_name()?, timestamp);
        let backup_path = self.backup_dir.join(&backup_filename);

        fs::write(&backup_path, &content)
            .map_err(|e| ConfigError::BackupFailed(format!("{}: {}", backup_path.display(), e)))?;

        info!(backup = %backup_path.display(), "created config backup");
        Ok(backup_path)
    }

    fn file_name(&self) -> Result<&str, ConfigError> {
        self.config_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ConfigError::BackupFailed(format!(
                    "Config path has no UTF-8 file name: {}",
                    self.config_path.display()
                ))
            })
    }
}

#[cfg(test)]
mod tests;
