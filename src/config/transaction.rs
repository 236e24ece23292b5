// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Configuration transaction management with automatic backups
//!
//! Provides atomic write operations: the config on disk is either the old
//! content or the new content, never a mix.

use atomic_write_file::AtomicWriteFile;
use std::{fs, io::Write, path::Path, path::PathBuf};
use tracing::info;

use crate::config::{ConfigError, ConfigManager};
use crate::core::ConfigStore;

/// Atomic configuration transaction with automatic backup.
///
/// # Lifecycle
///
/// 1. `begin()` - Creates timestamped backup immediately
/// 2. Caller prepares new content (in memory, usually a merged `ConfigStore`)
/// 3. `commit()`/`commit_store()` - Writes atomically, or `rollback()` -
///    Restores the backup
///
/// # Example
///
/// ```no_run
/// use cfg_keybind_manager::config::{ConfigManager, ConfigTransaction};
/// use std::path::PathBuf;
///
/// let manager = ConfigManager::new(PathBuf::from("config.cfg"))?;
/// let tx = ConfigTransaction::begin(&manager)?;
///
/// match tx.commit("Jump_Key:32\nJump_Key_hold:false\n") {
///     Ok(()) => println!("Changes applied successfully"),
///     Err(e) => eprintln!("Commit failed: {}", e),
/// }
/// # Ok::<(), cfg_keybind_manager::config::ConfigError>(())
/// ```
pub struct ConfigTransaction<'a> {
    manager: &'a ConfigManager,
    backup_path: PathBuf,
}

impl<'a> ConfigTransaction<'a> {
    /// Begins a new transaction by creating a timestamped backup.
    ///
    /// The backup is created before anything else happens, so a rollback
    /// point exists before any modification is attempted.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be read or the backup file
    /// cannot be written. No changes are made in that case.
    pub fn begin(manager: &'a ConfigManager) -> Result<Self, ConfigError> {
        let backup_path = manager.create_timestamped_backup()?;

        Ok(Self {
            manager,
            backup_path,
        })
    }

    /// Path of the backup created by `begin()`.
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// Serialises `store` and commits it.
    pub fn commit_store(self, store: &ConfigStore) -> Result<(), ConfigError> {
        self.commit(&store.serialize())
    }

    /// Commits the transaction by atomically writing new content to the config file.
    ///
    /// The write is atomic at the filesystem level (temp file + rename).
    /// This method consumes the transaction, preventing accidental
    /// double-commits. If it fails, the original config is unchanged and the
    /// backup from `begin()` is still available.
    pub fn commit(self, new_content: &str) -> Result<(), ConfigError> {
        write_atomically(&self.manager.config_path, new_content)?;

        info!(path = %self.manager.config_path.display(), "config committed");
        Ok(())
    }

    /// Rolls back to the backup created during `begin()`.
    ///
    /// Atomically restores the configuration file to its state when the
    /// transaction began. Borrows `self`, so it can be retried.
    pub fn rollback(&self) -> Result<(), ConfigError> {
        let backup_content = fs::read_to_string(&self.backup_path).map_err(|e| {
            ConfigError::BackupFailed(format!(
                "Cannot read backup {}: {}",
                self.backup_path.display(),
                e
            ))
        })?;

        write_atomically(&self.manager.config_path, &backup_content)?;

        info!(backup = %self.backup_path.display(), "config rolled back");
        Ok(())
    }
}

/// Writes `content` to `path` via temp file + rename.
pub(crate) fn write_atomically(path: &Path, content: &str) -> Result<(), ConfigError> {
    let mut file = AtomicWriteFile::options()
        .open(path)
        .map_err(|e| ConfigError::WriteFailed(format!("Failed to open for atomic write: {}", e)))?;

    file.write_all(content.as_bytes())
        .map_err(|e| ConfigError::WriteFailed(format!("Failed to write content: {}", e)))?;

    file.commit()
        .map_err(|e| ConfigError::WriteFailed(format!("Failed to commit atomic write: {}", e)))?;

    Ok(())
}
