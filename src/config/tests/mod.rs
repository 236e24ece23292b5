//! Config module tests
//!
//! - ConfigManager file handling and backups
//! - ConfigTransaction commit and rollback

#[cfg(test)]
mod config_manager_tests;
