use super::super::*;
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

/// Helper: Creates a temporary config file for testing.
fn create_test_config() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.cfg");
    fs::write(
        &config_path,
        "Jump_Key:32\nJump_Key_hold:false\nFov:90\n",
    )
    .unwrap();
    (temp_dir, config_path)
}

#[test]
fn test_new_with_valid_config() {
    let (_temp_dir, config_path) = create_test_config();

    let manager = ConfigManager::new(config_path.clone());
    assert!(manager.is_ok(), "Should create manager with valid config");

    let manager = manager.unwrap();
    assert_eq!(manager.config_path(), config_path);

    // Backup directory should be created
    let backup_dir = config_path.parent().unwrap().join("backups");
    assert!(backup_dir.is_dir(), "Backup directory should be created");
    assert_eq!(manager.backup_dir(), backup_dir);
}

#[test]
fn test_new_with_missing_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent.cfg");

    match ConfigManager::new(config_path.clone()) {
        Err(ConfigError::NotFound(path)) => assert_eq!(path, config_path),
        other => panic!("Expected NotFound error, got: {:?}", other),
    }
}

#[test]
fn test_new_with_directory_path() {
    let temp_dir = TempDir::new().unwrap();

    let result = ConfigManager::new(temp_dir.path().to_path_buf());
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
fn test_read_config() {
    let (_temp_dir, config_path) = create_test_config();
    let manager = ConfigManager::new(config_path).unwrap();

    let content = manager.read_config().unwrap();
    assert!(content.contains("Jump_Key:32"), "Should contain keybinding");
    assert!(content.contains("Fov:90"), "Should contain other settings");
}

#[test]
fn test_load_store() {
    let (_temp_dir, config_path) = create_test_config();
    let manager = ConfigManager::new(config_path).unwrap();

    let store = manager.load_store().unwrap();
    assert_eq!(store.len(), 3);
    assert_eq!(store.get("Jump_Key"), Some("32"));
    assert_eq!(store.get("Fov"), Some("90"));
}

#[test]
fn test_load_store_strips_bom() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.cfg");
    fs::write(&config_path, b"\xEF\xBB\xBFJump_Key:32\n").unwrap();

    let manager = ConfigManager::new(config_path).unwrap();
    let store = manager.load_store().unwrap();

    assert_eq!(store.get("Jump_Key"), Some("32"));
}

#[test]
fn test_load_store_rejects_invalid_utf8() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.cfg");
    fs::write(&config_path, b"Jump_Key:32\nName:\xFF\xFE\n").unwrap();

    let manager = ConfigManager::new(config_path).unwrap();
    let result = manager.load_store();

    assert!(
        matches!(result, Err(ConfigError::Parse(ParseError::InvalidUtf8 { .. }))),
        "Expected Parse error, got: {:?}",
        result
    );
}

#[test]
fn test_backup_dir_reused() {
    let (_temp_dir, config_path) = create_test_config();
    let backup_dir = config_path.parent().unwrap().join("backups");
    fs::create_dir(&backup_dir).unwrap();
    fs::write(backup_dir.join("keep.txt"), "x").unwrap();

    ConfigManager::new(config_path).unwrap();

    assert!(backup_dir.join("keep.txt").exists(), "Existing backups dir must be left alone");
}

#[test]
fn test_create_timestamped_backup() {
    let (_temp_dir, config_path) = create_test_config();
    let manager = ConfigManager::new(config_path.clone()).unwrap();

    let backup_path = manager.create_timestamped_backup().unwrap();

    assert!(backup_path.exists(), "Backup file should exist");
    assert_eq!(backup_path.parent().unwrap(), manager.backup_dir());

    // config.cfg.YYYY-MM-DD_HHMMSS
    let filename = backup_path.file_name().unwrap().to_str().unwrap();
    let timestamp = filename.strip_prefix("config.cfg.").unwrap();
    assert_eq!(timestamp.len(), 17, "Unexpected timestamp: {}", timestamp);
    assert_eq!(&timestamp[10..11], "_");

    let original = fs::read_to_string(&config_path).unwrap();
    let backup = fs::read_to_string(&backup_path).unwrap();
    assert_eq!(original, backup, "Backup should match original exactly");
}

#[test]
fn test_list_backups_sorted_newest_first() {
    let (_temp_dir, config_path) = create_test_config();
    let manager = ConfigManager::new(config_path).unwrap();

    let first = manager.create_timestamped_backup().unwrap();
    thread::sleep(Duration::from_secs(1));
    let second = manager.create_timestamped_backup().unwrap();

    let backups = manager.list_backups().unwrap();
    assert_eq!(backups, vec![second, first]);
}

#[test]
fn test_list_backups_empty_directory() {
    let (_temp_dir, config_path) = create_test_config();
    let manager = ConfigManager::new(config_path).unwrap();

    assert!(manager.list_backups().unwrap().is_empty());
}

#[test]
fn test_list_backups_ignores_other_files() {
    let (_temp_dir, config_path) = create_test_config();
    let manager = ConfigManager::new(config_path).unwrap();

    fs::write(manager.backup_dir().join("random.txt"), "junk").unwrap();
    fs::write(manager.backup_dir().join("other.cfg.2025-01-01_000000"), "junk").unwrap();
    manager.create_timestamped_backup().unwrap();

    let backups = manager.list_backups().unwrap();
    assert_eq!(backups.len(), 1, "Only this config's backups are listed");
}
