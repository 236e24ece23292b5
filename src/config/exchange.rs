//! JSON exchange files for keybindings
//!
//! Bindings leave and re-enter the tool as a JSON array:
//!
//! ```json
//! [
//!   {
//!     "FeatureName": "Jump",
//!     "KeyCode": 32,
//!     "IsHold": false
//!   }
//! ]
//! ```
//!
//! Output is pretty-printed with non-ASCII feature names written literally.
//! Import is all-or-nothing: malformed JSON, a top-level value that isn't an
//! array, or any record missing `FeatureName`/`KeyCode` rejects the whole
//! file. A missing `IsHold` reads as `false`.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::config::transaction::write_atomically;
use crate::config::ConfigError;
use crate::core::FeatureKeybind;

#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Exchange file does not exist.
    #[error("Exchange file not found: {0}")]
    NotFound(PathBuf),

    /// Content is not valid JSON, or a record has the wrong shape.
    #[error("Malformed keybind JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Valid JSON, but not an array of records.
    #[error("Expected a JSON array of keybindings, found {0}")]
    NotAnArray(&'static str),

    /// Writing the exchange file failed.
    #[error("Failed to write exchange file: {0}")]
    WriteFailed(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialises bindings as an indented JSON array.
pub fn to_json(bindings: &[FeatureKeybind]) -> Result<String, ExchangeError> {
    let mut json = serde_json::to_string_pretty(bindings)?;
    json.push('\n');
    Ok(json)
}

/// Parses an exchange document
///
/// # Example
/// ```
/// use cfg_keybind_manager::config::exchange::{from_json, ExchangeError};
///
/// let binds = from_json(r#"[{"FeatureName":"Jump","KeyCode":32,"IsHold":true}]"#)?;
/// assert_eq!(binds[0].key_code, 32);
///
/// assert!(matches!(from_json(r#"{"FeatureName":"Jump"}"#), Err(ExchangeError::NotAnArray("object"))));
/// # Ok::<(), ExchangeError>(())
/// ```
pub fn from_json(content: &str) -> Result<Vec<FeatureKeybind>, ExchangeError> {
    let value: Value = serde_json::from_str(content)?;

    if !value.is_array() {
        return Err(ExchangeError::NotAnArray(json_type(&value)));
    }

    Ok(serde_json::from_value(value)?)
}

/// Writes bindings to `path` atomically.
pub fn write_exchange_file(path: &Path, bindings: &[FeatureKeybind]) -> Result<(), ExchangeError> {
    let json = to_json(bindings)?;
    write_atomically(path, &json)?;

    info!(path = %path.display(), count = bindings.len(), "exported keybindings");
    Ok(())
}

/// Reads and parses an exchange file.
pub fn read_exchange_file(path: &Path) -> Result<Vec<FeatureKeybind>, ExchangeError> {
    if !path.is_file() {
        return Err(ExchangeError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    // Editors on some platforms prepend a BOM
    let bindings = from_json(content.trim_start_matches('\u{feff}'))?;

    info!(path = %path.display(), count = bindings.len(), "imported keybindings");
    Ok(bindings)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export_format() {
        let json = to_json(&[FeatureKeybind::new("Jump", 32, false)]).unwrap();

        assert!(json.starts_with("[\n  {\n"));
        assert!(json.contains("\"FeatureName\": \"Jump\""));
        assert!(json.contains("\"KeyCode\": 32"));
        assert!(json.contains("\"IsHold\": false"));
    }

    #[test]
    fn test_non_ascii_written_literally() {
        let json = to_json(&[FeatureKeybind::new("Sprünge", 74, true)]).unwrap();
        assert!(json.contains("Sprünge"));
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn test_import_rejects_malformed_json() {
        assert!(matches!(from_json("[{\"FeatureName\": "), Err(ExchangeError::Malformed(_))));
    }

    #[test]
    fn test_import_rejects_non_array() {
        assert!(matches!(from_json("42"), Err(ExchangeError::NotAnArray("number"))));
        assert!(matches!(from_json("null"), Err(ExchangeError::NotAnArray("null"))));
    }

    #[test]
    fn test_import_rejects_whole_file_on_bad_record() {
        let json = r#"[
            {"FeatureName": "Jump", "KeyCode": 32, "IsHold": false},
            {"FeatureName": "Run", "KeyCode": "fast"}
        ]"#;
        assert!(matches!(from_json(json), Err(ExchangeError::Malformed(_))));
    }

    #[test]
    fn test_missing_is_hold_defaults_to_false() {
        let binds = from_json(r#"[{"FeatureName": "Run", "KeyCode": 82}]"#).unwrap();
        assert!(!binds[0].is_hold);
    }

    #[test]
    fn test_missing_key_code_is_rejected() {
        assert!(from_json(r#"[{"FeatureName": "Run"}]"#).is_err());
    }

    #[test]
    fn test_empty_array_is_fine() {
        assert!(from_json("[]").unwrap().is_empty());
    }

    #[test]
    fn test_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("binds.json");
        let binds = vec![
            FeatureKeybind::new("Jump", 32, false),
            FeatureKeybind::new("Aim", -3, true),
        ];

        write_exchange_file(&path, &binds).unwrap();
        let read = read_exchange_file(&path).unwrap();

        let fields: Vec<_> = read
            .iter()
            .map(|kb| (kb.feature_name.as_str(), kb.key_code, kb.is_hold))
            .collect();
        assert_eq!(fields, vec![("Jump", 32, false), ("Aim", -3, true)]);
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.json");

        match read_exchange_file(&path) {
            Err(ExchangeError::NotFound(p)) => assert_eq!(p, path),
            other => panic!("Expected NotFound error, got: {:?}", other),
        }
    }
}
