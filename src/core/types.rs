//! src/core/types.rs
//!
//! Core type definitions for keybinding management
//!
//! This module defines the fundamental types used throughout the application:
//! - `KeyScheme`: Which key-code numbering a config uses (GLFW or virtual-key)
//! - `FeatureKeybind`: A feature's key code and hold/toggle mode
//! - `ModificationRecord`: One key-code change applied to a config
//!
//! Feature names compare case-insensitively everywhere, so equality and
//! hashing of `FeatureKeybind` only look at the lowercased name.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Suffix of the config key holding a feature's key code.
pub const KEY_SUFFIX: &str = "_Key";

/// Suffix of the config key holding a feature's hold mode.
pub const HOLD_SUFFIX: &str = "_Key_hold";

/// Key code meaning "not bound to anything".
pub const UNBOUND_CODE: i32 = -1;

/// Key-code numbering scheme
///
/// The two schemes are not numerically comparable: code 65 is `A` in both,
/// but 256 is `ESCAPE` under GLFW and means nothing as a virtual-key.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum KeyScheme {
    /// Modern windowing-library key codes (GLFW numbering)
    #[default]
    Glfw,
    /// Legacy Windows virtual-key codes
    VirtualKey,
}

impl fmt::Display for KeyScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyScheme::Glfw => write!(f, "glfw"),
            KeyScheme::VirtualKey => write!(f, "vk"),
        }
    }
}

/// Binding of a single feature, derived from its `_Key`/`_Key_hold` pair
///
/// Serialises to the exchange format:
/// `{ "FeatureName": "Jump", "KeyCode": 32, "IsHold": false }`
///
/// # Example
/// ```
/// use cfg_keybind_manager::core::FeatureKeybind;
///
/// let jump = FeatureKeybind::new("Jump", 32, false);
/// assert!(jump.is_active());
/// assert_eq!(jump, FeatureKeybind::new("JUMP", 7, true));
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FeatureKeybind {
    /// Feature name with the suffix stripped, original casing kept
    pub feature_name: String,

    /// Key code, `-1` when unbound, `<= -2` for pointer buttons
    pub key_code: i32,

    /// `true` = effect while held, `false` = toggles on press
    #[serde(default)]
    pub is_hold: bool,
}

impl FeatureKeybind {
    pub fn new(feature_name: &str, key_code: i32, is_hold: bool) -> Self {
        Self {
            feature_name: feature_name.to_string(),
            key_code,
            is_hold,
        }
    }

    /// A binding is active unless its code is the unbound sentinel.
    pub fn is_active(&self) -> bool {
        self.key_code != UNBOUND_CODE
    }

    /// Lowercased name used for case-insensitive lookups.
    pub fn name_key(&self) -> String {
        self.feature_name.to_lowercase()
    }

    /// Config key holding this feature's key code (`<name>_Key`).
    pub fn key_entry(&self) -> String {
        format!("{}{}", self.feature_name, KEY_SUFFIX)
    }

    /// Config key holding this feature's hold mode (`<name>_Key_hold`).
    pub fn hold_entry(&self) -> String {
        format!("{}{}", self.feature_name, HOLD_SUFFIX)
    }
}

impl PartialEq for FeatureKeybind {
    fn eq(&self, other: &Self) -> bool {
        self.name_key() == other.name_key()
    }
}

impl Eq for FeatureKeybind {}

impl Hash for FeatureKeybind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name_key().hash(state);
    }
}

impl fmt::Display for FeatureKeybind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.is_hold { "hold" } else { "toggle" };
        write!(f, "{} = {} ({})", self.feature_name, self.key_code, mode)
    }
}

/// A single key-code change made by a merge
///
/// Records are immutable once appended to a `ModificationHistory`.
#[derive(Clone, Debug, PartialEq)]
pub struct ModificationRecord {
    pub feature_name: String,
    /// Previous code, `-1` if the old value was not an integer
    pub old_key_code: i32,
    pub new_key_code: i32,
    pub timestamp: DateTime<Local>,
}

impl ModificationRecord {
    pub fn new(feature_name: &str, old_key_code: i32, new_key_code: i32) -> Self {
        Self {
            feature_name: feature_name.to_string(),
            old_key_code,
            new_key_code,
            timestamp: Local::now(),
        }
    }

    /// True when the merge wrote the same code that was already there.
    pub fn is_unchanged(&self) -> bool {
        self.old_key_code == self.new_key_code
    }
}

impl fmt::Display for ModificationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {}",
            self.feature_name, self.old_key_code, self.new_key_code
        )
    }
}
