//! Keybinding extraction from a config store
//!
//! A feature `F` is spread over two config keys:
//! - `F_Key` → integer key code
//! - `F_Key_hold` → `true`/`false` hold mode
//!
//! Suffixes match case-insensitively. Values that don't parse are ignored,
//! and a feature seen through only one of its keys gets the other field at
//! its type default (`key_code = 0`, `is_hold = false`).
//!
//! Extraction never mutates the store, and output order follows the store's
//! first-seen order so repeated calls give identical results.

use std::collections::HashMap;
use tracing::debug;

use crate::core::store::ConfigStore;
use crate::core::types::{FeatureKeybind, HOLD_SUFFIX, KEY_SUFFIX};

/// Which half of a feature a config key describes
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KeyRole {
    /// `<name>_Key`
    Code,
    /// `<name>_Key_hold`
    Hold,
}

/// Splits a config key into feature name and role
///
/// Returns `None` for keys that follow neither suffix, or for a bare suffix
/// with no feature name in front of it.
///
/// # Example
/// ```
/// use cfg_keybind_manager::core::extractor::{classify_key, KeyRole};
///
/// assert_eq!(classify_key("Jump_Key"), Some(("Jump", KeyRole::Code)));
/// assert_eq!(classify_key("jump_key_HOLD"), Some(("jump", KeyRole::Hold)));
/// assert_eq!(classify_key("Volume"), None);
/// ```
pub fn classify_key(key: &str) -> Option<(&str, KeyRole)> {
    // Longer suffix first
    let (name, role) = if let Some(name) = strip_suffix_ignore_case(key, HOLD_SUFFIX) {
        (name, KeyRole::Hold)
    } else {
        (strip_suffix_ignore_case(key, KEY_SUFFIX)?, KeyRole::Code)
    };

    if name.is_empty() {
        return None;
    }

    Some((name, role))
}

/// Parses a boolean the way config writers produce it (any casing).
pub fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Extracts every feature binding from `store`
///
/// # Example
/// ```
/// use cfg_keybind_manager::core::{extract_keybinds, ConfigStore};
///
/// let store = ConfigStore::load("Jump_Key:32\nJump_Key_hold:false\nRun_Key:-1\n");
/// let binds = extract_keybinds(&store);
///
/// assert_eq!(binds.len(), 2);
/// assert_eq!(binds[0].key_code, 32);
/// assert!(!binds[1].is_active());
/// ```
pub fn extract_keybinds(store: &ConfigStore) -> Vec<FeatureKeybind> {
    let mut keybinds: Vec<FeatureKeybind> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (key, value) in store.iter() {
        let Some((name, role)) = classify_key(key) else {
            continue;
        };

        match role {
            KeyRole::Code => {
                let Ok(code) = value.parse::<i32>() else {
                    debug!(key, value, "key code is not an integer, skipping");
                    continue;
                };
                entry(&mut keybinds, &mut positions, name).key_code = code;
            }
            KeyRole::Hold => {
                let Some(hold) = parse_bool(value) else {
                    debug!(key, value, "hold flag is not a boolean, skipping");
                    continue;
                };
                entry(&mut keybinds, &mut positions, name).is_hold = hold;
            }
        }
    }

    keybinds
}

/// Extracts only bindings whose code is not the unbound sentinel.
pub fn extract_active(store: &ConfigStore) -> Vec<FeatureKeybind> {
    extract_keybinds(store)
        .into_iter()
        .filter(FeatureKeybind::is_active)
        .collect()
}

fn entry<'a>(
    keybinds: &'a mut Vec<FeatureKeybind>,
    positions: &mut HashMap<String, usize>,
    name: &str,
) -> &'a mut FeatureKeybind {
    let index = *positions.entry(name.to_lowercase()).or_insert_with(|| {
        keybinds.push(FeatureKeybind::new(name, 0, false));
        keybinds.len() - 1
    });

    &mut keybinds[index]
}

fn strip_suffix_ignore_case<'a>(key: &'a str, suffix: &str) -> Option<&'a str> {
    let split = key.len().checked_sub(suffix.len())?;
    let tail = key.get(split..)?;

    if tail.eq_ignore_ascii_case(suffix) {
        key.get(..split)
    } else {
        None
    }
}
