//! Merging edited keybindings back into a config store
//!
//! Merge only overwrites, it never creates: a binding whose feature has no
//! `_Key`/`_Key_hold` entry in the target store is ignored. Each `_Key`
//! overwrite appends a `ModificationRecord`; `_Key_hold` overwrites don't.
//!
//! The store is an in-memory copy, so nothing reaches disk until the caller
//! serialises it and commits a transaction.

use tracing::{debug, info};

use crate::core::history::ModificationHistory;
use crate::core::store::ConfigStore;
use crate::core::types::{FeatureKeybind, ModificationRecord, UNBOUND_CODE};

/// Outcome of a merge
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MergeSummary {
    /// Individual field overwrites (code and hold counted separately)
    pub applied: usize,

    /// Features with neither key present in the store, in input order
    pub not_applied: Vec<String>,
}

impl MergeSummary {
    pub fn is_noop(&self) -> bool {
        self.applied == 0
    }
}

/// Overwrites `store` entries from `bindings`, recording code changes
///
/// An old code that isn't an integer is recorded as `-1`; the merge carries on.
///
/// # Example
/// ```
/// use cfg_keybind_manager::core::{merge_keybinds, ConfigStore, FeatureKeybind, ModificationHistory};
///
/// let mut store = ConfigStore::load("Jump_Key:32\nJump_Key_hold:false\n");
/// let mut history = ModificationHistory::new();
///
/// let summary = merge_keybinds(
///     &mut store,
///     &[FeatureKeybind::new("Jump", 74, true), FeatureKeybind::new("Ghost", 5, false)],
///     &mut history,
/// );
///
/// assert_eq!(summary.applied, 2);
/// assert_eq!(summary.not_applied, vec!["Ghost".to_string()]);
/// assert_eq!(store.get("Jump_Key"), Some("74"));
/// assert_eq!(store.get("Jump_Key_hold"), Some("true"));
/// assert_eq!(history.len(), 1);
/// ```
pub fn merge_keybinds(
    store: &mut ConfigStore,
    bindings: &[FeatureKeybind],
    history: &mut ModificationHistory,
) -> MergeSummary {
    let mut summary = MergeSummary::default();

    for binding in bindings {
        let mut touched = false;

        let key_entry = binding.key_entry();
        if let Some(old) = store.set(&key_entry, &binding.key_code.to_string()) {
            let old_code = old.parse::<i32>().unwrap_or(UNBOUND_CODE);
            history.append(ModificationRecord::new(
                &binding.feature_name,
                old_code,
                binding.key_code,
            ));
            debug!(feature = %binding.feature_name, old_code, new_code = binding.key_code, "key code overwritten");
            summary.applied += 1;
            touched = true;
        }

        let hold_entry = binding.hold_entry();
        if store.set(&hold_entry, &binding.is_hold.to_string()).is_some() {
            summary.applied += 1;
            touched = true;
        }

        if !touched {
            debug!(feature = %binding.feature_name, "feature not in config, ignored");
            summary.not_applied.push(binding.feature_name.clone());
        }
    }

    info!(
        applied = summary.applied,
        not_applied = summary.not_applied.len(),
        "merge finished"
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_feature_leaves_store_untouched() {
        let mut store = ConfigStore::load("Jump_Key:32\nJump_Key_hold:false\n");
        let before = store.clone();
        let mut history = ModificationHistory::new();

        let summary = merge_keybinds(&mut store, &[FeatureKeybind::new("Ghost", 5, false)], &mut history);

        assert_eq!(summary.applied, 0);
        assert!(summary.is_noop());
        assert_eq!(store, before);
        assert!(history.is_empty());
    }

    #[test]
    fn test_unparsable_old_code_recorded_as_unbound() {
        let mut store = ConfigStore::load("Jump_Key:space\n");
        let mut history = ModificationHistory::new();

        let summary = merge_keybinds(&mut store, &[FeatureKeybind::new("Jump", 32, true)], &mut history);

        // No hold key in the store, so only the code counts
        assert_eq!(summary.applied, 1);
        assert_eq!(store.get("Jump_Key"), Some("32"));
        assert_eq!(history.all()[0].old_key_code, -1);
        assert_eq!(history.all()[0].new_key_code, 32);
    }

    #[test]
    fn test_hold_only_feature_is_applied_without_history() {
        let mut store = ConfigStore::load("Crouch_Key_hold:true\n");
        let mut history = ModificationHistory::new();

        let summary = merge_keybinds(&mut store, &[FeatureKeybind::new("crouch", 67, false)], &mut history);

        assert_eq!(summary.applied, 1);
        assert!(summary.not_applied.is_empty());
        assert_eq!(store.get("Crouch_Key_hold"), Some("false"));
        assert!(history.is_empty());
    }

    #[test]
    fn test_history_follows_input_order_with_repeats() {
        let mut store = ConfigStore::load("Jump_Key:32\nRun_Key:-1\n");
        let mut history = ModificationHistory::new();

        merge_keybinds(
            &mut store,
            &[
                FeatureKeybind::new("Run", 82, false),
                FeatureKeybind::new("Jump", 74, false),
                FeatureKeybind::new("Run", 83, false),
            ],
            &mut history,
        );

        let changes: Vec<_> = history
            .all()
            .iter()
            .map(|r| (r.feature_name.as_str(), r.old_key_code, r.new_key_code))
            .collect();
        assert_eq!(changes, vec![("Run", -1, 82), ("Jump", 32, 74), ("Run", 82, 83)]);
        assert_eq!(store.get("Run_Key"), Some("83"));
    }

    #[test]
    fn test_merge_keeps_original_key_casing() {
        let mut store = ConfigStore::load("JUMP_KEY:32\n");
        let mut history = ModificationHistory::new();

        merge_keybinds(&mut store, &[FeatureKeybind::new("jump", 74, false)], &mut history);

        assert_eq!(store.serialize(), "JUMP_KEY:74\n");
    }
}
