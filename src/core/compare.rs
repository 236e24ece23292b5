//! Two-way difference of active keybindings between configs
//!
//! This module uses HashSet-based indexing of lowercased feature names to
//! find features that are bound on one side but not the other.
//!
//! Only presence matters: a feature active on both sides with different key
//! codes or hold modes is not reported.
//!
//! # Performance
//! - Index one side: O(n)
//! - Difference: O(n + m), plus sorting the (usually short) result

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::core::extractor::extract_active;
use crate::core::store::ConfigStore;
use crate::core::types::FeatureKeybind;

/// Default labels when the caller doesn't name the two sides.
pub const DEFAULT_LABEL_A: &str = "A";
pub const DEFAULT_LABEL_B: &str = "B";

/// An active binding and the label of the config it came from
#[derive(Clone, Debug, PartialEq)]
pub struct SourcedKeybind {
    pub keybind: FeatureKeybind,
    pub source: String,
}

/// Features active on exactly one side, each list sorted by name
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComparisonResult {
    /// Active in A, absent (or unbound) in B
    pub unique_to_a: Vec<SourcedKeybind>,

    /// Active in B, absent (or unbound) in A
    pub unique_to_b: Vec<SourcedKeybind>,
}

impl ComparisonResult {
    /// True when both configs have the same set of active features.
    pub fn is_identical(&self) -> bool {
        self.unique_to_a.is_empty() && self.unique_to_b.is_empty()
    }

    pub fn total_differences(&self) -> usize {
        self.unique_to_a.len() + self.unique_to_b.len()
    }
}

/// Compares two stores, labelling sides `A` and `B`
///
/// # Example
/// ```
/// use cfg_keybind_manager::core::{compare_configs, ConfigStore};
///
/// let a = ConfigStore::load("Jump_Key:32\n");
/// let b = ConfigStore::load("Jump_Key:32\nSprint_Key:340\n");
///
/// let result = compare_configs(&a, &b);
/// assert!(result.unique_to_a.is_empty());
/// assert_eq!(result.unique_to_b[0].keybind.feature_name, "Sprint");
/// ```
pub fn compare_configs(a: &ConfigStore, b: &ConfigStore) -> ComparisonResult {
    compare_labeled(a, DEFAULT_LABEL_A, b, DEFAULT_LABEL_B)
}

/// Compares two stores, tagging each result with its side's label.
pub fn compare_labeled(
    a: &ConfigStore,
    label_a: &str,
    b: &ConfigStore,
    label_b: &str,
) -> ComparisonResult {
    let active_a = extract_active(a);
    let active_b = extract_active(b);

    ComparisonResult {
        unique_to_a: difference(&active_a, &active_b, label_a),
        unique_to_b: difference(&active_b, &active_a, label_b),
    }
}

/// Bindings in `left` whose name is not in `right`, sorted by name.
fn difference(left: &[FeatureKeybind], right: &[FeatureKeybind], label: &str) -> Vec<SourcedKeybind> {
    let right_names: HashSet<String> = right.iter().map(FeatureKeybind::name_key).collect();

    let mut unique: Vec<SourcedKeybind> = left
        .iter()
        .filter(|kb| !right_names.contains(&kb.name_key()))
        .map(|kb| SourcedKeybind {
            keybind: kb.clone(),
            source: label.to_string(),
        })
        .collect();

    unique.sort_by(|x, y| by_feature_name(&x.keybind, &y.keybind));
    unique
}

/// Case-insensitive name order, original casing as tie-break.
pub fn by_feature_name(a: &FeatureKeybind, b: &FeatureKeybind) -> Ordering {
    a.name_key()
        .cmp(&b.name_key())
        .then_with(|| a.feature_name.cmp(&b.feature_name))
}
