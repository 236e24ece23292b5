//! Append-only ledger of key-code changes
//!
//! Every merge that overwrites a `<name>_Key` entry appends one record here.
//! Records are never removed, reordered or collapsed: editing the same
//! feature twice leaves two entries.

use crate::core::types::ModificationRecord;

#[derive(Clone, Debug, Default)]
pub struct ModificationHistory {
    records: Vec<ModificationRecord>,
}

impl ModificationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: ModificationRecord) {
        self.records.push(record);
    }

    /// All records in the order they were appended.
    pub fn all(&self) -> &[ModificationRecord] {
        &self.records
    }

    /// Records touching one feature, matched case-insensitively.
    pub fn for_feature<'a>(
        &'a self,
        feature_name: &'a str,
    ) -> impl Iterator<Item = &'a ModificationRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| r.feature_name.eq_ignore_ascii_case(feature_name))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_repeated_edits_in_order() {
        let mut history = ModificationHistory::new();
        history.append(ModificationRecord::new("Jump", 32, 33));
        history.append(ModificationRecord::new("Run", -1, 82));
        history.append(ModificationRecord::new("jump", 33, 34));

        assert_eq!(history.len(), 3);
        let names: Vec<_> = history.all().iter().map(|r| r.feature_name.as_str()).collect();
        assert_eq!(names, vec!["Jump", "Run", "jump"]);

        let jumps: Vec<_> = history.for_feature("JUMP").map(|r| r.new_key_code).collect();
        assert_eq!(jumps, vec![33, 34]);
    }

    #[test]
    fn test_empty_history() {
        let history = ModificationHistory::new();
        assert!(history.is_empty());
        assert!(history.all().is_empty());
    }
}
