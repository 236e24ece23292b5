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

//! src/core/store.rs
//!
//! Flat `key:value` configuration store
//!
//! The mod config is one `key:value` pair per line, no quoting, no escaping.
//! This module parses it into an ordered mapping and writes it back out.
//!
//! # Parsing rules
//! - Blank lines are ignored
//! - The **first** colon splits key from value (values may contain colons)
//! - Key and value are trimmed
//! - Lines without a colon, or with an empty key, are skipped
//! - Keys are case-insensitive; the first occurrence wins
//!
//! # Architecture
//! Entries live in a `Vec` to keep first-seen order for stable output, with a
//! `HashMap` index from lowercased key to position for O(1) lookup.
//! The key set is fixed after loading: `set()` never inserts.

use nom::{
    bytes::complete::take_until,
    character::complete::char,
    combinator::rest,
    sequence::separated_pair,
    IResult, Parser,
};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Parse errors for config content
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Config is not valid UTF-8 (byte offset {offset})")]
    InvalidUtf8 { offset: usize },
}

/// Ordered, case-insensitive `key:value` store
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigStore {
    /// Entries in first-seen order, original key casing kept
    entries: Vec<(String, String)>,

    /// Lowercased key → index into `entries`
    index: HashMap<String, usize>,
}

impl ConfigStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses config text into a store
    ///
    /// Malformed lines are skipped rather than failing the load.
    ///
    /// # Example
    /// ```
    /// use cfg_keybind_manager::core::ConfigStore;
    ///
    /// let store = ConfigStore::load("Jump_Key:32\njump_key:99\nnot a pair\n");
    /// assert_eq!(store.len(), 1);
    /// assert_eq!(store.get("JUMP_KEY"), Some("32"));
    /// ```
    pub fn load(content: &str) -> Self {
        let mut store = Self::new();

        for (line_num, line) in content.lines().enumerate() {
            let line_num = line_num + 1;

            if line.trim().is_empty() {
                continue;
            }

            let Some((key, value)) = parse_entry_line(line) else {
                debug!(line = line_num, "skipping line without key:value pair");
                continue;
            };

            if !store.insert_first(key, value) {
                debug!(line = line_num, key, "ignoring duplicate key");
            }
        }

        store
    }

    /// Parses raw file bytes, stripping a leading UTF-8 byte-order mark.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let content = std::str::from_utf8(bytes).map_err(|e| ParseError::InvalidUtf8 {
            offset: e.valid_up_to(),
        })?;

        Ok(Self::load(content))
    }

    /// Writes the store back to `key:value` lines in store order.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push_str(key);
            out.push(':');
            out.push_str(value);
            out.push('\n');
        }
        out
    }

    /// Looks up a value by key, ignoring case.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(&key.to_lowercase())
            .map(|&i| self.entries[i].1.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(&key.to_lowercase())
    }

    /// Overwrites an existing key's value
    ///
    /// Returns the previous value, or `None` if the key is absent, in which
    /// case the store is left untouched.
    pub fn set(&mut self, key: &str, value: &str) -> Option<String> {
        let &i = self.index.get(&key.to_lowercase())?;
        Some(std::mem::replace(&mut self.entries[i].1, value.to_string()))
    }

    /// Iterates entries in store order as `(key, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts only if no entry with this key exists yet.
    fn insert_first(&mut self, key: &str, value: &str) -> bool {
        let lowered = key.to_lowercase();
        if self.index.contains_key(&lowered) {
            return false;
        }

        self.index.insert(lowered, self.entries.len());
        self.entries.push((key.to_string(), value.to_string()));
        true
    }
}

/// Splits one line on its first colon into a trimmed `(key, value)`
///
/// Returns `None` for lines without a colon or with an empty key.
pub fn parse_entry_line(line: &str) -> Option<(&str, &str)> {
    let (_, (key, value)) = key_value(line).ok()?;
    let key = key.trim();

    if key.is_empty() {
        return None;
    }

    Some((key, value.trim()))
}

fn key_value(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(take_until(":"), char(':'), rest).parse(input)
}
