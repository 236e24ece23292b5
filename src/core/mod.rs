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

//! src/core/mod.rs
//!
//! Core business logic module
//!
//! This module contains the keybinding data model and transformation engine:
//! - `key:value` config store (parse, serialise, overwrite)
//! - Key-code translation under two numbering schemes
//! - Keybinding extraction via the `_Key`/`_Key_hold` naming convention
//! - Merging edited bindings back, with a modification ledger
//! - Two-way comparison of active bindings
//! - The fine-tune state machine
//!
//! All business logic is isolated from terminal and file I/O so it can be
//! unit tested on plain strings.

pub mod compare;
pub mod extractor;
pub mod finetune;
pub mod history;
pub mod keycodes;
pub mod merge;
pub mod store;
pub mod types;

pub use compare::{compare_configs, compare_labeled, ComparisonResult, SourcedKeybind};
pub use extractor::{extract_active, extract_keybinds};
pub use finetune::{CaptureResult, FineTuneSession, TuneError, TuneEvent, TuneOutcome, TuneState};
pub use history::ModificationHistory;
pub use keycodes::KeyCodeTranslator;
pub use merge::{merge_keybinds, MergeSummary};
pub use store::{ConfigStore, ParseError};
pub use types::*;

#[cfg(test)]
mod tests;
