// Copyright 2025 bakri (tidynest@proton.me)
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

//! Config Keybind Manager
//!
//! Extract, edit, merge and compare the per-feature keybindings stored in a
//! game mod's flat `key:value` config file.
//!
//! # Features
//!
//! - **Convention-driven extraction:** `<Name>_Key` holds the key code,
//!   `<Name>_Key_hold` the hold/toggle flag
//! - **Two key-code schemes:** GLFW and Windows virtual-key codes, plus
//!   pointer buttons as negative codes
//! - **JSON exchange files:** Export, edit out-of-band, merge back
//! - **Comparison:** Active bindings unique to either of two configs
//! - **Modification ledger:** Every key-code overwrite is recorded
//! - **Automatic Backups:** Timestamped backups before every config change
//! - **Atomic Operations:** Safe file writes with rollback on failure
//!
//! # Architecture
//!
//! - **`core`:** Business logic (store, key codes, extraction, merge, compare,
//!   history, fine-tune state machine)
//! - **`config`:** File operations (reading, atomic writes, backups, JSON
//!   exchange files)
//! - **`capture`:** Key-capture boundary for the fine-tune flow
//! - **`report`:** Fixed-width text reports
//! - **`logging`:** `tracing` subscriber setup for the binary
//!
//! # Examples
//!
//! ## Extracting keybindings
//!
//! ```
//! use cfg_keybind_manager::core::{extract_keybinds, ConfigStore, KeyCodeTranslator, KeyScheme};
//!
//! let store = ConfigStore::load("Jump_Key:32\nJump_Key_hold:false\nRun_Key:-1\n");
//! let bindings = extract_keybinds(&store);
//!
//! assert_eq!(bindings.len(), 2);
//! assert_eq!(KeyCodeTranslator::name(bindings[0].key_code, KeyScheme::Glfw), "SPACE");
//! assert!(!bindings[1].is_active());
//! ```
//!
//! ## Comparing two configs
//!
//! ```
//! use cfg_keybind_manager::core::{compare_configs, ConfigStore};
//!
//! let a = ConfigStore::load("Jump_Key:32\n");
//! let b = ConfigStore::load("Jump_Key:74\nSprint_Key:340\n");
//!
//! let result = compare_configs(&a, &b);
//! assert!(result.unique_to_a.is_empty());
//! assert_eq!(result.unique_to_b[0].keybind.feature_name, "Sprint");
//! ```

pub mod capture;
pub mod config;
pub mod core;
pub mod logging;
pub mod report;

// Re-export commonly used types for convenience
pub use core::{ConfigStore, FeatureKeybind, KeyScheme, ModificationHistory, ModificationRecord};
