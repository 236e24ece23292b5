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

//! Interactive fine-tune flow as an explicit state machine
//!
//! ```text
//!  SelectingFeature ──Select──▶ AwaitingKeyCapture ──Captured(Key)──▶ ConfirmingCapture
//!        ▲                         │   ▲      │                          │   │   │
//!        │                         │   └──────┘ Captured(Invalid/        │   │   │
//!        │                         │            Unmapped): retry         │   │   │
//!        ├───────────Skip──────────┘                        Recapture ◀──┘   │   │
//!        ├──────────────────────────── Confirm (Applied) ◀──────────────────┘   │
//!        └──────────────────────────── Skip (Skipped) ◀─────────────────────────┘
//!
//!  Cancel (or Captured(Cancel)) from any live state ──▶ Cancelled (terminal)
//! ```
//!
//! The session owns no I/O. The caller feeds it events (menu choices, key
//! capture results) and renders the returned outcomes. Confirmed captures are
//! written to the borrowed store immediately through the merge engine, so the
//! history ledger sees them in the order the operator applied them.

use thiserror::Error;
use tracing::debug;

use crate::core::extractor::extract_keybinds;
use crate::core::history::ModificationHistory;
use crate::core::merge::merge_keybinds;
use crate::core::store::ConfigStore;
use crate::core::types::FeatureKeybind;

/// Result of one key-capture attempt at the operator boundary
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CaptureResult {
    /// A key resolved to a code, with the name to show for it
    Key { code: i32, display: String },
    /// Input recognised as a key that no table maps
    Unmapped(String),
    /// Input that isn't a key at all
    Invalid(String),
    /// Operator backed out
    Cancel,
}

/// Fine-tune session state
#[derive(Clone, Debug, PartialEq)]
pub enum TuneState {
    SelectingFeature,
    AwaitingKeyCapture {
        current: FeatureKeybind,
    },
    ConfirmingCapture {
        current: FeatureKeybind,
        pending: FeatureKeybind,
        display: String,
    },
    Cancelled,
}

impl TuneState {
    fn label(&self) -> &'static str {
        match self {
            TuneState::SelectingFeature => "SelectingFeature",
            TuneState::AwaitingKeyCapture { .. } => "AwaitingKeyCapture",
            TuneState::ConfirmingCapture { .. } => "ConfirmingCapture",
            TuneState::Cancelled => "Cancelled",
        }
    }
}

/// Input driving the session
#[derive(Clone, Debug, PartialEq)]
pub enum TuneEvent {
    Select(String),
    Captured(CaptureResult),
    Confirm,
    ToggleHold,
    Recapture,
    Skip,
    Cancel,
}

impl TuneEvent {
    fn label(&self) -> &'static str {
        match self {
            TuneEvent::Select(_) => "Select",
            TuneEvent::Captured(_) => "Captured",
            TuneEvent::Confirm => "Confirm",
            TuneEvent::ToggleHold => "ToggleHold",
            TuneEvent::Recapture => "Recapture",
            TuneEvent::Skip => "Skip",
            TuneEvent::Cancel => "Cancel",
        }
    }
}

/// What a handled event did
#[derive(Clone, Debug, PartialEq)]
pub enum TuneOutcome {
    /// Feature chosen, waiting for a key
    Selected(FeatureKeybind),
    /// Capture failed, still waiting for a key
    RetryCapture(String),
    /// Key captured, waiting for confirmation
    Captured { pending: FeatureKeybind, display: String },
    /// Hold mode of the pending binding flipped
    HoldToggled(bool),
    /// Binding written to the store (`fields` = overwritten entries)
    Applied { binding: FeatureKeybind, fields: usize },
    /// Feature left as it was
    Skipped(String),
    /// Session over
    Cancelled,
}

#[derive(Debug, Error, PartialEq)]
pub enum TuneError {
    #[error("Event '{event}' is not valid while {state}")]
    InvalidEvent {
        state: &'static str,
        event: &'static str,
    },

    #[error("Feature '{0}' has no keybinding in this config")]
    UnknownFeature(String),
}

/// Drives the fine-tune flow over a borrowed store and history
pub struct FineTuneSession<'a> {
    store: &'a mut ConfigStore,
    history: &'a mut ModificationHistory,
    state: TuneState,
    applied: Vec<FeatureKeybind>,
}

impl<'a> FineTuneSession<'a> {
    pub fn new(store: &'a mut ConfigStore, history: &'a mut ModificationHistory) -> Self {
        Self {
            store,
            history,
            state: TuneState::SelectingFeature,
            applied: Vec::new(),
        }
    }

    pub fn state(&self) -> &TuneState {
        &self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == TuneState::Cancelled
    }

    /// Bindings confirmed so far, in the order they were applied.
    pub fn applied(&self) -> &[FeatureKeybind] {
        &self.applied
    }

    /// Current bindings of the store, for the selection menu.
    pub fn features(&self) -> Vec<FeatureKeybind> {
        extract_keybinds(&*self.store)
    }

    /// Applies one event
    ///
    /// On error the state is left exactly as it was.
    pub fn handle(&mut self, event: TuneEvent) -> Result<TuneOutcome, TuneError> {
        let from = self.state.label();
        let event_label = event.label();

        let state = std::mem::replace(&mut self.state, TuneState::Cancelled);
        let (next, result) = self.transition(state, event);
        self.state = next;

        debug!(from, event = event_label, to = self.state.label(), ok = result.is_ok(), "fine-tune transition");
        result
    }

    fn transition(
        &mut self,
        state: TuneState,
        event: TuneEvent,
    ) -> (TuneState, Result<TuneOutcome, TuneError>) {
        use TuneEvent as E;
        use TuneState as S;

        match (state, event) {
            (S::Cancelled, event) => (S::Cancelled, Err(invalid(&S::Cancelled, &event))),

            (_, E::Cancel) | (S::AwaitingKeyCapture { .. }, E::Captured(CaptureResult::Cancel)) => {
                (S::Cancelled, Ok(TuneOutcome::Cancelled))
            }

            (S::SelectingFeature, E::Select(name)) => match self.find_feature(&name) {
                Some(current) => (
                    S::AwaitingKeyCapture { current: current.clone() },
                    Ok(TuneOutcome::Selected(current)),
                ),
                None => (S::SelectingFeature, Err(TuneError::UnknownFeature(name))),
            },

            (S::AwaitingKeyCapture { current }, E::Captured(capture)) => match capture {
                CaptureResult::Key { code, display } => {
                    let pending = FeatureKeybind::new(&current.feature_name, code, current.is_hold);
                    (
                        S::ConfirmingCapture {
                            current,
                            pending: pending.clone(),
                            display: display.clone(),
                        },
                        Ok(TuneOutcome::Captured { pending, display }),
                    )
                }
                CaptureResult::Unmapped(input) => (
                    S::AwaitingKeyCapture { current },
                    Ok(TuneOutcome::RetryCapture(format!("'{}' is not a mapped key", input))),
                ),
                CaptureResult::Invalid(input) => (
                    S::AwaitingKeyCapture { current },
                    Ok(TuneOutcome::RetryCapture(format!("'{}' is not a key", input))),
                ),
                // Handled by the Cancel arm above
                CaptureResult::Cancel => (S::Cancelled, Ok(TuneOutcome::Cancelled)),
            },

            (S::AwaitingKeyCapture { current }, E::Skip)
            | (S::ConfirmingCapture { current, .. }, E::Skip) => {
                (S::SelectingFeature, Ok(TuneOutcome::Skipped(current.feature_name)))
            }

            (S::ConfirmingCapture { current, mut pending, display }, E::ToggleHold) => {
                pending.is_hold = !pending.is_hold;
                let hold = pending.is_hold;
                (
                    S::ConfirmingCapture { current, pending, display },
                    Ok(TuneOutcome::HoldToggled(hold)),
                )
            }

            (S::ConfirmingCapture { current, .. }, E::Recapture) => (
                S::AwaitingKeyCapture { current: current.clone() },
                Ok(TuneOutcome::Selected(current)),
            ),

            (S::ConfirmingCapture { pending, .. }, E::Confirm) => {
                let summary = merge_keybinds(&mut *self.store, std::slice::from_ref(&pending), &mut *self.history);
                self.applied.push(pending.clone());
                (
                    S::SelectingFeature,
                    Ok(TuneOutcome::Applied {
                        binding: pending,
                        fields: summary.applied,
                    }),
                )
            }

            (state, event) => {
                let err = invalid(&state, &event);
                (state, Err(err))
            }
        }
    }

    fn find_feature(&self, name: &str) -> Option<FeatureKeybind> {
        extract_keybinds(&*self.store)
            .into_iter()
            .find(|kb| kb.feature_name.eq_ignore_ascii_case(name.trim()))
    }
}

fn invalid(state: &TuneState, event: &TuneEvent) -> TuneError {
    TuneError::InvalidEvent {
        state: state.label(),
        event: event.label(),
    }
}
