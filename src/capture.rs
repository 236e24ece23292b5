//! Key capture at the operator boundary
//!
//! The fine-tune session only ever sees `CaptureResult`s. This module is the
//! collaborator that produces them:
//! - `KeyCapture`: anything that can wait for the operator to pick a key
//! - `ModifierPoller`: optional platform hook reporting whether a modifier
//!   is physically held, used to tell left from right
//! - `LineKeyCapture`: a line-based capture reading a key name or a raw code
//!   per line, for terminals without raw keyboard access
//!
//! Platforms without native key-state polling use `NoopModifierPoller`.

use std::io::BufRead;
use tracing::warn;

use crate::core::{CaptureResult, KeyCodeTranslator, KeyScheme};

/// Source of key-capture results.
pub trait KeyCapture {
    /// Blocks until the operator produces a key, bad input, or a cancel.
    fn capture(&mut self, scheme: KeyScheme) -> CaptureResult;
}

/// Platform hook for reading live modifier state
pub trait ModifierPoller {
    /// True when the key with this code (in `scheme`) is currently held.
    fn is_pressed(&self, code: i32, scheme: KeyScheme) -> bool;
}

/// Poller for platforms without native key-state access; never pressed.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopModifierPoller;

impl ModifierPoller for NoopModifierPoller {
    fn is_pressed(&self, _code: i32, _scheme: KeyScheme) -> bool {
        false
    }
}

/// Words that cancel a capture.
const CANCEL_WORDS: &[&str] = &["esc", "cancel"];

/// Generic modifier names and their sided table names
const SIDED_MODIFIERS: &[(&str, &str, &str)] = &[
    ("shift", "LEFT SHIFT", "RIGHT SHIFT"),
    ("ctrl", "LEFT CONTROL", "RIGHT CONTROL"),
    ("control", "LEFT CONTROL", "RIGHT CONTROL"),
    ("alt", "LEFT ALT", "RIGHT ALT"),
];

/// Line-based capture: one key per line
///
/// Accepted input:
/// - a raw integer code (`32`, `-3`)
/// - a key name from the active scheme's table (`space`, `F5`, `pointer right`)
/// - a generic modifier (`shift`, `ctrl`, `alt`), resolved to the right-hand
///   key only when the poller reports it held
/// - `esc`, `cancel` or end of input to cancel
///
/// # Example
/// ```
/// use cfg_keybind_manager::capture::{KeyCapture, LineKeyCapture, NoopModifierPoller};
/// use cfg_keybind_manager::core::{CaptureResult, KeyScheme};
///
/// let mut capture = LineKeyCapture::new("space\n".as_bytes(), NoopModifierPoller);
/// assert_eq!(
///     capture.capture(KeyScheme::Glfw),
///     CaptureResult::Key { code: 32, display: "SPACE".to_string() }
/// );
/// ```
pub struct LineKeyCapture<R, P> {
    input: R,
    poller: P,
}

impl<R: BufRead, P: ModifierPoller> LineKeyCapture<R, P> {
    pub fn new(input: R, poller: P) -> Self {
        Self { input, poller }
    }

    /// Reads one line; `None` at end of input or on a read error.
    pub fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                warn!(error = %e, "failed to read operator input");
                None
            }
        }
    }

    /// Turns one line of operator input into a capture result.
    pub fn resolve(&self, input: &str, scheme: KeyScheme) -> CaptureResult {
        if input.is_empty() {
            return CaptureResult::Invalid(input.to_string());
        }

        if CANCEL_WORDS.iter().any(|w| w.eq_ignore_ascii_case(input)) {
            return CaptureResult::Cancel;
        }

        if let Ok(code) = input.parse::<i32>() {
            return CaptureResult::Key {
                code,
                display: KeyCodeTranslator::name(code, scheme),
            };
        }

        let name = self.sided_modifier(input, scheme).unwrap_or(input);

        match KeyCodeTranslator::code_for(name, scheme) {
            Some(code) => CaptureResult::Key {
                code,
                display: KeyCodeTranslator::name(code, scheme),
            },
            None if looks_like_key_name(input) => CaptureResult::Unmapped(input.to_string()),
            None => CaptureResult::Invalid(input.to_string()),
        }
    }

    fn sided_modifier(&self, input: &str, scheme: KeyScheme) -> Option<&'static str> {
        let &(_, left, right) = SIDED_MODIFIERS
            .iter()
            .find(|(generic, _, _)| generic.eq_ignore_ascii_case(input))?;

        let right_held = KeyCodeTranslator::code_for(right, scheme)
            .is_some_and(|code| self.poller.is_pressed(code, scheme));

        Some(if right_held { right } else { left })
    }
}

impl<R: BufRead, P: ModifierPoller> KeyCapture for LineKeyCapture<R, P> {
    fn capture(&mut self, scheme: KeyScheme) -> CaptureResult {
        match self.read_line() {
            Some(line) => self.resolve(&line, scheme),
            None => CaptureResult::Cancel,
        }
    }
}

/// Letters, digits, spaces and underscores only: plausibly a key name.
fn looks_like_key_name(input: &str) -> bool {
    input
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    struct HeldKeys(Vec<i32>);

    impl ModifierPoller for HeldKeys {
        fn is_pressed(&self, code: i32, _scheme: KeyScheme) -> bool {
            self.0.contains(&code)
        }
    }

    fn capture_all(input: &str, scheme: KeyScheme) -> Vec<CaptureResult> {
        let mut capture = LineKeyCapture::new(input.as_bytes(), NoopModifierPoller);
        let mut results = Vec::new();
        loop {
            let result = capture.capture(scheme);
            let done = result == CaptureResult::Cancel;
            results.push(result);
            if done {
                return results;
            }
        }
    }

    #[test]
    fn test_codes_and_names() {
        let results = capture_all("32\nf5\npointer right\n", KeyScheme::Glfw);
        assert_eq!(
            results,
            vec![
                CaptureResult::Key { code: 32, display: "SPACE".into() },
                CaptureResult::Key { code: 294, display: "F5".into() },
                CaptureResult::Key { code: -3, display: "POINTER RIGHT".into() },
                CaptureResult::Cancel,
            ]
        );
    }

    #[test]
    fn test_bad_input_is_reported_not_fatal() {
        let results = capture_all("hyper\n$$$\n\nesc\n", KeyScheme::VirtualKey);
        assert_eq!(
            results,
            vec![
                CaptureResult::Unmapped("hyper".into()),
                CaptureResult::Invalid("$$$".into()),
                CaptureResult::Invalid("".into()),
                CaptureResult::Cancel,
            ]
        );
    }

    #[test]
    fn test_unknown_code_still_captures() {
        let results = capture_all("9999\n", KeyScheme::Glfw);
        assert_eq!(
            results[0],
            CaptureResult::Key { code: 9999, display: "[Code:9999]".into() }
        );
    }

    #[test]
    fn test_generic_modifier_defaults_to_left() {
        let results = capture_all("shift\nctrl\n", KeyScheme::Glfw);
        assert_eq!(
            &results[..2],
            &[
                CaptureResult::Key { code: 340, display: "LEFT SHIFT".into() },
                CaptureResult::Key { code: 341, display: "LEFT CONTROL".into() },
            ]
        );
    }

    #[test]
    fn test_generic_modifier_uses_poller() {
        let mut capture = LineKeyCapture::new("shift\n".as_bytes(), HeldKeys(vec![161]));
        assert_eq!(
            capture.capture(KeyScheme::VirtualKey),
            CaptureResult::Key { code: 161, display: "RIGHT SHIFT".into() }
        );
    }
}
