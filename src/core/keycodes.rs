//! Key-code ↔ key-name translation
//!
//! Config files store bare integers. This module turns them into names an
//! operator can read, under either of the two numbering schemes the mod has
//! used over time:
//! - **GLFW**: printable keys keep their ASCII codes, everything else sits in
//!   sparse ranges from 256 up (navigation 256-269, locks 280-284,
//!   F-keys 290-314, keypad 320-336, modifiers 340-348)
//! - **Virtual-key**: the compact legacy Windows numbering (8-254)
//!
//! Codes below `-1` are pointer buttons and mean the same thing in both
//! schemes. `-1` is always "unbound".
//!
//! Lookups never fail: an unknown code comes back as `[Code:<n>]` so callers
//! can spot untranslated values without handling an error.
//!
//! Tables are built once on first use and never change afterwards.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::core::types::{KeyScheme, UNBOUND_CODE};

/// Display name of the unbound sentinel code.
pub const UNBOUND_NAME: &str = "unbound";

const POINTER_PREFIX: &str = "POINTER ";

/// Named pointer buttons; everything below `-4` is numbered.
const POINTER_BUTTONS: &[(i32, &str)] = &[
    (-2, "POINTER LEFT"),
    (-3, "POINTER RIGHT"),
    (-4, "POINTER MIDDLE"),
];

const GLFW_NAMED: &[(i32, &str)] = &[
    (32, "SPACE"),
    (39, "APOSTROPHE"),
    (44, "COMMA"),
    (45, "MINUS"),
    (46, "PERIOD"),
    (47, "SLASH"),
    (59, "SEMICOLON"),
    (61, "EQUAL"),
    (91, "LEFT BRACKET"),
    (92, "BACKSLASH"),
    (93, "RIGHT BRACKET"),
    (96, "GRAVE ACCENT"),
    (161, "WORLD 1"),
    (162, "WORLD 2"),
    // Navigation and editing
    (256, "ESCAPE"),
    (257, "ENTER"),
    (258, "TAB"),
    (259, "BACKSPACE"),
    (260, "INSERT"),
    (261, "DELETE"),
    (262, "RIGHT"),
    (263, "LEFT"),
    (264, "DOWN"),
    (265, "UP"),
    (266, "PAGE UP"),
    (267, "PAGE DOWN"),
    (268, "HOME"),
    (269, "END"),
    // Locks and system keys
    (280, "CAPS LOCK"),
    (281, "SCROLL LOCK"),
    (282, "NUM LOCK"),
    (283, "PRINT SCREEN"),
    (284, "PAUSE"),
    // Keypad operators (digits generated below)
    (330, "NUMPAD DECIMAL"),
    (331, "NUMPAD DIVIDE"),
    (332, "NUMPAD MULTIPLY"),
    (333, "NUMPAD SUBTRACT"),
    (334, "NUMPAD ADD"),
    (335, "NUMPAD ENTER"),
    (336, "NUMPAD EQUAL"),
    // Modifiers
    (340, "LEFT SHIFT"),
    (341, "LEFT CONTROL"),
    (342, "LEFT ALT"),
    (343, "LEFT SUPER"),
    (344, "RIGHT SHIFT"),
    (345, "RIGHT CONTROL"),
    (346, "RIGHT ALT"),
    (347, "RIGHT SUPER"),
    (348, "MENU"),
];

const VK_NAMED: &[(i32, &str)] = &[
    (8, "BACKSPACE"),
    (9, "TAB"),
    (12, "CLEAR"),
    (13, "ENTER"),
    (16, "SHIFT"),
    (17, "CONTROL"),
    (18, "ALT"),
    (19, "PAUSE"),
    (20, "CAPS LOCK"),
    (27, "ESCAPE"),
    (32, "SPACE"),
    (33, "PAGE UP"),
    (34, "PAGE DOWN"),
    (35, "END"),
    (36, "HOME"),
    (37, "LEFT"),
    (38, "UP"),
    (39, "RIGHT"),
    (40, "DOWN"),
    (44, "PRINT SCREEN"),
    (45, "INSERT"),
    (46, "DELETE"),
    (91, "LEFT WINDOWS"),
    (92, "RIGHT WINDOWS"),
    (93, "APPS"),
    // Keypad operators (digits generated below)
    (106, "NUMPAD MULTIPLY"),
    (107, "NUMPAD ADD"),
    (108, "NUMPAD SEPARATOR"),
    (109, "NUMPAD SUBTRACT"),
    (110, "NUMPAD DECIMAL"),
    (111, "NUMPAD DIVIDE"),
    (144, "NUM LOCK"),
    (145, "SCROLL LOCK"),
    // Sided modifiers
    (160, "LEFT SHIFT"),
    (161, "RIGHT SHIFT"),
    (162, "LEFT CONTROL"),
    (163, "RIGHT CONTROL"),
    (164, "LEFT ALT"),
    (165, "RIGHT ALT"),
    // OEM punctuation (US layout)
    (186, "SEMICOLON"),
    (187, "EQUAL"),
    (188, "COMMA"),
    (189, "MINUS"),
    (190, "PERIOD"),
    (191, "SLASH"),
    (192, "GRAVE ACCENT"),
    (219, "LEFT BRACKET"),
    (220, "BACKSLASH"),
    (221, "RIGHT BRACKET"),
    (222, "APOSTROPHE"),
];

/// First code of the F1.. run, keypad 0.. run and F-key count per scheme.
struct Ranges {
    f1: i32,
    f_count: i32,
    numpad0: i32,
}

const GLFW_RANGES: Ranges = Ranges { f1: 290, f_count: 25, numpad0: 320 };
const VK_RANGES: Ranges = Ranges { f1: 112, f_count: 24, numpad0: 96 };

fn build_table(named: &[(i32, &str)], ranges: &Ranges) -> HashMap<i32, String> {
    let mut map = HashMap::new();

    // Digits and letters share ASCII codes in both schemes
    for c in ('0'..='9').chain('A'..='Z') {
        map.insert(c as i32, c.to_string());
    }

    for n in 0..ranges.f_count {
        map.insert(ranges.f1 + n, format!("F{}", n + 1));
    }

    for n in 0..10 {
        map.insert(ranges.numpad0 + n, format!("NUMPAD {}", n));
    }

    for &(code, name) in named {
        map.insert(code, name.to_string());
    }

    map
}

fn build_reverse(table: &HashMap<i32, String>) -> HashMap<String, i32> {
    table
        .iter()
        .map(|(&code, name)| (name.to_lowercase(), code))
        .collect()
}

static GLFW_TABLE: LazyLock<HashMap<i32, String>> =
    LazyLock::new(|| build_table(GLFW_NAMED, &GLFW_RANGES));

static VK_TABLE: LazyLock<HashMap<i32, String>> =
    LazyLock::new(|| build_table(VK_NAMED, &VK_RANGES));

static GLFW_REVERSE: LazyLock<HashMap<String, i32>> = LazyLock::new(|| build_reverse(&GLFW_TABLE));

static VK_REVERSE: LazyLock<HashMap<String, i32>> = LazyLock::new(|| build_reverse(&VK_TABLE));

/// Read-only translator over the static key tables
///
/// # Example
/// ```
/// use cfg_keybind_manager::core::{KeyCodeTranslator, KeyScheme};
///
/// assert_eq!(KeyCodeTranslator::name(256, KeyScheme::Glfw), "ESCAPE");
/// assert_eq!(KeyCodeTranslator::name(27, KeyScheme::VirtualKey), "ESCAPE");
/// assert_eq!(KeyCodeTranslator::name(-3, KeyScheme::Glfw), "POINTER RIGHT");
/// assert_eq!(KeyCodeTranslator::name(9999, KeyScheme::Glfw), "[Code:9999]");
/// ```
pub struct KeyCodeTranslator;

impl KeyCodeTranslator {
    /// Resolves a code to its display name under `scheme`.
    pub fn name(code: i32, scheme: KeyScheme) -> String {
        if let Some(name) = Self::special_name(code) {
            return name;
        }

        Self::table(scheme)
            .get(&code)
            .cloned()
            .unwrap_or_else(|| untranslated(code))
    }

    /// Like `name()`, but `None` when the code has no table entry.
    pub fn lookup(code: i32, scheme: KeyScheme) -> Option<String> {
        Self::special_name(code).or_else(|| Self::table(scheme).get(&code).cloned())
    }

    /// True when `name()` would fall back to the `[Code:n]` form.
    pub fn is_untranslated(code: i32, scheme: KeyScheme) -> bool {
        Self::lookup(code, scheme).is_none()
    }

    /// Resolves a display name back to its code under `scheme`
    ///
    /// Case-insensitive. Also accepts `unbound`, pointer names and the
    /// `[Code:n]` fallback form, so `code_for(name(c)) == Some(c)` for any `c`.
    pub fn code_for(name: &str, scheme: KeyScheme) -> Option<i32> {
        let name = name.trim();
        let lowered = name.to_lowercase();

        if lowered == UNBOUND_NAME {
            return Some(UNBOUND_CODE);
        }

        if let Some(&(code, _)) = POINTER_BUTTONS
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
        {
            return Some(code);
        }

        if let Some(code) = parse_numbered_pointer(name) {
            return Some(code);
        }

        if let Some(code) = parse_untranslated(name) {
            return Some(code);
        }

        Self::reverse(scheme).get(&lowered).copied()
    }

    /// Number of table entries for a scheme (pointer buttons excluded).
    pub fn table_len(scheme: KeyScheme) -> usize {
        Self::table(scheme).len()
    }

    fn special_name(code: i32) -> Option<String> {
        if code == UNBOUND_CODE {
            return Some(UNBOUND_NAME.to_string());
        }

        if code > UNBOUND_CODE {
            return None;
        }

        let named = POINTER_BUTTONS
            .iter()
            .find(|&&(c, _)| c == code)
            .map(|&(_, n)| n.to_string());

        Some(named.unwrap_or_else(|| {
            format!("{}{}", POINTER_PREFIX, code.unsigned_abs() - 4)
        }))
    }

    fn table(scheme: KeyScheme) -> &'static HashMap<i32, String> {
        match scheme {
            KeyScheme::Glfw => &GLFW_TABLE,
            KeyScheme::VirtualKey => &VK_TABLE,
        }
    }

    fn reverse(scheme: KeyScheme) -> &'static HashMap<String, i32> {
        match scheme {
            KeyScheme::Glfw => &GLFW_REVERSE,
            KeyScheme::VirtualKey => &VK_REVERSE,
        }
    }
}

fn untranslated(code: i32) -> String {
    format!("[Code:{}]", code)
}

fn parse_untranslated(name: &str) -> Option<i32> {
    name.strip_prefix("[Code:")?.strip_suffix(']')?.parse().ok()
}

/// `POINTER <n>` with `n >= 1` → `-(n + 4)`.
fn parse_numbered_pointer(name: &str) -> Option<i32> {
    let prefix = name.get(..POINTER_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(POINTER_PREFIX) {
        return None;
    }

    let n: i32 = name[POINTER_PREFIX.len()..].trim().parse().ok()?;
    if n < 1 {
        return None;
    }

    n.checked_add(4).map(|v| -v)
}
