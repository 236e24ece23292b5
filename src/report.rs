//! Plain-text report rendering
//!
//! Fixed-width tables for binding lists, comparison results and the
//! modification history. Output is meant for people, not parsers, but the
//! column layout is stable so it can be asserted on in tests:
//!
//! | Column  | Width | Alignment |
//! |---------|-------|-----------|
//! | FEATURE | 32    | left      |
//! | CODE    | 11    | right     |
//! | KEY     | 20    | left      |
//! | last    | -     | left      |
//!
//! Feature names longer than the column are cut to fit and end in `…`.
//! The code column is wide enough for any `i32`. Colour is left to the
//! caller; nothing here emits escape codes.

use std::borrow::Cow;
use std::fmt::Write;

use crate::core::{
    ComparisonResult, FeatureKeybind, KeyCodeTranslator, KeyScheme, ModificationHistory,
    SourcedKeybind,
};

pub const FEATURE_WIDTH: usize = 32;
pub const CODE_WIDTH: usize = 11;
pub const KEY_WIDTH: usize = 20;

/// One table row: feature, raw code, translated key, trailing column.
pub fn format_row(feature: &str, code: &str, key: &str, last: &str) -> String {
    let row = format!(
        "{:<fw$} {:>cw$} {:<kw$} {}",
        fit(feature, FEATURE_WIDTH),
        code,
        key,
        last,
        fw = FEATURE_WIDTH,
        cw = CODE_WIDTH,
        kw = KEY_WIDTH,
    );
    row.trim_end().to_string()
}

/// Cuts `text` to at most `width` chars, marking the cut with `…`.
fn fit(text: &str, width: usize) -> Cow<'_, str> {
    if text.chars().count() <= width {
        return Cow::Borrowed(text);
    }

    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    Cow::Owned(cut)
}

fn rule(last_width: usize) -> String {
    format!(
        "{} {} {} {}",
        "-".repeat(FEATURE_WIDTH),
        "-".repeat(CODE_WIDTH),
        "-".repeat(KEY_WIDTH),
        "-".repeat(last_width)
    )
}

/// Renders every binding with its key name and hold/toggle mode.
pub fn render_keybind_table(bindings: &[FeatureKeybind], scheme: KeyScheme) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", format_row("FEATURE", "CODE", "KEY", "MODE"));
    let _ = writeln!(out, "{}", rule(6));

    for kb in bindings {
        let mode = if kb.is_hold { "hold" } else { "toggle" };
        let _ = writeln!(
            out,
            "{}",
            format_row(
                &kb.feature_name,
                &kb.key_code.to_string(),
                &KeyCodeTranslator::name(kb.key_code, scheme),
                mode,
            )
        );
    }

    out
}

/// Renders both sides of a comparison under their own headings
///
/// # Example
/// ```
/// use cfg_keybind_manager::core::{compare_labeled, ConfigStore, KeyScheme};
/// use cfg_keybind_manager::report::{format_row, render_comparison};
///
/// let a = ConfigStore::load("Jump_Key:32\n");
/// let b = ConfigStore::load("Jump_Key:32\nSprint_Key:340\n");
/// let result = compare_labeled(&a, "old.cfg", &b, "new.cfg");
///
/// let text = render_comparison(&result, "old.cfg", "new.cfg", KeyScheme::Glfw);
/// assert!(text.contains(&format_row("Sprint", "340", "LEFT SHIFT", "new.cfg")));
/// ```
pub fn render_comparison(
    result: &ComparisonResult,
    label_a: &str,
    label_b: &str,
    scheme: KeyScheme,
) -> String {
    let mut out = String::new();
    render_side(&mut out, label_a, label_b, &result.unique_to_a, scheme);
    out.push('\n');
    render_side(&mut out, label_b, label_a, &result.unique_to_b, scheme);
    out
}

fn render_side(
    out: &mut String,
    label: &str,
    other: &str,
    entries: &[SourcedKeybind],
    scheme: KeyScheme,
) {
    let _ = writeln!(
        out,
        "Active in {} but not in {} ({})",
        label,
        other,
        entries.len()
    );

    if entries.is_empty() {
        let _ = writeln!(out, "  (none)");
        return;
    }

    let _ = writeln!(out, "{}", format_row("FEATURE", "CODE", "KEY", "SOURCE"));
    let _ = writeln!(out, "{}", rule(10));

    for entry in entries {
        let kb = &entry.keybind;
        let _ = writeln!(
            out,
            "{}",
            format_row(
                &kb.feature_name,
                &kb.key_code.to_string(),
                &KeyCodeTranslator::name(kb.key_code, scheme),
                &entry.source,
            )
        );
    }
}

/// Renders the history ledger in append order
///
/// Records that rewrote the code already present are marked `(unchanged)`.
pub fn render_history(history: &ModificationHistory, scheme: KeyScheme) -> String {
    let mut out = String::new();

    for record in history.all() {
        let _ = write!(
            out,
            "{}  {}: {} ({}) -> {} ({})",
            record.timestamp.format("%H:%M:%S"),
            record.feature_name,
            record.old_key_code,
            KeyCodeTranslator::name(record.old_key_code, scheme),
            record.new_key_code,
            KeyCodeTranslator::name(record.new_key_code, scheme),
        );
        if record.is_unchanged() {
            out.push_str(" (unchanged)");
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{compare_configs, ConfigStore, ModificationRecord};

    #[test]
    fn test_row_layout() {
        let row = format_row("Jump", "32", "SPACE", "A");
        assert_eq!(&row[..4], "Jump");
        assert_eq!(
            &row[FEATURE_WIDTH + 1..FEATURE_WIDTH + 1 + CODE_WIDTH],
            format!("{:>w$}", "32", w = CODE_WIDTH)
        );
        assert_eq!(
            row[FEATURE_WIDTH + CODE_WIDTH + 2..].trim_end(),
            format!("{:<w$} A", "SPACE", w = KEY_WIDTH)
        );
    }

    #[test]
    fn test_comparison_report_lists_both_sides() {
        let a = ConfigStore::load("Jump_Key:32\nZoom_Key:9999\n");
        let b = ConfigStore::load("Sprint_Key:-3\n");

        let text = render_comparison(&compare_configs(&a, &b), "A", "B", KeyScheme::Glfw);

        assert!(text.contains("Active in A but not in B (2)"));
        assert!(text.contains(&format_row("Jump", "32", "SPACE", "A")));
        assert!(text.contains(&format_row("Zoom", "9999", "[Code:9999]", "A")));
        assert!(text.contains("Active in B but not in A (1)"));
        assert!(text.contains(&format_row("Sprint", "-3", "POINTER RIGHT", "B")));
    }

    #[test]
    fn test_empty_side_says_none() {
        let a = ConfigStore::load("Jump_Key:32\n");
        let text = render_comparison(&compare_configs(&a, &a), "A", "B", KeyScheme::Glfw);
        assert_eq!(text.matches("(none)").count(), 2);
    }

    #[test]
    fn test_keybind_table_uses_scheme() {
        let binds = vec![FeatureKeybind::new("Menu", 27, false)];

        let vk = render_keybind_table(&binds, KeyScheme::VirtualKey);
        assert!(vk.contains(&format_row("Menu", "27", "ESCAPE", "toggle")));

        let glfw = render_keybind_table(&binds, KeyScheme::Glfw);
        assert!(glfw.contains("[Code:27]"));
    }

    #[test]
    fn test_history_lines_in_order() {
        let mut history = ModificationHistory::new();
        history.append(ModificationRecord::new("Jump", 32, 74));
        history.append(ModificationRecord::new("Run", -1, 82));

        let text = render_history(&history, KeyScheme::Glfw);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Jump: 32 (SPACE) -> 74 (J)"));
        assert!(lines[1].ends_with("Run: -1 (unbound) -> 82 (R)"));
    }

    #[test]
    fn test_long_feature_name_keeps_columns() {
        let long = "A".repeat(40);
        let row = format_row(&long, "32", "SPACE", "A");
        let short = format_row("Jump", "32", "SPACE", "A");

        let feature: String = row.chars().take(FEATURE_WIDTH).collect();
        assert_eq!(feature.chars().count(), FEATURE_WIDTH);
        assert!(feature.ends_with('…'));
        assert!(feature.starts_with(&"A".repeat(FEATURE_WIDTH - 1)));

        // Everything after the feature column lines up with a short row
        let rest: String = row.chars().skip(FEATURE_WIDTH).collect();
        let short_rest: String = short.chars().skip(FEATURE_WIDTH).collect();
        assert_eq!(rest, short_rest);
    }

    #[test]
    fn test_name_exactly_column_width_is_not_cut() {
        let exact = "B".repeat(FEATURE_WIDTH);
        assert!(format_row(&exact, "1", "x", "y").starts_with(&exact));
    }

    #[test]
    fn test_extreme_code_fits_column() {
        let code = i32::MIN.to_string();
        let row = format_row("Jump", &code, "[Code:-2147483648]", "A");
        let short = format_row("Jump", "32", "SPACE", "A");
        assert_eq!(row.find(" [Code:"), short.find(" SPACE"));
    }

    #[test]
    fn test_history_marks_unchanged_records() {
        let mut history = ModificationHistory::new();
        history.append(ModificationRecord::new("Jump", 32, 32));
        history.append(ModificationRecord::new("Run", 82, 74));

        let text = render_history(&history, KeyScheme::Glfw);
        let lines: Vec<_> = text.lines().collect();

        assert!(lines[0].ends_with("Jump: 32 (SPACE) -> 32 (SPACE) (unchanged)"));
        assert!(lines[1].ends_with("Run: 82 (R) -> 74 (J)"));
    }
}
