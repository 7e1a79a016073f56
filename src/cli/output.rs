//! Output formatting utilities for the CLI.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use serde::Serialize;
use std::env;

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// Truncate a string to at most `max_len` characters, appending "..." if
/// truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Check if color output is supported
pub fn supports_color() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    !matches!(env::var("TERM").as_deref(), Ok("dumb"))
}

/// Base table with UTF-8 borders and dynamic column widths
pub fn base_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );
    table
}

/// Fail percentage cell: green when clean, yellow below half, red otherwise.
pub fn fail_percentage_cell(fail_percentage: f64, use_colors: bool) -> Cell {
    let cell = Cell::new(format!("{fail_percentage:.1}%"));
    if !use_colors {
        return cell;
    }
    let color = if fail_percentage <= 0.0 {
        Color::Green
    } else if fail_percentage < 50.0 {
        Color::Yellow
    } else {
        Color::Red
    };
    cell.fg(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
        assert_eq!(truncate("äöüäöüäöü", 5), "äö...");
    }

    #[test]
    fn test_base_table_has_headers() {
        let table = base_table(&["Class", "Failed"]);
        let rendered = table.to_string();
        assert!(rendered.contains("Class"));
        assert!(rendered.contains("Failed"));
    }
}
