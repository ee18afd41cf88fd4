//! Report formatting utilities for terminal output
//!
//! Provides formatting helpers shared by the reports.

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;

/// Date format used when a configured one is unusable
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Whether `fmt` is a strftime pattern chrono can render
pub fn is_valid_date_format(fmt: &str) -> bool {
    !fmt.is_empty() && StrftimeItems::new(fmt).all(|item| !matches!(item, Item::Error))
}

/// Format a date with the configured pattern, falling back to ISO dates
pub fn format_date(date: NaiveDate, fmt: &str) -> String {
    let fmt = if is_valid_date_format(fmt) {
        fmt
    } else {
        DEFAULT_DATE_FORMAT
    };
    date.format(fmt).to_string()
}

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct > 0.0 && pct < 0.1 {
        format!("{:.2}%", pct)
    } else if pct.abs() < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Format a ratio (0.24) as a rate ("24.0%")
pub fn format_rate(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Format a double separator line
pub fn double_separator(width: usize) -> String {
    "═".repeat(width)
}

/// Truncate a string to at most `max_len` characters, ending with "..."
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.05), "0.05%");
        assert_eq!(format_percentage(5.5), "5.5%");
        assert_eq!(format_percentage(50.0), "50%");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(0.24), "24.0%");
        assert_eq!(format_rate(0.0), "0.0%");
    }

    #[test]
    fn test_format_bar() {
        let bar = format_bar(50.0, 100.0, 10);
        assert_eq!(bar.chars().filter(|c| *c == '█').count(), 5);
        assert_eq!(format_bar(-1.0, 100.0, 4), "    ");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(format_date(date, "%d/%m/%Y"), "07/03/2025");
        assert_eq!(format_date(date, DEFAULT_DATE_FORMAT), "2025-03-07");
        assert_eq!(format_date(date, "%Q"), "2025-03-07");
        assert!(!is_valid_date_format(""));
        assert!(is_valid_date_format("%b %e, %Y"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 5), "He...");
        assert_eq!(truncate("Hi", 5), "Hi");
        assert_eq!(truncate("Café au lait", 6), "Caf...");
    }
}
