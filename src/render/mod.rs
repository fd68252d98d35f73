//! Terminal presentation helpers.
//!
//! Pure functions only: formatting, the relevance chart, and query-term
//! highlighting. Frontends (CLI and TUI) decide where the output goes.

pub mod chart;
pub mod highlight;

use chrono::NaiveDateTime;

/// Timestamp format used by the backend API.
const API_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Shown in place of a document body that could not be displayed.
pub const CONTENT_PLACEHOLDER: &str = "[document content unavailable]";

/// Reformat an API timestamp (`2024-03-01 14:05:00`) for display
/// (`Mar 1, 2024 14:05`). Unparseable input is returned unchanged.
pub fn format_timestamp(raw: &str) -> String {
    match NaiveDateTime::parse_from_str(raw, API_TIMESTAMP_FORMAT) {
        Ok(dt) => dt.format("%b %-d, %Y %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Truncate to at most `max` characters, appending an ellipsis when content
/// was dropped. Counts characters, not bytes, so multibyte text stays
/// intact.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_timestamp_reformats_api_dates() {
        assert_eq!(format_timestamp("2024-03-01 14:05:00"), "Mar 1, 2024 14:05");
        assert_eq!(format_timestamp("2023-12-25 09:00:30"), "Dec 25, 2023 09:00");
    }

    #[test]
    fn format_timestamp_passes_through_garbage() {
        assert_eq!(format_timestamp("yesterday"), "yesterday");
        assert_eq!(format_timestamp(""), "");
    }

    #[test]
    fn truncate_appends_ellipsis_only_when_needed() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly ten", 11), "exactly ten");
        assert_eq!(truncate("a longer sentence", 8), "a longer...");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate("héllo wörld", 5), "héllo...");
    }
}
