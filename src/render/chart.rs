//! Horizontal bar chart of source relevance scores.
//!
//! The renderer is a pure function from sources to a complete text frame;
//! re-rendering always replaces prior output, so redraws are idempotent by
//! construction. The cell math is shared with the interactive UI's bars.

use console::{measure_text_width, style, truncate_str};
use tracing::warn;

use crate::models::Source;

/// Minimum total columns needed to draw labels, bars, and annotations.
const MIN_WIDTH: usize = 24;
/// Label column width cap.
const MAX_LABEL_WIDTH: usize = 24;
/// Bars never shrink below this many cells.
const MIN_BAR_WIDTH: usize = 8;

/// Tooltip-style annotation for a percentage value.
pub fn relevance_label(value: f64) -> String {
    format!("Relevance: {:.1}%", value)
}

/// Percentage for a raw relevance score, clamped to the `[0, 100]` axis.
pub fn score_percent(score: f64) -> f64 {
    score.clamp(0.0, 1.0) * 100.0
}

/// Number of filled cells for a percentage on a bar of `width` cells.
pub fn filled_cells(percent: f64, width: usize) -> usize {
    (((percent / 100.0) * width as f64).round() as usize).min(width)
}

/// Render the chart as a text frame, one row per source.
///
/// Returns `None` (after logging) when there is nothing to draw or the
/// output is too narrow; never panics.
pub fn relevance_chart(sources: &[Source], width: usize) -> Option<String> {
    if sources.is_empty() {
        warn!("missing data for relevance chart");
        return None;
    }
    if width < MIN_WIDTH {
        warn!("output too narrow for relevance chart ({} columns)", width);
        return None;
    }

    let label_width = sources
        .iter()
        .map(|s| measure_text_width(&s.document_title))
        .max()
        .unwrap_or(0)
        .clamp(1, MAX_LABEL_WIDTH);
    let value_width = "100.0%".len();
    let bar_width = width
        .saturating_sub(label_width + value_width + 4)
        .max(MIN_BAR_WIDTH);

    let mut out = String::new();
    for source in sources {
        let pct = score_percent(source.relevance_score);
        let filled = filled_cells(pct, bar_width);
        let label = truncate_str(&source.document_title, label_width, "…");
        let bar = format!(
            "{}{}",
            style("█".repeat(filled)).cyan(),
            style("░".repeat(bar_width - filled)).dim(),
        );
        out.push_str(&format!(
            "{label:<label_width$}  {bar}  {value:>value_width$}\n",
            value = format!("{:.1}%", pct),
        ));
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(title: &str, score: f64) -> Source {
        Source {
            document_title: title.to_string(),
            chunk_content: String::new(),
            relevance_score: score,
        }
    }

    fn plain(frame: &str) -> String {
        console::strip_ansi_codes(frame).to_string()
    }

    #[test]
    fn empty_sources_render_nothing() {
        assert!(relevance_chart(&[], 80).is_none());
    }

    #[test]
    fn narrow_output_renders_nothing() {
        let sources = vec![source("doc.txt", 0.5)];
        assert!(relevance_chart(&sources, 10).is_none());
    }

    #[test]
    fn one_row_per_source_with_percent_annotation() {
        let sources = vec![source("climate_report.txt", 0.825), source("notes.txt", 0.31)];
        let frame = plain(&relevance_chart(&sources, 80).unwrap());
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("climate_report.txt"));
        assert!(lines[0].ends_with("82.5%"));
        assert!(lines[1].ends_with("31.0%"));
    }

    #[test]
    fn scores_clamp_to_the_axis() {
        let sources = vec![source("over.txt", 1.7), source("under.txt", -0.2)];
        let frame = plain(&relevance_chart(&sources, 60).unwrap());
        let lines: Vec<&str> = frame.lines().collect();
        assert!(lines[0].ends_with("100.0%"));
        assert!(lines[1].ends_with("0.0%"));
        assert!(!lines[1].contains('█'));
    }

    #[test]
    fn long_titles_are_truncated_not_overflowed() {
        let sources = vec![source(
            "a_very_long_document_title_that_keeps_going_and_going.txt",
            0.5,
        )];
        let frame = plain(&relevance_chart(&sources, 60).unwrap());
        assert!(frame.contains('…'));
    }

    #[test]
    fn filled_cell_math() {
        assert_eq!(filled_cells(0.0, 30), 0);
        assert_eq!(filled_cells(50.0, 30), 15);
        assert_eq!(filled_cells(100.0, 30), 30);
        // Rounds rather than floors.
        assert_eq!(filled_cells(99.9, 30), 30);
    }

    #[test]
    fn relevance_label_formats_one_decimal() {
        assert_eq!(relevance_label(82.5), "Relevance: 82.5%");
        assert_eq!(relevance_label(0.0), "Relevance: 0.0%");
        assert_eq!(relevance_label(100.0), "Relevance: 100.0%");
    }

    #[test]
    fn score_percent_clamps() {
        assert_eq!(score_percent(0.5), 50.0);
        assert_eq!(score_percent(2.0), 100.0);
        assert_eq!(score_percent(-1.0), 0.0);
    }
}
