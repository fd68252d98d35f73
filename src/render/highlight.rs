//! Query-term highlighting for retrieved source text.
//!
//! Tokens come from the query: lowercased, whitespace-split, and only
//! tokens strictly longer than three characters survive, applied in query
//! order without deduplication. Matching is case-insensitive. Claimed spans
//! are tracked so a later token never wraps inside an earlier match.

use regex::RegexBuilder;

/// Query words must be strictly longer than this to be highlighted.
const MIN_TOKEN_LEN: usize = 3;

/// A run of source text, marked when it matched a query token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub matched: bool,
}

/// Split `source` into matched and unmatched runs for `query`.
///
/// Empty input on either side yields the source as a single unmatched
/// segment. The segments always concatenate back to the source text.
pub fn highlight_segments(source: &str, query: &str) -> Vec<Segment> {
    if source.is_empty() || query.is_empty() {
        return vec![Segment {
            text: source.to_string(),
            matched: false,
        }];
    }

    let lowered = query.to_lowercase();
    let tokens = lowered
        .split_whitespace()
        .filter(|w| w.chars().count() > MIN_TOKEN_LEN);

    let mut claimed: Vec<(usize, usize)> = Vec::new();
    for token in tokens {
        let Ok(re) = RegexBuilder::new(&regex::escape(token))
            .case_insensitive(true)
            .build()
        else {
            continue;
        };
        for m in re.find_iter(source) {
            let span = (m.start(), m.end());
            if !overlaps_any(&claimed, span) {
                claimed.push(span);
            }
        }
    }
    claimed.sort_unstable();

    let mut segments = Vec::new();
    let mut cursor = 0;
    for (start, end) in claimed {
        if start > cursor {
            segments.push(Segment {
                text: source[cursor..start].to_string(),
                matched: false,
            });
        }
        segments.push(Segment {
            text: source[start..end].to_string(),
            matched: true,
        });
        cursor = end;
    }
    if cursor < source.len() {
        segments.push(Segment {
            text: source[cursor..].to_string(),
            matched: false,
        });
    }
    segments
}

/// Wrap matched runs with the given markers.
///
/// The unmatched text is inserted verbatim: callers own any escaping their
/// output medium needs.
pub fn highlight_with(source: &str, query: &str, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for seg in highlight_segments(source, query) {
        if seg.matched {
            out.push_str(open);
            out.push_str(&seg.text);
            out.push_str(close);
        } else {
            out.push_str(&seg.text);
        }
    }
    out
}

/// Highlight for terminal output.
///
/// Pre-existing escape sequences in the source are stripped before styling,
/// so untrusted document text cannot smuggle control sequences into the
/// terminal.
pub fn highlight_terminal(source: &str, query: &str) -> String {
    let clean = console::strip_ansi_codes(source);
    let style = console::Style::new().black().on_yellow();
    let mut out = String::with_capacity(clean.len());
    for seg in highlight_segments(&clean, query) {
        if seg.matched {
            out.push_str(&style.apply_to(seg.text.as_str()).to_string());
        } else {
            out.push_str(&seg.text);
        }
    }
    out
}

fn overlaps_any(claimed: &[(usize, usize)], span: (usize, usize)) -> bool {
    claimed.iter().any(|&(s, e)| span.0 < e && s < span.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_matching_tokens_case_insensitively() {
        // "fox" is only three characters and is filtered out.
        let out = highlight_with("The Quick Brown Fox", "quick fox", "<mark>", "</mark>");
        assert_eq!(out, "The <mark>Quick</mark> Brown Fox");
    }

    #[test]
    fn wraps_every_occurrence() {
        let out = highlight_with("Rust is rust is RUST", "rust", "[", "]");
        assert_eq!(out, "[Rust] is [rust] is [RUST]");
    }

    #[test]
    fn empty_inputs_pass_through() {
        assert_eq!(highlight_with("", "query", "[", "]"), "");
        assert_eq!(highlight_with("some text", "", "[", "]"), "some text");
    }

    #[test]
    fn short_tokens_are_ignored() {
        let out = highlight_with("the cat sat on the mat", "the cat sat", "[", "]");
        assert_eq!(out, "the cat sat on the mat");
    }

    #[test]
    fn overlapping_tokens_do_not_double_wrap() {
        // "background" claims its span first; "grounds" overlaps it and is
        // skipped rather than nested inside the existing markers.
        let out = highlight_with("backgrounds", "background grounds", "[", "]");
        assert_eq!(out, "[background]s");
    }

    #[test]
    fn earlier_query_tokens_take_precedence() {
        let out = highlight_with("abcdef", "cdef abcd", "[", "]");
        assert_eq!(out, "ab[cdef]");
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let out = highlight_with("what? what!", "what?", "[", "]");
        assert_eq!(out, "[what?] what!");
    }

    #[test]
    fn segments_concatenate_back_to_source() {
        let source = "Relevance scoring ranks retrieved passages.";
        let joined: String = highlight_segments(source, "relevance passages")
            .into_iter()
            .map(|s| s.text)
            .collect();
        assert_eq!(joined, source);
    }

    #[test]
    fn terminal_variant_strips_preexisting_ansi() {
        let tainted = "plain \x1b[31mred\x1b[0m text";
        let out = highlight_terminal(tainted, "");
        assert_eq!(out, "plain red text");
    }
}
