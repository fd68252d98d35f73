//! Ephemeral user notifications.
//!
//! Notices are the terminal counterpart of toast popups: created on demand
//! with a timestamp-based id, shown with severity styling, and dropped from
//! the board once their display window passes. One-shot CLI commands use
//! [`emit`] instead, which writes a single styled line to stderr.

use std::time::{Duration, Instant};

use console::Style;

/// How long a notice stays on the board.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

/// Notice severity, mapped to styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    /// Short tag shown before the message.
    pub fn tag(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "ok",
            Severity::Warning => "warn",
            Severity::Error => "error",
        }
    }

    /// Terminal style for this severity.
    pub fn style(self) -> Style {
        match self {
            Severity::Info => Style::new().cyan(),
            Severity::Success => Style::new().green(),
            Severity::Warning => Style::new().yellow(),
            Severity::Error => Style::new().red().bold(),
        }
    }
}

/// A single notification.
#[derive(Debug, Clone)]
pub struct Notice {
    pub id: String,
    pub severity: Severity,
    pub message: String,
    created: Instant,
}

/// Live notices with a fixed display window.
#[derive(Debug)]
pub struct NoticeBoard {
    ttl: Duration,
    seq: u64,
    notices: Vec<Notice>,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::with_ttl(NOTICE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            seq: 0,
            notices: Vec::new(),
        }
    }

    /// Add a notice and return its id.
    ///
    /// Ids are timestamp-based with a sequence suffix so notices created in
    /// the same millisecond stay distinct.
    pub fn push(&mut self, severity: Severity, message: impl Into<String>) -> String {
        self.seq += 1;
        let id = format!(
            "notice-{}-{}",
            chrono::Utc::now().timestamp_millis(),
            self.seq
        );
        self.notices.push(Notice {
            id: id.clone(),
            severity,
            message: message.into(),
            created: Instant::now(),
        });
        id
    }

    /// Drop notices whose display window has passed.
    pub fn sweep(&mut self) {
        self.sweep_at(Instant::now());
    }

    fn sweep_at(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.notices
            .retain(|n| now.saturating_duration_since(n.created) < ttl);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

/// Print a one-shot styled notification line to stderr.
pub fn emit(severity: Severity, message: &str) {
    let tag = severity
        .style()
        .for_stderr()
        .apply_to(format!("[{}]", severity.tag()));
    eprintln!("{} {}", tag, message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_within_a_millisecond() {
        let mut board = NoticeBoard::new();
        let a = board.push(Severity::Info, "first");
        let b = board.push(Severity::Info, "second");
        assert_ne!(a, b);
        assert!(a.starts_with("notice-"));
    }

    #[test]
    fn sweep_drops_only_expired_notices() {
        let mut board = NoticeBoard::with_ttl(Duration::from_secs(5));
        board.push(Severity::Success, "stays");
        board.sweep_at(Instant::now() + Duration::from_secs(1));
        assert_eq!(board.len(), 1);
        board.sweep_at(Instant::now() + Duration::from_secs(6));
        assert!(board.is_empty());
    }

    #[test]
    fn severity_tags() {
        assert_eq!(Severity::Info.tag(), "info");
        assert_eq!(Severity::Success.tag(), "ok");
        assert_eq!(Severity::Warning.tag(), "warn");
        assert_eq!(Severity::Error.tag(), "error");
    }
}
