//! TUI widget rendering: tab bar, pane bodies, input area, hint line, and
//! the notice overlay.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::notify::Severity;
use crate::render::chart;
use crate::render::highlight;
use crate::render::{self, CONTENT_PLACEHOLDER};

use super::{InputMode, RagTui, Tab};

/// Main layout rendering.
pub fn render(frame: &mut Frame, app: &RagTui) {
    let [header_area, body_area, input_area, hint_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_tabs(frame, header_area, app);
    match app.active_tab {
        Tab::Query => render_query(frame, body_area, app),
        Tab::Documents => render_documents(frame, body_area, app),
        Tab::Recent => render_recent(frame, body_area, app),
    }
    render_input(frame, input_area, app);
    render_hint(frame, hint_area, app);
    render_notices(frame, app);
}

/// Tab bar; the active pane is marked.
fn render_tabs(frame: &mut Frame, area: Rect, app: &RagTui) {
    let active = Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let inactive = Style::default().fg(Color::DarkGray);

    let mut spans = vec![Span::styled(
        " rag ",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    for tab in Tab::ALL {
        let style = if tab == app.active_tab { active } else { inactive };
        spans.push(Span::styled(format!(" {} ", tab.title()), style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_query(frame: &mut Frame, area: Rect, app: &RagTui) {
    let Some(outcome) = &app.query.outcome else {
        let text = if app.query.busy {
            "Thinking..."
        } else {
            "Ask a question about your documents."
        };
        let widget = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(" Answer "));
        frame.render_widget(widget, area);
        return;
    };

    let bar_rows = (outcome.sources.len() as u16 + 2).min(8);
    let [answer_area, chart_area, source_area] = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(bar_rows),
        Constraint::Fill(1),
    ])
    .areas(area);

    let answer = Paragraph::new(outcome.response.as_str())
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Answer "));
    frame.render_widget(answer, answer_area);

    render_relevance_bars(frame, chart_area, app);
    render_selected_source(frame, source_area, app);
}

/// Horizontal relevance bars, one per source; the selected row is marked.
fn render_relevance_bars(frame: &mut Frame, area: Rect, app: &RagTui) {
    let Some(outcome) = &app.query.outcome else {
        return;
    };
    if outcome.sources.is_empty() {
        let widget = Paragraph::new("No sources returned.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(" Sources "));
        frame.render_widget(widget, area);
        return;
    }

    let label_width = 20usize;
    let value_width = "100.0%".len();
    let bar_width = (area.width as usize)
        .saturating_sub(label_width + value_width + 8)
        .max(8);

    let mut lines = Vec::new();
    for (i, source) in outcome.sources.iter().enumerate() {
        let pct = chart::score_percent(source.relevance_score);
        let filled = chart::filled_cells(pct, bar_width);
        let selected = i == app.query.selected_source;

        let marker = if selected { "▶ " } else { "  " };
        let label_style = if selected {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(marker.to_string(), Style::default().fg(Color::Cyan)),
            Span::styled(
                format!(
                    "{:<label_width$}",
                    render::truncate(&source.document_title, label_width.saturating_sub(3))
                ),
                label_style,
            ),
            Span::styled("█".repeat(filled), Style::default().fg(Color::Cyan)),
            Span::styled(
                "░".repeat(bar_width - filled),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(format!("  {:>value_width$}", format!("{:.1}%", pct))),
        ]));
    }

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Sources "));
    frame.render_widget(widget, area);
}

/// The selected source's chunk text with query terms highlighted.
fn render_selected_source(frame: &mut Frame, area: Rect, app: &RagTui) {
    let Some(outcome) = &app.query.outcome else {
        return;
    };
    let Some(source) = outcome.sources.get(app.query.selected_source) else {
        return;
    };

    let clean = console::strip_ansi_codes(&source.chunk_content);
    let lines = highlighted_lines(&clean, &app.query.last_query);
    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", source.document_title)),
    );
    frame.render_widget(widget, area);
}

fn render_documents(frame: &mut Frame, area: Rect, app: &RagTui) {
    if let Some(detail) = &app.documents.detail {
        let mut lines = vec![
            Line::from(Span::styled(
                format!(
                    "{} · uploaded {} · {}",
                    detail.filename,
                    render::format_timestamp(&detail.upload_date),
                    if detail.processed { "ready" } else { "processing" },
                ),
                Style::default().fg(Color::DarkGray),
            )),
            Line::raw(""),
        ];
        if detail.content.trim().is_empty() {
            lines.push(Line::from(Span::styled(
                CONTENT_PLACEHOLDER,
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
            )));
        } else {
            for part in detail.content.split('\n') {
                lines.push(Line::raw(part.to_string()));
            }
        }
        if !detail.chunks.is_empty() {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                format!("Chunks ({})", detail.chunks.len()),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for chunk in &detail.chunks {
                lines.push(Line::raw(format!(
                    "{:>4}  {}",
                    chunk.chunk_index,
                    render::truncate(&chunk.content, 100)
                )));
            }
        }
        let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", detail.title)),
        );
        frame.render_widget(widget, area);
        return;
    }

    let lines: Vec<Line> = if app.documents.list.is_empty() {
        let text = if app.documents.busy {
            "Loading documents..."
        } else {
            "No documents indexed yet. Press u to upload one."
        };
        vec![Line::from(Span::styled(
            text,
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        app.documents
            .list
            .iter()
            .enumerate()
            .map(|(i, doc)| {
                let selected = i == app.documents.selected;
                let marker = if selected { "▶ " } else { "  " };
                let style = if selected {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let status = if doc.processed { "ready" } else { "processing" };
                Line::from(vec![
                    Span::styled(marker.to_string(), Style::default().fg(Color::Cyan)),
                    Span::styled(
                        format!("{:<40}", render::truncate(&doc.title, 38)),
                        style,
                    ),
                    Span::styled(
                        format!(
                            "  {}  {}",
                            render::format_timestamp(&doc.upload_date),
                            status
                        ),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])
            })
            .collect()
    };

    // Keep the selection visible on long lists.
    let visible = area.height.saturating_sub(2) as usize;
    let offset = app.documents.selected.saturating_sub(visible.saturating_sub(1)) as u16;
    let widget = Paragraph::new(lines)
        .scroll((offset, 0))
        .block(Block::default().borders(Borders::ALL).title(" Documents "));
    frame.render_widget(widget, area);
}

fn render_recent(frame: &mut Frame, area: Rect, app: &RagTui) {
    let mut lines = Vec::new();
    if app.recent.list.is_empty() {
        let text = if app.recent.busy {
            "Loading recent queries..."
        } else {
            "No recent queries."
        };
        lines.push(Line::from(Span::styled(
            text,
            Style::default().fg(Color::DarkGray),
        )));
    }
    for query in &app.recent.list {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}  ", render::format_timestamp(&query.timestamp)),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(render::truncate(&query.content, 80)),
        ]));
        for resp in &query.responses {
            lines.push(Line::from(Span::styled(
                format!("    ↳ {}", render::truncate(&resp.content, 100)),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Recent queries "));
    frame.render_widget(widget, area);
}

fn render_input(frame: &mut Frame, area: Rect, app: &RagTui) {
    let title = match (app.input_mode, app.active_tab) {
        (InputMode::UploadPath, _) => " file path ",
        (_, Tab::Query) => " question ",
        _ => " input ",
    };
    let style = if app.input_mode == InputMode::UploadPath || app.active_tab == Tab::Query {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let widget = Paragraph::new(app.input.as_str())
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(widget, area);
}

fn render_hint(frame: &mut Frame, area: Rect, app: &RagTui) {
    let widget = Paragraph::new(Line::from(Span::styled(
        format!(" {}", app.hint()),
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(widget, area);
}

/// Notices overlay in the top-right corner; the board sweeps them out
/// after their display window.
fn render_notices(frame: &mut Frame, app: &RagTui) {
    if app.notices.is_empty() {
        return;
    }
    let area = frame.area();
    let width = 44u16.min(area.width);
    if width < 12 || area.height < 4 {
        return;
    }

    let lines: Vec<Line> = app
        .notices
        .iter()
        .map(|n| {
            Line::from(vec![
                Span::styled(
                    format!("[{}] ", n.severity.tag()),
                    Style::default().fg(severity_color(n.severity)),
                ),
                Span::raw(render::truncate(&n.message, width as usize - 12)),
            ])
        })
        .collect();

    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let overlay = Rect::new(area.width - width, 1, width, height);
    frame.render_widget(Clear, overlay);
    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, overlay);
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::Cyan,
        Severity::Success => Color::Green,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
    }
}

/// Split highlighted segments into ratatui lines, styling matched runs.
fn highlighted_lines(text: &str, query: &str) -> Vec<Line<'static>> {
    let matched_style = Style::default().fg(Color::Black).bg(Color::Yellow);
    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();

    for seg in highlight::highlight_segments(text, query) {
        let style = if seg.matched {
            matched_style
        } else {
            Style::default()
        };
        let mut parts = seg.text.split('\n').peekable();
        while let Some(part) = parts.next() {
            if !part.is_empty() {
                current.push(Span::styled(part.to_string(), style));
            }
            if parts.peek().is_some() {
                lines.push(Line::from(std::mem::take(&mut current)));
            }
        }
    }
    lines.push(Line::from(current));
    lines
}
