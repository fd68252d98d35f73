//! Interactive terminal UI.
//!
//! Tabbed panes for querying, browsing documents, and reviewing recent
//! queries. The event loop is single-threaded and cooperative: API calls
//! are spawned onto the tokio runtime and their outcomes drained from a
//! channel once per frame, so the screen is the only shared mutable
//! resource.

pub mod sink;
pub mod widgets;

use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::client::RagClient;
use crate::models::{DocumentDetail, DocumentSummary, QueryOutcome, RecentQuery};
use crate::notify::{NoticeBoard, Severity};
use crate::render::chart;
use sink::{ui_channel, UiDrain, UiEvent, UiSink};

/// Top-level panes. The active one is marked in the tab bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Query,
    Documents,
    Recent,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Query, Tab::Documents, Tab::Recent];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Query => "Query",
            Tab::Documents => "Documents",
            Tab::Recent => "Recent",
        }
    }

    fn next(self) -> Tab {
        match self {
            Tab::Query => Tab::Documents,
            Tab::Documents => Tab::Recent,
            Tab::Recent => Tab::Query,
        }
    }

    fn prev(self) -> Tab {
        match self {
            Tab::Query => Tab::Recent,
            Tab::Documents => Tab::Query,
            Tab::Recent => Tab::Documents,
        }
    }
}

/// What the input line currently feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Query,
    UploadPath,
}

#[derive(Default)]
pub struct QueryPane {
    pub busy: bool,
    pub last_query: String,
    pub outcome: Option<QueryOutcome>,
    pub selected_source: usize,
}

#[derive(Default)]
pub struct DocumentsPane {
    pub busy: bool,
    pub loaded: bool,
    pub list: Vec<DocumentSummary>,
    pub selected: usize,
    pub detail: Option<DocumentDetail>,
}

#[derive(Default)]
pub struct RecentPane {
    pub busy: bool,
    pub loaded: bool,
    pub list: Vec<RecentQuery>,
}

/// TUI application state.
pub struct RagTui {
    client: RagClient,
    handle: tokio::runtime::Handle,
    sink: UiSink,
    drain: UiDrain,
    recent_limit: usize,
    pub active_tab: Tab,
    pub input: String,
    pub input_mode: InputMode,
    pub query: QueryPane,
    pub documents: DocumentsPane,
    pub recent: RecentPane,
    pub upload_percent: Option<u8>,
    pub notices: NoticeBoard,
    should_quit: bool,
}

impl RagTui {
    pub fn new(
        client: RagClient,
        handle: tokio::runtime::Handle,
        sink: UiSink,
        drain: UiDrain,
        recent_limit: usize,
    ) -> Self {
        Self {
            client,
            handle,
            sink,
            drain,
            recent_limit,
            active_tab: Tab::Query,
            input: String::new(),
            input_mode: InputMode::Query,
            query: QueryPane::default(),
            documents: DocumentsPane::default(),
            recent: RecentPane::default(),
            upload_percent: None,
            notices: NoticeBoard::new(),
            should_quit: false,
        }
    }

    /// Run the event loop until the user quits.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let mut terminal = ratatui::init();

        loop {
            for ev in self.drain.drain() {
                self.apply_event(ev);
            }
            self.notices.sweep();

            terminal.draw(|frame| widgets::render(frame, self))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    self.handle_key(key.code, key.modifiers);
                }
            }
        }

        ratatui::restore();
        Ok(())
    }

    /// Contextual hint for the focused pane (shown in the bottom line).
    pub fn hint(&self) -> String {
        if let Some(pct) = self.upload_percent {
            return format!("Uploading... {}%", pct);
        }
        if self.input_mode == InputMode::UploadPath {
            return "Enter a file path to upload. Esc cancels.".to_string();
        }
        match self.active_tab {
            Tab::Query => {
                if let Some(outcome) = &self.query.outcome {
                    if let Some(source) = outcome.sources.get(self.query.selected_source) {
                        let pct = chart::score_percent(source.relevance_score);
                        return format!(
                            "{} - Up/Down picks a source, Tab switches panes",
                            chart::relevance_label(pct)
                        );
                    }
                }
                "Type a question and press Enter. Tab switches panes, Ctrl+C quits.".to_string()
            }
            Tab::Documents => {
                if self.documents.detail.is_some() {
                    "Esc closes the preview.".to_string()
                } else {
                    "Up/Down select, Enter preview, u upload, r refresh, q quit.".to_string()
                }
            }
            Tab::Recent => "r refreshes, Tab switches panes, q quits.".to_string(),
        }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.input_mode == InputMode::UploadPath {
            match code {
                KeyCode::Enter => self.start_upload(),
                KeyCode::Esc => {
                    self.input.clear();
                    self.input_mode = InputMode::Query;
                }
                KeyCode::Char(c) => self.input.push(c),
                KeyCode::Backspace => {
                    self.input.pop();
                }
                _ => {}
            }
            return;
        }

        match code {
            KeyCode::Tab => self.select_tab(self.active_tab.next()),
            KeyCode::BackTab => self.select_tab(self.active_tab.prev()),
            _ => match self.active_tab {
                Tab::Query => self.handle_query_key(code),
                Tab::Documents => self.handle_documents_key(code),
                Tab::Recent => self.handle_recent_key(code),
            },
        }
    }

    fn handle_query_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => self.submit_query(),
            KeyCode::Char(c) => self.input.push(c),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Esc => self.input.clear(),
            KeyCode::Up => {
                self.query.selected_source = self.query.selected_source.saturating_sub(1);
            }
            KeyCode::Down => {
                if let Some(outcome) = &self.query.outcome {
                    if !outcome.sources.is_empty() {
                        self.query.selected_source =
                            (self.query.selected_source + 1).min(outcome.sources.len() - 1);
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_documents_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc if self.documents.detail.is_some() => {
                self.documents.detail = None;
            }
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('r') => self.refresh_documents(),
            KeyCode::Char('u') => {
                self.input.clear();
                self.input_mode = InputMode::UploadPath;
            }
            KeyCode::Up => {
                self.documents.selected = self.documents.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if !self.documents.list.is_empty() {
                    self.documents.selected =
                        (self.documents.selected + 1).min(self.documents.list.len() - 1);
                }
            }
            KeyCode::Enter => self.open_selected_document(),
            _ => {}
        }
    }

    fn handle_recent_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('r') => self.refresh_recent(),
            _ => {}
        }
    }

    fn select_tab(&mut self, tab: Tab) {
        self.input_mode = InputMode::Query;
        self.active_tab = tab;
        match tab {
            Tab::Documents if !self.documents.loaded && !self.documents.busy => {
                self.refresh_documents()
            }
            Tab::Recent if !self.recent.loaded && !self.recent.busy => self.refresh_recent(),
            _ => {}
        }
    }

    fn submit_query(&mut self) {
        if self.query.busy {
            self.notices
                .push(Severity::Warning, "A query is already running");
            return;
        }
        let text = self.input.trim().to_string();
        self.input.clear();
        self.query.last_query = text.clone();
        self.query.busy = true;

        let client = self.client.clone();
        let sink = self.sink.clone();
        self.handle.spawn(async move {
            sink.send(UiEvent::QueryFinished(client.submit_query(&text).await));
        });
    }

    fn start_upload(&mut self) {
        let path = self.input.trim().to_string();
        self.input.clear();
        self.input_mode = InputMode::Query;
        if path.is_empty() {
            self.notices.push(Severity::Error, "No file provided");
            return;
        }
        self.upload_percent = Some(0);

        let client = self.client.clone();
        let sink = self.sink.clone();
        let progress_sink = self.sink.clone();
        self.handle.spawn(async move {
            let result = client
                .upload_document(PathBuf::from(path).as_path(), move |pct| {
                    progress_sink.send(UiEvent::UploadProgress(pct))
                })
                .await;
            sink.send(UiEvent::UploadFinished(result));
        });
    }

    fn refresh_documents(&mut self) {
        self.documents.busy = true;
        let client = self.client.clone();
        let sink = self.sink.clone();
        self.handle.spawn(async move {
            sink.send(UiEvent::DocumentsLoaded(client.list_documents().await));
        });
    }

    fn open_selected_document(&mut self) {
        let Some(doc) = self.documents.list.get(self.documents.selected) else {
            return;
        };
        let id = doc.id;
        let client = self.client.clone();
        let sink = self.sink.clone();
        self.handle.spawn(async move {
            sink.send(UiEvent::DocumentLoaded(client.fetch_document(id).await));
        });
    }

    fn refresh_recent(&mut self) {
        self.recent.busy = true;
        let limit = self.recent_limit;
        let client = self.client.clone();
        let sink = self.sink.clone();
        self.handle.spawn(async move {
            sink.send(UiEvent::RecentLoaded(client.recent_queries(limit).await));
        });
    }

    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::QueryFinished(Ok(outcome)) => {
                self.query.busy = false;
                self.query.selected_source = 0;
                self.query.outcome = Some(outcome);
            }
            UiEvent::QueryFinished(Err(e)) => {
                self.query.busy = false;
                self.notices.push(Severity::Error, e.to_string());
            }
            UiEvent::DocumentsLoaded(Ok(list)) => {
                self.documents.busy = false;
                self.documents.loaded = true;
                self.documents.selected =
                    self.documents.selected.min(list.len().saturating_sub(1));
                self.documents.list = list;
            }
            UiEvent::DocumentsLoaded(Err(e)) => {
                self.documents.busy = false;
                self.notices.push(Severity::Error, e.to_string());
            }
            UiEvent::DocumentLoaded(Ok(detail)) => {
                self.documents.detail = Some(detail);
            }
            UiEvent::DocumentLoaded(Err(e)) => {
                self.notices.push(Severity::Error, e.to_string());
            }
            UiEvent::RecentLoaded(Ok(list)) => {
                self.recent.busy = false;
                self.recent.loaded = true;
                self.recent.list = list;
            }
            UiEvent::RecentLoaded(Err(e)) => {
                self.recent.busy = false;
                self.notices.push(Severity::Error, e.to_string());
            }
            UiEvent::UploadProgress(pct) => {
                // Repeated reports never move the readout backwards.
                let current = self.upload_percent.unwrap_or(0);
                self.upload_percent = Some(current.max(pct));
            }
            UiEvent::UploadFinished(result) => {
                self.upload_percent = None;
                match result {
                    Ok(receipt) => {
                        self.notices.push(
                            Severity::Success,
                            format!(
                                "Uploaded {} as document {}",
                                receipt.filename, receipt.document_id
                            ),
                        );
                        self.refresh_documents();
                    }
                    Err(e) => {
                        self.notices.push(Severity::Error, e.to_string());
                    }
                }
            }
        }
    }
}

/// Run the interactive UI on the current tokio runtime.
pub async fn launch(client: RagClient, recent_limit: usize) -> anyhow::Result<()> {
    let handle = tokio::runtime::Handle::current();
    tokio::task::spawn_blocking(move || {
        let (sink, drain) = ui_channel();
        let mut app = RagTui::new(client, handle, sink, drain, recent_limit);
        app.run()
    })
    .await
    .map_err(|e| anyhow::anyhow!("UI task failed: {e}"))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::error::RagError;

    fn test_app() -> RagTui {
        let (sink, drain) = ui_channel();
        RagTui::new(
            RagClient::new(&Settings::default()),
            tokio::runtime::Handle::current(),
            sink,
            drain,
            10,
        )
    }

    #[tokio::test]
    async fn tabs_cycle_in_both_directions() {
        assert_eq!(Tab::Query.next(), Tab::Documents);
        assert_eq!(Tab::Recent.next(), Tab::Query);
        assert_eq!(Tab::Query.prev(), Tab::Recent);
        assert_eq!(Tab::Documents.prev(), Tab::Query);
    }

    #[tokio::test]
    async fn failed_query_surfaces_a_notice() {
        let mut app = test_app();
        app.query.busy = true;
        app.apply_event(UiEvent::QueryFinished(Err(RagError::Service(
            "Unknown error".into(),
        ))));
        assert!(!app.query.busy);
        assert_eq!(app.notices.len(), 1);
        assert!(app
            .notices
            .iter()
            .any(|n| n.message == "Unknown error" && n.severity == Severity::Error));
    }

    #[tokio::test]
    async fn document_selection_clamps_to_shorter_lists() {
        let mut app = test_app();
        app.documents.selected = 7;
        app.apply_event(UiEvent::DocumentsLoaded(Ok(vec![])));
        assert_eq!(app.documents.selected, 0);
    }

    #[tokio::test]
    async fn upload_progress_never_moves_backwards() {
        let mut app = test_app();
        app.apply_event(UiEvent::UploadProgress(50));
        app.apply_event(UiEvent::UploadProgress(25));
        assert_eq!(app.upload_percent, Some(50));
        app.apply_event(UiEvent::UploadProgress(100));
        assert_eq!(app.upload_percent, Some(100));
    }

    #[tokio::test]
    async fn hint_shows_tooltip_for_selected_source() {
        let mut app = test_app();
        app.apply_event(UiEvent::QueryFinished(Ok(QueryOutcome {
            query_id: 1,
            response: "answer".into(),
            sources: vec![crate::models::Source {
                document_title: "doc.txt".into(),
                chunk_content: "text".into(),
                relevance_score: 0.825,
            }],
        })));
        assert!(app.hint().starts_with("Relevance: 82.5%"));
    }

    #[tokio::test]
    async fn upload_hint_takes_precedence_while_in_flight() {
        let mut app = test_app();
        app.apply_event(UiEvent::UploadProgress(40));
        assert_eq!(app.hint(), "Uploading... 40%");
    }
}
