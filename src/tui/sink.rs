//! Channel plumbing between spawned API calls and the UI loop.
//!
//! Spawned tasks never touch UI state; they post an event and the loop
//! drains everything queued once per frame.

use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

use crate::error::RagError;
use crate::models::{
    DocumentDetail, DocumentSummary, QueryOutcome, RecentQuery, UploadReceipt,
};

/// Outcome of a background API call, delivered to the UI loop.
#[derive(Debug)]
pub enum UiEvent {
    QueryFinished(Result<QueryOutcome, RagError>),
    DocumentsLoaded(Result<Vec<DocumentSummary>, RagError>),
    DocumentLoaded(Result<DocumentDetail, RagError>),
    RecentLoaded(Result<Vec<RecentQuery>, RagError>),
    UploadProgress(u8),
    UploadFinished(Result<UploadReceipt, RagError>),
}

/// Create a connected sink/drain pair.
pub fn ui_channel() -> (UiSink, UiDrain) {
    let (tx, rx) = channel();
    (UiSink { tx }, UiDrain { rx })
}

/// Sending half, cloned into spawned tasks.
#[derive(Clone)]
pub struct UiSink {
    tx: Sender<UiEvent>,
}

impl UiSink {
    /// Deliver an event; a closed UI just drops it.
    pub fn send(&self, event: UiEvent) {
        let _ = self.tx.send(event);
    }
}

/// Receiving half, owned by the UI loop.
pub struct UiDrain {
    rx: Receiver<UiEvent>,
}

impl UiDrain {
    /// Collect everything queued since the last frame.
    pub fn drain(&self) -> Vec<UiEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(ev) => events.push(ev),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }
}
