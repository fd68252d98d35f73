//! Async client for the RAG backend HTTP API.
//!
//! One method per endpoint. Each call validates its input locally first,
//! issues at most one request, and resolves to exactly one outcome via its
//! `Result`. There is no retry, no caching, and no coordination between
//! calls; overlapping requests share nothing but the connection pool.

use std::path::Path;
use std::time::Duration;

use reqwest::{multipart, Body, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::Settings;
use crate::error::{RagError, UNKNOWN_ERROR_MSG};
use crate::models::{
    DocumentDetail, DocumentSummary, QueryOutcome, RecentQuery, UploadReceipt,
};

/// Client for the RAG backend API.
#[derive(Clone)]
pub struct RagClient {
    client: Client,
    endpoint: String,
    upload_chunk_size: usize,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct DocumentsEnvelope {
    documents: Vec<DocumentSummary>,
}

#[derive(Debug, Deserialize)]
struct DocumentEnvelope {
    document: DocumentDetail,
}

#[derive(Debug, Deserialize)]
struct QueriesEnvelope {
    queries: Vec<RecentQuery>,
}

impl RagClient {
    /// Create a new client from settings.
    pub fn new(settings: &Settings) -> Self {
        let client = Client::builder()
            .user_agent(&settings.user_agent)
            .timeout(Duration::from_secs(settings.request_timeout))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            upload_chunk_size: settings.upload_chunk_size.max(1),
        }
    }

    /// Base URL this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit a query and return the answer with its sources.
    ///
    /// Empty or whitespace-only text fails with a validation error before
    /// any request is issued.
    pub async fn submit_query(&self, text: &str) -> Result<QueryOutcome, RagError> {
        if text.trim().is_empty() {
            return Err(RagError::Validation(
                "Query text cannot be empty".to_string(),
            ));
        }

        let url = format!("{}/api/query", self.endpoint);
        debug!("Submitting query to {}", url);
        let resp = self
            .client
            .post(&url)
            .json(&QueryRequest { query: text })
            .send()
            .await
            .map_err(RagError::from_send)?;

        unwrap_envelope(resp).await
    }

    /// Upload a document for indexing.
    ///
    /// `on_progress` receives whole percentages in `[0, 100]` as body
    /// chunks are handed to the transport; values are non-decreasing and
    /// finish at 100. An unreadable path fails with a validation error
    /// before any request is issued.
    pub async fn upload_document<F>(
        &self,
        path: &Path,
        mut on_progress: F,
    ) -> Result<UploadReceipt, RagError>
    where
        F: FnMut(u8) + Send + 'static,
    {
        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => return Err(RagError::Validation("No file provided".to_string())),
        };
        let data = tokio::fs::read(path).await.map_err(|e| {
            RagError::Validation(format!("Cannot read {}: {}", path.display(), e))
        })?;

        let total = data.len() as u64;
        let part = if total == 0 {
            // Nothing to stream; report completion up front.
            on_progress(100);
            multipart::Part::bytes(Vec::new())
        } else {
            let chunks: Vec<Vec<u8>> = data
                .chunks(self.upload_chunk_size)
                .map(|c| c.to_vec())
                .collect();
            let mut sent: u64 = 0;
            let stream = futures::stream::iter(chunks.into_iter().map(move |chunk| {
                sent += chunk.len() as u64;
                on_progress(percent(sent, total));
                Ok::<_, std::convert::Infallible>(chunk)
            }));
            multipart::Part::stream_with_length(Body::wrap_stream(stream), total)
        };
        let form = multipart::Form::new().part("document", part.file_name(file_name));

        let url = format!("{}/api/documents/upload", self.endpoint);
        debug!("Uploading document to {}", url);
        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(RagError::from_send)?;

        unwrap_envelope(resp).await
    }

    /// List all indexed documents.
    pub async fn list_documents(&self) -> Result<Vec<DocumentSummary>, RagError> {
        let url = format!("{}/api/documents", self.endpoint);
        debug!("Listing documents from {}", url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(RagError::from_send)?;

        let envelope: DocumentsEnvelope = unwrap_envelope(resp).await?;
        Ok(envelope.documents)
    }

    /// Fetch one document with its chunk previews.
    ///
    /// A non-positive id fails with a validation error before any request
    /// is issued.
    pub async fn fetch_document(&self, id: i64) -> Result<DocumentDetail, RagError> {
        if id <= 0 {
            return Err(RagError::Validation(
                "No document ID provided".to_string(),
            ));
        }

        let url = format!("{}/api/documents/{}", self.endpoint, id);
        debug!("Fetching document from {}", url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(RagError::from_send)?;

        let envelope: DocumentEnvelope = unwrap_envelope(resp).await?;
        Ok(envelope.document)
    }

    /// Fetch recent queries, newest first.
    ///
    /// The limit is sent as a query parameter and enforced again
    /// client-side, since the reference backend ignores it.
    pub async fn recent_queries(&self, limit: usize) -> Result<Vec<RecentQuery>, RagError> {
        let url = format!("{}/api/queries", self.endpoint);
        debug!("Fetching recent queries from {}", url);
        let resp = self
            .client
            .get(&url)
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(RagError::from_send)?;

        let envelope: QueriesEnvelope = unwrap_envelope(resp).await?;
        let mut queries = envelope.queries;
        queries.truncate(limit);
        Ok(queries)
    }
}

/// Whole-number upload percentage: `round(loaded * 100 / total)`.
pub(crate) fn percent(loaded: u64, total: u64) -> u8 {
    ((loaded as f64) * 100.0 / (total as f64)).round() as u8
}

/// Resolve a response into its typed payload.
///
/// Non-2xx: the body's `error` field, else the status reason, else the
/// unknown-error fallback. 2xx without a truthy `success` flag: the `error`
/// field or the fallback. Otherwise the payload is decoded from the full
/// body; decode failures surface the decoder's description.
async fn unwrap_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, RagError> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| RagError::Transport(e.to_string()))?;
    let value: Value = serde_json::from_str(&body).unwrap_or(Value::Null);

    if !status.is_success() {
        return Err(RagError::Service(error_message(&value, status)));
    }

    if !value.get("success").and_then(Value::as_bool).unwrap_or(false) {
        let msg = value
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_ERROR_MSG)
            .to_string();
        return Err(RagError::Service(msg));
    }

    serde_json::from_value(value).map_err(|e| RagError::Transport(e.to_string()))
}

fn error_message(value: &Value, status: StatusCode) -> String {
    value
        .get("error")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| UNKNOWN_ERROR_MSG.to_string())
}
