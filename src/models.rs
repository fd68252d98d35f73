//! Wire types for the RAG backend API.
//!
//! Everything here is transient and request-scoped; nothing is cached or
//! persisted client-side. Field names follow the backend's JSON.

use serde::Deserialize;

/// A retrieved source chunk returned alongside a query answer.
#[derive(Debug, Clone, Deserialize)]
pub struct Source {
    /// Title of the document the chunk came from.
    pub document_title: String,
    /// The chunk text itself.
    pub chunk_content: String,
    /// Normalized relevance in `[0.0, 1.0]`.
    pub relevance_score: f64,
}

/// Answer to a submitted query, with its supporting sources.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryOutcome {
    pub query_id: i64,
    /// The generated answer text.
    pub response: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// One row of the document listing.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentSummary {
    pub id: i64,
    pub filename: String,
    pub title: String,
    /// `"%Y-%m-%d %H:%M:%S"` as sent by the backend.
    pub upload_date: String,
    pub processed: bool,
}

/// Truncated chunk preview inside a document detail.
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkPreview {
    pub id: i64,
    pub content: String,
    pub chunk_index: i32,
}

/// Full document record with its chunk previews.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentDetail {
    pub id: i64,
    pub filename: String,
    pub title: String,
    pub content: String,
    pub upload_date: String,
    pub processed: bool,
    #[serde(default)]
    pub chunks: Vec<ChunkPreview>,
}

/// Truncated answer preview inside a recent-query row.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponsePreview {
    pub id: i64,
    pub content: String,
}

/// One row of the recent-queries listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RecentQuery {
    pub id: i64,
    pub content: String,
    /// `"%Y-%m-%d %H:%M:%S"` as sent by the backend.
    pub timestamp: String,
    #[serde(default)]
    pub responses: Vec<ResponsePreview>,
}

/// Acknowledgement for a completed upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadReceipt {
    pub document_id: i64,
    pub filename: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_outcome_decodes_backend_shape() {
        let body = serde_json::json!({
            "success": true,
            "query_id": 12,
            "response": "Photosynthesis converts light into chemical energy.",
            "sources": [
                {
                    "document_title": "biology_notes.txt",
                    "chunk_content": "Photosynthesis is the process...",
                    "relevance_score": 0.91
                }
            ]
        });
        let outcome: QueryOutcome = serde_json::from_value(body).unwrap();
        assert_eq!(outcome.query_id, 12);
        assert_eq!(outcome.sources.len(), 1);
        assert_eq!(outcome.sources[0].document_title, "biology_notes.txt");
        assert!((outcome.sources[0].relevance_score - 0.91).abs() < 1e-9);
    }

    #[test]
    fn query_outcome_tolerates_missing_sources() {
        let body = serde_json::json!({
            "success": true,
            "query_id": 1,
            "response": "No supporting documents."
        });
        let outcome: QueryOutcome = serde_json::from_value(body).unwrap();
        assert!(outcome.sources.is_empty());
    }

    #[test]
    fn document_detail_decodes_chunks() {
        let body = serde_json::json!({
            "id": 4,
            "filename": "report.txt",
            "title": "report.txt",
            "content": "Full text here.",
            "upload_date": "2024-03-01 14:05:00",
            "processed": true,
            "chunks": [
                {"id": 40, "content": "Full text...", "chunk_index": 0}
            ]
        });
        let doc: DocumentDetail = serde_json::from_value(body).unwrap();
        assert_eq!(doc.chunks.len(), 1);
        assert_eq!(doc.chunks[0].chunk_index, 0);
    }

    #[test]
    fn recent_query_decodes_response_previews() {
        let body = serde_json::json!({
            "id": 9,
            "content": "what is rust",
            "timestamp": "2024-03-02 09:30:00",
            "responses": [{"id": 2, "content": "Rust is a systems language..."}]
        });
        let query: RecentQuery = serde_json::from_value(body).unwrap();
        assert_eq!(query.responses[0].id, 2);
    }
}
