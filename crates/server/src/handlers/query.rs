use crate::error::Result;
use crate::state::AppState;
use axum::{extract::State, Json};
use coursemate_rag::Source;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<Source>,
    pub session_id: String,
}

/// POST /api/query - Answer a question about the courses
///
/// A session is created when the request carries none (or an empty id).
pub async fn query_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    let session_id = match request.session_id.filter(|id| !id.is_empty()) {
        Some(id) => id,
        None => state.rag.sessions().create_session(),
    };

    let (answer, sources) = state.rag.query(&request.query, Some(&session_id)).await?;

    tracing::info!(
        session_id = %session_id,
        sources = sources.len(),
        "Query answered"
    );

    Ok(Json(QueryResponse {
        answer,
        sources,
        session_id,
    }))
}
