//! HTTP handlers for advisory queries and history

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::{ChatLog, Language, QueryRecord};

use crate::error::AppResult;
use crate::middleware::CurrentFarmer;
use crate::services::AdviceResponse;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AskInput {
    pub query: String,
    #[serde(default)]
    pub language: Language,
}

/// Ask for advice
pub async fn ask(
    State(state): State<AppState>,
    current: CurrentFarmer,
    Json(input): Json<AskInput>,
) -> AppResult<Json<AdviceResponse>> {
    let response = state
        .advisory
        .ask(&current.0, &input.query, input.language)
        .await?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// Recent queries, newest first
pub async fn history(
    State(state): State<AppState>,
    current: CurrentFarmer,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<QueryRecord>>> {
    let records = state.advisory.history(current.0.id, query.limit).await?;
    Ok(Json(records))
}

/// Recent history as a chronological chat log
pub async fn chat_log(
    State(state): State<AppState>,
    current: CurrentFarmer,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<ChatLog>> {
    let log = state.advisory.chat_log(current.0.id, query.limit).await?;
    Ok(Json(log))
}
