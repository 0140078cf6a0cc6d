//! Axum route handlers for the Scoring API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeData;
use crate::scoring::calculator::ScoreBreakdown;
use crate::scoring::checklist::ChecklistItem;
use crate::scoring::keywords::{extract_keywords, KeywordExtraction};
use crate::scoring::session::{ScoringInputs, SessionSnapshot};
use crate::scoring::tiered::{parse_keywords_flat, parse_tiered_keywords, TieredKeywords};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExtractKeywordsRequest {
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ParseKeywordsRequest {
    pub raw: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ParseKeywordsResponse {
    pub tiered: Option<TieredKeywords>,
    pub flat: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub resume: ResumeData,
    pub job_description: Option<String>,
    pub extracted_keywords: Option<Vec<String>>,
    pub primary_keywords: Option<Vec<String>>,
    /// Raw persisted keyword column; decoded when explicit keyword lists are absent.
    pub keyword_payload: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChecklistResponse {
    pub scores: ScoreBreakdown,
    pub checklist: Vec<ChecklistItem>,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

impl ScoreRequest {
    /// Resolves explicit keyword lists, falling back to the persisted payload.
    fn into_inputs(self) -> ScoringInputs {
        let (extracted_keywords, primary_keywords) = match self.extracted_keywords {
            Some(kws) => (Some(kws), self.primary_keywords),
            None => match parse_tiered_keywords(self.keyword_payload.as_deref()) {
                Some(tiers) => (
                    Some(tiers.all),
                    self.primary_keywords.or(Some(tiers.primary)),
                ),
                None => (None, self.primary_keywords),
            },
        };

        ScoringInputs {
            resume: self.resume,
            job_description: self.job_description,
            extracted_keywords,
            primary_keywords,
        }
    }
}

fn ensure_text_size(field: &str, text: Option<&str>, max_bytes: usize) -> Result<(), AppError> {
    match text {
        Some(t) if t.len() > max_bytes => Err(AppError::Validation(format!(
            "{field} exceeds the {max_bytes}-byte limit"
        ))),
        _ => Ok(()),
    }
}

fn validate_inputs(inputs: &ScoringInputs, max_bytes: usize) -> Result<(), AppError> {
    ensure_text_size("job_description", inputs.job_description.as_deref(), max_bytes)?;
    ensure_text_size(
        "resume",
        Some(inputs.resume.searchable_text().as_str()),
        max_bytes,
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Stateless handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/keywords/extract
pub async fn handle_extract_keywords(
    State(state): State<AppState>,
    Json(request): Json<ExtractKeywordsRequest>,
) -> Result<Json<KeywordExtraction>, AppError> {
    let max = state.config.max_text_bytes;
    ensure_text_size("resume_text", request.resume_text.as_deref(), max)?;
    ensure_text_size("job_description", request.job_description.as_deref(), max)?;

    Ok(Json(extract_keywords(
        request.resume_text.as_deref().unwrap_or_default(),
        request.job_description.as_deref().unwrap_or_default(),
    )))
}

/// POST /api/v1/keywords/parse
///
/// Decodes a persisted keyword column. Malformed payloads yield nulls, not errors.
pub async fn handle_parse_keywords(
    Json(request): Json<ParseKeywordsRequest>,
) -> Json<ParseKeywordsResponse> {
    let tiered = parse_tiered_keywords(request.raw.as_deref());
    let flat = parse_keywords_flat(request.raw.as_deref());
    Json(ParseKeywordsResponse { tiered, flat })
}

/// POST /api/v1/score
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreBreakdown>, AppError> {
    let inputs = request.into_inputs();
    validate_inputs(&inputs, state.config.max_text_bytes)?;
    Ok(Json(inputs.score()))
}

/// POST /api/v1/checklist
pub async fn handle_checklist(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ChecklistResponse>, AppError> {
    let inputs = request.into_inputs();
    validate_inputs(&inputs, state.config.max_text_bytes)?;
    let scores = inputs.score();
    let checklist = inputs.checklist(&scores);
    Ok(Json(ChecklistResponse { scores, checklist }))
}

// ────────────────────────────────────────────────────────────────────────────
// Session handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session = state.sessions.create().await;
    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id: session.id(),
        }),
    )
}

/// PUT /api/v1/sessions/:id/inputs
///
/// Stores the inputs and schedules a debounced rescore. Returns immediately.
pub async fn handle_update_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ScoreRequest>,
) -> Result<StatusCode, AppError> {
    let inputs = request.into_inputs();
    validate_inputs(&inputs, state.config.max_text_bytes)?;

    let session = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;
    session.update(inputs).await;

    Ok(StatusCode::ACCEPTED)
}

/// POST /api/v1/sessions/:id/recalculate
pub async fn handle_recalculate_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;
    Ok(Json(session.recalculate_now().await))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;
    Ok(Json(session.snapshot().await))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {session_id} not found")))
    }
}
