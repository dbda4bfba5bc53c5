use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::Utc;
use serde::Deserialize;
use shiftcheck_domain::date_key_for;

use super::sessions::session_with_answers;
use crate::dto::{
    SubmissionPageResponse, SubmissionQueryParams, SubmissionResponse, SubmitRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// Runs a submit for the form runner: loads the form, replays the answers
/// through a session, and appends the submission.
pub async fn submit_handler(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    Json(payload): Json<SubmitRequest>,
) -> ApiResult<(StatusCode, Json<SubmissionResponse>)> {
    let form = state.form_service.get_form(form_id.as_str()).await?;
    let date_key = payload
        .date_key
        .unwrap_or_else(|| date_key_for(form.period(), Utc::now().date_naive()));

    let mut session = session_with_answers(form, &payload.answers)?;
    let submission = state
        .submission_service
        .submit(&mut session, payload.staff, date_key.as_str())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse::from(submission)),
    ))
}

/// Browses submissions newest first with filters and keyset pagination
/// (admin).
pub async fn query_submissions_handler(
    State(state): State<AppState>,
    Query(params): Query<SubmissionQueryParams>,
) -> ApiResult<Json<SubmissionPageResponse>> {
    let query = params.into_query()?;
    let page = state.submission_service.query_submissions(query).await?;
    Ok(Json(SubmissionPageResponse::from(page)))
}

/// Query-string selector for one pair's period window.
#[derive(Debug, Deserialize)]
pub struct PairWindowParams {
    /// Form id.
    pub form_id: String,
    /// Order-independent staff-pair key.
    pub staff_key: String,
    /// Period date key.
    pub date_key: String,
}

/// Lists one pair's submissions for one period window, oldest first (admin).
pub async fn list_by_pair_handler(
    State(state): State<AppState>,
    Query(params): Query<PairWindowParams>,
) -> ApiResult<Json<Vec<SubmissionResponse>>> {
    let listed = state
        .submission_service
        .list_by_pair(
            params.form_id.as_str(),
            params.staff_key.as_str(),
            params.date_key.as_str(),
        )
        .await?;

    Ok(Json(
        listed.into_iter().map(SubmissionResponse::from).collect(),
    ))
}
