use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::Value;
use shiftcheck_core::AppError;

use super::sessions::session_with_answers;
use crate::dto::{PreviewIssue, PreviewRequest, PreviewResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// Lists all form documents, ordered by id.
pub async fn list_forms_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<Value>>> {
    let forms = state.form_service.list_forms().await?;
    let documents = forms
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<Value>, _>>()
        .map_err(|error| AppError::Internal(format!("failed to encode forms: {error}")))?;
    Ok(Json(documents))
}

/// Returns one form document (the export wire format).
pub async fn get_form_handler(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let document = state.form_service.export_form(form_id.as_str()).await?;
    Ok(Json(document))
}

/// Saves or replaces one form document (the import wire format).
pub async fn save_form_handler(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    Json(document): Json<Value>,
) -> ApiResult<Json<Value>> {
    let document_id = document.get("id").and_then(Value::as_str).unwrap_or("");
    if document_id != form_id {
        return Err(AppError::Validation(format!(
            "form id in path '{form_id}' must match document id '{document_id}'"
        ))
        .into());
    }

    let saved = state.form_service.import_form(document).await?;
    let encoded = serde_json::to_value(&saved)
        .map_err(|error| AppError::Internal(format!("failed to encode form: {error}")))?;
    Ok(Json(encoded))
}

/// Deletes one form document.
pub async fn delete_form_handler(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.form_service.delete_form(form_id.as_str()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Resolves visibility and validation for candidate answers — the builder's
/// live preview, running the same engine as the form runner.
pub async fn preview_form_handler(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    Json(payload): Json<PreviewRequest>,
) -> ApiResult<Json<PreviewResponse>> {
    let form = state.form_service.get_form(form_id.as_str()).await?;
    let session = session_with_answers(form, &payload.answers)?;

    Ok(Json(PreviewResponse {
        visible_fields: session.visible_field_ids(),
        issues: session
            .validate()
            .into_iter()
            .map(PreviewIssue::from)
            .collect(),
        answers: session.submitted_answers(),
    }))
}
