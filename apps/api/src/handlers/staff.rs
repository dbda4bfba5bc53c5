use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use shiftcheck_application::StaffImportRow;
use shiftcheck_core::AppError;

use crate::dto::{CreateStaffRequest, ImportStaffRequest, StaffResponse, UpdateStaffRequest};
use crate::error::ApiResult;
use crate::state::AppState;

/// Query-string filter for roster listings.
#[derive(Debug, Default, Deserialize)]
pub struct StaffListParams {
    /// Restrict to active members.
    pub active: Option<bool>,
}

/// Lists roster entries ordered by name (admin).
pub async fn list_staff_handler(
    State(state): State<AppState>,
    Query(params): Query<StaffListParams>,
) -> ApiResult<Json<Vec<StaffResponse>>> {
    let listed = if params.active.unwrap_or(false) {
        state.staff_service.list_active_staff().await?
    } else {
        state.staff_service.list_all_staff().await?
    };

    Ok(Json(listed.into_iter().map(StaffResponse::from).collect()))
}

/// Lists active roster entries for the runner's staff pickers.
pub async fn run_staff_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<StaffResponse>>> {
    let listed = state.staff_service.list_active_staff().await?;
    Ok(Json(listed.into_iter().map(StaffResponse::from).collect()))
}

/// Creates a roster entry with an id derived from the name.
pub async fn create_staff_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateStaffRequest>,
) -> ApiResult<(StatusCode, Json<StaffResponse>)> {
    let created = state
        .staff_service
        .create_staff(payload.name.as_str(), payload.active.unwrap_or(true))
        .await?;
    Ok((StatusCode::CREATED, Json(StaffResponse::from(created))))
}

/// Renames and/or toggles a roster entry.
pub async fn update_staff_handler(
    State(state): State<AppState>,
    Path(staff_id): Path<String>,
    Json(payload): Json<UpdateStaffRequest>,
) -> ApiResult<Json<StaffResponse>> {
    if payload.name.is_none() && payload.active.is_none() {
        return Err(
            AppError::Validation("staff update requires name or active".to_owned()).into(),
        );
    }

    let mut updated = None;
    if let Some(name) = payload.name.as_deref() {
        updated = Some(
            state
                .staff_service
                .rename_staff(staff_id.as_str(), name)
                .await?,
        );
    }
    if let Some(active) = payload.active {
        updated = Some(
            state
                .staff_service
                .set_staff_active(staff_id.as_str(), active)
                .await?,
        );
    }

    let updated = updated
        .ok_or_else(|| AppError::Internal("staff update resolved no change".to_owned()))?;
    Ok(Json(StaffResponse::from(updated)))
}

/// Deletes a roster entry.
pub async fn delete_staff_handler(
    State(state): State<AppState>,
    Path(staff_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.staff_service.delete_staff(staff_id.as_str()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Bulk-imports roster rows, upserting by derived id.
pub async fn import_staff_handler(
    State(state): State<AppState>,
    Json(payload): Json<ImportStaffRequest>,
) -> ApiResult<Json<Vec<StaffResponse>>> {
    let rows = payload
        .rows
        .into_iter()
        .map(|row| StaffImportRow {
            name: row.name,
            active: row.active,
        })
        .collect();

    let imported = state.staff_service.import_staff(rows).await?;
    Ok(Json(imported.into_iter().map(StaffResponse::from).collect()))
}
