use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shiftcheck_application::{SubmissionCursor, SubmissionPage, SubmissionQuery};
use shiftcheck_core::{AppError, AppResult};
use shiftcheck_domain::Submission;
use ts_rs::TS;

/// Incoming payload for a form-runner submit.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/submit-request.ts"
)]
pub struct SubmitRequest {
    /// The two staff members on shift.
    pub staff: [String; 2],
    /// Period date key; derived from today when absent.
    pub date_key: Option<String>,
    /// Answer values keyed by field id.
    #[ts(type = "Record<string, unknown>")]
    pub answers: Map<String, Value>,
}

/// API representation of one submission.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/submission-response.ts"
)]
pub struct SubmissionResponse {
    /// Record id.
    pub id: String,
    /// Submitted form id.
    pub form_id: String,
    /// Form cadence at submit time.
    pub period: String,
    /// Period date key.
    pub date_key: String,
    /// Staff pair as entered.
    pub staff: [String; 2],
    /// Order-independent staff-pair key.
    pub staff_key: String,
    /// Sequence number, when one was allocated.
    pub sequence: Option<i64>,
    /// Persisted answer set.
    #[ts(type = "Record<string, unknown>")]
    pub answers: Map<String, Value>,
    /// Submission timestamp, RFC 3339.
    pub created_at: String,
}

impl From<Submission> for SubmissionResponse {
    fn from(value: Submission) -> Self {
        Self {
            id: value.id().as_str().to_owned(),
            form_id: value.form_id().as_str().to_owned(),
            period: value.period().as_str().to_owned(),
            date_key: value.date_key().as_str().to_owned(),
            staff: value.staff().clone(),
            staff_key: value.staff_key().as_str().to_owned(),
            sequence: value.sequence(),
            answers: value.answers().clone(),
            created_at: value.created_at().to_rfc3339(),
        }
    }
}

/// Keyset cursor over the newest-first submission ordering.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/submission-cursor.ts"
)]
pub struct SubmissionCursorDto {
    /// Creation time of the page's last row, RFC 3339.
    pub created_at: String,
    /// Record id of that row.
    pub id: String,
}

impl From<SubmissionCursor> for SubmissionCursorDto {
    fn from(value: SubmissionCursor) -> Self {
        Self {
            created_at: value.created_at.to_rfc3339(),
            id: value.id,
        }
    }
}

/// One page of submissions plus the continuation cursor.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/submission-page-response.ts"
)]
pub struct SubmissionPageResponse {
    /// Page rows, newest first.
    pub items: Vec<SubmissionResponse>,
    /// Cursor of the last row; absent when the page is empty.
    pub cursor: Option<SubmissionCursorDto>,
}

impl From<SubmissionPage> for SubmissionPageResponse {
    fn from(value: SubmissionPage) -> Self {
        Self {
            items: value
                .items
                .into_iter()
                .map(SubmissionResponse::from)
                .collect(),
            cursor: value.cursor.map(SubmissionCursorDto::from),
        }
    }
}

/// Query-string filters for browsing submissions.
#[derive(Debug, Default, Deserialize)]
pub struct SubmissionQueryParams {
    /// Restrict to one form.
    pub form_id: Option<String>,
    /// Restrict to one staff pair.
    pub staff_key: Option<String>,
    /// Inclusive lower creation-time bound, RFC 3339.
    pub created_from: Option<String>,
    /// Exclusive upper creation-time bound, RFC 3339.
    pub created_to: Option<String>,
    /// Page size; default applied by the service.
    pub page_size: Option<usize>,
    /// Continuation cursor timestamp, RFC 3339 (paired with `after_id`).
    pub after_created_at: Option<String>,
    /// Continuation cursor record id (paired with `after_created_at`).
    pub after_id: Option<String>,
}

impl SubmissionQueryParams {
    /// Converts the query string into the application query, parsing the
    /// RFC 3339 bounds and pairing the cursor halves.
    pub fn into_query(self) -> AppResult<SubmissionQuery> {
        let created_from = self
            .created_from
            .as_deref()
            .map(parse_timestamp)
            .transpose()?;
        let created_to = self.created_to.as_deref().map(parse_timestamp).transpose()?;

        let after = match (self.after_created_at, self.after_id) {
            (None, None) => None,
            (Some(created_at), Some(id)) => Some(SubmissionCursor {
                created_at: parse_timestamp(created_at.as_str())?,
                id,
            }),
            _ => {
                return Err(AppError::Validation(
                    "after_created_at and after_id must be provided together".to_owned(),
                ));
            }
        };

        Ok(SubmissionQuery {
            form_id: self.form_id,
            staff_key: self.staff_key,
            created_from,
            created_to,
            page_size: self.page_size,
            after,
        })
    }
}

fn parse_timestamp(value: &str) -> AppResult<chrono::DateTime<chrono::Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&chrono::Utc))
        .map_err(|error| AppError::Validation(format!("invalid timestamp '{value}': {error}")))
}
