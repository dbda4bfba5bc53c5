use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shiftcheck_application::ValidationIssue;
use ts_rs::TS;

/// Candidate answers for the builder's live preview.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/preview-request.ts"
)]
pub struct PreviewRequest {
    /// Answer values keyed by field id.
    #[ts(type = "Record<string, unknown>")]
    pub answers: Map<String, Value>,
}

/// One per-field validation problem.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/preview-issue.ts"
)]
pub struct PreviewIssue {
    /// Field the issue is anchored to.
    pub field_id: String,
    /// User-facing message.
    pub message: String,
}

impl From<ValidationIssue> for PreviewIssue {
    fn from(value: ValidationIssue) -> Self {
        Self {
            field_id: value.field_id,
            message: value.message,
        }
    }
}

/// Resolved engine state for the builder's live preview: what the runner
/// would show, flag, and persist for the candidate answers.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/preview-response.ts"
)]
pub struct PreviewResponse {
    /// Currently visible field ids, in document order.
    pub visible_fields: Vec<String>,
    /// Issues that would block submission.
    pub issues: Vec<PreviewIssue>,
    /// The answer set a submit would persist.
    #[ts(type = "Record<string, unknown>")]
    pub answers: Map<String, Value>,
}
