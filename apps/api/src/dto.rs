//! Request/response payloads and their domain conversions.

mod common;
mod forms;
mod staff;
mod submissions;

pub use common::HealthResponse;
pub use forms::{PreviewIssue, PreviewRequest, PreviewResponse};
pub use staff::{
    CreateStaffRequest, ImportStaffRequest, ImportStaffRow, StaffResponse, UpdateStaffRequest,
};
pub use submissions::{
    SubmissionCursorDto, SubmissionPageResponse, SubmissionQueryParams, SubmissionResponse,
    SubmitRequest,
};
