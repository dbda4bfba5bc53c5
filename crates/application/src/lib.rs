//! Application services and ports.

#![forbid(unsafe_code)]

mod form_service;
mod form_session;
mod ports;
mod staff_service;
mod submission_service;

pub use form_service::FormService;
pub use form_session::{FormSession, SessionPhase, ValidationIssue};
pub use ports::{
    FormRepository, SequenceAllocator, StaffRepository, SubmissionCursor, SubmissionPage,
    SubmissionQuery, SubmissionRepository,
};
pub use staff_service::{StaffImportRow, StaffService};
pub use submission_service::SubmissionService;
