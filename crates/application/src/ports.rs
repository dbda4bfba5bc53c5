//! Collaborator ports consumed by the application services.

mod forms;
mod staff;
mod submissions;

pub use forms::FormRepository;
pub use staff::StaffRepository;
pub use submissions::{
    SequenceAllocator, SubmissionCursor, SubmissionPage, SubmissionQuery, SubmissionRepository,
};
