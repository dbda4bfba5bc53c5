//! Infrastructure adapters for the Shiftcheck ports.

#![forbid(unsafe_code)]

mod in_memory_form_repository;
mod in_memory_sequence_allocator;
mod in_memory_staff_repository;
mod in_memory_submission_repository;
mod postgres_form_repository;
mod postgres_sequence_allocator;
mod postgres_staff_repository;
mod postgres_submission_repository;

pub use in_memory_form_repository::InMemoryFormRepository;
pub use in_memory_sequence_allocator::InMemorySequenceAllocator;
pub use in_memory_staff_repository::InMemoryStaffRepository;
pub use in_memory_submission_repository::InMemorySubmissionRepository;
pub use postgres_form_repository::PostgresFormRepository;
pub use postgres_sequence_allocator::PostgresSequenceAllocator;
pub use postgres_staff_repository::PostgresStaffRepository;
pub use postgres_submission_repository::PostgresSubmissionRepository;
