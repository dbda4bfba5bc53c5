use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shiftcheck_core::AppResult;
use shiftcheck_domain::{Submission, SubmissionInput};

/// Filters and pagination for browsing submissions, newest first.
#[derive(Debug, Clone, Default)]
pub struct SubmissionQuery {
    /// Restrict to one form.
    pub form_id: Option<String>,
    /// Restrict to one staff pair.
    pub staff_key: Option<String>,
    /// Inclusive lower creation-time bound.
    pub created_from: Option<DateTime<Utc>>,
    /// Exclusive upper creation-time bound.
    pub created_to: Option<DateTime<Utc>>,
    /// Page size; the service applies the default when absent.
    pub page_size: Option<usize>,
    /// Continue after this cursor (the previous page's last row).
    pub after: Option<SubmissionCursor>,
}

/// Keyset cursor over the newest-first ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionCursor {
    /// Creation time of the last row of the previous page.
    pub created_at: DateTime<Utc>,
    /// Record id of that row, tie-breaking equal timestamps.
    pub id: String,
}

/// One page of submissions plus the continuation cursor.
#[derive(Debug, Clone)]
pub struct SubmissionPage {
    /// Page rows, newest first.
    pub items: Vec<Submission>,
    /// Cursor of the last row; `None` when the page is empty.
    pub cursor: Option<SubmissionCursor>,
}

/// Persistence port for submissions.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Appends a submission as a new record and assigns its id.
    async fn append_submission(&self, input: SubmissionInput) -> AppResult<Submission>;

    /// Queries submissions with filters, newest first, keyset-paginated.
    async fn query_submissions(&self, query: SubmissionQuery) -> AppResult<SubmissionPage>;

    /// Lists one pair's submissions for one period window, oldest first.
    async fn list_by_pair(
        &self,
        form_id: &str,
        staff_key: &str,
        date_key: &str,
    ) -> AppResult<Vec<Submission>>;
}

/// Port allocating monotonically increasing sequence numbers per
/// `(form, staff pair, date key)` triple. Allocation failure is non-fatal to
/// the submit flow.
#[async_trait]
pub trait SequenceAllocator: Send + Sync {
    /// Atomically allocates the next sequence number for the triple.
    async fn next_sequence(
        &self,
        form_id: &str,
        staff_key: &str,
        date_key: &str,
    ) -> AppResult<i64>;
}
