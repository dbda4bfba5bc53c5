use std::sync::Arc;

use chrono::Utc;
use shiftcheck_core::{AppError, AppResult, NonEmptyString};
use shiftcheck_domain::{Submission, SubmissionInput, staff_key};
use tracing::warn;

use crate::form_session::FormSession;
use crate::ports::{SequenceAllocator, SubmissionPage, SubmissionQuery, SubmissionRepository};

const DEFAULT_PAGE_SIZE: usize = 25;
const MAX_PAGE_SIZE: usize = 200;

/// Application service for submitting and browsing checklist submissions.
#[derive(Clone)]
pub struct SubmissionService {
    repository: Arc<dyn SubmissionRepository>,
    sequences: Option<Arc<dyn SequenceAllocator>>,
}

impl SubmissionService {
    /// Creates a submission service; the sequence allocator is optional and
    /// its failures are never fatal to a submit.
    #[must_use]
    pub fn new(
        repository: Arc<dyn SubmissionRepository>,
        sequences: Option<Arc<dyn SequenceAllocator>>,
    ) -> Self {
        Self {
            repository,
            sequences,
        }
    }

    /// Submits a session's current answers for the given staff pair and
    /// date key.
    ///
    /// Validates against current visibility, allocates an optional sequence
    /// number (failure is swallowed), appends the submission, and settles
    /// the session phase: success resets it, failure returns it to editing
    /// with answers intact.
    pub async fn submit(
        &self,
        session: &mut FormSession,
        staff: [String; 2],
        date_key: &str,
    ) -> AppResult<Submission> {
        NonEmptyString::new(staff[0].as_str())?;
        NonEmptyString::new(staff[1].as_str())?;
        NonEmptyString::new(date_key)?;

        session.begin_submit()?;

        let form_id = session.form().id().as_str().to_owned();
        let period = session.form().period();
        let pair_key = staff_key(staff[0].as_str(), staff[1].as_str());

        let sequence = match &self.sequences {
            Some(allocator) => {
                match allocator
                    .next_sequence(form_id.as_str(), pair_key.as_str(), date_key)
                    .await
                {
                    Ok(sequence) => Some(sequence),
                    Err(error) => {
                        warn!(%error, %form_id, "sequence allocation failed; submitting without a sequence");
                        None
                    }
                }
            }
            None => None,
        };

        let input = SubmissionInput {
            form_id,
            period,
            date_key: date_key.to_owned(),
            staff,
            sequence,
            answers: session.submitted_answers(),
            created_at: Utc::now(),
        };

        match self.repository.append_submission(input).await {
            Ok(submission) => {
                session.complete_submit();
                Ok(submission)
            }
            Err(error) => {
                session.fail_submit();
                Err(error)
            }
        }
    }

    /// Queries submissions newest first, applying the default page size.
    pub async fn query_submissions(&self, mut query: SubmissionQuery) -> AppResult<SubmissionPage> {
        let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(AppError::Validation(
                "submission query page size must be greater than zero".to_owned(),
            ));
        }
        if page_size > MAX_PAGE_SIZE {
            return Err(AppError::Validation(format!(
                "submission query page size must not exceed {MAX_PAGE_SIZE}"
            )));
        }

        query.page_size = Some(page_size);
        self.repository.query_submissions(query).await
    }

    /// Lists one pair's submissions for one period window, oldest first.
    pub async fn list_by_pair(
        &self,
        form_id: &str,
        staff_key: &str,
        date_key: &str,
    ) -> AppResult<Vec<Submission>> {
        self.repository
            .list_by_pair(form_id, staff_key, date_key)
            .await
    }

    /// Returns the first submission of a pair's period window, if any.
    pub async fn find_existing_by_pair(
        &self,
        form_id: &str,
        staff_key: &str,
        date_key: &str,
    ) -> AppResult<Option<Submission>> {
        Ok(self
            .list_by_pair(form_id, staff_key, date_key)
            .await?
            .into_iter()
            .next())
    }
}

#[cfg(test)]
mod tests;
