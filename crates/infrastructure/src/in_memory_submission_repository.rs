use async_trait::async_trait;
use shiftcheck_application::{
    SubmissionCursor, SubmissionPage, SubmissionQuery, SubmissionRepository,
};
use shiftcheck_core::AppResult;
use shiftcheck_domain::{Submission, SubmissionInput};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory submission repository for tests and local development.
#[derive(Debug, Default)]
pub struct InMemorySubmissionRepository {
    submissions: RwLock<Vec<Submission>>,
}

impl InMemorySubmissionRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            submissions: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissionRepository {
    async fn append_submission(&self, input: SubmissionInput) -> AppResult<Submission> {
        let submission = Submission::new(Uuid::new_v4().to_string(), input)?;
        self.submissions.write().await.push(submission.clone());
        Ok(submission)
    }

    async fn query_submissions(&self, query: SubmissionQuery) -> AppResult<SubmissionPage> {
        let submissions = self.submissions.read().await;
        let mut matching: Vec<Submission> = submissions
            .iter()
            .filter(|submission| {
                query
                    .form_id
                    .as_deref()
                    .is_none_or(|form_id| submission.form_id().as_str() == form_id)
            })
            .filter(|submission| {
                query
                    .staff_key
                    .as_deref()
                    .is_none_or(|staff_key| submission.staff_key().as_str() == staff_key)
            })
            .filter(|submission| {
                query
                    .created_from
                    .is_none_or(|from| submission.created_at() >= from)
            })
            .filter(|submission| {
                query
                    .created_to
                    .is_none_or(|to| submission.created_at() < to)
            })
            .cloned()
            .collect();

        // Newest first; ids tie-break equal timestamps so the keyset cursor
        // is a total order.
        matching.sort_by(|left, right| {
            right
                .created_at()
                .cmp(&left.created_at())
                .then_with(|| right.id().as_str().cmp(left.id().as_str()))
        });

        if let Some(after) = &query.after {
            matching.retain(|submission| {
                (submission.created_at(), submission.id().as_str())
                    < (after.created_at, after.id.as_str())
            });
        }

        if let Some(page_size) = query.page_size {
            matching.truncate(page_size);
        }

        let cursor = matching.last().map(|submission| SubmissionCursor {
            created_at: submission.created_at(),
            id: submission.id().as_str().to_owned(),
        });

        Ok(SubmissionPage {
            items: matching,
            cursor,
        })
    }

    async fn list_by_pair(
        &self,
        form_id: &str,
        staff_key: &str,
        date_key: &str,
    ) -> AppResult<Vec<Submission>> {
        let submissions = self.submissions.read().await;
        let mut matching: Vec<Submission> = submissions
            .iter()
            .filter(|submission| {
                submission.form_id().as_str() == form_id
                    && submission.staff_key().as_str() == staff_key
                    && submission.date_key().as_str() == date_key
            })
            .cloned()
            .collect();
        matching.sort_by_key(Submission::created_at);
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::Map;
    use shiftcheck_application::{SubmissionQuery, SubmissionRepository};
    use shiftcheck_domain::{FormPeriod, SubmissionInput};

    use super::InMemorySubmissionRepository;

    fn input(form_id: &str, date_key: &str) -> SubmissionInput {
        SubmissionInput {
            form_id: form_id.to_owned(),
            period: FormPeriod::Daily,
            date_key: date_key.to_owned(),
            staff: ["Alex Jones".to_owned(), "Pat Smith".to_owned()],
            sequence: None,
            answers: Map::new(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn pages_newest_first_with_cursor() {
        let repository = InMemorySubmissionRepository::new();
        for index in 0..3 {
            repository
                .append_submission(input("daily", format!("2025-09-1{index}").as_str()))
                .await
                .unwrap_or_else(|_| unreachable!());
        }

        let first_page = repository
            .query_submissions(SubmissionQuery {
                form_id: Some("daily".to_owned()),
                page_size: Some(2),
                ..SubmissionQuery::default()
            })
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(first_page.items.len(), 2);

        let second_page = repository
            .query_submissions(SubmissionQuery {
                form_id: Some("daily".to_owned()),
                page_size: Some(2),
                after: first_page.cursor.clone(),
                ..SubmissionQuery::default()
            })
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(second_page.items.len(), 1);

        // No overlap between pages.
        let first_ids: Vec<&str> = first_page
            .items
            .iter()
            .map(|submission| submission.id().as_str())
            .collect();
        assert!(
            !first_ids.contains(&second_page.items[0].id().as_str())
        );
    }

    #[tokio::test]
    async fn list_by_pair_filters_the_window() {
        let repository = InMemorySubmissionRepository::new();
        repository
            .append_submission(input("daily", "2025-09-18"))
            .await
            .unwrap_or_else(|_| unreachable!());
        repository
            .append_submission(input("daily", "2025-09-19"))
            .await
            .unwrap_or_else(|_| unreachable!());

        let listed = repository
            .list_by_pair("daily", "alex jones__pat smith", "2025-09-18")
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].date_key().as_str(), "2025-09-18");
    }
}
