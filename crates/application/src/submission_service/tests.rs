use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Mutex;

use shiftcheck_core::{AppError, AppResult};
use shiftcheck_domain::{FormDef, Submission, SubmissionInput};

use super::SubmissionService;
use crate::form_session::FormSession;
use crate::ports::{
    SequenceAllocator, SubmissionCursor, SubmissionPage, SubmissionQuery, SubmissionRepository,
};

#[derive(Default)]
struct FakeSubmissionRepository {
    submissions: Mutex<Vec<Submission>>,
}

#[async_trait]
impl SubmissionRepository for FakeSubmissionRepository {
    async fn append_submission(&self, input: SubmissionInput) -> AppResult<Submission> {
        let mut submissions = self.submissions.lock().await;
        let submission = Submission::new(format!("sub-{}", submissions.len() + 1), input)?;
        submissions.push(submission.clone());
        Ok(submission)
    }

    async fn query_submissions(&self, query: SubmissionQuery) -> AppResult<SubmissionPage> {
        let submissions = self.submissions.lock().await;
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

        matching.sort_by(|left, right| {
            right
                .created_at()
                .cmp(&left.created_at())
                .then_with(|| right.id().as_str().cmp(left.id().as_str()))
        });

        if let Some(after) = &query.after {
            matching.retain(|submission| {
                (submission.created_at(), submission.id().as_str().to_owned())
                    < (after.created_at, after.id.clone())
            });
        }

        matching.truncate(query.page_size.unwrap_or(usize::MAX));
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
        let submissions = self.submissions.lock().await;
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

struct FailingSubmissionRepository;

#[async_trait]
impl SubmissionRepository for FailingSubmissionRepository {
    async fn append_submission(&self, _input: SubmissionInput) -> AppResult<Submission> {
        Err(AppError::Internal("write failed".to_owned()))
    }

    async fn query_submissions(&self, _query: SubmissionQuery) -> AppResult<SubmissionPage> {
        Err(AppError::Internal("query failed".to_owned()))
    }

    async fn list_by_pair(
        &self,
        _form_id: &str,
        _staff_key: &str,
        _date_key: &str,
    ) -> AppResult<Vec<Submission>> {
        Err(AppError::Internal("query failed".to_owned()))
    }
}

#[derive(Default)]
struct FakeSequenceAllocator {
    counters: Mutex<HashMap<String, i64>>,
}

#[async_trait]
impl SequenceAllocator for FakeSequenceAllocator {
    async fn next_sequence(
        &self,
        form_id: &str,
        staff_key: &str,
        date_key: &str,
    ) -> AppResult<i64> {
        let mut counters = self.counters.lock().await;
        let counter = counters
            .entry(format!("{form_id}__{date_key}__{staff_key}"))
            .or_insert(0);
        *counter += 1;
        Ok(*counter)
    }
}

struct FailingSequenceAllocator;

#[async_trait]
impl SequenceAllocator for FailingSequenceAllocator {
    async fn next_sequence(
        &self,
        _form_id: &str,
        _staff_key: &str,
        _date_key: &str,
    ) -> AppResult<i64> {
        Err(AppError::Internal("counter unavailable".to_owned()))
    }
}

fn mode_detail_form() -> FormDef {
    serde_json::from_value(json!({
        "id": "daily",
        "title": "Daily checklist",
        "period": "daily",
        "sections": [{
            "title": "Main",
            "fields": [
                {
                    "id": "mode",
                    "type": "select",
                    "label": "Mode",
                    "options": ["A", "B"],
                },
                {
                    "id": "detail",
                    "type": "text",
                    "label": "Detail",
                    "required": true,
                    "showIf": {"field": "mode", "op": "eq", "value": "B"},
                },
            ],
        }],
    }))
    .unwrap_or_else(|_| unreachable!())
}

fn staff_pair() -> [String; 2] {
    ["Alex Jones".to_owned(), "Pat Smith".to_owned()]
}

fn session() -> FormSession {
    FormSession::new(mode_detail_form()).unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn submit_appends_the_record_and_resets_the_session() {
    let repository = Arc::new(FakeSubmissionRepository::default());
    let service = SubmissionService::new(
        repository.clone(),
        Some(Arc::new(FakeSequenceAllocator::default())),
    );

    let mut session = session();
    session
        .set_answer("mode", json!("B"))
        .unwrap_or_else(|_| unreachable!());
    session
        .set_answer("detail", json!("x"))
        .unwrap_or_else(|_| unreachable!());

    let submission = service
        .submit(&mut session, staff_pair(), "2025-09-18")
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(submission.form_id().as_str(), "daily");
    assert_eq!(submission.date_key().as_str(), "2025-09-18");
    assert_eq!(submission.staff_key().as_str(), "alex jones__pat smith");
    assert_eq!(submission.sequence(), Some(1));
    assert_eq!(submission.answers().get("mode"), Some(&json!("B")));
    assert_eq!(submission.answers().get("detail"), Some(&json!("x")));
    assert!(session.answers().is_empty());

    // A second submit of the same pair and window increments the sequence.
    let mut second = self::session();
    second
        .set_answer("mode", json!("A"))
        .unwrap_or_else(|_| unreachable!());
    let next = service
        .submit(&mut second, staff_pair(), "2025-09-18")
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(next.sequence(), Some(2));
}

#[tokio::test]
async fn sequence_failure_is_swallowed() {
    let service = SubmissionService::new(
        Arc::new(FakeSubmissionRepository::default()),
        Some(Arc::new(FailingSequenceAllocator)),
    );

    let mut session = session();
    session
        .set_answer("mode", json!("A"))
        .unwrap_or_else(|_| unreachable!());

    let submission = service
        .submit(&mut session, staff_pair(), "2025-09-18")
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(submission.sequence(), None);
}

#[tokio::test]
async fn persistence_failure_returns_the_session_to_editing() {
    let service = SubmissionService::new(Arc::new(FailingSubmissionRepository), None);

    let mut session = session();
    session
        .set_answer("mode", json!("A"))
        .unwrap_or_else(|_| unreachable!());

    let result = service.submit(&mut session, staff_pair(), "2025-09-18").await;
    assert!(result.is_err());
    assert_eq!(session.phase(), crate::SessionPhase::Editing);
    assert_eq!(session.answers().get("mode"), Some(&json!("A")));
}

#[tokio::test]
async fn validation_failure_blocks_the_write() {
    let repository = Arc::new(FakeSubmissionRepository::default());
    let service = SubmissionService::new(repository.clone(), None);

    let mut session = session();
    session
        .set_answer("mode", json!("B"))
        .unwrap_or_else(|_| unreachable!());

    let result = service.submit(&mut session, staff_pair(), "2025-09-18").await;
    assert!(result.is_err());
    assert!(repository.submissions.lock().await.is_empty());
}

#[tokio::test]
async fn hidden_answers_never_reach_the_persisted_record() {
    let repository = Arc::new(FakeSubmissionRepository::default());
    let service = SubmissionService::new(repository, None);

    let mut session = session();
    session
        .set_answer("mode", json!("B"))
        .unwrap_or_else(|_| unreachable!());
    session
        .set_answer("detail", json!("stale"))
        .unwrap_or_else(|_| unreachable!());
    session
        .set_answer("mode", json!("A"))
        .unwrap_or_else(|_| unreachable!());

    let submission = service
        .submit(&mut session, staff_pair(), "2025-09-18")
        .await
        .unwrap_or_else(|_| unreachable!());
    assert!(!submission.answers().contains_key("detail"));
}

#[tokio::test]
async fn query_applies_the_default_page_size_and_rejects_zero() {
    let repository = Arc::new(FakeSubmissionRepository::default());
    let service = SubmissionService::new(repository, None);

    let page = service
        .query_submissions(SubmissionQuery::default())
        .await
        .unwrap_or_else(|_| unreachable!());
    assert!(page.items.is_empty());
    assert!(page.cursor.is_none());

    let zero = service
        .query_submissions(SubmissionQuery {
            page_size: Some(0),
            ..SubmissionQuery::default()
        })
        .await;
    assert!(zero.is_err());
}

#[tokio::test]
async fn query_pages_newest_first_with_a_cursor() {
    let repository = Arc::new(FakeSubmissionRepository::default());
    let service = SubmissionService::new(repository, None);

    for index in 0..3 {
        let mut session = session();
        session
            .set_answer("mode", json!("A"))
            .unwrap_or_else(|_| unreachable!());
        service
            .submit(&mut session, staff_pair(), format!("2025-09-{}", 10 + index).as_str())
            .await
            .unwrap_or_else(|_| unreachable!());
    }

    let first_page = service
        .query_submissions(SubmissionQuery {
            form_id: Some("daily".to_owned()),
            page_size: Some(2),
            ..SubmissionQuery::default()
        })
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(first_page.items.len(), 2);

    let cursor = first_page.cursor.clone().unwrap_or_else(|| unreachable!());
    let second_page = service
        .query_submissions(SubmissionQuery {
            form_id: Some("daily".to_owned()),
            page_size: Some(2),
            after: Some(cursor),
            ..SubmissionQuery::default()
        })
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(second_page.items.len(), 1);
}

#[tokio::test]
async fn list_by_pair_returns_the_window_oldest_first() {
    let repository = Arc::new(FakeSubmissionRepository::default());
    let service = SubmissionService::new(repository, None);

    for _ in 0..2 {
        let mut session = session();
        session
            .set_answer("mode", json!("A"))
            .unwrap_or_else(|_| unreachable!());
        service
            .submit(&mut session, staff_pair(), "2025-09-18")
            .await
            .unwrap_or_else(|_| unreachable!());
    }

    let listed = service
        .list_by_pair("daily", "alex jones__pat smith", "2025-09-18")
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(listed.len(), 2);
    assert!(listed[0].created_at() <= listed[1].created_at());

    let first = service
        .find_existing_by_pair("daily", "alex jones__pat smith", "2025-09-18")
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(first.map(|submission| submission.id().as_str().to_owned()),
        Some(listed[0].id().as_str().to_owned()));
}
