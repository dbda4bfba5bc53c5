use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use shiftcheck_application::{
    SubmissionCursor, SubmissionPage, SubmissionQuery, SubmissionRepository,
};
use shiftcheck_core::{AppError, AppResult};
use shiftcheck_domain::{FormPeriod, Submission, SubmissionInput};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const FALLBACK_PAGE_SIZE: usize = 25;

/// PostgreSQL-backed submission repository; answers are stored as JSONB.
#[derive(Clone)]
pub struct PostgresSubmissionRepository {
    pool: PgPool,
}

impl PostgresSubmissionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SubmissionRow {
    id: String,
    form_id: String,
    period: String,
    date_key: String,
    staff_first: String,
    staff_second: String,
    sequence: Option<i64>,
    answers: Value,
    created_at: DateTime<Utc>,
}

fn decode_submission(row: SubmissionRow) -> AppResult<Submission> {
    let period = FormPeriod::from_str(row.period.as_str())
        .map_err(|error| AppError::Internal(format!("invalid stored submission: {error}")))?;

    let Value::Object(answers) = row.answers else {
        return Err(AppError::Internal(
            "stored submission answers are not a JSON object".to_owned(),
        ));
    };

    Submission::new(
        row.id,
        SubmissionInput {
            form_id: row.form_id,
            period,
            date_key: row.date_key,
            staff: [row.staff_first, row.staff_second],
            sequence: row.sequence,
            answers,
            created_at: row.created_at,
        },
    )
    .map_err(|error| AppError::Internal(format!("invalid stored submission: {error}")))
}

#[async_trait]
impl SubmissionRepository for PostgresSubmissionRepository {
    async fn append_submission(&self, input: SubmissionInput) -> AppResult<Submission> {
        let submission = Submission::new(Uuid::new_v4().to_string(), input)?;

        sqlx::query(
            r#"
            INSERT INTO submissions (
                id,
                form_id,
                period,
                date_key,
                staff_first,
                staff_second,
                staff_key,
                sequence,
                answers,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(submission.id().as_str())
        .bind(submission.form_id().as_str())
        .bind(submission.period().as_str())
        .bind(submission.date_key().as_str())
        .bind(submission.staff()[0].as_str())
        .bind(submission.staff()[1].as_str())
        .bind(submission.staff_key().as_str())
        .bind(submission.sequence())
        .bind(Value::Object(submission.answers().clone()))
        .bind(submission.created_at())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to append submission: {error}")))?;

        Ok(submission)
    }

    async fn query_submissions(&self, query: SubmissionQuery) -> AppResult<SubmissionPage> {
        let page_size = query.page_size.unwrap_or(FALLBACK_PAGE_SIZE);

        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT id, form_id, period, date_key, staff_first, staff_second, sequence, \
             answers, created_at FROM submissions WHERE TRUE",
        );

        if let Some(form_id) = &query.form_id {
            builder.push(" AND form_id = ").push_bind(form_id.as_str());
        }
        if let Some(staff_key) = &query.staff_key {
            builder
                .push(" AND staff_key = ")
                .push_bind(staff_key.as_str());
        }
        if let Some(created_from) = query.created_from {
            builder.push(" AND created_at >= ").push_bind(created_from);
        }
        if let Some(created_to) = query.created_to {
            builder.push(" AND created_at < ").push_bind(created_to);
        }
        if let Some(after) = &query.after {
            builder
                .push(" AND (created_at, id) < (")
                .push_bind(after.created_at)
                .push(", ")
                .push_bind(after.id.as_str())
                .push(")");
        }

        builder
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(i64::try_from(page_size).unwrap_or(i64::MAX));

        let rows = builder
            .build_query_as::<SubmissionRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to query submissions: {error}"))
            })?;

        let items: Vec<Submission> = rows
            .into_iter()
            .map(decode_submission)
            .collect::<AppResult<_>>()?;

        let cursor = items.last().map(|submission| SubmissionCursor {
            created_at: submission.created_at(),
            id: submission.id().as_str().to_owned(),
        });

        Ok(SubmissionPage { items, cursor })
    }

    async fn list_by_pair(
        &self,
        form_id: &str,
        staff_key: &str,
        date_key: &str,
    ) -> AppResult<Vec<Submission>> {
        let rows = sqlx::query_as::<_, SubmissionRow>(
            r#"
            SELECT id, form_id, period, date_key, staff_first, staff_second, sequence,
                   answers, created_at
            FROM submissions
            WHERE form_id = $1 AND staff_key = $2 AND date_key = $3
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(form_id)
        .bind(staff_key)
        .bind(date_key)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list submissions for pair: {error}"))
        })?;

        rows.into_iter().map(decode_submission).collect()
    }
}
