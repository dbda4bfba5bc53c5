use async_trait::async_trait;
use shiftcheck_application::SequenceAllocator;
use shiftcheck_core::{AppError, AppResult};
use sqlx::{FromRow, PgPool};

/// PostgreSQL-backed sequence allocator.
///
/// One counter row per `(form, staff pair, date key)` triple; the upsert is
/// atomic, so concurrent submitters receive distinct, increasing values.
#[derive(Clone)]
pub struct PostgresSequenceAllocator {
    pool: PgPool,
}

impl PostgresSequenceAllocator {
    /// Creates an allocator with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CounterRow {
    value: i64,
}

#[async_trait]
impl SequenceAllocator for PostgresSequenceAllocator {
    async fn next_sequence(
        &self,
        form_id: &str,
        staff_key: &str,
        date_key: &str,
    ) -> AppResult<i64> {
        let counter_id = format!("{form_id}__{date_key}__{staff_key}");

        let row = sqlx::query_as::<_, CounterRow>(
            r#"
            INSERT INTO sequence_counters (counter_id, value)
            VALUES ($1, 1)
            ON CONFLICT (counter_id) DO UPDATE SET value = sequence_counters.value + 1
            RETURNING value
            "#,
        )
        .bind(counter_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to allocate sequence number: {error}"))
        })?;

        Ok(row.value)
    }
}
