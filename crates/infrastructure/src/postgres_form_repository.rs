use async_trait::async_trait;
use serde_json::Value;
use shiftcheck_application::FormRepository;
use shiftcheck_core::{AppError, AppResult};
use shiftcheck_domain::FormDef;
use sqlx::{FromRow, PgPool};

/// PostgreSQL-backed form repository storing definitions as whole JSONB
/// documents keyed by form id.
#[derive(Clone)]
pub struct PostgresFormRepository {
    pool: PgPool,
}

impl PostgresFormRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct FormRow {
    document: Value,
}

fn decode_form(document: Value) -> AppResult<FormDef> {
    serde_json::from_value(document)
        .map_err(|error| AppError::Internal(format!("failed to decode stored form: {error}")))
}

#[async_trait]
impl FormRepository for PostgresFormRepository {
    async fn save_form(&self, form: FormDef) -> AppResult<()> {
        let document = serde_json::to_value(&form)
            .map_err(|error| AppError::Internal(format!("failed to encode form: {error}")))?;

        sqlx::query(
            r#"
            INSERT INTO form_definitions (id, document, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (id) DO UPDATE SET document = EXCLUDED.document, updated_at = now()
            "#,
        )
        .bind(form.id().as_str())
        .bind(document)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to save form definition: {error}")))?;

        Ok(())
    }

    async fn find_form(&self, form_id: &str) -> AppResult<Option<FormDef>> {
        let row =
            sqlx::query_as::<_, FormRow>("SELECT document FROM form_definitions WHERE id = $1")
                .bind(form_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to load form definition: {error}"))
                })?;

        row.map(|row| decode_form(row.document)).transpose()
    }

    async fn list_forms(&self) -> AppResult<Vec<FormDef>> {
        let rows =
            sqlx::query_as::<_, FormRow>("SELECT document FROM form_definitions ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to list form definitions: {error}"))
                })?;

        rows.into_iter()
            .map(|row| decode_form(row.document))
            .collect()
    }

    async fn delete_form(&self, form_id: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM form_definitions WHERE id = $1")
            .bind(form_id)
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete form definition: {error}"))
            })?;

        Ok(())
    }
}
