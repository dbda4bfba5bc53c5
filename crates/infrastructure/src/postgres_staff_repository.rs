use async_trait::async_trait;
use shiftcheck_application::StaffRepository;
use shiftcheck_core::{AppError, AppResult};
use shiftcheck_domain::Staff;
use sqlx::{FromRow, PgPool};

/// PostgreSQL-backed staff roster repository.
#[derive(Clone)]
pub struct PostgresStaffRepository {
    pool: PgPool,
}

impl PostgresStaffRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct StaffRow {
    id: String,
    name: String,
    active: bool,
}

fn decode_staff(row: StaffRow) -> AppResult<Staff> {
    Staff::new(row.id, row.name, row.active)
        .map_err(|error| AppError::Internal(format!("invalid stored staff row: {error}")))
}

#[async_trait]
impl StaffRepository for PostgresStaffRepository {
    async fn save_staff(&self, staff: Staff) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO staff_members (id, name, active)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, active = EXCLUDED.active
            "#,
        )
        .bind(staff.id().as_str())
        .bind(staff.name().as_str())
        .bind(staff.active())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to save staff member: {error}")))?;

        Ok(())
    }

    async fn find_staff(&self, staff_id: &str) -> AppResult<Option<Staff>> {
        let row = sqlx::query_as::<_, StaffRow>(
            "SELECT id, name, active FROM staff_members WHERE id = $1",
        )
        .bind(staff_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load staff member: {error}")))?;

        row.map(decode_staff).transpose()
    }

    async fn list_staff(&self, active_only: bool) -> AppResult<Vec<Staff>> {
        let rows = sqlx::query_as::<_, StaffRow>(
            r#"
            SELECT id, name, active
            FROM staff_members
            WHERE ($1 = FALSE OR active)
            ORDER BY name
            "#,
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list staff members: {error}")))?;

        rows.into_iter().map(decode_staff).collect()
    }

    async fn delete_staff(&self, staff_id: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM staff_members WHERE id = $1")
            .bind(staff_id)
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete staff member: {error}"))
            })?;

        Ok(())
    }
}
