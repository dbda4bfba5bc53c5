use std::sync::Arc;

use shiftcheck_core::{AppError, AppResult};
use shiftcheck_domain::{Staff, staff_id_slug};
use uuid::Uuid;

use crate::ports::StaffRepository;

/// One row of a bulk roster import.
#[derive(Debug, Clone)]
pub struct StaffImportRow {
    /// Display name; the roster id is derived from it.
    pub name: String,
    /// Active flag; defaults to active when absent.
    pub active: Option<bool>,
}

/// Application service for the staff roster.
#[derive(Clone)]
pub struct StaffService {
    repository: Arc<dyn StaffRepository>,
}

impl StaffService {
    /// Creates a staff service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn StaffRepository>) -> Self {
        Self { repository }
    }

    /// Creates a roster entry with an id derived from the name.
    pub async fn create_staff(&self, name: &str, active: bool) -> AppResult<Staff> {
        let staff_id =
            staff_id_slug(name).unwrap_or_else(|| Uuid::new_v4().to_string());

        if self.repository.find_staff(staff_id.as_str()).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "staff member '{staff_id}' already exists"
            )));
        }

        let staff = Staff::new(staff_id, name, active)?;
        self.repository.save_staff(staff.clone()).await?;
        Ok(staff)
    }

    /// Lists active roster entries ordered by name.
    pub async fn list_active_staff(&self) -> AppResult<Vec<Staff>> {
        self.repository.list_staff(true).await
    }

    /// Lists all roster entries ordered by name.
    pub async fn list_all_staff(&self) -> AppResult<Vec<Staff>> {
        self.repository.list_staff(false).await
    }

    /// Renames a roster entry.
    pub async fn rename_staff(&self, staff_id: &str, new_name: &str) -> AppResult<Staff> {
        let existing = self.require_staff(staff_id).await?;
        let renamed = Staff::new(staff_id, new_name, existing.active())?;
        self.repository.save_staff(renamed.clone()).await?;
        Ok(renamed)
    }

    /// Toggles whether a roster entry is selectable for shifts.
    pub async fn set_staff_active(&self, staff_id: &str, active: bool) -> AppResult<Staff> {
        let existing = self.require_staff(staff_id).await?;
        let updated = Staff::new(staff_id, existing.name().as_str(), active)?;
        self.repository.save_staff(updated.clone()).await?;
        Ok(updated)
    }

    /// Deletes a roster entry.
    pub async fn delete_staff(&self, staff_id: &str) -> AppResult<()> {
        self.require_staff(staff_id).await?;
        self.repository.delete_staff(staff_id).await
    }

    /// Bulk import: upserts each row by the id derived from its name.
    ///
    /// Unlike [`Self::create_staff`], an existing entry is replaced rather
    /// than refused, so re-importing a roster is idempotent.
    pub async fn import_staff(&self, rows: Vec<StaffImportRow>) -> AppResult<Vec<Staff>> {
        let mut imported = Vec::with_capacity(rows.len());

        for row in rows {
            let staff_id = staff_id_slug(row.name.as_str())
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            let staff = Staff::new(staff_id, row.name.as_str(), row.active.unwrap_or(true))?;
            self.repository.save_staff(staff.clone()).await?;
            imported.push(staff);
        }

        Ok(imported)
    }

    async fn require_staff(&self, staff_id: &str) -> AppResult<Staff> {
        self.repository
            .find_staff(staff_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("staff member '{staff_id}' does not exist"))
            })
    }
}
