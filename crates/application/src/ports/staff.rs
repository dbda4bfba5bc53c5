use async_trait::async_trait;
use shiftcheck_core::AppResult;
use shiftcheck_domain::Staff;

/// Persistence port for the staff roster.
#[async_trait]
pub trait StaffRepository: Send + Sync {
    /// Saves or updates a roster entry, keyed by id.
    async fn save_staff(&self, staff: Staff) -> AppResult<()>;

    /// Looks up a roster entry by id.
    async fn find_staff(&self, staff_id: &str) -> AppResult<Option<Staff>>;

    /// Lists roster entries ordered by name, optionally active only.
    async fn list_staff(&self, active_only: bool) -> AppResult<Vec<Staff>>;

    /// Deletes a roster entry by id.
    async fn delete_staff(&self, staff_id: &str) -> AppResult<()>;
}
