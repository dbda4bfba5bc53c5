use std::collections::HashMap;

use async_trait::async_trait;
use shiftcheck_application::StaffRepository;
use shiftcheck_core::AppResult;
use shiftcheck_domain::Staff;
use tokio::sync::RwLock;

/// In-memory staff repository for tests and local development.
#[derive(Debug, Default)]
pub struct InMemoryStaffRepository {
    staff: RwLock<HashMap<String, Staff>>,
}

impl InMemoryStaffRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            staff: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl StaffRepository for InMemoryStaffRepository {
    async fn save_staff(&self, staff: Staff) -> AppResult<()> {
        self.staff
            .write()
            .await
            .insert(staff.id().as_str().to_owned(), staff);
        Ok(())
    }

    async fn find_staff(&self, staff_id: &str) -> AppResult<Option<Staff>> {
        Ok(self.staff.read().await.get(staff_id).cloned())
    }

    async fn list_staff(&self, active_only: bool) -> AppResult<Vec<Staff>> {
        let staff = self.staff.read().await;
        let mut listed: Vec<Staff> = staff
            .values()
            .filter(|member| !active_only || member.active())
            .cloned()
            .collect();
        listed.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
        Ok(listed)
    }

    async fn delete_staff(&self, staff_id: &str) -> AppResult<()> {
        self.staff.write().await.remove(staff_id);
        Ok(())
    }
}
