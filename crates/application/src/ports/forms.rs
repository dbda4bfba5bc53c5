use async_trait::async_trait;
use shiftcheck_core::AppResult;
use shiftcheck_domain::FormDef;

/// Persistence port for form definitions.
#[async_trait]
pub trait FormRepository: Send + Sync {
    /// Saves or replaces a form definition, keyed by its id.
    async fn save_form(&self, form: FormDef) -> AppResult<()>;

    /// Looks up a form definition by id.
    async fn find_form(&self, form_id: &str) -> AppResult<Option<FormDef>>;

    /// Lists all form definitions ordered by id.
    async fn list_forms(&self) -> AppResult<Vec<FormDef>>;

    /// Deletes a form definition by id.
    async fn delete_form(&self, form_id: &str) -> AppResult<()>;
}
