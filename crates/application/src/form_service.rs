use std::sync::Arc;

use serde_json::Value;
use shiftcheck_core::{AppError, AppResult};
use shiftcheck_domain::FormDef;

use crate::ports::FormRepository;

/// Application service for authoring and loading form definitions.
#[derive(Clone)]
pub struct FormService {
    repository: Arc<dyn FormRepository>,
}

impl FormService {
    /// Creates a form service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn FormRepository>) -> Self {
        Self { repository }
    }

    /// Saves or replaces a form definition after shape validation.
    pub async fn save_form(&self, form: FormDef) -> AppResult<FormDef> {
        form.validate()?;
        self.repository.save_form(form.clone()).await?;
        Ok(form)
    }

    /// Loads a form definition, re-validating its shape so an invalid
    /// document never reaches a renderer or session.
    pub async fn get_form(&self, form_id: &str) -> AppResult<FormDef> {
        let form = self
            .repository
            .find_form(form_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("form '{form_id}' does not exist")))?;

        form.validate()?;
        Ok(form)
    }

    /// Lists all form definitions ordered by id.
    pub async fn list_forms(&self) -> AppResult<Vec<FormDef>> {
        self.repository.list_forms().await
    }

    /// Deletes a form definition.
    pub async fn delete_form(&self, form_id: &str) -> AppResult<()> {
        if self.repository.find_form(form_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "form '{form_id}' does not exist"
            )));
        }

        self.repository.delete_form(form_id).await
    }

    /// Exports a form definition as its JSON wire format.
    pub async fn export_form(&self, form_id: &str) -> AppResult<Value> {
        let form = self.get_form(form_id).await?;
        serde_json::to_value(&form)
            .map_err(|error| AppError::Internal(format!("failed to encode form: {error}")))
    }

    /// Imports a form definition from its JSON wire format and saves it.
    ///
    /// Importing a previously exported document reproduces an equivalent
    /// form.
    pub async fn import_form(&self, document: Value) -> AppResult<FormDef> {
        let form: FormDef = serde_json::from_value(document)
            .map_err(|error| AppError::Validation(format!("invalid form document: {error}")))?;

        self.save_form(form).await
    }
}

#[cfg(test)]
mod tests;
