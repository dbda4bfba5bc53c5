use std::collections::HashMap;

use async_trait::async_trait;
use shiftcheck_application::FormRepository;
use shiftcheck_core::AppResult;
use shiftcheck_domain::FormDef;
use tokio::sync::RwLock;

/// In-memory form repository for tests and local development.
#[derive(Debug, Default)]
pub struct InMemoryFormRepository {
    forms: RwLock<HashMap<String, FormDef>>,
}

impl InMemoryFormRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            forms: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl FormRepository for InMemoryFormRepository {
    async fn save_form(&self, form: FormDef) -> AppResult<()> {
        self.forms
            .write()
            .await
            .insert(form.id().as_str().to_owned(), form);
        Ok(())
    }

    async fn find_form(&self, form_id: &str) -> AppResult<Option<FormDef>> {
        Ok(self.forms.read().await.get(form_id).cloned())
    }

    async fn list_forms(&self) -> AppResult<Vec<FormDef>> {
        let forms = self.forms.read().await;
        let mut listed: Vec<FormDef> = forms.values().cloned().collect();
        listed.sort_by(|left, right| left.id().as_str().cmp(right.id().as_str()));
        Ok(listed)
    }

    async fn delete_form(&self, form_id: &str) -> AppResult<()> {
        self.forms.write().await.remove(form_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shiftcheck_application::FormRepository;
    use shiftcheck_domain::FormDef;

    use super::InMemoryFormRepository;

    fn form(form_id: &str) -> FormDef {
        serde_json::from_value(json!({
            "id": form_id,
            "title": "Checklist",
            "period": "daily",
            "sections": [],
        }))
        .unwrap_or_else(|_| unreachable!())
    }

    #[tokio::test]
    async fn save_find_list_delete() {
        let repository = InMemoryFormRepository::new();
        repository
            .save_form(form("weekly"))
            .await
            .unwrap_or_else(|_| unreachable!());
        repository
            .save_form(form("daily"))
            .await
            .unwrap_or_else(|_| unreachable!());

        let found = repository
            .find_form("daily")
            .await
            .unwrap_or_else(|_| unreachable!());
        assert!(found.is_some());

        let listed = repository
            .list_forms()
            .await
            .unwrap_or_else(|_| unreachable!());
        let ids: Vec<&str> = listed.iter().map(|form| form.id().as_str()).collect();
        assert_eq!(ids, vec!["daily", "weekly"]);

        repository
            .delete_form("daily")
            .await
            .unwrap_or_else(|_| unreachable!());
        assert!(
            repository
                .find_form("daily")
                .await
                .unwrap_or_else(|_| unreachable!())
                .is_none()
        );
    }
}
