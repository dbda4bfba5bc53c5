use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Mutex;

use shiftcheck_core::AppResult;
use shiftcheck_domain::FormDef;

use super::FormService;
use crate::ports::FormRepository;

#[derive(Default)]
struct FakeFormRepository {
    forms: Mutex<HashMap<String, FormDef>>,
}

#[async_trait]
impl FormRepository for FakeFormRepository {
    async fn save_form(&self, form: FormDef) -> AppResult<()> {
        self.forms
            .lock()
            .await
            .insert(form.id().as_str().to_owned(), form);
        Ok(())
    }

    async fn find_form(&self, form_id: &str) -> AppResult<Option<FormDef>> {
        Ok(self.forms.lock().await.get(form_id).cloned())
    }

    async fn list_forms(&self) -> AppResult<Vec<FormDef>> {
        let mut forms: Vec<FormDef> = self.forms.lock().await.values().cloned().collect();
        forms.sort_by(|left, right| left.id().as_str().cmp(right.id().as_str()));
        Ok(forms)
    }

    async fn delete_form(&self, form_id: &str) -> AppResult<()> {
        self.forms.lock().await.remove(form_id);
        Ok(())
    }
}

fn service() -> FormService {
    FormService::new(Arc::new(FakeFormRepository::default()))
}

fn sample_document(form_id: &str) -> serde_json::Value {
    json!({
        "id": form_id,
        "title": "Daily checklist",
        "period": "daily",
        "sections": [{
            "title": "Main",
            "fields": [
                {
                    "id": "mode",
                    "type": "select",
                    "label": "Mode",
                    "required": true,
                    "options": ["A", "B"],
                },
                {
                    "id": "detail",
                    "type": "text",
                    "label": "Detail",
                    "required": true,
                    "showIf": {"field": "mode", "op": "eq", "value": "B"},
                },
            ],
        }],
    })
}

#[tokio::test]
async fn import_then_export_round_trips() {
    let service = service();
    let document = sample_document("daily");

    let imported = service
        .import_form(document.clone())
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(imported.id().as_str(), "daily");

    let exported = service
        .export_form("daily")
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(document, exported);

    let reimported = service
        .import_form(exported)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(imported, reimported);
}

#[tokio::test]
async fn save_rejects_invalid_shapes() {
    let service = service();

    let duplicate_ids = json!({
        "id": "broken",
        "title": "Broken",
        "period": "daily",
        "sections": [{
            "title": "",
            "fields": [
                {"id": "a", "type": "text", "label": "A"},
                {"id": "a", "type": "text", "label": "A again"},
            ],
        }],
    });
    assert!(service.import_form(duplicate_ids).await.is_err());

    let dangling_condition = json!({
        "id": "broken",
        "title": "Broken",
        "period": "daily",
        "sections": [{
            "title": "",
            "fields": [{
                "id": "detail",
                "type": "text",
                "label": "Detail",
                "showIf": {"field": "missing", "op": "eq", "value": "B"},
            }],
        }],
    });
    assert!(service.import_form(dangling_condition).await.is_err());
}

#[tokio::test]
async fn get_missing_form_is_not_found() {
    let service = service();
    assert!(service.get_form("nope").await.is_err());
    assert!(service.delete_form("nope").await.is_err());
}

#[tokio::test]
async fn list_is_ordered_by_id() {
    let service = service();
    for form_id in ["weekly", "daily"] {
        service
            .import_form(sample_document(form_id))
            .await
            .unwrap_or_else(|_| unreachable!());
    }

    let listed = service.list_forms().await.unwrap_or_else(|_| unreachable!());
    let ids: Vec<&str> = listed.iter().map(|form| form.id().as_str()).collect();
    assert_eq!(ids, vec!["daily", "weekly"]);
}

#[tokio::test]
async fn save_replaces_whole_document() {
    let service = service();
    service
        .import_form(sample_document("daily"))
        .await
        .unwrap_or_else(|_| unreachable!());

    let replacement = json!({
        "id": "daily",
        "title": "Daily checklist v2",
        "period": "weekly",
        "sections": [{
            "title": "Main",
            "fields": [{"id": "notes", "type": "text", "label": "Notes"}],
        }],
    });
    service
        .import_form(replacement)
        .await
        .unwrap_or_else(|_| unreachable!());

    let loaded = service.get_form("daily").await.unwrap_or_else(|_| unreachable!());
    assert_eq!(loaded.title().as_str(), "Daily checklist v2");
    assert_eq!(loaded.fields().count(), 1);
}

#[tokio::test]
async fn forms_deserialized_from_storage() {
    // A stored document deserializes through serde, bypassing constructors;
    // get_form still applies the shape pass.
    let repository = Arc::new(FakeFormRepository::default());
    let broken: FormDef = serde_json::from_value(json!({
        "id": "broken",
        "title": "Broken",
        "period": "daily",
        "sections": [{
            "title": "",
            "fields": [
                {"id": "a", "type": "text", "label": "A"},
                {"id": "a", "type": "text", "label": "A again"},
            ],
        }],
    }))
    .unwrap_or_else(|_| unreachable!());
    repository
        .save_form(broken)
        .await
        .unwrap_or_else(|_| unreachable!());

    let service = FormService::new(repository);
    assert!(service.get_form("broken").await.is_err());
}
