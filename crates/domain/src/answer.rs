use chrono::NaiveDate;
use serde_json::{Map, Value};
use shiftcheck_core::{AppError, AppResult};

use crate::condition::evaluate;
use crate::form::{Field, FieldType, FormDef};

/// Current answer values keyed by field id.
///
/// Absence of a key means the field is unanswered; a boolean field is
/// three-valued through absence (neither `true` nor `false` chosen yet).
pub type AnswerMap = Map<String, Value>;

/// Behavior row for one field type.
///
/// Dispatch is a closed table: the value an unanswered field contributes to
/// a submission, the predicate deciding whether `required` is satisfied, and
/// the normalizer applied before a raw value enters the answer map. Adding a
/// field type means adding one row.
pub struct FieldContract {
    default_value: fn() -> Option<Value>,
    is_answered: fn(Option<&Value>) -> bool,
    normalize: fn(&Field, Value) -> AppResult<Value>,
}

impl FieldContract {
    /// Returns the value an unanswered field contributes to a submitted
    /// answer set; `None` omits the field entirely.
    #[must_use]
    pub fn default_value(&self) -> Option<Value> {
        (self.default_value)()
    }

    /// Returns whether the current value satisfies `required`.
    #[must_use]
    pub fn is_answered(&self, value: Option<&Value>) -> bool {
        (self.is_answered)(value)
    }

    /// Shape-checks and normalizes a raw value for this field.
    pub fn normalize(&self, field: &Field, value: Value) -> AppResult<Value> {
        (self.normalize)(field, value)
    }
}

static TEXT_CONTRACT: FieldContract = FieldContract {
    default_value: no_default,
    is_answered: answered_non_empty_string,
    normalize: normalize_text,
};

static NUMBER_CONTRACT: FieldContract = FieldContract {
    default_value: no_default,
    is_answered: answered_number,
    normalize: normalize_number,
};

static BOOLEAN_CONTRACT: FieldContract = FieldContract {
    default_value: no_default,
    is_answered: answered_boolean,
    normalize: normalize_boolean,
};

static SELECT_CONTRACT: FieldContract = FieldContract {
    default_value: empty_string_default,
    is_answered: answered_non_empty_string,
    normalize: normalize_select,
};

static CHECKLIST_CONTRACT: FieldContract = FieldContract {
    default_value: empty_set_default,
    is_answered: answered_non_empty_array,
    normalize: normalize_checklist,
};

static DATE_CONTRACT: FieldContract = FieldContract {
    default_value: no_default,
    is_answered: answered_non_empty_string,
    normalize: normalize_date,
};

impl FieldType {
    /// Returns the dispatch row for this field type; unrecognized types use
    /// the text row.
    #[must_use]
    pub fn contract(&self) -> &'static FieldContract {
        match self {
            Self::Text | Self::Other(_) => &TEXT_CONTRACT,
            Self::Number => &NUMBER_CONTRACT,
            Self::Boolean => &BOOLEAN_CONTRACT,
            Self::Select => &SELECT_CONTRACT,
            Self::Checklist => &CHECKLIST_CONTRACT,
            Self::Date => &DATE_CONTRACT,
        }
    }
}

fn no_default() -> Option<Value> {
    None
}

fn empty_string_default() -> Option<Value> {
    Some(Value::String(String::new()))
}

fn empty_set_default() -> Option<Value> {
    Some(Value::Array(Vec::new()))
}

fn answered_non_empty_string(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(text)) if !text.is_empty())
}

fn answered_number(value: Option<&Value>) -> bool {
    // JSON numbers are always finite; an unparsed input never reaches the
    // answer map in the first place.
    matches!(value, Some(Value::Number(_)))
}

fn answered_boolean(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(_)))
}

fn answered_non_empty_array(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Array(items)) if !items.is_empty())
}

fn type_mismatch(field: &Field, expected: &str) -> AppError {
    AppError::Validation(format!(
        "field '{}' expects {expected}",
        field.id().as_str()
    ))
}

fn normalize_text(field: &Field, value: Value) -> AppResult<Value> {
    match value {
        Value::String(_) => Ok(value),
        _ => Err(type_mismatch(field, "a string")),
    }
}

fn normalize_number(field: &Field, value: Value) -> AppResult<Value> {
    match value {
        Value::Number(_) => Ok(value),
        _ => Err(type_mismatch(field, "a number")),
    }
}

fn normalize_boolean(field: &Field, value: Value) -> AppResult<Value> {
    match value {
        Value::Bool(_) => Ok(value),
        _ => Err(type_mismatch(field, "true or false")),
    }
}

fn normalize_select(field: &Field, value: Value) -> AppResult<Value> {
    let Value::String(text) = value else {
        return Err(type_mismatch(field, "an option string"));
    };

    // The empty string is "no selection", the select default.
    if !text.is_empty() && !field.options().iter().any(|option| option == &text) {
        return Err(AppError::Validation(format!(
            "'{}' is not an option of field '{}'",
            text,
            field.id().as_str()
        )));
    }

    Ok(Value::String(text))
}

fn normalize_checklist(field: &Field, value: Value) -> AppResult<Value> {
    let Value::Array(items) = value else {
        return Err(type_mismatch(field, "a list of option strings"));
    };

    // Set semantics: membership only, duplicates collapse.
    let mut selected: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let Value::String(text) = item else {
            return Err(type_mismatch(field, "a list of option strings"));
        };

        if !field.options().iter().any(|option| option == &text) {
            return Err(AppError::Validation(format!(
                "'{}' is not an option of field '{}'",
                text,
                field.id().as_str()
            )));
        }

        if !selected.contains(&text) {
            selected.push(text);
        }
    }

    Ok(Value::Array(selected.into_iter().map(Value::String).collect()))
}

fn normalize_date(field: &Field, value: Value) -> AppResult<Value> {
    let Value::String(text) = value else {
        return Err(type_mismatch(field, "an ISO date string"));
    };

    let date = NaiveDate::parse_from_str(text.as_str(), "%Y-%m-%d").map_err(|_| {
        AppError::Validation(format!(
            "field '{}' expects an ISO date, got '{}'",
            field.id().as_str(),
            text
        ))
    })?;

    let parse_lenient = |bound: Option<&str>| {
        bound.and_then(|value| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok())
    };
    let below_min = parse_lenient(field.min()).is_some_and(|min| date < min);
    let above_max = parse_lenient(field.max()).is_some_and(|max| date > max);
    if below_min || above_max {
        return Err(AppError::Validation(format!(
            "date '{}' for field '{}' is outside the allowed range",
            text,
            field.id().as_str()
        )));
    }

    Ok(Value::String(text))
}

/// Builds the answer set a submission persists: every currently visible
/// field in document order, with its answered value or its registered
/// default; hidden fields never contribute, even if previously answered.
#[must_use]
pub fn submitted_answers(form: &FormDef, answers: &AnswerMap) -> AnswerMap {
    let mut snapshot = AnswerMap::new();

    for field in form.fields() {
        if !evaluate(field.show_if(), answers) {
            continue;
        }

        let field_id = field.id().as_str();
        if let Some(value) = answers.get(field_id) {
            snapshot.insert(field_id.to_owned(), value.clone());
        } else if let Some(default_value) = field.field_type().contract().default_value() {
            snapshot.insert(field_id.to_owned(), default_value);
        }
    }

    snapshot
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::AnswerMap;
    use crate::form::{Field, FieldInput, FieldType};

    fn field(field_type: FieldType, options: Option<Vec<&str>>) -> Field {
        Field::new(FieldInput {
            id: "f".to_owned(),
            label: "F".to_owned(),
            field_type,
            options: options.map(|items| items.into_iter().map(str::to_owned).collect()),
            ..FieldInput::default()
        })
        .unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn text_requires_non_empty_string() {
        let contract = FieldType::Text.contract();
        assert!(!contract.is_answered(None));
        assert!(!contract.is_answered(Some(&json!(""))));
        assert!(contract.is_answered(Some(&json!("x"))));
        assert_eq!(contract.default_value(), None);
    }

    #[test]
    fn boolean_requires_an_explicit_choice() {
        let contract = FieldType::Boolean.contract();
        assert!(!contract.is_answered(None));
        assert!(contract.is_answered(Some(&json!(true))));
        assert!(contract.is_answered(Some(&json!(false))));
    }

    #[test]
    fn select_defaults_to_empty_string() {
        let contract = FieldType::Select.contract();
        assert_eq!(contract.default_value(), Some(json!("")));
        assert!(!contract.is_answered(Some(&json!(""))));
        assert!(contract.is_answered(Some(&json!("A"))));
    }

    #[test]
    fn select_rejects_values_outside_options() {
        let mode = field(FieldType::Select, Some(vec!["A", "B"]));
        let contract = FieldType::Select.contract();
        assert!(contract.normalize(&mode, json!("A")).is_ok());
        assert!(contract.normalize(&mode, json!("")).is_ok());
        assert!(contract.normalize(&mode, json!("C")).is_err());
        assert!(contract.normalize(&mode, json!(1)).is_err());
    }

    #[test]
    fn checklist_collapses_duplicates_and_rejects_strangers() {
        let kit = field(FieldType::Checklist, Some(vec!["Ox", "Trauma"]));
        let contract = FieldType::Checklist.contract();

        let normalized = contract
            .normalize(&kit, json!(["Ox", "Ox", "Trauma"]))
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(normalized, json!(["Ox", "Trauma"]));

        assert!(contract.normalize(&kit, json!(["Splint"])).is_err());
        assert!(contract.normalize(&kit, json!("Ox")).is_err());
        assert_eq!(contract.default_value(), Some(json!([])));
    }

    #[test]
    fn number_normalization_rejects_strings() {
        let count = field(FieldType::Number, None);
        let contract = FieldType::Number.contract();
        assert!(contract.normalize(&count, json!(3)).is_ok());
        assert!(contract.normalize(&count, json!("3")).is_err());
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let serviced = Field::new(FieldInput {
            id: "serviced".to_owned(),
            field_type: FieldType::Date,
            label: "Serviced".to_owned(),
            min: Some("2025-01-01".to_owned()),
            max: Some("2025-01-31".to_owned()),
            ..FieldInput::default()
        })
        .unwrap_or_else(|_| unreachable!());
        let contract = FieldType::Date.contract();

        assert!(contract.normalize(&serviced, json!("2025-01-01")).is_ok());
        assert!(contract.normalize(&serviced, json!("2025-01-31")).is_ok());
        assert!(contract.normalize(&serviced, json!("2024-12-31")).is_err());
        assert!(contract.normalize(&serviced, json!("2025-02-01")).is_err());
        assert!(contract.normalize(&serviced, json!("not-a-date")).is_err());
    }

    #[test]
    fn unknown_type_uses_the_text_row() {
        let signature = field(FieldType::Other("signature".to_owned()), None);
        let contract = signature.field_type().contract();
        assert!(contract.normalize(&signature, json!("scribble")).is_ok());
        assert!(!contract.is_answered(Some(&Value::String(String::new()))));
    }

    #[test]
    fn submitted_answers_registers_defaults_and_drops_hidden() {
        use super::submitted_answers;
        use crate::form::FormDef;

        let raw = serde_json::json!({
            "id": "daily",
            "title": "Daily",
            "period": "daily",
            "sections": [{
                "title": "",
                "fields": [
                    {"id": "mode", "type": "select", "label": "Mode", "options": ["A", "B"]},
                    {"id": "kit", "type": "checklist", "label": "Kit", "options": ["Ox"]},
                    {
                        "id": "detail", "type": "text", "label": "Detail",
                        "showIf": {"field": "mode", "op": "eq", "value": "B"},
                    },
                ],
            }],
        });
        let form: FormDef = serde_json::from_value(raw).unwrap_or_else(|_| unreachable!());

        let mut answers = AnswerMap::new();
        answers.insert("mode".to_owned(), json!("A"));
        answers.insert("detail".to_owned(), json!("stale"));

        let snapshot = submitted_answers(&form, &answers);
        assert_eq!(snapshot.get("mode"), Some(&json!("A")));
        // Hidden field's stale answer is dropped from the snapshot.
        assert!(!snapshot.contains_key("detail"));
        // Untouched checklist registers its empty-set default.
        assert_eq!(snapshot.get("kit"), Some(&json!([])));
    }
}
