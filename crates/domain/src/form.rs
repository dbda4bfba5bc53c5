use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use shiftcheck_core::{AppError, AppResult, NonEmptyString};

use crate::condition::Condition;

/// Cadence of a checklist form; controls the date-key format of submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPeriod {
    /// One submission window per calendar date.
    Daily,
    /// One submission window per ISO week.
    Weekly,
}

impl FormPeriod {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

impl FromStr for FormPeriod {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            _ => Err(AppError::Validation(format!(
                "unknown form period '{value}'"
            ))),
        }
    }
}

/// Supported form field types.
///
/// Unrecognized type strings are preserved for round-trip fidelity and
/// dispatch with the text contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Free-text input.
    Text,
    /// Numeric input.
    Number,
    /// Three-valued yes/no choice (unanswered until a choice is made).
    Boolean,
    /// Single choice from a closed option list.
    Select,
    /// Any number of choices from a closed option list.
    Checklist,
    /// Date-only input, optionally bounded.
    Date,
    /// Unrecognized type string, kept verbatim.
    Other(String),
}

impl FieldType {
    /// Returns the stable wire value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Select => "select",
            Self::Checklist => "checklist",
            Self::Date => "date",
            Self::Other(value) => value.as_str(),
        }
    }
}

impl Default for FieldType {
    fn default() -> Self {
        Self::Text
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "text" => Self::Text,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "select" => Self::Select,
            "checklist" => Self::Checklist,
            "date" => Self::Date,
            _ => Self::Other(value),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from(String::deserialize(deserializer)?))
    }
}

/// One field in a form section.
///
/// Field keys follow the persisted document shape (camelCase for the
/// multi-word attributes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    id: NonEmptyString,
    #[serde(rename = "type")]
    field_type: FieldType,
    label: NonEmptyString,
    #[serde(default)]
    required: bool,
    #[serde(rename = "showIf", default, skip_serializing_if = "Option::is_none")]
    show_if: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Vec<String>>,
    #[serde(
        rename = "switchLabel",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    switch_label: Option<String>,
    #[serde(rename = "noLabel", default, skip_serializing_if = "Option::is_none")]
    no_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<String>,
}

/// Input payload for constructing one field.
#[derive(Debug, Clone, Default)]
pub struct FieldInput {
    /// Field id, unique within the containing form.
    pub id: String,
    /// Field type.
    pub field_type: FieldType,
    /// Display label.
    pub label: String,
    /// Whether an answer is required for submission.
    pub required: bool,
    /// Optional visibility condition.
    pub show_if: Option<Condition>,
    /// Placeholder text (text/number/date).
    pub placeholder: Option<String>,
    /// Option list (select/checklist).
    pub options: Option<Vec<String>>,
    /// Display label for the affirmative choice (boolean).
    pub switch_label: Option<String>,
    /// Display label for the negative choice (boolean).
    pub no_label: Option<String>,
    /// Inclusive lower date bound, `YYYY-MM-DD` (date).
    pub min: Option<String>,
    /// Inclusive upper date bound, `YYYY-MM-DD` (date).
    pub max: Option<String>,
}

impl Field {
    /// Creates a validated field.
    pub fn new(input: FieldInput) -> AppResult<Self> {
        let field = Self {
            id: NonEmptyString::new(input.id)?,
            field_type: input.field_type,
            label: NonEmptyString::new(input.label)?,
            required: input.required,
            show_if: input.show_if,
            placeholder: input.placeholder,
            options: input.options,
            switch_label: input.switch_label,
            no_label: input.no_label,
            min: input.min,
            max: input.max,
        };
        field.check_attributes()?;
        Ok(field)
    }

    /// Returns the field id.
    #[must_use]
    pub fn id(&self) -> &NonEmptyString {
        &self.id
    }

    /// Returns the field type.
    #[must_use]
    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &NonEmptyString {
        &self.label
    }

    /// Returns whether an answer is required for submission.
    #[must_use]
    pub fn required(&self) -> bool {
        self.required
    }

    /// Returns the visibility condition, if any.
    #[must_use]
    pub fn show_if(&self) -> Option<&Condition> {
        self.show_if.as_ref()
    }

    /// Returns the placeholder text, if any.
    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// Returns the option list; empty when the field carries none.
    #[must_use]
    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or(&[])
    }

    /// Returns the affirmative-choice label, if any.
    #[must_use]
    pub fn switch_label(&self) -> Option<&str> {
        self.switch_label.as_deref()
    }

    /// Returns the negative-choice label, if any.
    #[must_use]
    pub fn no_label(&self) -> Option<&str> {
        self.no_label.as_deref()
    }

    /// Returns the inclusive lower date bound, if any.
    #[must_use]
    pub fn min(&self) -> Option<&str> {
        self.min.as_deref()
    }

    /// Returns the inclusive upper date bound, if any.
    #[must_use]
    pub fn max(&self) -> Option<&str> {
        self.max.as_deref()
    }

    fn check_attributes(&self) -> AppResult<()> {
        let reject = |attribute: &str| {
            Err(AppError::Validation(format!(
                "field '{}' of type '{}' cannot set {}",
                self.id.as_str(),
                self.field_type.as_str(),
                attribute
            )))
        };

        match self.field_type {
            FieldType::Text | FieldType::Number => {
                if self.options.is_some() {
                    return reject("options");
                }
                if self.switch_label.is_some() || self.no_label.is_some() {
                    return reject("boolean choice labels");
                }
                if self.min.is_some() || self.max.is_some() {
                    return reject("date bounds");
                }
            }
            FieldType::Boolean => {
                if self.options.is_some() {
                    return reject("options");
                }
                if self.placeholder.is_some() {
                    return reject("placeholder");
                }
                if self.min.is_some() || self.max.is_some() {
                    return reject("date bounds");
                }
            }
            FieldType::Select | FieldType::Checklist => {
                if self.placeholder.is_some() {
                    return reject("placeholder");
                }
                if self.switch_label.is_some() || self.no_label.is_some() {
                    return reject("boolean choice labels");
                }
                if self.min.is_some() || self.max.is_some() {
                    return reject("date bounds");
                }

                let mut seen = HashSet::new();
                for option in self.options() {
                    if !seen.insert(option.as_str()) {
                        return Err(AppError::Validation(format!(
                            "field '{}' lists duplicate option '{}'",
                            self.id.as_str(),
                            option
                        )));
                    }
                }
            }
            FieldType::Date => {
                if self.options.is_some() {
                    return reject("options");
                }
                if self.switch_label.is_some() || self.no_label.is_some() {
                    return reject("boolean choice labels");
                }

                let min = self.min.as_deref().map(parse_bound).transpose()?;
                let max = self.max.as_deref().map(parse_bound).transpose()?;
                if let (Some(min), Some(max)) = (min, max)
                    && min > max
                {
                    return Err(AppError::Validation(format!(
                        "field '{}' date bounds are inverted",
                        self.id.as_str()
                    )));
                }
            }
            // Unrecognized types dispatch as text; their attributes are
            // opaque to this engine.
            FieldType::Other(_) => {}
        }

        Ok(())
    }
}

fn parse_bound(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("invalid date bound '{value}'")))
}

/// Section grouping consecutive fields; order is display and evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    title: String,
    #[serde(default)]
    fields: Vec<Field>,
}

impl Section {
    /// Creates a section; an empty title renders without a heading.
    #[must_use]
    pub fn new(title: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            title: title.into(),
            fields,
        }
    }

    /// Returns the section title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Returns the fields in display order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

/// Computed-field declaration, carried as data only (no evaluator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedField {
    id: String,
    expr: String,
}

impl ComputedField {
    /// Returns the computed-field id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the expression source.
    #[must_use]
    pub fn expr(&self) -> &str {
        self.expr.as_str()
    }
}

/// Cross-field validation rule, carried as data only (no evaluator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    field: String,
    rule: String,
    message: String,
}

impl ValidationRule {
    /// Returns the target field id.
    #[must_use]
    pub fn field(&self) -> &str {
        self.field.as_str()
    }

    /// Returns the rule source.
    #[must_use]
    pub fn rule(&self) -> &str {
        self.rule.as_str()
    }

    /// Returns the user-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// A checklist form definition.
///
/// Immutable for the duration of a form-running session; the serialized
/// shape is both the persisted document and the export/import wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDef {
    id: NonEmptyString,
    title: NonEmptyString,
    period: FormPeriod,
    #[serde(default)]
    sections: Vec<Section>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    computed: Vec<ComputedField>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    validation: Vec<ValidationRule>,
}

impl FormDef {
    /// Creates a validated form definition.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        period: FormPeriod,
        sections: Vec<Section>,
    ) -> AppResult<Self> {
        let form = Self {
            id: NonEmptyString::new(id)?,
            title: NonEmptyString::new(title)?,
            period,
            sections,
            computed: Vec::new(),
            validation: Vec::new(),
        };
        form.validate()?;
        Ok(form)
    }

    /// Returns the form id.
    #[must_use]
    pub fn id(&self) -> &NonEmptyString {
        &self.id
    }

    /// Returns the form title.
    #[must_use]
    pub fn title(&self) -> &NonEmptyString {
        &self.title
    }

    /// Returns the submission cadence.
    #[must_use]
    pub fn period(&self) -> FormPeriod {
        self.period
    }

    /// Returns the sections in display order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Returns the carried computed-field declarations.
    #[must_use]
    pub fn computed(&self) -> &[ComputedField] {
        &self.computed
    }

    /// Returns the carried validation-rule declarations.
    #[must_use]
    pub fn validation(&self) -> &[ValidationRule] {
        &self.validation
    }

    /// Iterates every field in document order (section order, then field
    /// order within the section).
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.sections.iter().flat_map(|section| section.fields())
    }

    /// Looks up a field by id.
    #[must_use]
    pub fn field(&self, field_id: &str) -> Option<&Field> {
        self.fields().find(|field| field.id().as_str() == field_id)
    }

    /// Shape-validates the whole definition.
    ///
    /// Deserialized definitions bypass the validated constructors, so this
    /// pass runs before a definition is persisted or handed to a session:
    /// non-empty id/title/field ids/labels, unique field ids, per-type
    /// attribute consistency, no empty condition groups, and no condition
    /// referencing an unknown field id.
    pub fn validate(&self) -> AppResult<()> {
        if self.id.as_str().trim().is_empty() {
            return Err(AppError::Validation("form id must not be empty".to_owned()));
        }
        if self.title.as_str().trim().is_empty() {
            return Err(AppError::Validation(
                "form title must not be empty".to_owned(),
            ));
        }

        let mut known_ids = HashSet::new();
        for field in self.fields() {
            if field.id().as_str().trim().is_empty() {
                return Err(AppError::Validation(
                    "field ids must not be empty".to_owned(),
                ));
            }
            if field.label().as_str().trim().is_empty() {
                return Err(AppError::Validation(format!(
                    "field '{}' label must not be empty",
                    field.id().as_str()
                )));
            }
            if !known_ids.insert(field.id().as_str()) {
                return Err(AppError::Validation(format!(
                    "duplicate field id '{}' in form '{}'",
                    field.id().as_str(),
                    self.id.as_str()
                )));
            }
        }

        for field in self.fields() {
            field.check_attributes()?;
            if let Some(condition) = field.show_if() {
                check_condition(condition, &known_ids, field.id().as_str())?;
            }
        }

        Ok(())
    }
}

fn check_condition(
    condition: &Condition,
    known_ids: &HashSet<&str>,
    owner_field_id: &str,
) -> AppResult<()> {
    match condition {
        Condition::And { and } => check_group(and, known_ids, owner_field_id),
        Condition::Or { or } => check_group(or, known_ids, owner_field_id),
        Condition::Compare { field, .. } => {
            if !known_ids.contains(field.as_str()) {
                return Err(AppError::Validation(format!(
                    "showIf on field '{owner_field_id}' references unknown field '{field}'"
                )));
            }
            Ok(())
        }
    }
}

fn check_group(
    children: &[Condition],
    known_ids: &HashSet<&str>,
    owner_field_id: &str,
) -> AppResult<()> {
    // Empty groups are not a valid persisted state; the builder collapses
    // them back to "no condition".
    if children.is_empty() {
        return Err(AppError::Validation(format!(
            "showIf on field '{owner_field_id}' contains an empty condition group"
        )));
    }

    for child in children {
        check_condition(child, known_ids, owner_field_id)?;
    }

    Ok(())
}
