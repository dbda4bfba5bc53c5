use serde_json::Value;
use shiftcheck_core::{AppError, AppResult};
use shiftcheck_domain::{AnswerMap, FormDef, evaluate, submitted_answers};

/// Phase of a form-running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Accepting answer changes.
    Editing,
    /// A submit is in flight; changes and further submits are refused.
    Submitting,
}

/// One field's validation problem at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Field the issue is anchored to.
    pub field_id: String,
    /// User-facing message.
    pub message: String,
}

/// Answer-state reducer for one form-running session.
///
/// Holds the current answer map for an immutable form definition. Every
/// change re-resolves visibility in document order and unregisters fields
/// that left the visible set, so a hidden required field never blocks
/// submission and a stale hidden answer never feeds another field's
/// condition or the submitted snapshot.
pub struct FormSession {
    form: FormDef,
    answers: AnswerMap,
    phase: SessionPhase,
}

impl FormSession {
    /// Creates a session for a shape-valid form definition.
    pub fn new(form: FormDef) -> AppResult<Self> {
        form.validate()?;
        Ok(Self {
            form,
            answers: AnswerMap::new(),
            phase: SessionPhase::Editing,
        })
    }

    /// Returns the form definition this session runs.
    #[must_use]
    pub fn form(&self) -> &FormDef {
        &self.form
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Returns the raw current answers (registered fields only).
    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    /// Normalizes and records one answer, then reconciles visibility.
    ///
    /// Answering a currently hidden field is a no-op: the value is
    /// unregistered again by the reconciliation pass.
    pub fn set_answer(&mut self, field_id: &str, value: Value) -> AppResult<()> {
        self.require_editing()?;
        let field = self.form.field(field_id).ok_or_else(|| {
            AppError::Validation(format!(
                "unknown field '{}' for form '{}'",
                field_id,
                self.form.id().as_str()
            ))
        })?;

        let normalized = field.field_type().contract().normalize(field, value)?;
        self.answers.insert(field_id.to_owned(), normalized);
        self.reconcile_visibility();
        Ok(())
    }

    /// Clears one answer back to unanswered, then reconciles visibility.
    pub fn clear_answer(&mut self, field_id: &str) -> AppResult<()> {
        self.require_editing()?;
        if self.form.field(field_id).is_none() {
            return Err(AppError::Validation(format!(
                "unknown field '{}' for form '{}'",
                field_id,
                self.form.id().as_str()
            )));
        }

        self.answers.remove(field_id);
        self.reconcile_visibility();
        Ok(())
    }

    /// Returns the ids of currently visible fields, in document order.
    #[must_use]
    pub fn visible_field_ids(&self) -> Vec<String> {
        self.form
            .fields()
            .filter(|field| evaluate(field.show_if(), &self.answers))
            .map(|field| field.id().as_str().to_owned())
            .collect()
    }

    /// Reports the per-field issues that would block submission right now,
    /// recomputed against current visibility.
    #[must_use]
    pub fn validate(&self) -> Vec<ValidationIssue> {
        self.form
            .fields()
            .filter(|field| field.required())
            .filter(|field| evaluate(field.show_if(), &self.answers))
            .filter(|field| {
                let value = self.answers.get(field.id().as_str());
                !field.field_type().contract().is_answered(value)
            })
            .map(|field| ValidationIssue {
                field_id: field.id().as_str().to_owned(),
                message: "Required".to_owned(),
            })
            .collect()
    }

    /// Returns the answer set a submission would persist right now: visible
    /// fields only, unanswered ones contributing their registered default.
    #[must_use]
    pub fn submitted_answers(&self) -> AnswerMap {
        submitted_answers(&self.form, &self.answers)
    }

    /// Validates and transitions `Editing` → `Submitting`.
    ///
    /// Refused with a conflict while a submit is already in flight, and with
    /// a validation error (no phase change) while required visible fields
    /// are unanswered.
    pub fn begin_submit(&mut self) -> AppResult<()> {
        if self.phase == SessionPhase::Submitting {
            return Err(AppError::Conflict(
                "a submit is already in flight for this session".to_owned(),
            ));
        }

        let issues = self.validate();
        if !issues.is_empty() {
            let fields: Vec<&str> = issues
                .iter()
                .map(|issue| issue.field_id.as_str())
                .collect();
            return Err(AppError::Validation(format!(
                "required fields are unanswered: {}",
                fields.join(", ")
            )));
        }

        self.phase = SessionPhase::Submitting;
        Ok(())
    }

    /// Records a successful submit: the session resets to an empty
    /// `Editing` state.
    pub fn complete_submit(&mut self) {
        self.answers.clear();
        self.phase = SessionPhase::Editing;
    }

    /// Records a failed submit: back to `Editing` with answers retained.
    pub fn fail_submit(&mut self) {
        self.phase = SessionPhase::Editing;
    }

    fn require_editing(&self) -> AppResult<()> {
        if self.phase == SessionPhase::Submitting {
            return Err(AppError::Conflict(
                "answers are frozen while a submit is in flight".to_owned(),
            ));
        }

        Ok(())
    }

    // Unregisters every field that left the visible set. Iterates to a
    // fixpoint: removing a hidden field's answer can in turn hide another
    // field whose condition depended on it.
    fn reconcile_visibility(&mut self) {
        loop {
            let unregistered: Vec<String> = self
                .form
                .fields()
                .filter(|field| !evaluate(field.show_if(), &self.answers))
                .filter(|field| self.answers.contains_key(field.id().as_str()))
                .map(|field| field.id().as_str().to_owned())
                .collect();

            if unregistered.is_empty() {
                break;
            }

            for field_id in unregistered {
                self.answers.remove(field_id.as_str());
            }
        }
    }
}
