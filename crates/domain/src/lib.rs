//! Domain entities and the form-interpretation engine.

#![forbid(unsafe_code)]

mod answer;
mod condition;
mod form;
mod staff;
mod submission;

pub use answer::{AnswerMap, FieldContract, submitted_answers};
pub use condition::{Condition, ConditionOp, evaluate};
pub use form::{
    ComputedField, Field, FieldInput, FieldType, FormDef, FormPeriod, Section, ValidationRule,
};
pub use staff::{Staff, normalize_name, staff_id_slug, staff_key};
pub use submission::{Submission, SubmissionInput, date_key_daily, date_key_for, date_key_weekly};
