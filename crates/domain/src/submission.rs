use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shiftcheck_core::{AppResult, NonEmptyString};

use crate::answer::AnswerMap;
use crate::form::FormPeriod;
use crate::staff::staff_key;

/// One persisted checklist submission.
///
/// Serialized keys match the persisted document shape; the record id is
/// assigned by the persistence adapter on append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    id: NonEmptyString,
    #[serde(rename = "formId")]
    form_id: NonEmptyString,
    period: FormPeriod,
    #[serde(rename = "dateKey")]
    date_key: NonEmptyString,
    staff: [String; 2],
    #[serde(rename = "staffKey")]
    staff_key: NonEmptyString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sequence: Option<i64>,
    answers: AnswerMap,
    #[serde(rename = "createdAt")]
    created_at: DateTime<Utc>,
}

/// Input payload for appending one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionInput {
    /// Form the submission answers.
    pub form_id: String,
    /// Cadence of the form at submit time.
    pub period: FormPeriod,
    /// Period-dependent date key (`YYYY-MM-DD` or `YYYY-Www`).
    pub date_key: String,
    /// The two staff members on shift, as entered.
    pub staff: [String; 2],
    /// Optional per-(form, staff pair, date) sequence number.
    pub sequence: Option<i64>,
    /// Visible answered values at submit time.
    pub answers: AnswerMap,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
}

impl SubmissionInput {
    /// Returns the order-independent key for the staff pair.
    #[must_use]
    pub fn staff_key(&self) -> String {
        staff_key(self.staff[0].as_str(), self.staff[1].as_str())
    }
}

impl Submission {
    /// Creates a validated submission record with a storage-assigned id.
    pub fn new(id: impl Into<String>, input: SubmissionInput) -> AppResult<Self> {
        let staff_key = input.staff_key();
        let [first, second] = input.staff;

        Ok(Self {
            id: NonEmptyString::new(id)?,
            form_id: NonEmptyString::new(input.form_id)?,
            period: input.period,
            date_key: NonEmptyString::new(input.date_key)?,
            staff: [
                NonEmptyString::new(first)?.into(),
                NonEmptyString::new(second)?.into(),
            ],
            staff_key: NonEmptyString::new(staff_key)?,
            sequence: input.sequence,
            answers: input.answers,
            created_at: input.created_at,
        })
    }

    /// Returns the storage-assigned record id.
    #[must_use]
    pub fn id(&self) -> &NonEmptyString {
        &self.id
    }

    /// Returns the submitted form id.
    #[must_use]
    pub fn form_id(&self) -> &NonEmptyString {
        &self.form_id
    }

    /// Returns the form cadence at submit time.
    #[must_use]
    pub fn period(&self) -> FormPeriod {
        self.period
    }

    /// Returns the period-dependent date key.
    #[must_use]
    pub fn date_key(&self) -> &NonEmptyString {
        &self.date_key
    }

    /// Returns the staff pair as entered.
    #[must_use]
    pub fn staff(&self) -> &[String; 2] {
        &self.staff
    }

    /// Returns the order-independent staff-pair key.
    #[must_use]
    pub fn staff_key(&self) -> &NonEmptyString {
        &self.staff_key
    }

    /// Returns the sequence number, when one was allocated.
    #[must_use]
    pub fn sequence(&self) -> Option<i64> {
        self.sequence
    }

    /// Returns the submitted answer set.
    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    /// Returns the submission timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Date key for a daily form: the calendar date, `YYYY-MM-DD`.
#[must_use]
pub fn date_key_daily(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Date key for a weekly form: `YYYY-Www` per ISO-8601, using the week-based
/// year (early January can belong to the previous ISO year).
#[must_use]
pub fn date_key_weekly(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

/// Date key for the given cadence.
#[must_use]
pub fn date_key_for(period: FormPeriod, date: NaiveDate) -> String {
    match period {
        FormPeriod::Daily => date_key_daily(date),
        FormPeriod::Weekly => date_key_weekly(date),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{date_key_daily, date_key_weekly};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(|| unreachable!())
    }

    #[test]
    fn daily_key_is_the_calendar_date() {
        assert_eq!(date_key_daily(date(2025, 9, 18)), "2025-09-18");
    }

    #[test]
    fn weekly_key_uses_iso_week() {
        assert_eq!(date_key_weekly(date(2025, 9, 18)), "2025-W38");
    }

    #[test]
    fn weekly_key_uses_week_based_year_at_boundaries() {
        // 2027-01-01 is a Friday in the last ISO week of 2026.
        assert_eq!(date_key_weekly(date(2027, 1, 1)), "2026-W53");
        // 2024-12-30 is a Monday opening week 1 of 2025.
        assert_eq!(date_key_weekly(date(2024, 12, 30)), "2025-W01");
    }
}
