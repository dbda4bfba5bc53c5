use serde::{Deserialize, Serialize};
use shiftcheck_core::{AppResult, NonEmptyString};

/// Roster entry for one staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    id: NonEmptyString,
    name: NonEmptyString,
    active: bool,
}

impl Staff {
    /// Creates a validated roster entry.
    pub fn new(id: impl Into<String>, name: impl Into<String>, active: bool) -> AppResult<Self> {
        Ok(Self {
            id: NonEmptyString::new(id)?,
            name: NonEmptyString::new(name)?,
            active,
        })
    }

    /// Returns the roster id.
    #[must_use]
    pub fn id(&self) -> &NonEmptyString {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns whether the member is selectable for shifts.
    #[must_use]
    pub fn active(&self) -> bool {
        self.active
    }
}

/// Collapses case and inner whitespace so spelling variants of the same name
/// compare equal.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Order-independent identifier for a pair of staff members, used to group
/// submissions: normalized names, sorted, joined with `__`.
#[must_use]
pub fn staff_key(first: &str, second: &str) -> String {
    let mut pair = [normalize_name(first), normalize_name(second)];
    pair.sort();
    format!("{}__{}", pair[0], pair[1])
}

/// Derives a roster id slug from a display name: lowercase, whitespace
/// becomes `_`, everything outside `[a-z0-9_]` is dropped, capped at 40
/// characters. Returns `None` when nothing survives (caller falls back to a
/// random id).
#[must_use]
pub fn staff_id_slug(name: &str) -> Option<String> {
    let slug: String = name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || *ch == '_')
        .take(40)
        .collect();

    (!slug.is_empty()).then_some(slug)
}

#[cfg(test)]
mod tests {
    use super::{normalize_name, staff_id_slug, staff_key};

    #[test]
    fn normalization_collapses_case_and_whitespace() {
        assert_eq!(normalize_name("  Alex   Jones "), "alex jones");
    }

    #[test]
    fn staff_key_is_order_independent() {
        let forward = staff_key("Alex Jones", "Pat Smith");
        let reverse = staff_key("pat  smith", "ALEX JONES");
        assert_eq!(forward, reverse);
        assert_eq!(forward, "alex jones__pat smith");
    }

    #[test]
    fn slug_strips_punctuation_and_caps_length() {
        assert_eq!(
            staff_id_slug("Alex O'Brien-Jones").as_deref(),
            Some("alex_obrienjones")
        );
        assert_eq!(staff_id_slug("!!!"), None);

        let long = "a".repeat(60);
        let slug = staff_id_slug(long.as_str()).unwrap_or_else(|| unreachable!());
        assert_eq!(slug.len(), 40);
    }
}
