//! Validator predicates, error kinds, and message projection
//!
//! Field validators are pure predicates over a single value; group
//! validators see the whole group so they can compare sibling fields.
//! A failed validator yields an [`ErrorKind`], never an error type that
//! aborts processing.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::field::{Field, FieldValue};
use super::group::FieldGroup;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9._%+-]+@[a-z0-9.-]+$").expect("email pattern is valid"));

/// Validation failure kinds, attached to a field or group
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Required,
    MinLength,
    MaxLength,
    Pattern,
    Range,
    Match,
}

impl ErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::MinLength => "min_length",
            Self::MaxLength => "max_length",
            Self::Pattern => "pattern",
            Self::Range => "range",
            Self::Match => "match",
        }
    }
}

/// Pure field-level predicates, parameterized at construction time
#[derive(Debug, Clone)]
pub enum Validator {
    /// Text must be non-empty; bools always pass
    Required,
    /// Non-empty text must hold at least this many characters
    MinLength(usize),
    /// Text must hold at most this many characters
    MaxLength(usize),
    /// Non-empty text must look like an email address
    EmailPattern,
    /// Non-empty text must parse as a number inside `[min, max]`
    Range { min: f64, max: f64 },
}

impl Validator {
    /// Range validator factory: the same predicate reused with different
    /// bounds per call site instead of duplicating the check.
    pub fn range(min: f64, max: f64) -> Self {
        Validator::Range { min, max }
    }

    /// Evaluate the predicate against a value. `None` means valid.
    pub fn check(&self, value: &FieldValue) -> Option<ErrorKind> {
        match self {
            Validator::Required => value.is_empty().then_some(ErrorKind::Required),
            Validator::MinLength(min) => {
                let text = value.as_text();
                (!text.is_empty() && text.chars().count() < *min).then_some(ErrorKind::MinLength)
            }
            Validator::MaxLength(max) => {
                (value.as_text().chars().count() > *max).then_some(ErrorKind::MaxLength)
            }
            Validator::EmailPattern => {
                let text = value.as_text();
                (!text.is_empty() && !EMAIL_PATTERN.is_match(text)).then_some(ErrorKind::Pattern)
            }
            Validator::Range { min, max } => {
                let text = value.as_text();
                if text.is_empty() {
                    return None;
                }
                match text.trim().parse::<f64>() {
                    Ok(n) if n >= *min && n <= *max => None,
                    _ => Some(ErrorKind::Range),
                }
            }
        }
    }
}

/// Cross-field predicates attached to a group rather than a single field
#[derive(Debug, Clone)]
pub enum GroupValidator {
    /// Two child fields must hold equal values. Gated on interaction: no
    /// error is reported while either field is still pristine, so the form
    /// never flags a mismatch before the user has typed in both fields.
    EmailMatch { email: String, confirm: String },
}

impl GroupValidator {
    /// Evaluate the predicate against a group's current children
    pub fn check(&self, group: &FieldGroup) -> Option<ErrorKind> {
        match self {
            GroupValidator::EmailMatch { email, confirm } => {
                let email = group.field(email)?;
                let confirm = group.field(confirm)?;
                if email.pristine() || confirm.pristine() {
                    return None;
                }
                (email.value != confirm.value).then_some(ErrorKind::Match)
            }
        }
    }
}

/// One error-kind to message-text mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntry {
    pub kind: ErrorKind,
    pub text: String,
}

/// Ordered message table; projection concatenates in entry order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTable {
    entries: Vec<MessageEntry>,
}

impl Default for MessageTable {
    fn default() -> Self {
        let texts = [
            (ErrorKind::Required, "Please enter your email address."),
            (ErrorKind::Pattern, "Please enter a valid email address."),
            (ErrorKind::MinLength, "The value entered is too short."),
            (ErrorKind::MaxLength, "The value entered is too long."),
            (ErrorKind::Range, "Please rate between 1 and 5."),
            (ErrorKind::Match, "The confirmation does not match."),
        ];
        Self {
            entries: texts
                .into_iter()
                .map(|(kind, text)| MessageEntry {
                    kind,
                    text: text.to_string(),
                })
                .collect(),
        }
    }
}

impl MessageTable {
    /// Build a table from (kind, text) pairs, preserving order
    pub fn from_pairs(pairs: impl IntoIterator<Item = (ErrorKind, String)>) -> Self {
        Self {
            entries: pairs
                .into_iter()
                .map(|(kind, text)| MessageEntry { kind, text })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[MessageEntry] {
        &self.entries
    }

    pub fn text_for(&self, kind: ErrorKind) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| e.text.as_str())
    }
}

/// Project a field's active errors into a human-readable message.
///
/// Empty unless the field is touched-or-dirty and has at least one error.
/// Multiple active kinds concatenate their texts in table order,
/// space-joined. Pure: unchanged field state always yields the same string.
pub fn project_message(field: &Field, table: &MessageTable) -> String {
    if !(field.touched || field.dirty) || field.errors().is_empty() {
        return String::new();
    }
    table
        .entries
        .iter()
        .filter(|e| field.errors().contains(&e.kind))
        .map(|e| e.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Project a group's own (cross-field) errors into a message.
///
/// Gating mirrors [`project_message`]: the group counts as interacted with
/// once any child is touched or dirty.
pub fn project_group_message(group: &FieldGroup, table: &MessageTable) -> String {
    if !group.interacted() || group.errors().is_empty() {
        return String::new();
    }
    table
        .entries
        .iter()
        .filter(|e| group.errors().contains(&e.kind))
        .map(|e| e.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collect the error set produced by a validator list against one value
pub fn run_validators(validators: &[Validator], value: &FieldValue) -> BTreeSet<ErrorKind> {
    validators.iter().filter_map(|v| v.check(value)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod range_validator {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_empty_value_is_valid() {
            let rating = Validator::range(1.0, 5.0);
            assert_eq!(rating.check(&FieldValue::text("")), None);
        }

        #[test]
        fn test_in_bounds_is_valid() {
            let rating = Validator::range(1.0, 5.0);
            for v in ["1", "3", "5", "4.5"] {
                assert_eq!(rating.check(&FieldValue::text(v)), None, "value {v}");
            }
        }

        #[test]
        fn test_out_of_bounds_fails() {
            let rating = Validator::range(1.0, 5.0);
            for v in ["0", "6", "-1", "100"] {
                assert_eq!(
                    rating.check(&FieldValue::text(v)),
                    Some(ErrorKind::Range),
                    "value {v}"
                );
            }
        }

        #[test]
        fn test_non_numeric_fails() {
            let rating = Validator::range(1.0, 5.0);
            assert_eq!(
                rating.check(&FieldValue::text("three")),
                Some(ErrorKind::Range)
            );
        }

        #[test]
        fn test_factory_parameterizes_bounds() {
            let wide = Validator::range(1.0, 10.0);
            assert_eq!(wide.check(&FieldValue::text("7")), None);

            let narrow = Validator::range(1.0, 5.0);
            assert_eq!(
                narrow.check(&FieldValue::text("7")),
                Some(ErrorKind::Range)
            );
        }
    }

    mod field_validators {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_required_rejects_empty_text() {
            assert_eq!(
                Validator::Required.check(&FieldValue::text("")),
                Some(ErrorKind::Required)
            );
            assert_eq!(Validator::Required.check(&FieldValue::text("x")), None);
        }

        #[test]
        fn test_required_accepts_any_bool() {
            assert_eq!(Validator::Required.check(&FieldValue::Bool(false)), None);
        }

        #[test]
        fn test_min_length_skips_empty() {
            let v = Validator::MinLength(3);
            assert_eq!(v.check(&FieldValue::text("")), None);
            assert_eq!(v.check(&FieldValue::text("ab")), Some(ErrorKind::MinLength));
            assert_eq!(v.check(&FieldValue::text("abc")), None);
        }

        #[test]
        fn test_max_length() {
            let v = Validator::MaxLength(5);
            assert_eq!(v.check(&FieldValue::text("abcde")), None);
            assert_eq!(
                v.check(&FieldValue::text("abcdef")),
                Some(ErrorKind::MaxLength)
            );
        }

        #[test]
        fn test_email_pattern() {
            let v = Validator::EmailPattern;
            assert_eq!(v.check(&FieldValue::text("")), None);
            assert_eq!(v.check(&FieldValue::text("a@b.com")), None);
            assert_eq!(
                v.check(&FieldValue::text("not-an-email")),
                Some(ErrorKind::Pattern)
            );
        }

        #[test]
        fn test_run_validators_collects_all_failures() {
            let validators = vec![Validator::MinLength(5), Validator::EmailPattern];
            let errors = run_validators(&validators, &FieldValue::text("a@"));
            assert!(errors.contains(&ErrorKind::MinLength));
            assert!(errors.contains(&ErrorKind::Pattern));
        }
    }

    mod message_projection {
        use super::*;
        use pretty_assertions::assert_eq;
        use crate::state::field::Field;

        #[test]
        fn test_pristine_field_projects_empty() {
            let field = Field::text("email").with_validators(vec![Validator::Required]);
            assert!(!field.is_valid());
            assert_eq!(project_message(&field, &MessageTable::default()), "");
        }

        #[test]
        fn test_touched_invalid_field_projects_text() {
            let mut field = Field::text("email").with_validators(vec![Validator::Required]);
            field.mark_touched();
            assert_eq!(
                project_message(&field, &MessageTable::default()),
                "Please enter your email address."
            );
        }

        #[test]
        fn test_dirty_valid_field_projects_empty() {
            let mut field = Field::text("email").with_validators(vec![Validator::Required]);
            field.set_value(FieldValue::text("a@b.com"));
            assert_eq!(project_message(&field, &MessageTable::default()), "");
        }

        #[test]
        fn test_multiple_errors_join_in_table_order() {
            let mut field = Field::text("email")
                .with_validators(vec![Validator::MinLength(5), Validator::EmailPattern]);
            field.set_value(FieldValue::text("a@"));
            // Pattern sits before MinLength in the default table
            assert_eq!(
                project_message(&field, &MessageTable::default()),
                "Please enter a valid email address. The value entered is too short."
            );
        }

        #[test]
        fn test_projection_is_idempotent() {
            let mut field = Field::text("email").with_validators(vec![Validator::Required]);
            field.mark_touched();
            let table = MessageTable::default();
            let first = project_message(&field, &table);
            let second = project_message(&field, &table);
            assert_eq!(first, second);
        }

        #[test]
        fn test_kind_missing_from_table_is_skipped() {
            let mut field = Field::text("email").with_validators(vec![Validator::Required]);
            field.mark_touched();
            let table = MessageTable::from_pairs([(ErrorKind::Pattern, "bad shape".to_string())]);
            assert_eq!(project_message(&field, &table), "");
        }
    }

    mod message_table {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_default_covers_all_kinds() {
            let table = MessageTable::default();
            for kind in [
                ErrorKind::Required,
                ErrorKind::MinLength,
                ErrorKind::MaxLength,
                ErrorKind::Pattern,
                ErrorKind::Range,
                ErrorKind::Match,
            ] {
                assert!(table.text_for(kind).is_some(), "missing {kind:?}");
            }
        }

        #[test]
        fn test_serde_round_trip_preserves_order() {
            let table = MessageTable::default();
            let json = serde_json::to_string(&table).unwrap();
            let parsed: MessageTable = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, table);
        }
    }
}
