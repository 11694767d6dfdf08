//! Form field value objects

use std::collections::BTreeSet;

use serde_json::Value;

use super::validate::{ErrorKind, Validator};

/// Type-safe field values
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    /// Convenience constructor for text values
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Get the text value (returns empty string for bool fields)
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Bool(_) => "",
        }
    }

    /// Get the bool value (returns false for text fields)
    pub fn as_bool(&self) -> bool {
        match self {
            FieldValue::Bool(b) => *b,
            FieldValue::Text(_) => false,
        }
    }

    /// A text value is empty when it holds no characters; bools always carry
    /// a value
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Bool(_) => false,
        }
    }

    /// JSON representation for snapshots and submit payloads
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Bool(b) => Value::Bool(*b),
        }
    }
}

/// A single named form field: current value, interaction flags, active
/// validators, and the error set they produced.
///
/// The error set is recomputed synchronously and fully on every value or
/// validator change, never patched incrementally.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
    pub touched: bool,
    pub dirty: bool,
    validators: Vec<Validator>,
    errors: BTreeSet<ErrorKind>,
}

impl Field {
    /// Create a new empty text field
    pub fn text(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: FieldValue::default(),
            touched: false,
            dirty: false,
            validators: Vec::new(),
            errors: BTreeSet::new(),
        }
    }

    /// Create a new text field with initial value
    pub fn text_with_value(name: &str, value: String) -> Self {
        Self {
            value: FieldValue::Text(value),
            ..Self::text(name)
        }
    }

    /// Create a new boolean field with initial value
    pub fn flag(name: &str, value: bool) -> Self {
        Self {
            value: FieldValue::Bool(value),
            ..Self::text(name)
        }
    }

    /// Attach validators at construction time
    pub fn with_validators(mut self, validators: Vec<Validator>) -> Self {
        self.validators = validators;
        self.revalidate();
        self
    }

    /// Assign a new value, marking the field dirty and revalidating
    pub fn set_value(&mut self, value: FieldValue) {
        self.value = value;
        self.dirty = true;
        self.revalidate();
    }

    /// Assign a new value without recording an interaction: the field stays
    /// pristine. Used for programmatic patching (fixtures), not user input.
    pub fn patch_value(&mut self, value: FieldValue) {
        self.value = value;
        self.revalidate();
    }

    /// Mark the field as touched (focus left the field)
    pub fn mark_touched(&mut self) {
        self.touched = true;
    }

    /// A field is pristine until it has been touched or edited
    pub fn pristine(&self) -> bool {
        !self.touched && !self.dirty
    }

    /// Replace the active validator set and revalidate immediately
    pub fn set_validators(&mut self, validators: Vec<Validator>) {
        self.validators = validators;
        self.revalidate();
    }

    /// Remove all validators and revalidate immediately
    pub fn clear_validators(&mut self) {
        self.validators.clear();
        self.revalidate();
    }

    /// The currently active validators
    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    /// Recompute the full error set from the active validators
    pub fn revalidate(&mut self) {
        self.errors = self
            .validators
            .iter()
            .filter_map(|v| v.check(&self.value))
            .collect();
    }

    /// Active validation errors
    pub fn errors(&self) -> &BTreeSet<ErrorKind> {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod field_value {
        use super::*;

        #[test]
        fn test_default_is_empty_text() {
            let value = FieldValue::default();
            assert_eq!(value, FieldValue::Text(String::new()));
            assert!(value.is_empty());
        }

        #[test]
        fn test_as_text_for_bool_is_empty() {
            assert_eq!(FieldValue::Bool(true).as_text(), "");
        }

        #[test]
        fn test_as_bool_for_text_is_false() {
            assert!(!FieldValue::text("yes").as_bool());
        }

        #[test]
        fn test_bool_is_never_empty() {
            assert!(!FieldValue::Bool(false).is_empty());
        }

        #[test]
        fn test_to_json() {
            assert_eq!(FieldValue::text("a").to_json(), serde_json::json!("a"));
            assert_eq!(FieldValue::Bool(true).to_json(), serde_json::json!(true));
        }
    }

    mod field {
        use super::*;

        #[test]
        fn test_new_field_is_pristine() {
            let field = Field::text("firstName");
            assert!(field.pristine());
            assert!(!field.touched);
            assert!(!field.dirty);
            assert!(field.is_valid());
        }

        #[test]
        fn test_set_value_marks_dirty() {
            let mut field = Field::text("firstName");
            field.set_value(FieldValue::text("Ada"));
            assert!(field.dirty);
            assert!(!field.touched);
            assert!(!field.pristine());
        }

        #[test]
        fn test_mark_touched_breaks_pristine() {
            let mut field = Field::text("email");
            field.mark_touched();
            assert!(field.touched);
            assert!(!field.pristine());
        }

        #[test]
        fn test_set_value_revalidates() {
            let mut field = Field::text("firstName").with_validators(vec![Validator::Required]);
            assert!(field.errors().contains(&ErrorKind::Required));

            field.set_value(FieldValue::text("Ada"));
            assert!(field.is_valid());
        }

        #[test]
        fn test_set_validators_revalidates_immediately() {
            let mut field = Field::text("phone");
            assert!(field.is_valid());

            field.set_validators(vec![Validator::Required]);
            assert!(field.errors().contains(&ErrorKind::Required));

            field.clear_validators();
            assert!(field.is_valid());
        }

        #[test]
        fn test_error_set_is_fully_recomputed() {
            let mut field = Field::text("firstName")
                .with_validators(vec![Validator::Required, Validator::MinLength(3)]);
            field.set_value(FieldValue::text("Al"));
            assert_eq!(field.errors().len(), 1);
            assert!(field.errors().contains(&ErrorKind::MinLength));

            field.set_value(FieldValue::text("Alan"));
            assert!(field.errors().is_empty());
        }

        #[test]
        fn test_patch_value_leaves_field_pristine() {
            let mut field = Field::text("firstName").with_validators(vec![Validator::Required]);
            field.patch_value(FieldValue::text("Ada"));
            assert!(field.pristine());
            assert!(!field.dirty);
            // Still revalidates against the patched value
            assert!(field.is_valid());
        }

        #[test]
        fn test_flag_field_holds_bool() {
            let field = Field::flag("sendCatalog", true);
            assert!(field.value.as_bool());
        }
    }
}
