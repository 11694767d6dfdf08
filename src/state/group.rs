//! Composite field tree with group-level validators
//!
//! A group owns an ordered list of fields and nested groups plus its own
//! cross-field validators. Validity is the conjunction of the group's own
//! validators and every descendant's validity, recomputed top-down on every
//! affected change.

use std::collections::BTreeSet;

use serde_json::Value;

use super::field::Field;
use super::validate::{ErrorKind, GroupValidator};

/// One entry in a group: either a leaf field or a nested group
#[derive(Debug, Clone)]
pub enum ControlNode {
    Field(Field),
    Group(FieldGroup),
}

impl ControlNode {
    pub fn name(&self) -> &str {
        match self {
            ControlNode::Field(f) => &f.name,
            ControlNode::Group(g) => &g.name,
        }
    }
}

/// Ordered composite of fields and sub-groups sharing a validity computation
#[derive(Debug, Clone)]
pub struct FieldGroup {
    pub name: String,
    children: Vec<ControlNode>,
    validators: Vec<GroupValidator>,
    errors: BTreeSet<ErrorKind>,
}

impl FieldGroup {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            children: Vec::new(),
            validators: Vec::new(),
            errors: BTreeSet::new(),
        }
    }

    /// Append a field; insertion order is display order
    pub fn with_field(mut self, field: Field) -> Self {
        self.children.push(ControlNode::Field(field));
        self
    }

    /// Append a nested group
    pub fn with_group(mut self, group: FieldGroup) -> Self {
        self.children.push(ControlNode::Group(group));
        self
    }

    /// Attach a group-level (cross-field) validator
    pub fn with_validator(mut self, validator: GroupValidator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn children(&self) -> &[ControlNode] {
        &self.children
    }

    /// Look up a field by dotted path, e.g. `"emailGroup.email"`
    pub fn field(&self, path: &str) -> Option<&Field> {
        match path.split_once('.') {
            Some((head, rest)) => self.children.iter().find_map(|c| match c {
                ControlNode::Group(g) if g.name == head => g.field(rest),
                _ => None,
            }),
            None => self.children.iter().find_map(|c| match c {
                ControlNode::Field(f) if f.name == path => Some(f),
                _ => None,
            }),
        }
    }

    /// Mutable dotted-path field lookup
    pub fn field_mut(&mut self, path: &str) -> Option<&mut Field> {
        match path.split_once('.') {
            Some((head, rest)) => self.children.iter_mut().find_map(|c| match c {
                ControlNode::Group(g) if g.name == head => g.field_mut(rest),
                _ => None,
            }),
            None => self.children.iter_mut().find_map(|c| match c {
                ControlNode::Field(f) if f.name == path => Some(f),
                _ => None,
            }),
        }
    }

    /// Look up a nested group by dotted path
    pub fn group(&self, path: &str) -> Option<&FieldGroup> {
        match path.split_once('.') {
            Some((head, rest)) => self.children.iter().find_map(|c| match c {
                ControlNode::Group(g) if g.name == head => g.group(rest),
                _ => None,
            }),
            None => self.children.iter().find_map(|c| match c {
                ControlNode::Group(g) if g.name == path => Some(g),
                _ => None,
            }),
        }
    }

    /// Top-down full recomputation: every descendant field first, then this
    /// group's own validators against the refreshed children.
    pub fn revalidate(&mut self) {
        for child in &mut self.children {
            match child {
                ControlNode::Field(f) => f.revalidate(),
                ControlNode::Group(g) => g.revalidate(),
            }
        }
        let validators = self.validators.clone();
        let mut own = BTreeSet::new();
        for validator in &validators {
            if let Some(kind) = validator.check(self) {
                own.insert(kind);
            }
        }
        self.errors = own;
    }

    /// Errors from this group's own validators (not the children's)
    pub fn errors(&self) -> &BTreeSet<ErrorKind> {
        &self.errors
    }

    /// Valid only if the group's own validators and every descendant pass
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
            && self.children.iter().all(|c| match c {
                ControlNode::Field(f) => f.is_valid(),
                ControlNode::Group(g) => g.is_valid(),
            })
    }

    /// True once any descendant field has been touched or edited
    pub fn interacted(&self) -> bool {
        self.children.iter().any(|c| match c {
            ControlNode::Field(f) => f.touched || f.dirty,
            ControlNode::Group(g) => g.interacted(),
        })
    }

    /// All fields as (dotted path, field) pairs in declaration order
    pub fn walk_fields(&self) -> Vec<(String, &Field)> {
        let mut out = Vec::new();
        self.collect_fields("", &mut out);
        out
    }

    /// All nested groups as (dotted path, group) pairs in declaration order
    pub fn walk_groups(&self) -> Vec<(String, &FieldGroup)> {
        let mut out = Vec::new();
        self.collect_groups("", &mut out);
        out
    }

    /// Current values as a nested JSON object
    pub fn values(&self) -> Value {
        let mut map = serde_json::Map::new();
        for child in &self.children {
            match child {
                ControlNode::Field(f) => {
                    map.insert(f.name.clone(), f.value.to_json());
                }
                ControlNode::Group(g) => {
                    map.insert(g.name.clone(), g.values());
                }
            }
        }
        Value::Object(map)
    }

    fn collect_fields<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a Field)>) {
        for child in &self.children {
            let path = if prefix.is_empty() {
                child.name().to_string()
            } else {
                format!("{prefix}.{}", child.name())
            };
            match child {
                ControlNode::Field(f) => out.push((path, f)),
                ControlNode::Group(g) => g.collect_fields(&path, out),
            }
        }
    }

    fn collect_groups<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a FieldGroup)>) {
        for child in &self.children {
            if let ControlNode::Group(g) = child {
                let path = if prefix.is_empty() {
                    g.name.clone()
                } else {
                    format!("{prefix}.{}", g.name)
                };
                g.collect_groups(&path, out);
                out.push((path, g));
            }
        }
    }
}
