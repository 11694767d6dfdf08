//! Address sub-records and their append-only collection

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::field::FieldValue;
use super::validate::{run_validators, ErrorKind, Validator};

/// Kind of address; free-form kinds round-trip as plain strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    #[default]
    Home,
    Work,
    #[serde(untagged)]
    Other(String),
}

impl AddressType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Home => "home",
            Self::Work => "work",
            Self::Other(s) => s,
        }
    }
}

/// One uniform address sub-record; no identity beyond its list position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    pub address_type: AddressType,
    pub street1: String,
    pub street2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl AddressRecord {
    /// Validity-check the record with the same required-style rules as
    /// top-level fields. street2 stays optional.
    pub fn validate(&self) -> BTreeMap<&'static str, BTreeSet<ErrorKind>> {
        let required = [Validator::Required];
        let lines = [
            ("street1", &self.street1),
            ("city", &self.city),
            ("state", &self.state),
            ("zip", &self.zip),
        ];
        let mut errors = BTreeMap::new();
        for (name, text) in lines {
            let set = run_validators(&required, &FieldValue::text(text.clone()));
            if !set.is_empty() {
                errors.insert(name, set);
            }
        }
        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// JSON representation for snapshots and submit payloads
    pub fn to_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert(
            "addressType".to_string(),
            Value::String(self.address_type.as_str().to_string()),
        );
        for (name, text) in [
            ("street1", &self.street1),
            ("street2", &self.street2),
            ("city", &self.city),
            ("state", &self.state),
            ("zip", &self.zip),
        ] {
            map.insert(name.to_string(), Value::String(text.clone()));
        }
        Value::Object(map)
    }
}

/// Ordered, append-only list of address records.
///
/// Insertion order is display order and is semantically meaningful; indices
/// stay stable because records are never removed or reordered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressCollection {
    records: Vec<AddressRecord>,
}

impl AddressCollection {
    /// A collection pre-populated with one default record, as the form
    /// starts out
    pub fn with_one_default() -> Self {
        Self {
            records: vec![AddressRecord::default()],
        }
    }

    /// Append a default record and return its index
    pub fn add(&mut self) -> usize {
        self.records.push(AddressRecord::default());
        self.records.len() - 1
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AddressRecord> {
        self.records.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut AddressRecord> {
        self.records.get_mut(index)
    }

    pub fn records(&self) -> &[AddressRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AddressRecord> {
        self.records.iter()
    }
}
