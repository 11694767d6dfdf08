//! Customer signup form engine
//!
//! Builds the root customer form, applies discrete input events, and runs
//! the reactive recomputation chain: field validators, group validators,
//! cross-field couplings, and debounced message projection. All mutation
//! happens in the single event-processing context; the only timing-sensitive
//! behavior is the email message debounce, which uses a tokio timer when a
//! runtime is available and degrades to immediate delivery when not.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::debounce::Debouncer;
use crate::error::FormError;
use crate::sink::SubmitSink;
use crate::state::{
    project_group_message, project_message, AddressCollection, AddressRecord, ErrorKind, Field,
    FieldGroup, FieldValue, GroupValidator, MessageTable, Validator,
};

/// Form lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Uninitialized,
    /// Field model constructed, validators and couplings attached
    Built,
    /// Steady state: input events drive the recomputation chain
    Editing,
    /// Values were serialized for the sink; no further mutation expected
    Submitted,
}

/// Phone requiredness, driven by the notification channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneRequirement {
    Required,
    Unconstrained,
}

/// One discrete input from the UI collaborator
#[derive(Debug, Clone)]
pub struct InputEvent {
    /// Dotted field path, e.g. `"emailGroup.email"`
    pub field: String,
    /// New value, if the event carries one
    pub value: Option<FieldValue>,
    /// Whether the event marks the field as touched (focus left it)
    pub touched: bool,
}

impl InputEvent {
    /// A value-change event
    pub fn value(field: &str, value: FieldValue) -> Self {
        Self {
            field: field.to_string(),
            value: Some(value),
            touched: false,
        }
    }

    /// A text value-change event
    pub fn text(field: &str, text: &str) -> Self {
        Self::value(field, FieldValue::text(text))
    }

    /// A blur event: marks the field touched without changing its value
    pub fn blur(field: &str) -> Self {
        Self {
            field: field.to_string(),
            value: None,
            touched: true,
        }
    }
}

/// Reactions a field subscription can run against the rest of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reaction {
    /// The notification channel drives the phone field's requiredness
    SyncPhoneRequirement,
    /// Recompute the cached email validation message
    ProjectEmailMessage,
}

/// One subscriber registered for a field's value changes
#[derive(Debug, Clone, Copy)]
struct Subscription {
    reaction: Reaction,
    debounced: bool,
}

/// Serialized submission payload handed to the sink
#[derive(Debug, Clone, Serialize)]
pub struct SubmittedForm {
    pub session_id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub values: Value,
}

/// Queryable snapshot of the current form state for rendering
#[derive(Debug, Clone, Serialize)]
pub struct FormSnapshot {
    /// Nested values object, addresses included
    pub values: Value,
    /// Active error kinds per field path; group-level errors keyed by the
    /// group path, address errors as `addresses.<index>.<line>`
    pub errors_by_field: BTreeMap<String, BTreeSet<ErrorKind>>,
    /// Projected message per field path (empty until touched-or-dirty)
    pub messages_by_field: BTreeMap<String, String>,
}

/// The signup form engine: one exclusively-owned instance per editing
/// session.
pub struct SignupEngine {
    session_id: Uuid,
    form: FieldGroup,
    addresses: AddressCollection,
    lifecycle: Lifecycle,
    subscriptions: HashMap<String, Vec<Subscription>>,
    messages: MessageTable,
    debouncer: Debouncer<Reaction>,
    deferred_rx: UnboundedReceiver<Reaction>,
    email_message: String,
    email_recomputations: u64,
}

impl Default for SignupEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl SignupEngine {
    /// Build the customer form with default values, validators, and
    /// reactive couplings attached. One address record is pre-populated.
    pub fn new(config: EngineConfig) -> Self {
        let mut form = FieldGroup::new("customerForm")
            .with_field(
                Field::text("firstName")
                    .with_validators(vec![Validator::Required, Validator::MinLength(3)]),
            )
            .with_field(
                Field::text("lastName")
                    .with_validators(vec![Validator::Required, Validator::MaxLength(50)]),
            )
            .with_group(
                FieldGroup::new("emailGroup")
                    .with_field(
                        Field::text("email")
                            .with_validators(vec![Validator::Required, Validator::EmailPattern]),
                    )
                    .with_field(
                        Field::text("confirmEmail").with_validators(vec![Validator::Required]),
                    )
                    .with_validator(GroupValidator::EmailMatch {
                        email: "email".to_string(),
                        confirm: "confirmEmail".to_string(),
                    }),
            )
            .with_field(Field::text("phone"))
            .with_field(Field::text_with_value("notification", "email".to_string()))
            .with_field(Field::text("rating").with_validators(vec![Validator::range(1.0, 5.0)]))
            .with_field(Field::flag("sendCatalog", true));
        form.revalidate();

        let mut subscriptions: HashMap<String, Vec<Subscription>> = HashMap::new();
        subscriptions.insert(
            "notification".to_string(),
            vec![Subscription {
                reaction: Reaction::SyncPhoneRequirement,
                debounced: false,
            }],
        );
        subscriptions.insert(
            "emailGroup.email".to_string(),
            vec![Subscription {
                reaction: Reaction::ProjectEmailMessage,
                debounced: true,
            }],
        );

        let (tx, deferred_rx) = mpsc::unbounded_channel();
        let session_id = Uuid::new_v4();
        tracing::debug!(%session_id, "form built");

        Self {
            session_id,
            form,
            addresses: AddressCollection::with_one_default(),
            lifecycle: Lifecycle::Built,
            subscriptions,
            messages: config.messages,
            debouncer: Debouncer::new(Duration::from_millis(config.debounce_ms), tx),
            deferred_rx,
            email_message: String::new(),
            email_recomputations: 0,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// The root field group
    pub fn form(&self) -> &FieldGroup {
        &self.form
    }

    pub fn addresses(&self) -> &AddressCollection {
        &self.addresses
    }

    /// The debounce-cached message for the email field
    pub fn email_message(&self) -> &str {
        &self.email_message
    }

    /// How many times the email message has been recomputed; a burst of
    /// edits inside the debounce window counts once
    pub fn email_recomputations(&self) -> u64 {
        self.email_recomputations
    }

    /// Apply one input event: mutate the field, revalidate the whole tree,
    /// and dispatch the field's subscriptions.
    pub fn apply(&mut self, event: InputEvent) -> Result<(), FormError> {
        let InputEvent {
            field,
            value,
            touched,
        } = event;
        {
            let target = self
                .form
                .field_mut(&field)
                .ok_or_else(|| FormError::UnknownField(field.clone()))?;
            if let Some(value) = value {
                target.set_value(value);
            }
            if touched {
                target.mark_touched();
            }
        }
        if self.lifecycle == Lifecycle::Built {
            self.lifecycle = Lifecycle::Editing;
        }
        self.form.revalidate();
        tracing::debug!(field = %field, "input applied");
        self.dispatch(&field);
        Ok(())
    }

    /// Convenience wrapper for a value-change event
    pub fn set_value(&mut self, field: &str, value: FieldValue) -> Result<(), FormError> {
        self.apply(InputEvent::value(field, value))
    }

    /// Convenience wrapper for a blur event
    pub fn mark_touched(&mut self, field: &str) -> Result<(), FormError> {
        self.apply(InputEvent::blur(field))
    }

    /// Current requiredness of the phone field
    pub fn phone_requirement(&self) -> PhoneRequirement {
        let required = self
            .form
            .field("phone")
            .is_some_and(|f| f.validators().iter().any(|v| matches!(v, Validator::Required)));
        if required {
            PhoneRequirement::Required
        } else {
            PhoneRequirement::Unconstrained
        }
    }

    /// Append a default address record and return its index
    pub fn add_address(&mut self) -> usize {
        if self.lifecycle == Lifecycle::Built {
            self.lifecycle = Lifecycle::Editing;
        }
        let index = self.addresses.add();
        tracing::debug!(index, "address added");
        index
    }

    /// Mutable access to one address record
    pub fn address_mut(&mut self, index: usize) -> Option<&mut AddressRecord> {
        self.addresses.get_mut(index)
    }

    /// Whole-form validity: the field tree and every address record
    pub fn is_valid(&self) -> bool {
        self.form.is_valid() && self.addresses.iter().all(AddressRecord::is_valid)
    }

    /// Apply any debounce firings that have already been delivered
    pub fn drain_deferred(&mut self) {
        while let Ok(reaction) = self.deferred_rx.try_recv() {
            self.react(reaction);
        }
    }

    /// Await the next debounce firing and apply it. Returns false if the
    /// channel closed.
    pub async fn next_deferred(&mut self) -> bool {
        match self.deferred_rx.recv().await {
            Some(reaction) => {
                self.react(reaction);
                true
            }
            None => false,
        }
    }

    /// Current values, errors, and projected messages
    pub fn snapshot(&self) -> FormSnapshot {
        let mut errors_by_field = BTreeMap::new();
        let mut messages_by_field = BTreeMap::new();

        for (path, field) in self.form.walk_fields() {
            if !field.errors().is_empty() {
                errors_by_field.insert(path.clone(), field.errors().clone());
            }
            // The email message is recomputed on debounce, not per snapshot
            let message = if path == "emailGroup.email" {
                self.email_message.clone()
            } else {
                project_message(field, &self.messages)
            };
            messages_by_field.insert(path, message);
        }
        for (path, group) in self.form.walk_groups() {
            if !group.errors().is_empty() {
                errors_by_field.insert(path.clone(), group.errors().clone());
            }
            messages_by_field.insert(path, project_group_message(group, &self.messages));
        }
        for (index, record) in self.addresses.iter().enumerate() {
            for (line, errors) in record.validate() {
                errors_by_field.insert(format!("addresses.{index}.{line}"), errors);
            }
        }

        FormSnapshot {
            values: self.values_json(),
            errors_by_field,
            messages_by_field,
        }
    }

    /// Patch the fixture subset of fields, leaving everything else alone.
    /// Patching is programmatic, not user input: the fields stay pristine.
    pub fn populate_test_data(&mut self) {
        let patches = [
            ("firstName", FieldValue::text("Rohaan")),
            ("lastName", FieldValue::text("Kathirgamathamby")),
            ("sendCatalog", FieldValue::Bool(false)),
        ];
        for (field, value) in patches {
            if let Some(target) = self.form.field_mut(field) {
                target.patch_value(value);
            }
        }
        self.form.revalidate();
        tracing::debug!("test data populated");
    }

    /// Serialize the current values (valid or not) and hand them to the
    /// sink. The lifecycle moves to `Submitted` either way; validity never
    /// blocks submission.
    pub async fn submit(&mut self, sink: &mut dyn SubmitSink) -> Result<SubmittedForm, FormError> {
        let payload = SubmittedForm {
            session_id: self.session_id,
            submitted_at: Utc::now(),
            values: self.values_json(),
        };
        self.lifecycle = Lifecycle::Submitted;
        tracing::info!(
            session = %self.session_id,
            valid = self.is_valid(),
            "form submitted"
        );
        sink.deliver(&payload).await?;
        Ok(payload)
    }

    fn values_json(&self) -> Value {
        let mut values = match self.form.values() {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        let addresses: Vec<Value> = self.addresses.iter().map(AddressRecord::to_json).collect();
        values.insert("addresses".to_string(), Value::Array(addresses));
        Value::Object(values)
    }

    fn dispatch(&mut self, field: &str) {
        let subs = match self.subscriptions.get(field) {
            Some(subs) => subs.clone(),
            None => return,
        };
        for sub in subs {
            if sub.debounced {
                self.debouncer.trigger(sub.reaction);
            } else {
                self.react(sub.reaction);
            }
        }
    }

    fn react(&mut self, reaction: Reaction) {
        match reaction {
            Reaction::SyncPhoneRequirement => self.sync_phone_requirement(),
            Reaction::ProjectEmailMessage => self.project_email_message(),
        }
    }

    /// One-way edge: the notification value rewires the phone validators
    /// and forces immediate revalidation.
    fn sync_phone_requirement(&mut self) {
        let channel = self
            .form
            .field("notification")
            .map(|f| f.value.as_text().to_string())
            .unwrap_or_default();
        if let Some(phone) = self.form.field_mut("phone") {
            if channel == "text" {
                phone.set_validators(vec![Validator::Required]);
            } else {
                phone.clear_validators();
            }
        }
        tracing::debug!(channel = %channel, requirement = ?self.phone_requirement(), "phone requiredness updated");
    }

    fn project_email_message(&mut self) {
        if let Some(email) = self.form.field("emailGroup.email") {
            self.email_message = project_message(email, &self.messages);
            self.email_recomputations += 1;
            tracing::debug!(message = %self.email_message, "email message recomputed");
        }
    }
}
