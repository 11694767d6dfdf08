//! Signup form engine
//!
//! A UI-framework-independent reactive form engine for a customer signup
//! flow: named fields with touched/dirty interaction flags, pure validator
//! predicates, cross-field group validation, a reactive coupling that
//! rewires one field's validators from another field's value, a debounced
//! validation message, and a growable list of address records.
//!
//! The engine is single-threaded and event-driven: the embedding UI pushes
//! [`InputEvent`]s in, reads [`FormSnapshot`]s out, and renders the
//! validity and messages however it likes. The only async piece is the
//! email-message debounce timer.
//!
//! ```no_run
//! use signup_engine::{EngineConfig, FieldValue, SignupEngine};
//!
//! # #[tokio::main] async fn main() -> Result<(), signup_engine::FormError> {
//! let mut engine = SignupEngine::new(EngineConfig::default());
//! engine.set_value("firstName", FieldValue::text("Ada"))?;
//! engine.set_value("notification", FieldValue::text("text"))?;
//! let snapshot = engine.snapshot();
//! # Ok(()) }
//! ```

pub mod config;
pub mod debounce;
pub mod engine;
pub mod error;
pub mod logging;
pub mod sink;
pub mod state;

pub use config::EngineConfig;
pub use engine::{
    FormSnapshot, InputEvent, Lifecycle, PhoneRequirement, SignupEngine, SubmittedForm,
};
pub use error::FormError;
pub use sink::{LoggingSink, SubmitSink};
pub use state::{
    AddressCollection, AddressRecord, AddressType, ErrorKind, Field, FieldGroup, FieldValue,
    MessageTable, Validator,
};
