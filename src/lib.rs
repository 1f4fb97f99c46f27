//! Dynamic content-schema engine: a field catalog, a schema walker, a
//! default-content synthesizer, a content validator and a schema inference
//! engine, all operating on JSON content.
//!
//! Schemas are ordered trees of typed [`Field`]s, optionally organized
//! into [`Tab`]s. [`content::default_content`] builds the starting value
//! for a new document, [`validator::validate_content`] checks an existing
//! one and [`infer::Classifier`] guesses a schema from sample content.

pub mod catalog;
pub mod content;
pub mod infer;
pub mod types;
pub mod validator;
pub mod walker;

pub use content::{default_content, SynthesisContext};
pub use infer::{materialize, Classifier, FieldCandidate, TypeCandidate};
pub use types::{
    Field, FieldOptions, FieldType, Limit, Schema, SchemaError, Tab, ValidationRules,
};
pub use validator::{
    remap, validate_content, validate_field, ContentValidator, ErrorKey, ErrorMap, FieldError,
    MediaConfig,
};
pub use walker::{expand_visual_only, flatten, search, FieldMatch};
