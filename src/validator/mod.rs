//! Content validation against a schema.
//!
//! Errors come back as a tree mirroring the content's shape: collection
//! fields key their item errors by index, groups and localised fields by
//! string key. [`validate_content`] is the entry point; [`remap::remap`]
//! keeps an error tree aligned when collection items move.

pub mod remap;
pub mod rules;

use std::collections::BTreeMap;

use log::debug;
use serde_json::{json, Value as JsonValue};

use crate::types::{Field, FieldType, Schema, SchemaError};
use crate::walker::expand_visual_only;

pub use remap::remap;
pub use rules::validate_field;

/// Addresses one slot in an error tree: a collection index or an object key
/// (field key or language code). Indices order before keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorKey {
    Index(usize),
    Key(String),
}

impl From<usize> for ErrorKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for ErrorKey {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

/// The error recorded for one field: a plain message for leaves, a nested
/// map when the field has erroring subfields, languages or items.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    Message(String),
    Nested(ErrorMap),
}

impl FieldError {
    pub fn as_message(&self) -> Option<&str> {
        match self {
            Self::Message(msg) => Some(msg),
            Self::Nested(_) => None,
        }
    }

    pub fn as_nested(&self) -> Option<&ErrorMap> {
        match self {
            Self::Message(_) => None,
            Self::Nested(map) => Some(map),
        }
    }
}

pub type ErrorMap = BTreeMap<ErrorKey, FieldError>;

/// Project media-library configuration. When the advanced library is active
/// and declares custom per-image fields, those fields are validated inside
/// every non-simple image value that carries a `src`.
#[derive(Debug, Clone, Default)]
pub struct MediaConfig {
    pub advanced: bool,
    pub custom_fields: Vec<Field>,
}

/// Validate `content` against `schema` for the given content languages.
///
/// Returns a map keyed by top-level field key; an empty map means the
/// content is clean. Fails only on misuse, i.e. non-object content.
pub fn validate_content(
    content: &JsonValue,
    schema: &Schema,
    languages: &[String],
) -> Result<ErrorMap, SchemaError> {
    ContentValidator::new(languages).validate(content, schema)
}

/// Recursive-descent validator; borrow it the languages and, optionally,
/// the project media configuration.
#[derive(Debug, Clone)]
pub struct ContentValidator<'a> {
    languages: &'a [String],
    media: Option<&'a MediaConfig>,
}

impl<'a> ContentValidator<'a> {
    pub fn new(languages: &'a [String]) -> Self {
        Self {
            languages,
            media: None,
        }
    }

    pub fn with_media(mut self, media: &'a MediaConfig) -> Self {
        self.media = Some(media);
        self
    }

    pub fn validate(&self, content: &JsonValue, schema: &Schema) -> Result<ErrorMap, SchemaError> {
        if !content.is_object() {
            return Err(SchemaError::InvalidContent(
                "content has to be an object".to_string(),
            ));
        }

        let fields = expand_visual_only(&schema.fields);
        let mut errors = ErrorMap::new();

        if schema.tabs.is_empty() {
            for field in &fields {
                if let Some(error) = self.validate_in(field, content, None) {
                    errors.insert(ErrorKey::Key(field.key.clone()), error);
                }
            }
        } else {
            // untagged fields belong to the first tab
            for (tab_index, tab) in schema.tabs.iter().enumerate() {
                for field in fields.iter().filter(|f| {
                    f.tab.as_deref() == Some(tab.label.as_str())
                        || (tab_index == 0 && f.tab.is_none())
                }) {
                    if let Some(error) = self.validate_in(field, content, tab.group_as.as_deref())
                    {
                        errors.insert(ErrorKey::Key(field.key.clone()), error);
                    }
                }
            }
        }

        Ok(errors)
    }

    /// Validate one field against its parent value, resolving the field's
    /// own value through the tab's `groupAs` namespace when present.
    fn validate_in(
        &self,
        field: &Field,
        parent: &JsonValue,
        group_as: Option<&str>,
    ) -> Option<FieldError> {
        let value = match group_as {
            Some(group) => parent
                .get(group)
                .map_or(&JsonValue::Null, |nested| {
                    nested.get(&field.key).unwrap_or(&JsonValue::Null)
                }),
            None => parent.get(&field.key).unwrap_or(&JsonValue::Null),
        };

        let mut subfields: Option<&[Field]> = field.value.as_deref();

        // advanced media library: image values grow custom subfields
        if field.field_type == FieldType::Image && !field.option_bool("simple") {
            if let Some(media) = self.media {
                if media.advanced
                    && !media.custom_fields.is_empty()
                    && value.get("src").and_then(JsonValue::as_str).is_some()
                {
                    subfields = Some(&media.custom_fields);
                }
            }
        }

        let mut errors = ErrorMap::new();

        if field.field_type.is_repeating() {
            let children = field.filtered_children();
            let items = value.as_array().map_or(&[][..], Vec::as_slice);
            for (i, item) in items.iter().enumerate() {
                let child = if children.len() == 1 {
                    children.first().copied()
                } else {
                    let discriminator = item.get("___mb_type").and_then(JsonValue::as_str);
                    children
                        .iter()
                        .copied()
                        .find(|sub| discriminator.is_some_and(|tag| sub.key == tag))
                };
                // unknown items are skipped: the child key may have been
                // renamed, or pre-existing content lacks the discriminator
                let Some(child) = child else {
                    debug!(
                        "skipping item {i} of '{}': no matching child field",
                        field.key
                    );
                    continue;
                };

                let error = if child.field_type == FieldType::Group || children.len() == 1 {
                    // the item itself is the child's value, so wrap it in
                    // a synthetic parent keyed by the child's key
                    let wrapped = json!({ child.key.clone(): item });
                    self.validate_in(child, &wrapped, None)
                } else {
                    self.validate_in(child, item, None)
                };
                if let Some(error) = error {
                    errors.insert(ErrorKey::Index(i), error);
                }
            }
        } else if let Some(subfields) = subfields {
            for subfield in subfields {
                if let Some(error) = self.validate_in(subfield, value, None) {
                    errors.insert(ErrorKey::Key(subfield.key.clone()), error);
                }
            }
        }

        let Some(rules) = &field.validation else {
            return (!errors.is_empty()).then_some(FieldError::Nested(errors));
        };

        if field.localised {
            for lang in self.languages {
                let localized = value.get(lang).unwrap_or(&JsonValue::Null);
                if let Some(message) =
                    validate_field(localized, field.field_type, rules, &field.label)
                {
                    errors.insert(ErrorKey::Key(lang.clone()), FieldError::Message(message));
                }
            }
        } else if let Some(message) = validate_field(value, field.field_type, rules, &field.label)
        {
            // collections and images report their own error inside the
            // nested map, under the field's key, so item errors survive
            if !errors.is_empty()
                || field.field_type == FieldType::Image
                || field.field_type.is_repeating()
            {
                errors.insert(
                    ErrorKey::Key(field.key.clone()),
                    FieldError::Message(message),
                );
            } else {
                return Some(FieldError::Message(message));
            }
        }

        (!errors.is_empty()).then_some(FieldError::Nested(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema_from(value: serde_json::Value) -> Schema {
        serde_json::from_value(value).unwrap()
    }

    fn langs() -> Vec<String> {
        vec!["en".to_string(), "de".to_string()]
    }

    fn message_at<'m>(errors: &'m ErrorMap, key: &str) -> Option<&'m str> {
        errors.get(&ErrorKey::from(key)).and_then(FieldError::as_message)
    }

    #[test]
    fn clean_content_produces_no_errors() {
        let schema = schema_from(json!({
            "fields": [
                { "type": "text", "key": "title", "label": "Title", "validation": { "required": true } },
                { "type": "toggle", "key": "draft" }
            ]
        }));
        let errors =
            validate_content(&json!({ "title": "Hello", "draft": true }), &schema, &langs())
                .unwrap();
        assert!(errors.is_empty());
    }

    #[test]
    fn missing_required_text_reports_labelled_message() {
        let schema = schema_from(json!({
            "fields": [
                { "type": "text", "key": "title", "label": "Title", "validation": { "required": true } }
            ]
        }));
        let errors = validate_content(&json!({}), &schema, &langs()).unwrap();
        assert_eq!(message_at(&errors, "title"), Some("A Title is required"));
    }

    #[test]
    fn non_object_content_is_a_usage_error() {
        let schema = schema_from(json!({ "fields": [] }));
        assert!(validate_content(&json!("nope"), &schema, &langs()).is_err());
        assert!(validate_content(&json!([1, 2]), &schema, &langs()).is_err());
    }

    #[test]
    fn localised_fields_report_per_language() {
        let schema = schema_from(json!({
            "fields": [
                { "type": "text", "key": "title", "label": "Title", "localised": true,
                  "validation": { "required": true } }
            ]
        }));
        let errors = validate_content(
            &json!({ "title": { "en": "Hello", "de": "" } }),
            &schema,
            &langs(),
        )
        .unwrap();
        let nested = errors
            .get(&ErrorKey::from("title"))
            .and_then(FieldError::as_nested)
            .unwrap();
        assert!(nested.get(&ErrorKey::from("en")).is_none());
        assert_eq!(
            nested.get(&ErrorKey::from("de")).and_then(FieldError::as_message),
            Some("A Title is required")
        );
    }

    #[test]
    fn group_errors_nest_by_child_key() {
        let schema = schema_from(json!({
            "fields": [
                { "type": "group", "key": "meta", "value": [
                    { "type": "text", "key": "description", "label": "Description",
                      "validation": { "required": true } }
                ]}
            ]
        }));
        let errors =
            validate_content(&json!({ "meta": {} }), &schema, &langs()).unwrap();
        let nested = errors
            .get(&ErrorKey::from("meta"))
            .and_then(FieldError::as_nested)
            .unwrap();
        assert_eq!(
            nested
                .get(&ErrorKey::from("description"))
                .and_then(FieldError::as_message),
            Some("A Description is required")
        );
    }

    #[test]
    fn rows_dispatch_by_discriminator_and_skip_unknown_items() {
        let schema = schema_from(json!({
            "fields": [
                { "type": "rows", "key": "sections", "value": [
                    { "type": "text", "key": "quote", "label": "Quote",
                      "validation": { "required": true } },
                    { "type": "image", "key": "picture",
                      "validation": { "required": true } }
                ]}
            ]
        }));
        let content = json!({ "sections": [
            { "___mb_type": "quote", "quote": "" },
            { "___mb_type": "picture", "picture": "img/a.png" },
            { "___mb_type": "renamed-away", "whatever": 1 },
            { "no_discriminator": true }
        ]});
        let errors = validate_content(&content, &schema, &langs()).unwrap();
        let nested = errors
            .get(&ErrorKey::from("sections"))
            .and_then(FieldError::as_nested)
            .unwrap();
        assert_eq!(nested.len(), 1);
        assert_eq!(
            nested
                .get(&ErrorKey::Index(0))
                .and_then(FieldError::as_message),
            Some("A Quote is required")
        );
    }

    #[test]
    fn single_child_rows_wrap_items_in_a_synthetic_parent() {
        let schema = schema_from(json!({
            "fields": [
                { "type": "rows", "key": "quotes", "value": [
                    { "type": "text", "key": "quote", "label": "Quote",
                      "validation": { "required": true } }
                ]}
            ]
        }));
        let errors = validate_content(
            &json!({ "quotes": ["fine", ""] }),
            &schema,
            &langs(),
        )
        .unwrap();
        let nested = errors
            .get(&ErrorKey::from("quotes"))
            .and_then(FieldError::as_nested)
            .unwrap();
        assert_eq!(
            nested
                .get(&ErrorKey::Index(1))
                .and_then(FieldError::as_message),
            Some("A Quote is required")
        );
    }

    #[test]
    fn collection_own_error_joins_item_errors_under_field_key() {
        let schema = schema_from(json!({
            "fields": [
                { "type": "rows", "key": "sections", "validation": { "min": 3 }, "value": [
                    { "type": "text", "key": "quote", "label": "Quote",
                      "validation": { "required": true } }
                ]}
            ]
        }));
        let errors =
            validate_content(&json!({ "sections": [""] }), &schema, &langs()).unwrap();
        let nested = errors
            .get(&ErrorKey::from("sections"))
            .and_then(FieldError::as_nested)
            .unwrap();
        assert_eq!(
            nested
                .get(&ErrorKey::Index(0))
                .and_then(FieldError::as_message),
            Some("A Quote is required")
        );
        assert_eq!(
            nested
                .get(&ErrorKey::from("sections"))
                .and_then(FieldError::as_message),
            Some("At least 3 items are required")
        );
    }

    #[test]
    fn empty_required_collection_reports_under_its_own_key() {
        let schema = schema_from(json!({
            "fields": [
                { "type": "rows", "key": "sections", "validation": { "min": 1 }, "value": [
                    { "type": "text", "key": "quote" }
                ]}
            ]
        }));
        let errors = validate_content(&json!({}), &schema, &langs()).unwrap();
        let nested = errors
            .get(&ErrorKey::from("sections"))
            .and_then(FieldError::as_nested)
            .unwrap();
        assert_eq!(
            nested
                .get(&ErrorKey::from("sections"))
                .and_then(FieldError::as_message),
            Some("At least one item is required")
        );
    }

    #[test]
    fn group_as_tab_resolves_nested_values() {
        let schema = schema_from(json!({
            "fields": [
                { "type": "text", "key": "title", "label": "Title", "tab": "Content",
                  "validation": { "required": true } },
                { "type": "text", "key": "description", "label": "Description", "tab": "SEO",
                  "validation": { "required": true } }
            ],
            "tabs": [
                { "label": "Content" },
                { "label": "SEO", "groupAs": "seo" }
            ]
        }));
        let clean = json!({ "title": "t", "seo": { "description": "d" } });
        assert!(validate_content(&clean, &schema, &langs()).unwrap().is_empty());

        // missing namespace object fails its required fields
        let missing = json!({ "title": "t" });
        let errors = validate_content(&missing, &schema, &langs()).unwrap();
        assert_eq!(
            message_at(&errors, "description"),
            Some("A Description is required")
        );
    }

    #[test]
    fn untagged_fields_validate_with_the_first_tab() {
        let schema = schema_from(json!({
            "fields": [
                { "type": "text", "key": "untagged", "validation": { "required": true } }
            ],
            "tabs": [
                { "label": "Main", "groupAs": "main" },
                { "label": "Other" }
            ]
        }));
        let clean = json!({ "main": { "untagged": "x" } });
        assert!(validate_content(&clean, &schema, &langs()).unwrap().is_empty());
        let errors = validate_content(&json!({}), &schema, &langs()).unwrap();
        assert!(errors.contains_key(&ErrorKey::from("untagged")));
    }

    #[test]
    fn visual_containers_are_expanded_before_validation() {
        let schema = schema_from(json!({
            "fields": [
                { "type": "container", "key": "___mb_visual_container", "visualOnly": true, "value": [
                    { "type": "text", "key": "inner", "label": "Inner",
                      "validation": { "required": true } }
                ]}
            ]
        }));
        let errors = validate_content(&json!({}), &schema, &langs()).unwrap();
        assert_eq!(message_at(&errors, "inner"), Some("An Inner is required"));
    }

    #[test]
    fn media_custom_fields_validate_inside_image_values() {
        let media = MediaConfig {
            advanced: true,
            custom_fields: vec![serde_json::from_value(json!({
                "type": "text", "key": "alt", "label": "Alt text",
                "validation": { "required": true }
            }))
            .unwrap()],
        };
        let schema = schema_from(json!({
            "fields": [
                { "type": "image", "key": "hero" }
            ]
        }));
        let languages = langs();
        let validator = ContentValidator::new(&languages).with_media(&media);

        let errors = validator
            .validate(&json!({ "hero": { "src": "img/a.png" } }), &schema)
            .unwrap();
        let nested = errors
            .get(&ErrorKey::from("hero"))
            .and_then(FieldError::as_nested)
            .unwrap();
        assert_eq!(
            nested.get(&ErrorKey::from("alt")).and_then(FieldError::as_message),
            Some("An Alt text is required")
        );

        // without a src there is nothing to hang custom fields on
        let no_src = validator.validate(&json!({ "hero": {} }), &schema).unwrap();
        assert!(no_src.is_empty());

        // simple images opt out of the media library entirely
        let simple_schema = schema_from(json!({
            "fields": [
                { "type": "image", "key": "hero", "options": { "simple": true } }
            ]
        }));
        let simple = validator
            .validate(&json!({ "hero": { "src": "img/a.png" } }), &simple_schema)
            .unwrap();
        assert!(simple.is_empty());
    }

    #[test]
    fn required_image_error_sits_under_its_own_key() {
        let schema = schema_from(json!({
            "fields": [
                { "type": "image", "key": "hero", "validation": { "required": true } }
            ]
        }));
        let errors = validate_content(&json!({}), &schema, &langs()).unwrap();
        let nested = errors
            .get(&ErrorKey::from("hero"))
            .and_then(FieldError::as_nested)
            .unwrap();
        assert_eq!(
            nested.get(&ErrorKey::from("hero")).and_then(FieldError::as_message),
            Some("An image is required")
        );
    }
}
