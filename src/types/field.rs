use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::validation::ValidationRules;

/// The closed set of field types a schema may use.
///
/// Serializes to the wire names used in schema files (`"rich text"`,
/// `"radio group"`, ...). `Heading`, `Separator` and `Container` are
/// purely visual kinds that never contribute a content value themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    #[serde(rename = "rich text")]
    RichText,
    Date,
    Group,
    Rows,
    Columns,
    Image,
    Toggle,
    Color,
    Tags,
    List,
    Select,
    File,
    Checkboxes,
    #[serde(rename = "radio group")]
    RadioGroup,
    Link,
    Reference,
    Id,
    Languages,
    Heading,
    Separator,
    Container,
}

impl FieldType {
    /// Types that exist purely to structure the authoring UI.
    pub fn is_visual_kind(&self) -> bool {
        matches!(self, Self::Heading | Self::Separator | Self::Container)
    }

    /// Types whose content value is an array of repeating items.
    pub fn is_repeating(&self) -> bool {
        matches!(self, Self::Rows | Self::Columns)
    }

    /// Types that carry a children slot (`value` holds nested fields).
    pub fn has_children_slot(&self) -> bool {
        matches!(self, Self::Group | Self::Rows | Self::Columns | Self::Container)
    }
}

/// The cleaned, flat `{key: value}` projection of a field's options.
///
/// Authoring tools work with the catalog's ordered option descriptors; by
/// the time a field reaches the synthesizer or validator only this
/// projection remains.
pub type FieldOptions = BTreeMap<String, JsonValue>;

/// A single node in a content schema tree.
///
/// `value` is the recursive children slot, present for group/rows/columns/
/// container fields. `key` is unique among siblings and empty only for
/// visual-only catalog templates awaiting a key assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "JsonValue::is_null")]
    pub default: JsonValue,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: FieldOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Vec<Field>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub localised: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub visual_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_field: Option<String>,
    #[serde(default = "default_version")]
    pub version: u32,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

fn default_version() -> u32 {
    1
}

impl Field {
    /// Create a bare field of the given type and key; defaults everywhere else.
    pub fn new(field_type: FieldType, key: impl Into<String>) -> Self {
        Self {
            field_type,
            key: key.into(),
            label: String::new(),
            default: JsonValue::Null,
            options: FieldOptions::new(),
            validation: None,
            value: None,
            tab: None,
            localised: false,
            visual_only: false,
            display_field: None,
            version: 1,
        }
    }

    /// The field's children, or an empty slice when it has none.
    pub fn children(&self) -> &[Field] {
        self.value.as_deref().unwrap_or(&[])
    }

    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }

    /// The non-visual children, i.e. the candidate item types of a
    /// repeating field.
    pub fn filtered_children(&self) -> Vec<&Field> {
        self.children().iter().filter(|c| !c.visual_only).collect()
    }

    /// String-valued option lookup.
    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(JsonValue::as_str)
    }

    /// Bool-valued option lookup; absent or non-bool options read as false.
    pub fn option_bool(&self, key: &str) -> bool {
        self.options
            .get(key)
            .and_then(JsonValue::as_bool)
            .unwrap_or(false)
    }
}
