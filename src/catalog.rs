//! Static registry of field-type templates.
//!
//! Each template carries the default value, option descriptors and default
//! validation rules for one field type, plus authoring metadata (label,
//! description, palette group, icon). [`instantiate`] turns a template into
//! a clean [`Field`] ready for the synthesizer and validator: option
//! descriptors are projected to a flat `{key: value}` map and authoring
//! metadata is stripped.

use once_cell::sync::Lazy;
use serde_json::{json, Value as JsonValue};

use crate::types::{Field, FieldOptions, FieldType, Limit, ValidationRules};

/// One configurable option of a field type, as presented by authoring
/// tools. `component` names the editor widget; only `key` and `value`
/// survive into an instantiated field.
#[derive(Debug, Clone)]
pub struct OptionDescriptor {
    pub component: &'static str,
    pub key: &'static str,
    pub label: Option<&'static str>,
    pub value: JsonValue,
}

fn opt(
    component: &'static str,
    key: &'static str,
    label: Option<&'static str>,
    value: JsonValue,
) -> OptionDescriptor {
    OptionDescriptor {
        component,
        key,
        label,
        value,
    }
}

/// A clean default instance description for one field type.
#[derive(Debug, Clone)]
pub struct FieldTemplate {
    pub field_type: FieldType,
    /// Empty for regular types; visual-only templates carry a reserved key.
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    /// Authoring palette group ("content", "structure", "helpers", "visual").
    pub group: &'static str,
    pub icon: &'static str,
    pub default: JsonValue,
    pub options: Vec<OptionDescriptor>,
    pub validation: Option<ValidationRules>,
    /// Whether instances carry a children slot (`value: []`).
    pub has_children_slot: bool,
    pub visual_only: bool,
    pub version: u32,
}

impl FieldTemplate {
    fn new(field_type: FieldType, label: &'static str) -> Self {
        Self {
            field_type,
            key: "",
            label,
            description: "",
            group: "content",
            icon: "",
            default: JsonValue::Null,
            options: Vec::new(),
            validation: None,
            has_children_slot: false,
            visual_only: false,
            version: 1,
        }
    }
}

fn count_rules(unit: &str) -> ValidationRules {
    ValidationRules {
        unit: Some(unit.to_string()),
        ..Default::default()
    }
}

fn length_rules() -> ValidationRules {
    ValidationRules {
        enforce_min_max: true,
        unit: Some("length".to_string()),
        ..Default::default()
    }
}

static CATALOG: Lazy<Vec<FieldTemplate>> = Lazy::new(|| {
    vec![
        FieldTemplate {
            description: "Adds a unique ID to the content",
            group: "helpers",
            icon: "hash",
            options: vec![
                opt("MbSelect", "type", Some("Default id:"), json!("uuid")),
                opt(
                    "MbInput",
                    "idTemplate",
                    Some("Template to generate the ID from:"),
                    json!(""),
                ),
                opt("MbToggle", "editable", None, json!(false)),
            ],
            validation: Some(ValidationRules::required()),
            version: 3,
            ..FieldTemplate::new(FieldType::Id, "Unique ID")
        },
        FieldTemplate {
            description: "Allows selecting which languages the content will be available in",
            group: "helpers",
            icon: "language",
            validation: Some(ValidationRules {
                min: Some(Limit::Number(1.0)),
                unit: Some("languages".to_string()),
                ..Default::default()
            }),
            ..FieldTemplate::new(FieldType::Languages, "Content Languages")
        },
        FieldTemplate {
            description: "Basic text input field with support for wrapping and multiple lines",
            icon: "text-input",
            options: vec![
                opt("MbToggle", "wrapping", None, json!(true)),
                opt("MbToggle", "multiline", None, json!(false)),
            ],
            validation: Some(length_rules()),
            ..FieldTemplate::new(FieldType::Text, "Unformatted Text")
        },
        FieldTemplate {
            description: "Basic number input field",
            icon: "number",
            validation: Some(ValidationRules::default()),
            ..FieldTemplate::new(FieldType::Number, "Number")
        },
        FieldTemplate {
            description: "Configurable rich text editor field",
            icon: "text",
            options: vec![
                opt("MbRadioGroup", "outputFormat", Some("Output format:"), json!("html")),
                opt(
                    "MbCheckboxGroup",
                    "blockFormats",
                    Some("Allowed block formats:"),
                    json!(["blockquote", "heading", "hr", "orderedList", "unorderedList", "image"]),
                ),
                opt(
                    "MbCheckboxGroup",
                    "inlineFormats",
                    Some("Allowed inline formats:"),
                    json!(["em", "strong", "link"]),
                ),
                opt("MbToggle", "allowRaw", None, json!(false)),
            ],
            validation: Some(length_rules()),
            ..FieldTemplate::new(FieldType::RichText, "Rich Text")
        },
        FieldTemplate {
            description: "Groups multiple fields under a common key, ideal for objects",
            group: "structure",
            icon: "group",
            has_children_slot: true,
            ..FieldTemplate::new(FieldType::Group, "Field Group")
        },
        FieldTemplate {
            description: "Show a heading and / or description between sibling fields",
            group: "visual",
            icon: "heading-spaced",
            key: "___mb_visual_heading",
            options: vec![
                opt("MbInput", "heading", Some("Heading"), json!("")),
                opt("MbEditor", "description", Some("Description"), json!("")),
            ],
            visual_only: true,
            version: 2,
            ..FieldTemplate::new(FieldType::Heading, "Heading and Description")
        },
        FieldTemplate {
            description: "Adds a line and whitespace between the two sibling fields",
            group: "visual",
            icon: "add-separator",
            key: "___mb_visual_separator",
            visual_only: true,
            version: 2,
            ..FieldTemplate::new(FieldType::Separator, "Separator")
        },
        FieldTemplate {
            description: "A date picker with an optional time selector",
            icon: "calendar",
            options: vec![
                opt("MbRadioGroup", "outputFormat", Some("Output format:"), json!("iso")),
                opt("MbToggle", "removable", None, json!(false)),
                opt("MbToggle", "showTime", None, json!(true)),
                opt("MbToggle", "defaultToNow", None, json!(true)),
                opt("MbSelect", "only", Some("Only allow dates in the…"), JsonValue::Null),
            ],
            validation: Some(count_rules("date")),
            version: 2,
            ..FieldTemplate::new(FieldType::Date, "Date and Time")
        },
        FieldTemplate {
            description: "Allows adding sub-fields as columns, ideal for arrays of objects",
            group: "structure",
            icon: "columns",
            options: vec![
                opt("MbToggle", "allowEditing", None, json!(true)),
                opt("MbInput", "itemLabel", Some("Item label:"), json!("Column")),
            ],
            validation: Some(count_rules("columns")),
            has_children_slot: true,
            ..FieldTemplate::new(FieldType::Columns, "Columns")
        },
        FieldTemplate {
            description: "Allows adding sub-fields as rows, ideal for arrays of objects",
            group: "structure",
            icon: "rows",
            options: vec![
                opt("MbToggle", "compact", None, json!(true)),
                opt("MbToggle", "allowEditing", None, json!(true)),
                opt("MbInput", "itemLabel", Some("Item label:"), json!("Row")),
            ],
            validation: Some(count_rules("rows")),
            has_children_slot: true,
            ..FieldTemplate::new(FieldType::Rows, "Rows")
        },
        FieldTemplate {
            description: "An image picker with (optional) resolution hints and size limits",
            icon: "image",
            options: vec![
                opt("MbInput", "resolutionHint", Some("Ideal resolution:"), json!("")),
                opt("MbToggle", "removable", None, json!(true)),
                opt("MbToggle", "simple", None, json!(false)),
            ],
            validation: Some(count_rules("filesize (MB)")),
            ..FieldTemplate::new(FieldType::Image, "Image")
        },
        FieldTemplate {
            description: "A simple toggle that can output true or false",
            group: "helpers",
            icon: "toggle-on",
            options: vec![
                opt("MbIconPicker", "iconLeft", Some("Icon for the ‘false’ value:"), JsonValue::Null),
                opt("MbIconPicker", "iconRight", Some("Icon for the ‘true’ value:"), JsonValue::Null),
            ],
            ..FieldTemplate::new(FieldType::Toggle, "Toggle")
        },
        FieldTemplate {
            description: "A colour picker with support for pre-defined palettes",
            group: "helpers",
            icon: "color",
            options: vec![
                opt("MbRadioGroup", "format", Some("Output format:"), json!("hex")),
                opt("MbToggle", "removable", None, json!(false)),
                opt("MbPalette", "palette", Some("Custom palette:"), json!([])),
            ],
            validation: Some(ValidationRules::default()),
            ..FieldTemplate::new(FieldType::Color, "Color")
        },
        FieldTemplate {
            description: "An input field for a sortable list of items",
            icon: "tags",
            options: vec![
                opt("MbToggle", "allowUnsuggested", None, json!(true)),
                opt("MbEditableList", "autocompleteModel", None, json!([])),
            ],
            validation: Some(count_rules("tags")),
            ..FieldTemplate::new(FieldType::Tags, "Tags")
        },
        FieldTemplate {
            description: "A sortable list of custom values",
            icon: "bullet-list",
            options: vec![
                opt("MbToggle", "limitToModel", None, json!(false)),
                opt("MbEditableList", "model", None, json!([])),
            ],
            validation: Some(count_rules("list items")),
            ..FieldTemplate::new(FieldType::List, "Sortable list")
        },
        FieldTemplate {
            description: "A dropdown field to select a single value",
            group: "helpers",
            icon: "dropdown",
            options: vec![
                opt("MbToggle", "filterable", None, json!(false)),
                opt("MbToggle", "removable", None, json!(false)),
                opt(
                    "MbInput",
                    "placeholder",
                    Some("Placeholder text when empty:"),
                    json!("Select a value…"),
                ),
                opt("MbEditableList", "options", Some("Options:"), json!([])),
            ],
            validation: Some(ValidationRules::default()),
            ..FieldTemplate::new(FieldType::Select, "Dropdown")
        },
        FieldTemplate {
            description: "A file picker to pick certain types of files",
            icon: "attachment",
            options: vec![
                opt("MbToggle", "removable", None, json!(false)),
                opt("MbToggle", "allowUpload", None, json!(false)),
                opt("MbFilePicker", "root", Some("Only allow picking files from this folder:"), JsonValue::Null),
                opt("MbTagInput", "filetypes", None, json!(["pdf", "zip"])),
            ],
            validation: Some(count_rules("filesize (MB)")),
            version: 2,
            ..FieldTemplate::new(FieldType::File, "File")
        },
        FieldTemplate {
            description: "A custom list of boxes to be checked",
            group: "helpers",
            icon: "checkbox-list",
            options: vec![
                opt("MbSelect", "type", Some("Display type:"), json!("inline")),
                opt("MbEditableList", "checkboxes", Some("Checkboxes:"), json!([])),
            ],
            validation: Some(count_rules("selected")),
            ..FieldTemplate::new(FieldType::Checkboxes, "Checkboxes")
        },
        FieldTemplate {
            description: "A list of values of which only one may be selected",
            group: "helpers",
            icon: "radio-group-list",
            options: vec![
                opt("MbSelect", "type", Some("Display type:"), json!("inline")),
                opt("MbEditableList", "options", Some("Options:"), json!([])),
            ],
            validation: Some(ValidationRules::default()),
            ..FieldTemplate::new(FieldType::RadioGroup, "Radio Group")
        },
        FieldTemplate {
            description: "A field for linking to an external or internal document",
            group: "helpers",
            icon: "link",
            options: vec![
                opt("MbRadioGroup", "type", Some("Type:"), json!("both")),
                opt("MbToggle", "byFilePath", None, json!(false)),
                opt("MbInput", "urlSuffix", Some("URL suffix (when file path is used):"), json!("/")),
                opt("MbInput", "urlTemplate", Some("Internal URL template:"), json!("")),
            ],
            validation: Some(ValidationRules::default()),
            ..FieldTemplate::new(FieldType::Link, "Link")
        },
        FieldTemplate {
            description: "Reference a value from another content item",
            group: "helpers",
            icon: "document-link",
            options: vec![
                opt("MbItemList", "collections", Some("Limit to these Collections:"), json!([])),
                opt("MbInput", "field", Some("Field to reference:"), json!("")),
                opt("MbToggle", "removable", None, json!(false)),
            ],
            validation: Some(ValidationRules::default()),
            version: 2,
            ..FieldTemplate::new(FieldType::Reference, "Content Reference")
        },
        FieldTemplate {
            description: "A container for grouping fields purely on a visual level",
            group: "visual",
            icon: "placeholder",
            key: "___mb_visual_container",
            options: vec![
                opt("MbToggle", "collapsible", None, json!(false)),
                opt("MbToggle", "collapseByDefault", None, json!(false)),
                opt("MbToggle", "row", None, json!(false)),
                opt("MbToggle", "bordered", None, json!(false)),
            ],
            has_children_slot: true,
            visual_only: true,
            ..FieldTemplate::new(FieldType::Container, "Container")
        },
    ]
});

/// All templates in catalog order.
pub fn templates() -> &'static [FieldTemplate] {
    &CATALOG
}

/// The template for the given field type, if one exists.
pub fn template_for(field_type: FieldType) -> Option<&'static FieldTemplate> {
    CATALOG.iter().find(|t| t.field_type == field_type)
}

/// Instantiate a clean [`Field`] from a template.
///
/// Projects the option descriptors to the flat `{key: value}` map the
/// synthesizer and validator consume; authoring metadata (description,
/// palette group, icon) does not survive.
pub fn instantiate(
    template: &FieldTemplate,
    key: impl Into<String>,
    label: impl Into<String>,
    tab: Option<&str>,
) -> Field {
    let mut options = FieldOptions::new();
    for descriptor in &template.options {
        options.insert(descriptor.key.to_string(), descriptor.value.clone());
    }

    Field {
        field_type: template.field_type,
        key: key.into(),
        label: label.into(),
        default: template.default.clone(),
        options,
        validation: template.validation.clone(),
        value: template.has_children_slot.then(Vec::new),
        tab: tab.map(str::to_string),
        localised: false,
        visual_only: template.visual_only,
        display_field: None,
        version: template.version,
    }
}
