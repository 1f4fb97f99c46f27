//! Default content synthesis.
//!
//! Builds the content value a freshly created document starts from, by
//! recursively instantiating each schema field's default.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

use crate::types::{Field, FieldType, Schema};

/// Caller-supplied context for synthesis.
#[derive(Debug, Clone, Default)]
pub struct SynthesisContext {
    /// The file path of the content item, used by `id` fields configured
    /// to derive their value from it.
    pub path: Option<String>,
    /// Clock override; `None` means `Utc::now()`.
    pub now: Option<DateTime<Utc>>,
}

impl SynthesisContext {
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            now: None,
        }
    }
}

/// Build the default content value for a schema.
pub fn default_content(schema: &Schema, ctx: &SynthesisContext) -> JsonValue {
    JsonValue::Object(assemble(&schema.fields, true, schema, ctx))
}

fn assemble(
    fields: &[Field],
    top_level: bool,
    schema: &Schema,
    ctx: &SynthesisContext,
) -> Map<String, JsonValue> {
    let mut obj = Map::new();

    for field in fields {
        // Pure decoration contributes nothing.
        if field.visual_only && !field.has_children() {
            continue;
        }

        let mut hoist = false;
        let value = if field.field_type == FieldType::Group {
            JsonValue::Object(assemble(field.children(), false, schema, ctx))
        } else if field.visual_only {
            hoist = true;
            JsonValue::Object(assemble(field.children(), false, schema, ctx))
        } else if field.field_type == FieldType::Id {
            match field.option_str("type") {
                // falling back to null: undefined values would not be saved
                Some("filepath") => ctx
                    .path
                    .as_deref()
                    .map_or(JsonValue::Null, |p| JsonValue::String(p.to_string())),
                Some("uuid") => JsonValue::String(Uuid::new_v4().to_string()),
                _ => JsonValue::Null,
            }
        } else if field.field_type == FieldType::Date && field.option_bool("defaultToNow") {
            default_date_value(field, ctx)
        } else {
            field.default.clone()
        };

        let group_key = if top_level {
            field.tab.as_deref().and_then(|tab| schema.group_as_for(tab))
        } else {
            None
        };

        if let Some(group_as) = group_key {
            let entry = obj
                .entry(group_as.to_string())
                .or_insert_with(|| JsonValue::Object(Map::new()));
            if let JsonValue::Object(nested) = entry {
                if hoist {
                    if let JsonValue::Object(map) = value {
                        nested.extend(map);
                    }
                } else {
                    nested.insert(field.key.clone(), value);
                }
            }
        } else if hoist {
            if let JsonValue::Object(map) = value {
                obj.extend(map);
            }
        } else {
            obj.insert(field.key.clone(), value);
        }
    }

    obj
}

/// The current time, clamped into the field's `[min, max]` validation
/// bounds, rendered per its output-format options.
fn default_date_value(field: &Field, ctx: &SynthesisContext) -> JsonValue {
    let now = ctx.now.unwrap_or_else(Utc::now);
    let mut moment = now;

    if let Some(rules) = &field.validation {
        match (rules.min_datetime(), rules.max_datetime()) {
            (Some(min), Some(max)) => moment = now.min(max).max(min),
            (Some(min), None) => moment = now.max(min),
            (None, Some(max)) => moment = now.min(max),
            (None, None) => {}
        }
    }

    if field.option_str("outputFormat") == Some("iso") {
        if field.option_bool("showTime") {
            JsonValue::String(moment.to_rfc3339_opts(SecondsFormat::Secs, true))
        } else {
            JsonValue::String(moment.format("%Y-%m-%d").to_string())
        }
    } else {
        JsonValue::Number(moment.timestamp_millis().into())
    }
}
