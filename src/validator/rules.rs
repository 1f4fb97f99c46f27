//! Per-type leaf validation rules.

use log::warn;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde_json::Value as JsonValue;

use crate::types::{FieldType, ValidationRules};

static REGEX_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/(.*?)/([gimyus]*)$").expect("static pattern"));

static TEL_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^tel:\+?[-0-9]+$").expect("static pattern"));

// Accepts http(s) and mailto URLs with a registrable-looking host,
// localhost, or a bare address-and-port.
static URL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:https?://|mailto:)(?:www\.)?(?:[-a-zA-Z0-9@:%._+~#=]{2,256}\.[a-z]{2,6}|localhost:[0-9]+|[.0-9]+:[0-9]+)\b[-a-zA-Z0-9@:%_+.~#?&/=]*$",
    )
    .expect("static pattern")
});

/// Compile a user-supplied pattern, accepting either a bare pattern or a
/// `/pattern/flags` literal. Returns `None` for malformed input; a broken
/// rule must not block content editors.
pub(crate) fn compile_user_regex(input: &str) -> Option<Regex> {
    let (pattern, flags) = if input.starts_with('/') {
        let captures = REGEX_LITERAL.captures(input)?;
        (
            captures.get(1).map_or("", |m| m.as_str()).to_string(),
            captures.get(2).map_or("", |m| m.as_str()).to_string(),
        )
    } else {
        (input.to_string(), String::new())
    };

    RegexBuilder::new(&pattern)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .build()
        .ok()
}

/// JSON falsiness: null, false, zero and the empty string. Arrays and
/// objects always count as present.
fn is_empty_value(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::Bool(b) => !b,
        JsonValue::Number(n) => n.as_f64() == Some(0.0),
        JsonValue::String(s) => s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => false,
    }
}

fn item_count(value: &JsonValue) -> usize {
    value.as_array().map_or(0, Vec::len)
}

fn required_message(label: &str) -> String {
    if label.is_empty() {
        "This field is required".to_string()
    } else {
        format!("A {label} is required")
    }
}

fn format_bound(bound: f64) -> String {
    if bound.fract() == 0.0 {
        format!("{}", bound as i64)
    } else {
        format!("{bound}")
    }
}

/// Count bound check with singular/plural wording, e.g.
/// "At least one tag is required" / "Only up to 3 tags are allowed".
fn check_count_bounds(
    count: usize,
    rules: &ValidationRules,
    singular: &str,
    plural: &str,
) -> Option<String> {
    let mut error = None;
    if let Some(min) = rules.min_count() {
        if count < min {
            error = Some(if min == 1 {
                format!("At least one {singular} is required")
            } else {
                format!("At least {min} {plural} are required")
            });
        }
    }
    if let Some(max) = rules.max_count() {
        if count > max {
            error = Some(if max == 1 {
                format!("Only one {singular} is allowed")
            } else {
                format!("Only up to {max} {plural} are allowed")
            });
        }
    }
    error
}

/// Validate a single leaf value against a field's rules.
///
/// Returns the error message, or `None` when the value passes. `label`
/// personalizes required-field messages and may be empty.
pub fn validate_field(
    value: &JsonValue,
    field_type: FieldType,
    rules: &ValidationRules,
    label: &str,
) -> Option<String> {
    match field_type {
        FieldType::Checkboxes => {
            if !rules.enforce_min_max {
                return None;
            }
            let count = item_count(value);
            if let Some(min) = rules.min_count() {
                if count < min {
                    return Some(if min == 1 {
                        "At least one box needs to be selected".to_string()
                    } else {
                        format!("At least {min} boxes need to be selected")
                    });
                }
            }
            if let Some(max) = rules.max_count() {
                if count > max {
                    return Some(if max == 1 {
                        "At most one box may be selected".to_string()
                    } else {
                        format!("At most {max} boxes may be selected")
                    });
                }
            }
            None
        }
        FieldType::Image => {
            if !rules.required {
                return None;
            }
            match value {
                JsonValue::String(src) if !src.is_empty() => None,
                // a structured value must carry a source reference
                JsonValue::Object(map)
                    if map.get("src").and_then(JsonValue::as_str).is_some_and(|s| !s.is_empty()) =>
                {
                    None
                }
                _ => Some("An image is required".to_string()),
            }
        }
        FieldType::Languages => {
            check_count_bounds(item_count(value), rules, "language", "languages")
        }
        FieldType::Link => {
            let link = value.as_str().unwrap_or("");
            if rules.required && link.is_empty() {
                return Some(required_message(label));
            }
            if !link.is_empty()
                && !link.starts_with('/')
                && !link.starts_with('#')
                && !TEL_LINK.is_match(link)
                && !URL_SHAPE.is_match(link)
            {
                return Some("This is not a valid URL".to_string());
            }
            None
        }
        FieldType::List => check_count_bounds(item_count(value), rules, "item", "items"),
        FieldType::Number => {
            let Some(number) = value.as_f64() else {
                // non-numeric values count as empty
                if rules.required {
                    return Some(required_message(label));
                }
                return None;
            };
            if let Some(min) = rules.min_number() {
                if number < min {
                    return Some(format!("The value is too small (min {})", format_bound(min)));
                }
            }
            if let Some(max) = rules.max_number() {
                if number > max {
                    return Some(format!("The value is too large (max {})", format_bound(max)));
                }
            }
            None
        }
        FieldType::Text | FieldType::RichText => {
            let text = value.as_str().unwrap_or("");
            if rules.required && text.is_empty() {
                return Some(required_message(label));
            }
            if rules.enforce_min_max && (rules.min_count().is_some() || rules.max_count().is_some())
            {
                let length = text.chars().count();
                let mut error = None;
                if let Some(min) = rules.min_count() {
                    if length < min {
                        error = Some("The value is too short".to_string());
                    }
                }
                if let Some(max) = rules.max_count() {
                    if length > max {
                        error = Some("The value is too long".to_string());
                    }
                }
                return error;
            }
            if let Some(pattern) = &rules.regex {
                match compile_user_regex(pattern) {
                    Some(regex) if !regex.is_match(text) => {
                        return Some(
                            rules
                                .regex_error
                                .clone()
                                .unwrap_or_else(|| "Invalid value".to_string()),
                        );
                    }
                    Some(_) => {}
                    None => {
                        // fail open: a broken pattern is no rule at all
                        warn!("ignoring malformed validation regex: {pattern}");
                    }
                }
            }
            None
        }
        FieldType::Rows | FieldType::Columns => {
            check_count_bounds(item_count(value), rules, "item", "items")
        }
        FieldType::Tags => check_count_bounds(item_count(value), rules, "tag", "tags"),
        _ => {
            if rules.required && is_empty_value(value) {
                return Some(required_message(label));
            }
            None
        }
    }
}
