//! Schema inference from existing content.
//!
//! Classifies each value of a JSON document into the most plausible field
//! type, along with a ranked list of alternates an author can pick from
//! instead. [`materialize`] turns the accepted candidates into a schema.

pub mod materialize;

use serde_json::{Map, Value as JsonValue};

use crate::catalog;
use crate::types::validation::parse_iso_datetime;
use crate::types::FieldType;

pub use materialize::materialize;

/// Epoch milliseconds for 2000-01-01; numbers above it look like timestamps.
pub const DEFAULT_EPOCH_CUTOFF_MS: f64 = 946_684_800_000.0;

/// One selectable alternative for a classified value. `None` means
/// "ignore field": the value produces no schema field at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCandidate {
    pub label: String,
    pub value: Option<FieldType>,
}

/// A classified document key, ready for review and materialization.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCandidate {
    pub key: String,
    pub field_type: Option<FieldType>,
    pub type_candidates: Vec<TypeCandidate>,
    pub localised: bool,
    pub children: Option<Vec<FieldCandidate>>,
}

/// The outcome of classifying one value: the best guess plus alternates.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub field_type: Option<FieldType>,
    pub type_candidates: Vec<TypeCandidate>,
    pub localised: bool,
    pub children: Option<Vec<FieldCandidate>>,
}

impl Classification {
    fn unknown() -> Self {
        Self {
            field_type: None,
            type_candidates: all_type_candidates(),
            localised: false,
            children: None,
        }
    }

    fn of(field_type: FieldType, alternates: &[FieldType]) -> Self {
        Self {
            field_type: Some(field_type),
            type_candidates: candidates_for(field_type, alternates),
            localised: false,
            children: None,
        }
    }
}

fn label_for(field_type: FieldType) -> String {
    catalog::template_for(field_type)
        .map(|t| t.label.to_string())
        .unwrap_or_default()
}

fn ignore_candidate() -> TypeCandidate {
    TypeCandidate {
        label: "Ignore field".to_string(),
        value: None,
    }
}

/// Ranked candidate list: best guess first, alternates after, "ignore" last.
fn candidates_for(best: FieldType, alternates: &[FieldType]) -> Vec<TypeCandidate> {
    let mut candidates = Vec::with_capacity(alternates.len() + 2);
    for field_type in std::iter::once(&best).chain(alternates) {
        candidates.push(TypeCandidate {
            label: label_for(*field_type),
            value: Some(*field_type),
        });
    }
    candidates.push(ignore_candidate());
    candidates
}

/// Every non-visual catalog type, for values nothing can be guessed from.
fn all_type_candidates() -> Vec<TypeCandidate> {
    let mut candidates: Vec<TypeCandidate> = catalog::templates()
        .iter()
        .filter(|t| !t.visual_only)
        .map(|t| TypeCandidate {
            label: t.label.to_string(),
            value: Some(t.field_type),
        })
        .collect();
    candidates.push(ignore_candidate());
    candidates
}

fn is_language_code(code: &str) -> bool {
    let bytes = code.as_bytes();
    match bytes.len() {
        2 => bytes.iter().all(u8::is_ascii_alphabetic),
        5 => {
            bytes[2] == b'-'
                && bytes[..2].iter().all(u8::is_ascii_alphabetic)
                && bytes[3..].iter().all(u8::is_ascii_alphabetic)
        }
        _ => false,
    }
}

fn looks_like_markup(text: &str) -> bool {
    text.contains('\n')
        || text.contains('*')
        || text.contains('>')
        || text.contains("__")
        || text.contains("</")
        || (text.starts_with('#') && text.trim_start_matches('#').starts_with(' '))
}

/// A quoted timestamp: 8 to 11 digit characters, enough for most
/// reasonable second- or millisecond-resolution epochs.
fn looks_like_numeric_timestamp(text: &str) -> bool {
    (8..=11).contains(&text.len()) && text.bytes().all(|b| b.is_ascii_digit())
}

/// Naive plural handling, enough for inferring item keys from a parent
/// collection key.
fn singularize(word: &str) -> Option<String> {
    let lower = word.to_ascii_lowercase();
    if let Some(stem) = word.strip_suffix("ies").filter(|s| !s.is_empty()) {
        return Some(format!("{stem}y"));
    }
    if lower.ends_with("sses")
        || lower.ends_with("shes")
        || lower.ends_with("ches")
        || lower.ends_with("xes")
        || lower.ends_with("zes")
    {
        return word.strip_suffix("es").map(str::to_string);
    }
    if lower.ends_with('s') && !lower.ends_with("ss") {
        return word.strip_suffix('s').map(str::to_string);
    }
    None
}

/// Value classifier. The epoch cutoff decides when a bare number is
/// plausible as a millisecond timestamp rather than a quantity.
#[derive(Debug, Clone)]
pub struct Classifier {
    pub epoch_cutoff_ms: f64,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            epoch_cutoff_ms: DEFAULT_EPOCH_CUTOFF_MS,
        }
    }
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify every key of a document object, in document order.
    pub fn field_candidates(&self, document: &Map<String, JsonValue>) -> Vec<FieldCandidate> {
        document
            .iter()
            .map(|(key, value)| {
                let classification = self.classify(value, Some(key));
                FieldCandidate {
                    key: key.clone(),
                    field_type: classification.field_type,
                    type_candidates: classification.type_candidates,
                    localised: classification.localised,
                    children: classification.children,
                }
            })
            .collect()
    }

    /// Guess the field type of a single value. `key` is the key the value
    /// sits under, when there is one; reserved `___mb_` keys classify as
    /// ignored.
    pub fn classify(&self, value: &JsonValue, key: Option<&str>) -> Classification {
        if key.is_some_and(|k| k.starts_with("___mb_")) {
            return Classification {
                field_type: None,
                type_candidates: vec![ignore_candidate()],
                localised: false,
                children: None,
            };
        }

        match value {
            JsonValue::Null => Classification::unknown(),
            JsonValue::String(text) => classify_string(text),
            JsonValue::Number(n) => {
                let number = n.as_f64().unwrap_or(0.0);
                if number > self.epoch_cutoff_ms {
                    Classification::of(FieldType::Date, &[FieldType::Number])
                } else {
                    Classification::of(
                        FieldType::Number,
                        &[FieldType::Date, FieldType::RadioGroup, FieldType::Select],
                    )
                }
            }
            JsonValue::Bool(_) => Classification::of(
                FieldType::Toggle,
                &[FieldType::RadioGroup, FieldType::Select],
            ),
            JsonValue::Array(items) => self.classify_array(items, key),
            JsonValue::Object(map) => self.classify_object(map),
        }
    }

    fn classify_array(&self, items: &[JsonValue], key: Option<&str>) -> Classification {
        if items.is_empty() {
            return Classification::unknown();
        }
        if items
            .iter()
            .all(|item| item.as_str().is_some_and(is_language_code))
        {
            return Classification::of(
                FieldType::Languages,
                &[FieldType::List, FieldType::Tags, FieldType::Checkboxes],
            );
        }
        if items
            .iter()
            .all(|item| !item.is_object() && !item.is_array() && !item.is_null())
        {
            return Classification::of(
                FieldType::Tags,
                &[FieldType::List, FieldType::Checkboxes, FieldType::Languages],
            );
        }

        let mut classification =
            Classification::of(FieldType::Rows, &[FieldType::Columns]);
        classification.children = Some(self.merge_item_candidates(items, key));
        classification
    }

    /// Reduce a collection's items to the distinct child shapes they take,
    /// inventing a key for each shape.
    fn merge_item_candidates(&self, items: &[JsonValue], key: Option<&str>) -> Vec<FieldCandidate> {
        let mut children: Vec<FieldCandidate> = Vec::new();

        for item in items {
            let details = self.classify(item, None);
            let already_known = children.iter().any(|existing| {
                existing.field_type == details.field_type
                    && existing.type_candidates == details.type_candidates
                    && existing.localised == details.localised
                    && existing.children == details.children
            });
            if already_known {
                continue;
            }

            let key_candidate = item
                .get("___mb_type")
                .and_then(JsonValue::as_str)
                .map(str::to_string)
                .or_else(|| key.and_then(singularize))
                .unwrap_or_else(|| format!("{}-element", key.unwrap_or("item")));

            let taken = children
                .iter()
                .filter(|existing| existing.key.starts_with(&key_candidate))
                .count();
            let child_key = if taken == 0 {
                key_candidate
            } else {
                format!("{key_candidate}-{taken}")
            };

            children.push(FieldCandidate {
                key: child_key,
                field_type: details.field_type,
                type_candidates: details.type_candidates,
                localised: details.localised,
                children: details.children,
            });
        }

        children
    }

    fn classify_object(&self, map: &Map<String, JsonValue>) -> Classification {
        if map.is_empty() {
            return Classification::unknown();
        }
        if map.keys().all(|subkey| is_language_code(subkey)) {
            // localised value: classify the first language's entry
            let first = map.values().next().unwrap_or(&JsonValue::Null);
            let inner = self.classify(first, None);
            let mut type_candidates = inner.type_candidates;
            type_candidates.extend(candidates_for(FieldType::Group, &[]));
            return Classification {
                field_type: inner.field_type,
                type_candidates,
                localised: true,
                children: None,
            };
        }
        if map.get("src").is_some_and(JsonValue::is_string) && map.contains_key("alt") {
            return Classification::of(FieldType::Image, &[FieldType::Group]);
        }

        let mut classification = Classification::of(FieldType::Group, &[]);
        classification.children = Some(self.field_candidates(map));
        classification
    }
}

fn classify_string(text: &str) -> Classification {
    let path_like =
        text.starts_with('/') || text.starts_with("./") || text.starts_with("../");

    if path_like && text.contains('.') {
        Classification::of(
            FieldType::File,
            &[
                FieldType::Text,
                FieldType::RichText,
                FieldType::Id,
                FieldType::RadioGroup,
                FieldType::Select,
                FieldType::Link,
                FieldType::Image,
            ],
        )
    } else if ((text.starts_with("http") || text.starts_with("www")) && text.contains('.'))
        || text.starts_with('/')
    {
        Classification::of(
            FieldType::Link,
            &[
                FieldType::Text,
                FieldType::RichText,
                FieldType::Id,
                FieldType::RadioGroup,
                FieldType::Color,
                FieldType::Select,
                FieldType::Image,
            ],
        )
    } else if parse_iso_datetime(text).is_some() || looks_like_numeric_timestamp(text) {
        Classification::of(
            FieldType::Date,
            &[
                FieldType::Text,
                FieldType::RichText,
                FieldType::Id,
                FieldType::RadioGroup,
                FieldType::Select,
                FieldType::Link,
            ],
        )
    } else if (text.starts_with('#') && (text.len() == 4 || text.len() == 7))
        || text.starts_with("rgb")
        || text.starts_with("hsl")
    {
        Classification::of(
            FieldType::Color,
            &[
                FieldType::Text,
                FieldType::RichText,
                FieldType::Id,
                FieldType::RadioGroup,
                FieldType::Select,
                FieldType::Link,
            ],
        )
    } else if looks_like_markup(text) {
        Classification::of(
            FieldType::RichText,
            &[
                FieldType::Text,
                FieldType::Id,
                FieldType::RadioGroup,
                FieldType::File,
                FieldType::Select,
                FieldType::Link,
            ],
        )
    } else {
        Classification::of(
            FieldType::Text,
            &[
                FieldType::RichText,
                FieldType::Id,
                FieldType::RadioGroup,
                FieldType::Color,
                FieldType::Select,
                FieldType::Link,
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn classify(value: serde_json::Value) -> Classification {
        Classifier::new().classify(&value, None)
    }

    #[test]
    fn scalar_heuristics() {
        assert_eq!(classify(json!("Hello")).field_type, Some(FieldType::Text));
        assert_eq!(
            classify(json!("2023-01-01T00:00:00Z")).field_type,
            Some(FieldType::Date)
        );
        assert_eq!(
            classify(json!("1680000000")).field_type,
            Some(FieldType::Date)
        );
        assert_eq!(
            classify(json!("/img/photo.png")).field_type,
            Some(FieldType::File)
        );
        assert_eq!(
            classify(json!("https://example.com")).field_type,
            Some(FieldType::Link)
        );
        assert_eq!(
            classify(json!("/about")).field_type,
            Some(FieldType::Link)
        );
        assert_eq!(classify(json!("#ff0000")).field_type, Some(FieldType::Color));
        assert_eq!(
            classify(json!("rgb(1, 2, 3)")).field_type,
            Some(FieldType::Color)
        );
        assert_eq!(
            classify(json!("# A Heading\n\nAnd some *markdown*")).field_type,
            Some(FieldType::RichText)
        );
        assert_eq!(classify(json!(true)).field_type, Some(FieldType::Toggle));
        assert_eq!(classify(json!(42)).field_type, Some(FieldType::Number));
    }

    #[test]
    fn numbers_past_the_epoch_cutoff_read_as_dates() {
        let classifier = Classifier::new();
        assert_eq!(
            classifier
                .classify(&json!(1_680_000_000_000_i64), None)
                .field_type,
            Some(FieldType::Date)
        );
        assert_eq!(
            classifier.classify(&json!(946_684_800_000_i64), None).field_type,
            Some(FieldType::Number)
        );

        let lenient = Classifier { epoch_cutoff_ms: 0.0 };
        assert_eq!(
            lenient.classify(&json!(1000), None).field_type,
            Some(FieldType::Date)
        );
    }

    #[test]
    fn array_heuristics() {
        assert_eq!(
            classify(json!(["en", "de-DE"])).field_type,
            Some(FieldType::Languages)
        );
        assert_eq!(
            classify(json!(["alpha", "beta"])).field_type,
            Some(FieldType::Tags)
        );
        assert_eq!(
            classify(json!([{ "a": 1 }])).field_type,
            Some(FieldType::Rows)
        );
    }

    #[test]
    fn unclassifiable_values_offer_every_type() {
        for value in [json!(null), json!({}), json!([])] {
            let classification = classify(value);
            assert_eq!(classification.field_type, None);
            assert!(classification.type_candidates.len() > 20);
            assert_eq!(classification.type_candidates.last(), Some(&ignore_candidate()));
        }
    }

    #[test]
    fn reserved_keys_classify_as_ignored() {
        let classification = Classifier::new().classify(&json!("quote"), Some("___mb_type"));
        assert_eq!(classification.field_type, None);
        assert_eq!(classification.type_candidates, vec![ignore_candidate()]);
    }

    #[test]
    fn candidate_lists_rank_the_guess_first_and_ignore_last() {
        let classification = classify(json!("Hello"));
        assert_eq!(classification.type_candidates[0].label, "Unformatted Text");
        assert_eq!(
            classification.type_candidates[0].value,
            Some(FieldType::Text)
        );
        assert_eq!(classification.type_candidates.last(), Some(&ignore_candidate()));
    }

    #[test]
    fn localised_objects_classify_by_first_language_value() {
        let classification = classify(json!({ "en": "Hello", "de": "Hallo" }));
        assert_eq!(classification.field_type, Some(FieldType::Text));
        assert!(classification.localised);
        // group stays available as an escape hatch
        assert!(classification
            .type_candidates
            .iter()
            .any(|c| c.value == Some(FieldType::Group)));
    }

    #[test]
    fn src_and_alt_read_as_an_image() {
        let classification = classify(json!({ "src": "img/a.png", "alt": "A cat" }));
        assert_eq!(classification.field_type, Some(FieldType::Image));
        let group = classify(json!({ "src": "img/a.png", "caption": "no alt" }));
        assert_eq!(group.field_type, Some(FieldType::Group));
    }

    #[test]
    fn objects_classify_as_groups_with_children() {
        let classification = classify(json!({ "title": "Hello", "count": 3 }));
        assert_eq!(classification.field_type, Some(FieldType::Group));
        let children = classification.children.unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].key, "title");
        assert_eq!(children[0].field_type, Some(FieldType::Text));
        assert_eq!(children[1].field_type, Some(FieldType::Number));
    }

    #[test]
    fn repeating_items_merge_by_shape() {
        let classifier = Classifier::new();
        let classification = classifier.classify(
            &json!([
                { "quote": "a", "cite": "b" },
                { "quote": "c", "cite": "d" },
                { "src": "img/a.png", "alt": "e" }
            ]),
            Some("sections"),
        );
        assert_eq!(classification.field_type, Some(FieldType::Rows));
        let children = classification.children.unwrap();
        assert_eq!(children.len(), 2);
        // singularized from the parent key, disambiguated by suffix
        assert_eq!(children[0].key, "section");
        assert_eq!(children[1].key, "section-1");
        assert_eq!(children[0].field_type, Some(FieldType::Group));
        assert_eq!(children[1].field_type, Some(FieldType::Image));
    }

    #[test]
    fn discriminators_name_repeating_items() {
        let classification = Classifier::new().classify(
            &json!([
                { "___mb_type": "quote", "quote": "a" },
                { "___mb_type": "banner", "image": { "src": "x", "alt": "y" } }
            ]),
            Some("sections"),
        );
        let children = classification.children.unwrap();
        assert_eq!(children[0].key, "quote");
        assert_eq!(children[1].key, "banner");
    }

    #[test]
    fn unsingularizable_keys_fall_back_to_element_suffix() {
        let classification = Classifier::new().classify(
            &json!([{ "a": 1 }]),
            Some("media"),
        );
        let children = classification.children.unwrap();
        assert_eq!(children[0].key, "media-element");
    }

    #[test]
    fn singularize_handles_common_suffixes() {
        assert_eq!(singularize("entries").as_deref(), Some("entry"));
        assert_eq!(singularize("boxes").as_deref(), Some("box"));
        assert_eq!(singularize("dishes").as_deref(), Some("dish"));
        assert_eq!(singularize("sections").as_deref(), Some("section"));
        assert_eq!(singularize("address"), None);
        assert_eq!(singularize("media"), None);
    }

    #[test]
    fn language_codes() {
        assert!(is_language_code("en"));
        assert!(is_language_code("de-DE"));
        assert!(!is_language_code("eng"));
        assert!(!is_language_code("d3"));
        assert!(!is_language_code("de_DE"));
    }

    #[test]
    fn sample_document_classifies_as_expected() {
        let document = json!({
            "title": "Hello",
            "published": "2023-01-01T00:00:00Z",
            "tags": ["a", "b"],
            "active": true
        });
        let candidates = Classifier::new().field_candidates(document.as_object().unwrap());
        let types: Vec<(&str, Option<FieldType>)> = candidates
            .iter()
            .map(|c| (c.key.as_str(), c.field_type))
            .collect();
        assert_eq!(
            types,
            vec![
                ("title", Some(FieldType::Text)),
                ("published", Some(FieldType::Date)),
                ("tags", Some(FieldType::Tags)),
                ("active", Some(FieldType::Toggle)),
            ]
        );
    }
}
