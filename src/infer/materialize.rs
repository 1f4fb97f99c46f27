//! Turning reviewed field candidates into a schema.

use crate::catalog;
use crate::types::{Field, Schema, Tab};

use super::FieldCandidate;

const DEFAULT_TAB: &str = "ungrouped";

/// Build a schema from accepted candidates. Candidates without a type are
/// skipped. With `create_tabs`, every top-level group candidate becomes a
/// tab namespacing its children via `groupAs`; everything else lands on
/// the default tab.
pub fn materialize(candidates: &[FieldCandidate], create_tabs: bool) -> Schema {
    let mut tabs = vec![Tab::new(DEFAULT_TAB, None)];
    let mut fields = Vec::new();

    for candidate in candidates {
        let Some(field_type) = candidate.field_type else {
            continue;
        };
        if create_tabs && field_type == crate::types::FieldType::Group {
            tabs.push(Tab::new(&candidate.key, Some(candidate.key.clone())));
            if let Some(children) = &candidate.children {
                fields.extend(
                    children
                        .iter()
                        .filter_map(|child| field_from_candidate(child, &candidate.key)),
                );
            }
        } else if let Some(field) = field_from_candidate(candidate, DEFAULT_TAB) {
            fields.push(field);
        }
    }

    Schema { fields, tabs }
}

/// Instantiate the candidate's catalog template, defaulting the label to
/// the capitalized key. Untyped children are dropped.
pub fn field_from_candidate(candidate: &FieldCandidate, tab: &str) -> Option<Field> {
    let template = catalog::template_for(candidate.field_type?)?;
    let mut field = catalog::instantiate(template, &candidate.key, capitalize(&candidate.key), Some(tab));
    field.localised = candidate.localised;

    if let Some(children) = &candidate.children {
        if !children.is_empty() {
            field.value = Some(
                children
                    .iter()
                    .filter_map(|child| field_from_candidate(child, tab))
                    .collect(),
            );
        }
    }

    Some(field)
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
