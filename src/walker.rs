//! Generic traversal over a field tree.
//!
//! [`search`] walks a schema depth-first in document order while tracking
//! the two addressing schemes side by side: the definition path (`keypath`,
//! every node visited) and the content path (`contentpath`, visual-only
//! nodes excluded and the owning tab's `groupAs` substituted at the root).

use crate::types::{Field, Schema};

/// One match produced by [`search`]: both path snapshots plus the field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatch<'a> {
    /// Path of field keys from the schema root, visual-only nodes included.
    pub keypath: Vec<String>,
    /// Path of keys locating the field's value inside content.
    pub contentpath: Vec<String>,
    pub field: &'a Field,
}

/// Find all fields matching `predicate`, in pre-order document order.
///
/// Matches are emitted as they are visited; no deduplication. Path
/// snapshots are cloned, so later traversal cannot disturb earlier results.
pub fn search<'a, P>(schema: &'a Schema, predicate: P) -> Vec<FieldMatch<'a>>
where
    P: Fn(&Field) -> bool,
{
    let mut keypath = Vec::new();
    let mut contentpath = Vec::new();
    let mut results = Vec::new();
    walk(
        schema,
        &schema.fields,
        true,
        &predicate,
        &mut keypath,
        &mut contentpath,
        &mut results,
    );
    results
}

fn walk<'a, P>(
    schema: &'a Schema,
    fields: &'a [Field],
    top_level: bool,
    predicate: &P,
    keypath: &mut Vec<String>,
    contentpath: &mut Vec<String>,
    results: &mut Vec<FieldMatch<'a>>,
) where
    P: Fn(&Field) -> bool,
{
    for field in fields {
        keypath.push(field.key.clone());

        if top_level && !schema.tabs.is_empty() {
            if let Some(tab) = &field.tab {
                // A content item belongs to exactly one groupAs namespace,
                // determined by its own tab, so any earlier seed is stale.
                contentpath.clear();
                if let Some(group_as) = schema.group_as_for(tab) {
                    contentpath.push(group_as.to_string());
                }
            }
        }
        if !field.visual_only {
            contentpath.push(field.key.clone());
        }

        if predicate(field) {
            results.push(FieldMatch {
                keypath: keypath.clone(),
                contentpath: contentpath.clone(),
                field,
            });
        }

        if let Some(children) = &field.value {
            walk(schema, children, false, predicate, keypath, contentpath, results);
        }

        keypath.pop();
        if !field.visual_only {
            contentpath.pop();
        }
    }
}

/// Depth-first pre-order listing of every node, interior and leaf.
pub fn flatten(fields: &[Field]) -> Vec<&Field> {
    let mut result = Vec::new();
    for field in fields {
        result.push(field);
        result.extend(flatten(field.children()));
    }
    result
}

/// Replace every visual-only field that has children with its (recursively
/// expanded) children, spliced in place; the container itself disappears.
/// Non-visual fields keep their position with expanded children.
/// Idempotent: expanding an already-expanded list is a no-op.
pub fn expand_visual_only(fields: &[Field]) -> Vec<Field> {
    let mut result = Vec::new();
    for field in fields {
        if field.visual_only && field.has_children() {
            result.extend(expand_visual_only(field.children()));
        } else if field.has_children() {
            let mut clone = field.clone();
            clone.value = Some(expand_visual_only(field.children()));
            result.push(clone);
        } else {
            result.push(field.clone());
        }
    }
    result
}
