//! Error-index remapping for repeating collections.
//!
//! When an item is inserted, moved or deleted, previously reported item
//! errors still point at the old indices. [`remap`] rewrites them without
//! re-validating.

use super::{ErrorKey, ErrorMap};

/// Rewrite the indices of an error map after one item changed position.
///
/// `changed` is the index that moved; `target` is where it went, with
/// `None` meaning the item was deleted. `changed == Some(target)` encodes
/// an insertion at that index (including a deletion being undone). String
/// keys carry the collection field's own error and pass through untouched.
pub fn remap(errors: &ErrorMap, changed: usize, target: Option<usize>) -> ErrorMap {
    let mut remapped = ErrorMap::new();

    for (key, value) in errors {
        let ErrorKey::Index(index) = key else {
            remapped.insert(key.clone(), value.clone());
            continue;
        };
        let index = *index;

        if target == Some(changed) && index >= changed {
            // insertion shifts everything at and after it
            remapped.insert(ErrorKey::Index(index + 1), value.clone());
        } else if index == changed {
            if let Some(target) = target {
                remapped.insert(ErrorKey::Index(target), value.clone());
            }
            // a deleted item's error disappears with it
        } else if changed > index && target.is_some_and(|t| t <= index) {
            remapped.insert(ErrorKey::Index(index + 1), value.clone());
        } else if changed < index && target.map_or(true, |t| t >= index) {
            remapped.insert(ErrorKey::Index(index - 1), value.clone());
        } else if target.is_some() || index < changed {
            remapped.insert(ErrorKey::Index(index), value.clone());
        }
        // remaining case: an error past a deletion with no target, dropped
        // by the shift branch above, so nothing is left to keep here
    }

    remapped
}
