use serde::{Deserialize, Serialize};

use super::field::Field;

/// A named grouping of root-level fields. When `group_as` is set, the
/// content of every field carrying this tab is nested under that key
/// instead of living at the content root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub label: String,
    #[serde(rename = "groupAs", default)]
    pub group_as: Option<String>,
}

impl Tab {
    pub fn new(label: impl Into<String>, group_as: Option<String>) -> Self {
        Self {
            label: label.into(),
            group_as,
        }
    }
}

/// A content schema: an ordered tree of root fields plus an ordered set
/// of tabs. Treated as immutable input by every engine operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub tabs: Vec<Tab>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            fields,
            tabs: Vec::new(),
        }
    }

    /// The `groupAs` key of the named tab, if the tab exists and has one.
    pub fn group_as_for(&self, tab_label: &str) -> Option<&str> {
        self.tabs
            .iter()
            .find(|tab| tab.label == tab_label)
            .and_then(|tab| tab.group_as.as_deref())
    }
}
