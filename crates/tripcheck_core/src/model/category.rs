//! Completion category record.

use serde::{Deserialize, Serialize};

/// Logical grouping of items matched by title patterns across sections.
///
/// An empty `title_patterns` list marks an informational category that is
/// never reported complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    /// Matched against item titles by equality or substring.
    #[serde(default)]
    pub title_patterns: Vec<String>,
    pub label: String,
}

impl Category {
    pub fn new(id: impl Into<String>, label: impl Into<String>, patterns: &[&str]) -> Self {
        Self {
            id: id.into(),
            title_patterns: patterns.iter().map(|value| value.to_string()).collect(),
            label: label.into(),
        }
    }

    /// Returns whether this category has no structured backing.
    pub fn is_informational(&self) -> bool {
        self.title_patterns.is_empty()
    }
}
