//! Checklist data model
//!
//! Everything here is request-scoped: built from one tool call, rendered,
//! handed to the response shaper and dropped.

pub mod normalize;
pub mod render;

pub use normalize::{canonicalize_line_endings, clean_item, normalize, normalize_on};
pub use render::render_document;

use serde::Serialize;

/// Item count used when the caller does not ask for one.
pub const DEFAULT_ITEM_COUNT: usize = 5;

/// Topic used when the caller supplies none of the accepted topic fields.
pub const DEFAULT_TOPIC: &str = "implementing a snake game";

/// Upper bound on how many filler items are appended to a short checklist.
pub const MAX_PADDED_ITEMS: usize = 20;

/// A resolved tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistRequest {
    pub topic: String,
    pub item_count: usize,
}

impl ChecklistRequest {
    /// Resolve a request, falling back to the default topic and count.
    ///
    /// Blank topics count as absent and a zero count is treated like a
    /// missing one.
    pub fn new(topic: Option<&str>, item_count: Option<usize>) -> Self {
        let topic = topic
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TOPIC)
            .to_string();
        let item_count = item_count
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_ITEM_COUNT);
        Self { topic, item_count }
    }
}

impl Default for ChecklistRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// A single line, imperative task with list markers removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChecklistItem(String);

impl ChecklistItem {
    /// Minimum number of characters a cleaned item must exceed.
    pub const MIN_LEN: usize = 3;

    /// Accepts already-cleaned text, rejecting anything multi-line or too short.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.contains('\n') || text.chars().count() <= Self::MIN_LEN {
            return None;
        }
        Some(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChecklistItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered checklist items, sized to the requested count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Checklist(Vec<ChecklistItem>);

impl Checklist {
    pub fn items(&self) -> &[ChecklistItem] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChecklistItem> {
        self.0.iter()
    }
}

impl From<Vec<ChecklistItem>> for Checklist {
    fn from(items: Vec<ChecklistItem>) -> Self {
        Self(items)
    }
}

/// A rendered checklist document: the items plus the markdown text written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub checklist: Checklist,
    pub text: String,
}

impl RenderedDocument {
    pub fn as_str(&self) -> &str {
        &self.text
    }
}
