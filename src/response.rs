//! Shapes a rendered checklist into a tool-call result.
//!
//! Calling agents like to "helpfully" rewrite or regenerate whatever a tool
//! hands back. The result therefore carries an instruction block next to the
//! document: when the file was written it forbids recreating it, and when the
//! write failed it asks for a verbatim copy between explicit markers.

use crate::checklist::render::UNCHECKED;
use regex::Regex;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::LazyLock;

/// Slug used when no usable topic is available.
const DEFAULT_SLUG: &str = "checklist";

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s]").expect("static slug pattern"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static slug pattern"));

/// Derive a lowercase, hyphenated, filesystem-safe slug from a topic.
pub fn slugify(topic: Option<&str>) -> String {
    let Some(topic) = topic else {
        return DEFAULT_SLUG.to_string();
    };
    let lowered = topic.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, "");
    let slug = WHITESPACE_RUN.replace_all(stripped.trim(), "-").into_owned();
    if slug.is_empty() {
        DEFAULT_SLUG.to_string()
    } else {
        slug
    }
}

/// File name a checklist for `topic` is written to.
pub fn checklist_filename(topic: Option<&str>) -> String {
    format!("{}-checklist.md", slugify(topic))
}

/// Count open tasks by scanning the document text.
pub fn count_tasks(document: &str) -> usize {
    document.matches(UNCHECKED).count()
}

/// Where the checklist ended up after a successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistOutcome {
    pub path: PathBuf,
    pub task_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn as_text(&self) -> &str {
        match self {
            ContentBlock::Text { text } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistMetadata {
    pub topic: Option<String>,
    pub filename: String,
    pub task_count: usize,
    pub persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Result envelope returned for a `tools/call`.
///
/// The document is the first content block and is repeated in `checklist`
/// and `text` for clients that only read one of those.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolResponse {
    pub content: Vec<ContentBlock>,
    pub is_error: bool,
    pub checklist: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ChecklistMetadata>,
}

impl ProtocolResponse {
    /// The primary payload: the document, or the error message.
    pub fn document(&self) -> &str {
        self.content.first().map(ContentBlock::as_text).unwrap_or_default()
    }
}

/// Builds [`ProtocolResponse`] values. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseShaper;

impl ResponseShaper {
    /// Wrap a rendered document with the instruction block for its persist state.
    pub fn shape(
        document: &str,
        topic: Option<&str>,
        persisted: Option<&PersistOutcome>,
        is_error: bool,
    ) -> ProtocolResponse {
        let filename = checklist_filename(topic);
        let task_count = count_tasks(document);
        let topic_label = topic.unwrap_or(DEFAULT_SLUG);

        let instructions = match persisted {
            Some(outcome) => persisted_instructions(topic_label, &filename, outcome),
            None => unpersisted_instructions(topic_label, &filename, task_count, document),
        };

        ProtocolResponse {
            content: vec![
                ContentBlock::text(document),
                ContentBlock::text(instructions.clone()),
            ],
            is_error,
            checklist: document.to_string(),
            text: document.to_string(),
            instructions: Some(instructions),
            metadata: Some(ChecklistMetadata {
                topic: topic.map(str::to_string),
                filename,
                task_count,
                persisted: persisted.is_some(),
                path: persisted.map(|o| o.path.clone()),
            }),
        }
    }

    /// Error-flagged response carrying a human-readable message instead of a checklist.
    pub fn error(message: impl Into<String>) -> ProtocolResponse {
        let message = message.into();
        ProtocolResponse {
            content: vec![ContentBlock::text(message.clone())],
            is_error: true,
            checklist: message.clone(),
            text: message,
            instructions: None,
            metadata: None,
        }
    }
}

fn persisted_instructions(topic: &str, filename: &str, outcome: &PersistOutcome) -> String {
    let path = outcome.path.display();
    let count = outcome.task_count;
    format!(
        "IMPORTANT INSTRUCTIONS FOR THE ASSISTANT:\n\
         The checklist for \"{topic}\" has ALREADY been created and saved to {path} ({filename}) with {count} tasks.\n\
         - DO NOT create, recreate, overwrite, or edit {filename}.\n\
         - DO NOT output the checklist content again, reformatted or otherwise.\n\
         - DO NOT generate your own version of this checklist.\n\
         - Simply tell the user the file is ready.\n\
         \n\
         Example acceptable reply:\n\
         \"I've created {filename} with {count} tasks for {topic}. It is saved at {path}.\""
    )
}

fn unpersisted_instructions(topic: &str, filename: &str, count: usize, document: &str) -> String {
    let body = document.trim_end_matches('\n');
    format!(
        "IMPORTANT INSTRUCTIONS FOR THE ASSISTANT:\n\
         The checklist for \"{topic}\" could not be saved automatically.\n\
         Create a file named {filename} containing EXACTLY the content between the BEGIN and END markers below.\n\
         - DO NOT alter the formatting, wording, order, or checkboxes.\n\
         - DO NOT add or remove tasks. The file must contain {count} tasks.\n\
         - DO NOT echo the checklist content back into the conversation.\n\
         \n\
         ===== BEGIN {filename} =====\n\
         {body}\n\
         ===== END {filename} =====\n\
         \n\
         Example acceptable reply:\n\
         \"I've created {filename} with {count} tasks for {topic}.\""
    )
}
