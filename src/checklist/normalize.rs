//! Coerces free-form model output into a fixed-size checklist.
//!
//! The model is asked for one task per line, but replies arrive numbered,
//! bulleted, prefixed with headings, or as a single paragraph. Extraction
//! picks exactly one strategy by scanning every line, first match wins:
//! numbered lines, then bulleted lines, then plain lines, then sentences.
//! A file mixing numbers and bullets therefore keeps only the numbered lines.
//!
//! Nothing in here can fail. Empty or missing input still yields a full
//! checklist made of filler tasks.

use super::{render, Checklist, ChecklistItem, RenderedDocument, MAX_PADDED_ITEMS};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Filler tasks appended when the model under-supplies items.
pub const GENERIC_TASKS: [&str; 10] = [
    "Create project documentation",
    "Set up version control",
    "Implement automated testing",
    "Conduct code review",
    "Perform user acceptance testing",
    "Optimize performance",
    "Fix any identified bugs",
    "Deploy to production environment",
    "Create user documentation",
    "Plan for future enhancements",
];

/// Verb used to turn a non-imperative item into a task.
const IMPERATIVE_PREFIX: &str = "Implement";

// ═══════════════════════════════════════════════════════════════════════════
//  PATTERNS
// ═══════════════════════════════════════════════════════════════════════════

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("static checklist pattern")
}

/// Markdown heading, setext heading, or horizontal rule.
static HEADER: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?m)^(#+\s+.+?$|.+?\n={3,}|-{3,})"));

static LABEL: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?im)^(checklist|task list|todo|to-do|steps|plan)[:|-]\s*"));

static NUMBERED: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[0-9]+\."));
static NUMBERED_PREFIX: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[0-9]+\.\s*"));
static BULLET: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[-*•]"));
static BULLET_PREFIX: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[-*•]\s*"));
static SENTENCE: LazyLock<Regex> = LazyLock::new(|| pattern(r"[^.!?]+[.!?]+"));

/// List marker or task-list checkbox left over after extraction.
static RESIDUAL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^([0-9]+\.|[-*•]|\[[ xX]\])\s*"));
static STEP_LABEL: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)^(step|task|item)\s+[0-9]+\s*[:|-]\s*"));

/// Capitalized word followed by whitespace, or a single capitalized word.
static VERB_LED: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[A-Z][a-z]+(\s|$)"));

// ═══════════════════════════════════════════════════════════════════════════
//  EXTRACTION
// ═══════════════════════════════════════════════════════════════════════════

/// The extraction strategy chosen for a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    Numbered,
    Bulleted,
    Lines,
    Sentences,
}

impl Extraction {
    /// Pick the strategy by scanning all lines, in fixed precedence.
    pub fn detect(lines: &[&str]) -> Self {
        if lines.iter().any(|l| NUMBERED.is_match(l)) {
            Extraction::Numbered
        } else if lines.iter().any(|l| BULLET.is_match(l)) {
            Extraction::Bulleted
        } else if lines.len() >= 2 {
            Extraction::Lines
        } else {
            Extraction::Sentences
        }
    }

    fn extract(self, lines: &[&str]) -> Vec<String> {
        match self {
            Extraction::Numbered => take_marked(lines, &NUMBERED, &NUMBERED_PREFIX),
            Extraction::Bulleted => take_marked(lines, &BULLET, &BULLET_PREFIX),
            Extraction::Lines => lines.iter().map(|l| l.to_string()).collect(),
            Extraction::Sentences => split_sentences(lines.first().copied().unwrap_or("")),
        }
    }
}

fn take_marked(lines: &[&str], marker: &Regex, prefix: &Regex) -> Vec<String> {
    lines
        .iter()
        .filter(|l| marker.is_match(l))
        .map(|l| prefix.replace(l, "").trim().to_string())
        .collect()
}

fn split_sentences(blob: &str) -> Vec<String> {
    let sentences: Vec<&str> = SENTENCE.find_iter(blob).map(|m| m.as_str()).collect();
    let sentences = if sentences.is_empty() {
        vec![blob]
    } else {
        sentences
    };
    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| s.chars().count() > ChecklistItem::MIN_LEN)
        .map(str::to_string)
        .collect()
}

/// Replace CRLF and lone CR with LF.
pub fn canonicalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Drop the first heading/rule and the first "Checklist:"-style label.
fn strip_preamble(text: &str) -> String {
    let without_header = HEADER.replace(text, "");
    LABEL.replace(&without_header, "").trim().to_string()
}

/// Strip leftover list markers and "Step N:" labels until none remain.
pub fn clean_item(raw: &str) -> String {
    let mut current = raw.trim().to_string();
    loop {
        let stripped = RESIDUAL_MARKER.replace(&current, "");
        let next = STEP_LABEL.replace(&stripped, "").trim().to_string();
        if next == current {
            return next;
        }
        current = next;
    }
}

fn ensure_verb_led(item: String) -> String {
    if VERB_LED.is_match(&item) {
        item
    } else {
        format!("{IMPERATIVE_PREFIX} {item}")
    }
}

/// Steps 1 to 7: extract, clean, and size the checklist.
pub fn extract_checklist(raw: Option<&str>, item_count: usize) -> Checklist {
    let text = canonicalize_line_endings(raw.unwrap_or_default());
    let content = strip_preamble(&text);

    let lines: Vec<&str> = content
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mode = Extraction::detect(&lines);
    debug!(?mode, lines = lines.len(), "Extracting checklist items");

    let mut items: Vec<ChecklistItem> = mode
        .extract(&lines)
        .iter()
        .map(|item| clean_item(item))
        .filter(|item| item.chars().count() > ChecklistItem::MIN_LEN)
        .map(ensure_verb_led)
        .filter_map(ChecklistItem::new)
        .collect();

    if items.len() > item_count {
        items.truncate(item_count);
    }
    while items.len() < item_count && items.len() < MAX_PADDED_ITEMS {
        let filler = GENERIC_TASKS[items.len() % GENERIC_TASKS.len()];
        items.push(ChecklistItem(filler.to_string()));
    }

    Checklist::from(items)
}

/// Normalize a model reply into a rendered checklist dated today.
pub fn normalize(raw: Option<&str>, item_count: usize) -> RenderedDocument {
    normalize_on(raw, item_count, chrono::Local::now().date_naive())
}

/// Normalize a model reply into a rendered checklist with a fixed date.
pub fn normalize_on(raw: Option<&str>, item_count: usize, date: NaiveDate) -> RenderedDocument {
    let checklist = extract_checklist(raw, item_count);
    debug!(items = checklist.len(), "Formatted checklist items");
    let text = render::render_document(&checklist, date);
    RenderedDocument { checklist, text }
}
