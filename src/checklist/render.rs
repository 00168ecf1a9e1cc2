//! Markdown template for a checklist file.

use super::Checklist;
use chrono::NaiveDate;

pub const TITLE: &str = "# Development Checklist";

/// Marker for an open task. Response shaping counts tasks by this marker.
pub const UNCHECKED: &str = "- [ ]";

const AGENT_PREAMBLE: [&str; 4] = [
    "## Instructions for AI Agents",
    "",
    "Work through the tasks below in order. Mark each task complete by changing `[ ]` to `[x]` as soon as it is done, then update the progress tracker.",
    "Do not reword, reorder, add, or remove tasks.",
];

const PROGRESS_STAGES: [&str; 5] = [
    "0% - Not started",
    "25% - Getting started",
    "50% - Halfway there",
    "75% - Almost done",
    "100% - Complete",
];

/// Render the checklist into the fixed document template.
///
/// Lines are joined with `\n` and the document ends with a newline.
pub fn render_document(checklist: &Checklist, date: NaiveDate) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(checklist.len() + 20);

    lines.push(TITLE.to_string());
    lines.push(String::new());
    lines.push(format!("Generated: {}", date.format("%Y-%m-%d")));
    lines.push(String::new());
    lines.extend(AGENT_PREAMBLE.iter().map(|l| l.to_string()));
    lines.push(String::new());
    lines.push("## Tasks".to_string());
    lines.push(String::new());
    lines.extend(checklist.iter().map(|item| format!("{UNCHECKED} {item}")));
    lines.push(String::new());
    lines.push("## Progress".to_string());
    lines.push(String::new());
    lines.extend(
        PROGRESS_STAGES
            .iter()
            .map(|stage| format!("{UNCHECKED} {stage}")),
    );

    let mut doc = lines.join("\n");
    doc.push('\n');
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::ChecklistItem;

    fn checklist(items: &[&str]) -> Checklist {
        Checklist::from(
            items
                .iter()
                .map(|s| ChecklistItem::new(*s).unwrap())
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_render_structure() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let doc = render_document(&checklist(&["Create repo", "Write tests"]), date);

        let lines: Vec<&str> = doc.lines().collect();
        assert_eq!(lines[0], TITLE);
        assert!(lines.contains(&"Generated: 2025-01-31"));
        assert!(lines.contains(&"- [ ] Create repo"));
        assert!(lines.contains(&"- [ ] Write tests"));
        assert_eq!(lines.last(), Some(&"- [ ] 100% - Complete"));
        assert!(doc.ends_with('\n'));
        assert!(!doc.contains('\r'));
    }

    #[test]
    fn test_render_marks_items_then_progress() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let doc = render_document(&checklist(&["Create repo"]), date);
        // One task plus five progress stages.
        assert_eq!(doc.matches(UNCHECKED).count(), 6);
        let task_pos = doc.find("- [ ] Create repo").unwrap();
        let progress_pos = doc.find("## Progress").unwrap();
        assert!(task_pos < progress_pos);
    }

    #[test]
    fn test_preamble_has_no_unchecked_marker() {
        assert!(AGENT_PREAMBLE.iter().all(|l| !l.contains(UNCHECKED)));
    }
}
