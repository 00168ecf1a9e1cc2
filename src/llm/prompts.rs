/// System prompt asking for exactly `count` single-line, verb-led tasks.
pub fn checklist_system_prompt(topic: &str, count: usize) -> String {
    format!(
        r#"Create a detailed development checklist with exactly {count} steps for {topic}.

FORMAT REQUIREMENTS:
1. Each item must be a SINGLE LINE starting with an action verb (e.g., "Create", "Build", "Implement", "Design")
2. Items should be clear, concise, and actionable - no vague descriptions
3. Make each item a concrete task that can be checked off when completed
4. Format as a simple list with one task per line (NOT numbered)
5. Each item should be approximately 5-15 words in length
6. NO introductory text, explanations, or conclusions - ONLY the checklist items
7. Do NOT split a single item across multiple lines
8. NO placeholders or "(e.g., ...)" text within items"#
    )
}

pub fn checklist_user_prompt(topic: &str) -> String {
    format!("Create a development checklist for: {topic}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_embeds_count_and_topic() {
        let prompt = checklist_system_prompt("a CLI tool", 7);
        assert!(prompt.starts_with(
            "Create a detailed development checklist with exactly 7 steps for a CLI tool."
        ));
        assert!(prompt.contains("SINGLE LINE"));
    }

    #[test]
    fn test_user_prompt() {
        assert_eq!(
            checklist_user_prompt("a CLI tool"),
            "Create a development checklist for: a CLI tool"
        );
    }
}
