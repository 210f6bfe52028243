//! Prompt templates sent to the text generator.

/// Instruction for turning topic notes into markdown flashcards
pub fn flashcard_prompt(notes: &str) -> String {
    format!(
        r####"You are a strict study assistant. Use ONLY the notes below to create flashcards.
Do not add information or examples that are not in the notes.

Instructions:
- Create one flashcard per concept; never merge topics into one card.
- Start every flashcard with a title line beginning with "### ".
- Give each flashcard 3 to 5 short bullet points starting with "- ".
- Cover every point in the notes and keep examples when the notes have them.
- Only if a concept is unclear, you may add one very simple example.

Notes:
"""{notes}"""

Reply with the flashcards in Markdown only."####
    )
}

/// Instruction for turning a flashcard deck into multiple-choice questions
pub fn quiz_prompt(flashcards: &str) -> String {
    format!(
        r#"You are a helpful assistant. Use ONLY the flashcards below to write quiz questions.

Instructions:
- Write as many multiple-choice questions as needed to cover every bullet point.
- Every question has exactly 4 different options.
- "answer" must repeat the full text of the correct option exactly.
- Do not add content that is not in the flashcards and do not repeat a concept.

Flashcards:
"""{flashcards}"""

Reply with a JSON array only, in this format:
[
  {{
    "question": "What is ...?",
    "options": ["first", "second", "third", "fourth"],
    "answer": "second"
  }}
]"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_embed_source() {
        assert!(flashcard_prompt("heaps are trees").contains("\"\"\"heaps are trees\"\"\""));
        let quiz = quiz_prompt("### Heap\n- tree");
        assert!(quiz.contains("### Heap\n- tree"));
        assert!(quiz.contains("\"options\": [\"first\""));
    }
}
