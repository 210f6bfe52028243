//! Data models for multiple-choice quizzes

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StudyError};

/// Number of options every question carries
pub const OPTIONS_PER_QUESTION: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl QuizQuestion {
    pub fn is_correct(&self, option: &str) -> bool {
        self.answer == option
    }

    fn validate(&self, number: usize) -> Result<()> {
        let malformed = |reason: String| {
            Err(StudyError::MalformedArtifact(format!("question {}: {}", number, reason)))
        };

        if self.question.trim().is_empty() {
            return malformed("empty question text".to_string());
        }
        if self.options.len() != OPTIONS_PER_QUESTION {
            return malformed(format!(
                "expected {} options, got {}",
                OPTIONS_PER_QUESTION,
                self.options.len()
            ));
        }
        let distinct: HashSet<&str> = self.options.iter().map(String::as_str).collect();
        if distinct.len() != self.options.len() {
            return malformed("options are not distinct".to_string());
        }
        if !self.options.contains(&self.answer) {
            return malformed(format!("answer {:?} is not one of the options", self.answer));
        }
        Ok(())
    }
}

/// Ordered questions of one content's quiz; stored as a bare JSON array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuizDeck {
    pub questions: Vec<QuizQuestion>,
}

impl QuizDeck {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Check every question; the first violation is reported
    pub fn validate(&self) -> Result<()> {
        if self.questions.is_empty() {
            return Err(StudyError::MalformedArtifact("quiz has no questions".to_string()));
        }
        for (i, question) in self.questions.iter().enumerate() {
            question.validate(i + 1)?;
        }
        Ok(())
    }
}

/// Parse and validate a generator reply into a quiz deck.
///
/// The reply must be a JSON array of questions, optionally wrapped in a
/// markdown code fence.
pub fn parse_quiz_response(reply: &str) -> Result<QuizDeck> {
    let json = strip_code_fence(reply);
    let deck: QuizDeck = serde_json::from_str(json)
        .map_err(|e| StudyError::MalformedArtifact(format!("quiz is not valid JSON: {}", e)))?;
    deck.validate()?;
    Ok(deck)
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening fence line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: &[&str], answer: &str) -> QuizQuestion {
        QuizQuestion {
            question: "Which structure is a complete binary tree?".to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            answer: answer.to_string(),
        }
    }

    const VALID: &str = r#"[
  {"question": "Heap root holds?", "options": ["min", "max", "median", "mode"], "answer": "min"},
  {"question": "Stack order?", "options": ["LIFO", "FIFO", "random", "sorted"], "answer": "LIFO"}
]"#;

    #[test]
    fn test_parse_valid_response() {
        let deck = parse_quiz_response(VALID).unwrap();
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.questions[1].answer, "LIFO");
    }

    #[test]
    fn test_parse_fenced_response() {
        let fenced = format!("```json\n{}\n```", VALID);
        assert_eq!(parse_quiz_response(&fenced).unwrap(), parse_quiz_response(VALID).unwrap());
    }

    #[test]
    fn test_deck_serializes_as_array() {
        let deck = parse_quiz_response(VALID).unwrap();
        let json = serde_json::to_string(&deck).unwrap();
        assert!(json.starts_with('['));
    }

    #[test]
    fn test_rejects_three_options() {
        let deck = QuizDeck::new(vec![question(&["a", "b", "c"], "a")]);
        assert!(matches!(deck.validate(), Err(StudyError::MalformedArtifact(_))));
    }

    #[test]
    fn test_rejects_answer_outside_options() {
        let deck = QuizDeck::new(vec![question(&["a", "b", "c", "d"], "B")]);
        assert!(matches!(deck.validate(), Err(StudyError::MalformedArtifact(_))));
    }

    #[test]
    fn test_rejects_duplicate_options() {
        let deck = QuizDeck::new(vec![question(&["a", "a", "c", "d"], "a")]);
        assert!(matches!(deck.validate(), Err(StudyError::MalformedArtifact(_))));
    }

    #[test]
    fn test_rejects_empty_quiz_and_bad_json() {
        assert!(matches!(parse_quiz_response("[]"), Err(StudyError::MalformedArtifact(_))));
        assert!(matches!(
            parse_quiz_response("Here are your questions!"),
            Err(StudyError::MalformedArtifact(_))
        ));
        assert!(matches!(
            parse_quiz_response(r#"[{"question": "q", "options": ["a"]}]"#),
            Err(StudyError::MalformedArtifact(_))
        ));
    }
}
