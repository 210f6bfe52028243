use crate::cache::GenerationCache;
use crate::error::{Result, StudyError};
use crate::flashcards::FlashcardDecks;
use crate::generation::prompts::quiz_prompt;
use crate::generation::TextGenerator;
use crate::storage::CourseStore;

use super::models::{parse_quiz_response, QuizDeck};

/// Builds quiz decks from a content's flashcards, cached per content
pub struct QuizSynthesizer<'a> {
    store: &'a CourseStore,
    generator: &'a dyn TextGenerator,
}

impl<'a> QuizSynthesizer<'a> {
    pub fn new(store: &'a CourseStore, generator: &'a dyn TextGenerator) -> Self {
        Self { store, generator }
    }

    fn cache(&self, content: &str) -> GenerationCache {
        GenerationCache::new(
            self.store.quiz_path(content),
            self.store.quiz_fingerprint_path(content),
        )
    }

    /// The quiz for a content, regenerated only when its flashcards changed
    pub fn get_or_build_quiz(&self, content: &str) -> Result<QuizDeck> {
        let flashcards = FlashcardDecks::new(self.store).get_content_deck(content)?;

        let deck: QuizDeck = self.cache(content).get_or_regenerate(&flashcards, |source| {
            log::info!("Generating quiz for {:?}", content);
            let reply = self.generator.generate(&quiz_prompt(source))?;
            parse_quiz_response(&reply)
        })?;

        // A cached deck may have been edited on disk since it was generated
        deck.validate()
            .map_err(|e| StudyError::corrupt(self.store.quiz_path(content), e))?;
        Ok(deck)
    }

    /// Force the next `get_or_build_quiz` to regenerate
    pub fn invalidate(&self, content: &str) -> Result<()> {
        self.cache(content).invalidate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::content_fingerprint;
    use crate::generation::testing::ScriptedGenerator;
    use crate::storage::{write_atomic, StudyStorage};
    use std::fs;
    use tempfile::TempDir;

    const QUIZ: &str = r#"[{"question": "Heap root?", "options": ["min", "max", "mid", "leaf"], "answer": "min"}]"#;
    const QUIZ_B: &str = r#"[{"question": "Stack?", "options": ["LIFO", "FIFO", "both", "none"], "answer": "LIFO"}]"#;

    fn create_test_course() -> (CourseStore, TempDir) {
        let temp = TempDir::new().unwrap();
        let storage = StudyStorage::new(temp.path().to_path_buf());
        let course = storage.create_course("Algorithms").unwrap();
        let store = storage.course(course.id);
        store.add_content("C").unwrap();
        write_atomic(&store.topic_deck_path("C", "T1"), b"### Heap\n- min at root").unwrap();
        (store, temp)
    }

    #[test]
    fn test_quiz_is_cached() {
        let (store, _temp) = create_test_course();
        let generator = ScriptedGenerator::new(vec![Ok(QUIZ.into()), Ok(QUIZ_B.into())]);
        let synthesizer = QuizSynthesizer::new(&store, &generator);

        let first = synthesizer.get_or_build_quiz("C").unwrap();
        let second = synthesizer.get_or_build_quiz("C").unwrap();

        assert_eq!(first, second);
        assert_eq!(generator.calls(), 1);
        assert!(generator.last_prompt().unwrap().contains("### Heap\n- min at root"));
        assert_eq!(
            fs::read_to_string(store.quiz_fingerprint_path("C")).unwrap(),
            content_fingerprint("### Heap\n- min at root")
        );
    }

    #[test]
    fn test_changed_flashcards_regenerate() {
        let (store, _temp) = create_test_course();
        let generator = ScriptedGenerator::new(vec![Ok(QUIZ.into()), Ok(QUIZ_B.into())]);
        let synthesizer = QuizSynthesizer::new(&store, &generator);
        synthesizer.get_or_build_quiz("C").unwrap();

        write_atomic(&store.content_deck_path("C"), b"### Stack\n- LIFO").unwrap();
        let quiz = synthesizer.get_or_build_quiz("C").unwrap();

        assert_eq!(generator.calls(), 2);
        assert_eq!(quiz.questions[0].answer, "LIFO");
    }

    #[test]
    fn test_invalidate_forces_regeneration() {
        let (store, _temp) = create_test_course();
        let generator = ScriptedGenerator::new(vec![Ok(QUIZ.into()), Ok(QUIZ_B.into())]);
        let synthesizer = QuizSynthesizer::new(&store, &generator);
        synthesizer.get_or_build_quiz("C").unwrap();

        synthesizer.invalidate("C").unwrap();
        synthesizer.get_or_build_quiz("C").unwrap();
        assert_eq!(generator.calls(), 2);
    }

    #[test]
    fn test_malformed_quiz_leaves_no_fingerprint() {
        let (store, _temp) = create_test_course();
        let bad = r#"[{"question": "Heap?", "options": ["min", "max", "mid"], "answer": "min"}]"#;
        let generator = ScriptedGenerator::replying(bad);

        let result = QuizSynthesizer::new(&store, &generator).get_or_build_quiz("C");
        assert!(matches!(result, Err(StudyError::MalformedArtifact(_))));
        assert!(!store.quiz_fingerprint_path("C").exists());
        assert!(!store.quiz_path("C").exists());
    }

    #[test]
    fn test_invalid_cached_quiz_is_corrupt() {
        let (store, _temp) = create_test_course();
        write_atomic(&store.quiz_path("C"), b"[]").unwrap();
        write_atomic(
            &store.quiz_fingerprint_path("C"),
            content_fingerprint("### Heap\n- min at root").as_bytes(),
        )
        .unwrap();
        let generator = ScriptedGenerator::replying(QUIZ);

        let result = QuizSynthesizer::new(&store, &generator).get_or_build_quiz("C");
        assert!(matches!(result, Err(StudyError::CorruptData { .. })));
        assert_eq!(generator.calls(), 0);
    }

    #[test]
    fn test_missing_flashcards() {
        let (store, _temp) = create_test_course();
        let generator = ScriptedGenerator::replying(QUIZ);

        let result = QuizSynthesizer::new(&store, &generator).get_or_build_quiz("Other");
        assert!(matches!(result, Err(StudyError::NotFound(_))));
        assert_eq!(generator.calls(), 0);
    }
}
