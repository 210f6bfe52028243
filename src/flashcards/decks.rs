//! Topic decks and their per-content aggregate.
//!
//! ```text
//! flashcards/{content}_{topic}.md   # generated from the topic's note
//! flashcards/{content}.md           # aggregate, built once from the topic decks
//! ```
//! The aggregate is a write-through, build-once cache: once it exists it is
//! returned as stored, even if topic decks change later. It is rebuilt only
//! when the file is gone (content deletion, `rebuild_content_deck`).

use std::fs;
use std::path::PathBuf;

use crate::error::{Result, StudyError};
use crate::generation::prompts::flashcard_prompt;
use crate::generation::TextGenerator;
use crate::storage::html_utils::note_to_plain_text;
use crate::storage::keys::topic_prefix;
use crate::storage::{list_files, read_optional, write_atomic, CourseStore};

/// Separator between topic decks inside an aggregate deck
pub const DECK_SEPARATOR: &str = "\n\n";

pub struct FlashcardDecks<'a> {
    store: &'a CourseStore,
}

impl<'a> FlashcardDecks<'a> {
    pub fn new(store: &'a CourseStore) -> Self {
        Self { store }
    }

    /// Topic deck files of a content, sorted by file name
    pub fn topic_deck_paths(&self, content: &str) -> Result<Vec<PathBuf>> {
        let prefix = topic_prefix(content);
        let mut paths: Vec<PathBuf> = list_files(&self.store.flashcards_dir())?
            .into_iter()
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .map_or(false, |name| name.starts_with(&prefix) && name.ends_with(".md"))
            })
            .collect();
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(paths)
    }

    /// The content-level deck, aggregated from topic decks on first use
    pub fn get_content_deck(&self, content: &str) -> Result<String> {
        if let Some(deck) = read_optional(&self.store.content_deck_path(content))? {
            return Ok(deck);
        }
        self.build_content_deck(content)
    }

    /// Discard the stored aggregate and build it again from the topic decks
    pub fn rebuild_content_deck(&self, content: &str) -> Result<String> {
        let path = self.store.content_deck_path(content);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        self.build_content_deck(content)
    }

    fn build_content_deck(&self, content: &str) -> Result<String> {
        let paths = self.topic_deck_paths(content)?;
        if paths.is_empty() {
            return Err(StudyError::NotFound(format!(
                "no flashcards for content {:?}",
                content
            )));
        }

        let mut decks = Vec::with_capacity(paths.len());
        for path in &paths {
            decks.push(fs::read_to_string(path)?.trim().to_string());
        }
        let combined = decks.join(DECK_SEPARATOR);

        write_atomic(&self.store.content_deck_path(content), combined.as_bytes())?;
        log::info!(
            "Aggregated {} topic decks into content deck {:?}",
            paths.len(),
            content
        );
        Ok(combined)
    }

    /// The stored topic deck, if it was generated already
    pub fn load_topic_deck(&self, content: &str, topic: &str) -> Result<Option<String>> {
        Ok(read_optional(&self.store.topic_deck_path(content, topic))?
            .map(|deck| deck.trim().to_string()))
    }

    /// The topic deck, generated from the topic's note when missing
    pub fn ensure_topic_deck(
        &self,
        generator: &dyn TextGenerator,
        content: &str,
        topic: &str,
    ) -> Result<String> {
        if let Some(deck) = self.load_topic_deck(content, topic)? {
            return Ok(deck);
        }
        self.generate_topic_deck(generator, content, topic)
    }

    /// Generate the topic deck again, replacing the stored one on success
    pub fn regenerate_topic_deck(
        &self,
        generator: &dyn TextGenerator,
        content: &str,
        topic: &str,
    ) -> Result<String> {
        self.generate_topic_deck(generator, content, topic)
    }

    fn generate_topic_deck(
        &self,
        generator: &dyn TextGenerator,
        content: &str,
        topic: &str,
    ) -> Result<String> {
        if !self.store.note_path(content, topic).exists() {
            return Err(StudyError::NotFound(format!(
                "note for topic {:?} in {:?}",
                topic, content
            )));
        }
        let notes = note_to_plain_text(&self.store.load_note(content, topic)?);
        if notes.is_empty() {
            return Err(StudyError::EmptySource(format!(
                "the note for topic {:?} is empty",
                topic
            )));
        }

        log::info!("Generating flashcards for {:?} / {:?}", content, topic);
        let deck = generator.generate(&flashcard_prompt(&notes))?.trim().to_string();
        if deck.is_empty() {
            return Err(StudyError::MalformedArtifact(
                "the generator returned no flashcards".to_string(),
            ));
        }

        write_atomic(&self.store.topic_deck_path(content, topic), deck.as_bytes())?;
        Ok(deck)
    }
}
