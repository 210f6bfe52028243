//! In-memory quiz run: question order, score and answer reveal.
//!
//! ```text
//! Answering --submit/reveal--> Revealed --advance--> Answering (next question)
//!                                  |
//!                                  +-- last question --> Complete
//! ```

use rand::seq::SliceRandom;
use rand::Rng;

use super::models::{QuizDeck, QuizQuestion};
use crate::error::{Result, StudyError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Waiting for an answer to the current question
    Answering,
    /// The correct answer is shown; the user may advance
    Revealed,
    /// Revealed at the last question
    Complete,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    /// Shuffled once per run
    questions: Vec<QuizQuestion>,
    index: usize,
    score: usize,
    selected: Option<String>,
    revealed: bool,
}

impl QuizSession {
    pub fn new(deck: &QuizDeck) -> Result<Self> {
        Self::with_rng(deck, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(deck: &QuizDeck, rng: &mut R) -> Result<Self> {
        if deck.is_empty() {
            return Err(StudyError::MalformedArtifact("quiz has no questions".to_string()));
        }
        let mut questions = deck.questions.clone();
        questions.shuffle(rng);

        Ok(Self {
            questions,
            index: 0,
            score: 0,
            selected: None,
            revealed: false,
        })
    }

    pub fn phase(&self) -> QuizPhase {
        match (self.revealed, self.is_last()) {
            (false, _) => QuizPhase::Answering,
            (true, false) => QuizPhase::Revealed,
            (true, true) => QuizPhase::Complete,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase() == QuizPhase::Complete
    }

    fn is_last(&self) -> bool {
        self.index + 1 >= self.questions.len()
    }

    pub fn current(&self) -> &QuizQuestion {
        &self.questions[self.index]
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn selected_option(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Answer the current question.
    ///
    /// Returns `Some(correct)` when the answer was accepted, `None` when the
    /// question was already revealed (the score is never counted twice).
    pub fn submit(&mut self, option: &str) -> Option<bool> {
        if self.revealed {
            return None;
        }
        let correct = self.current().is_correct(option);
        if correct {
            self.score += 1;
        }
        self.selected = Some(option.to_string());
        self.revealed = true;
        Some(correct)
    }

    /// Show the answer without scoring
    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    /// Move to the next question; false when not revealed yet or at the end
    pub fn advance(&mut self) -> bool {
        if !self.revealed || self.is_last() {
            return false;
        }
        self.index += 1;
        self.selected = None;
        self.revealed = false;
        true
    }

    pub fn restart(&mut self) {
        self.restart_with(&mut rand::thread_rng());
    }

    /// Reset the run with a fresh question order
    pub fn restart_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.questions.shuffle(rng);
        self.index = 0;
        self.score = 0;
        self.selected = None;
        self.revealed = false;
    }
}
