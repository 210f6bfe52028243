//! Multiple-choice quizzes generated from flashcard decks.

pub mod models;
pub mod session;
mod synthesizer;

pub use models::{parse_quiz_response, QuizDeck, QuizQuestion, OPTIONS_PER_QUESTION};
pub use session::{QuizPhase, QuizSession};
pub use synthesizer::QuizSynthesizer;
