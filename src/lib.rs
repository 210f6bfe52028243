//! Smart Study: courses, topic notes, generated flashcards and quizzes,
//! stored as plain files under a single base directory.

pub mod cache;
pub mod config;
pub mod error;
pub mod flashcards;
pub mod generation;
pub mod navigation;
pub mod quiz;
pub mod storage;

pub use error::{Result, StudyError};
