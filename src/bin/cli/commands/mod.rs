pub mod content;
pub mod courses;
pub mod flashcards;
pub mod key;
pub mod note;
pub mod quiz;
pub mod topic;
