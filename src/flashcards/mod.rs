//! Flashcard decks for Smart Study
//!
//! This module provides:
//! - Topic decks generated from a topic's note
//! - Content decks aggregated from the topic decks of a content
//! - Splitting a markdown deck into individual cards

pub mod cards;
pub mod decks;

pub use cards::{card_title, split_cards};
pub use decks::FlashcardDecks;
