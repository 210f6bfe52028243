use smartstudy_lib::flashcards::{card_title, split_cards};

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const CYAN: &str = "\x1b[36m";
}

/// Wrap `text` in `color` when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Render one flashcard, bolding its `### ` title line
pub fn render_card(card: &str, use_color: bool) -> String {
    let mut lines = Vec::new();
    for (i, line) in card.lines().enumerate() {
        if i == 0 && card_title(card).is_some() {
            lines.push(paint(line, Color::BOLD, use_color));
        } else {
            lines.push(line.to_string());
        }
    }
    lines.join("\n")
}

/// Render a whole deck, numbering each card
pub fn render_deck(deck: &str, use_color: bool) -> String {
    let cards = split_cards(deck);
    let total = cards.len();

    cards
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let counter = paint(&format!("[{}/{}]", i + 1, total), Color::DIM, use_color);
            format!("{}\n{}", counter, render_card(card, use_color))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
