/// Heading that opens every card in a generated deck
pub const CARD_HEADING: &str = "### ";

/// Split a markdown deck into cards, one per `### ` heading.
///
/// Text before the first heading forms its own card. Blank cards are dropped.
pub fn split_cards(deck: &str) -> Vec<String> {
    let mut cards = Vec::new();
    let mut current = String::new();

    for line in deck.lines() {
        if line.starts_with(CARD_HEADING) && !current.trim().is_empty() {
            cards.push(current.trim().to_string());
            current.clear();
        }
        current.push_str(line);
        current.push('\n');
    }
    if !current.trim().is_empty() {
        cards.push(current.trim().to_string());
    }

    cards
}

/// Title of a card without the heading marker
pub fn card_title(card: &str) -> Option<&str> {
    card.lines()
        .next()
        .and_then(|line| line.strip_prefix(CARD_HEADING))
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_cards() {
        let deck = "### A\n- x\n- y\n\n### B\n- z\n";
        assert_eq!(split_cards(deck), vec!["### A\n- x\n- y", "### B\n- z"]);
    }

    #[test]
    fn test_split_keeps_preamble() {
        let deck = "Intro line\n### A\n- x";
        assert_eq!(split_cards(deck), vec!["Intro line", "### A\n- x"]);
    }

    #[test]
    fn test_split_ignores_inline_hashes() {
        let deck = "### A\n- use #### sparingly\n####Not a card";
        assert_eq!(split_cards(deck).len(), 1);
    }

    #[test]
    fn test_split_empty() {
        assert!(split_cards("").is_empty());
        assert!(split_cards("\n\n  \n").is_empty());
    }

    #[test]
    fn test_card_title() {
        assert_eq!(card_title("### Heaps \n- tree"), Some("Heaps"));
        assert_eq!(card_title("- loose bullet"), None);
    }
}
