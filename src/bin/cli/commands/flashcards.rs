use anyhow::{bail, Context, Result};

use smartstudy_lib::flashcards::{split_cards, FlashcardDecks};

use crate::app::App;
use crate::render::terminal::{render_card, render_deck};
use crate::OutputFormat;

pub struct FlashcardOptions<'a> {
    pub topic: Option<&'a str>,
    /// 1-based card number
    pub card: Option<usize>,
    pub rebuild: bool,
    pub regenerate: bool,
}

pub fn run(
    app: &App,
    course: &str,
    content: &str,
    options: &FlashcardOptions,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let ctx = app.navigate(course, Some(content), options.topic)?;
    let content = ctx.require_content()?;
    let store = app.course_store(ctx.require_course()?);
    let decks = FlashcardDecks::new(&store);
    let generator = app.generator();

    let deck = match ctx.topic() {
        Some(topic) if options.regenerate => decks
            .regenerate_topic_deck(&generator, content, topic)
            .with_context(|| format!("Failed to regenerate flashcards for '{}'", topic))?,
        Some(topic) => decks
            .ensure_topic_deck(&generator, content, topic)
            .with_context(|| format!("Failed to load flashcards for '{}'", topic))?,
        None if options.rebuild => decks
            .rebuild_content_deck(content)
            .with_context(|| format!("Failed to rebuild flashcards for '{}'", content))?,
        None => decks
            .get_content_deck(content)
            .with_context(|| format!("Failed to load flashcards for '{}'", content))?,
    };

    let cards = split_cards(&deck);
    let selected = match options.card {
        Some(n) if n == 0 || n > cards.len() => {
            bail!("Card {} out of range (deck has {} cards)", n, cards.len())
        }
        Some(n) => Some(&cards[n - 1]),
        None => None,
    };

    match format {
        OutputFormat::Json => {
            let output = match selected {
                Some(card) => serde_json::json!({ "content": content, "topic": ctx.topic(), "card": card }),
                None => serde_json::json!({ "content": content, "topic": ctx.topic(), "cards": cards }),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => match selected {
            Some(card) => println!("{}", render_card(card, use_color)),
            None if cards.is_empty() => println!("(no flashcards)"),
            None => println!("{}", render_deck(&deck, use_color)),
        },
    }
    Ok(())
}
