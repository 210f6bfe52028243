use anyhow::{Context, Result};

use smartstudy_lib::storage::html_utils::is_blank_note;

use crate::app::App;
use crate::OutputFormat;

pub fn run_list(app: &App, course: &str, content: &str, format: &OutputFormat) -> Result<()> {
    let ctx = app.navigate(course, Some(content), None)?;
    let content = ctx.require_content()?;
    let store = app.course_store(ctx.require_course()?);
    let topics = store.list_topics(content).context("Failed to list topics")?;

    match format {
        OutputFormat::Json => {
            let mut output = Vec::new();
            for topic in &topics {
                output.push(serde_json::json!({
                    "name": topic,
                    "hasNote": !is_blank_note(&store.load_note(content, topic)?),
                    "hasFlashcards": store.topic_deck_path(content, topic).exists(),
                }));
            }
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", content);
            if topics.is_empty() {
                println!("  (no topics)");
            }
            for topic in &topics {
                let marker = if store.topic_deck_path(content, topic).exists() { " [cards]" } else { "" };
                println!("  {}{}", topic, marker);
            }
        }
    }
    Ok(())
}

pub fn run_add(
    app: &App,
    course: &str,
    content: &str,
    name: &str,
    format: &OutputFormat,
) -> Result<()> {
    let ctx = app.navigate(course, Some(content), None)?;
    let content = ctx.require_content()?;
    let added = app
        .course_store(ctx.require_course()?)
        .add_topic(content, name)
        .with_context(|| format!("Failed to add topic '{}'", name))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "name": name.trim(), "added": added })),
        OutputFormat::Plain if added => println!("Added topic: {}", name.trim()),
        OutputFormat::Plain => println!("Topic already exists: {}", name.trim()),
    }
    Ok(())
}

pub fn run_delete(
    app: &App,
    course: &str,
    content: &str,
    topic: &str,
    format: &OutputFormat,
) -> Result<()> {
    let ctx = app.navigate(course, Some(content), Some(topic))?;
    let (content, topic) = (ctx.require_content()?, ctx.require_topic()?);
    app.course_store(ctx.require_course()?)
        .remove_topic(content, topic)
        .with_context(|| format!("Failed to delete topic '{}'", topic))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "name": topic, "deleted": true })),
        OutputFormat::Plain => println!("Deleted topic: {}", topic),
    }
    Ok(())
}
