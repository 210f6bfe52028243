use anyhow::{bail, Context, Result};

use smartstudy_lib::storage::html_utils::note_to_plain_text;

use crate::app::App;
use crate::OutputFormat;

pub fn run_show(
    app: &App,
    course: &str,
    content: &str,
    topic: &str,
    raw: bool,
    format: &OutputFormat,
) -> Result<()> {
    let ctx = app.navigate(course, Some(content), Some(topic))?;
    let (content, topic) = (ctx.require_content()?, ctx.require_topic()?);
    let note = app
        .course_store(ctx.require_course()?)
        .load_note(content, topic)
        .context("Failed to load note")?;
    let text = if raw { note.clone() } else { note_to_plain_text(&note) };

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "content": content,
                "topic": topic,
                "html": note,
                "text": note_to_plain_text(&note),
            }))?
        ),
        OutputFormat::Plain if text.is_empty() => println!("(empty note)"),
        OutputFormat::Plain => println!("{}", text),
    }
    Ok(())
}

pub fn run_edit(
    app: &App,
    course: &str,
    content: &str,
    topic: &str,
    text: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let Some(text) = text else {
        bail!("No note text given. Use --text or pipe the note on stdin");
    };

    let ctx = app.navigate(course, Some(content), Some(topic))?;
    let (content, topic) = (ctx.require_content()?, ctx.require_topic()?);
    app.course_store(ctx.require_course()?)
        .save_note(content, topic, &text)
        .context("Failed to save note")?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "content": content, "topic": topic, "bytes": text.len() })
        ),
        OutputFormat::Plain => println!("Saved note: {} / {}", content, topic),
    }
    Ok(())
}
