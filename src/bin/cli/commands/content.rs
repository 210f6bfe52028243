use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run_list(app: &App, course: &str, format: &OutputFormat) -> Result<()> {
    let course = app.find_course(course)?;
    let contents = app
        .course_store(&course)
        .list_contents()
        .context("Failed to list contents")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&contents)?),
        OutputFormat::Plain => {
            println!("{}", course.name);
            if contents.is_empty() {
                println!("  (no contents)");
            }
            for content in &contents {
                println!("  {}", content);
            }
        }
    }
    Ok(())
}

pub fn run_add(app: &App, course: &str, name: &str, format: &OutputFormat) -> Result<()> {
    let course = app.find_course(course)?;
    let added = app
        .course_store(&course)
        .add_content(name)
        .with_context(|| format!("Failed to add content '{}'", name))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "name": name.trim(), "added": added })),
        OutputFormat::Plain if added => println!("Added content: {}", name.trim()),
        OutputFormat::Plain => println!("Content already exists: {}", name.trim()),
    }
    Ok(())
}

pub fn run_delete(app: &App, course: &str, content: &str, format: &OutputFormat) -> Result<()> {
    let ctx = app.navigate(course, Some(content), None)?;
    let content = ctx.require_content()?;
    let store = app.course_store(ctx.require_course()?);

    let removed = store.content_artifact_paths(content)?.len();
    store
        .remove_content(content)
        .with_context(|| format!("Failed to delete content '{}'", content))?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "name": content, "removedFiles": removed })
        ),
        OutputFormat::Plain => println!("Deleted content: {} ({} files)", content, removed),
    }
    Ok(())
}
