use anyhow::{Context, Result};

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run_list(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let courses = app.list_courses()?;

    match format {
        OutputFormat::Json => {
            let mut output = Vec::new();
            for course in &courses {
                let contents = app
                    .course_store(course)
                    .list_contents()
                    .with_context(|| format!("Failed to list contents of '{}'", course.name))?;
                output.push(serde_json::json!({
                    "id": course.id.to_string(),
                    "name": course.name,
                    "createdAt": course.created_at.to_rfc3339(),
                    "contents": contents,
                }));
            }
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if courses.is_empty() {
                println!("(no courses)");
                return Ok(());
            }
            for course in &courses {
                let count = app
                    .course_store(course)
                    .list_contents()
                    .with_context(|| format!("Failed to list contents of '{}'", course.name))?
                    .len();
                println!(
                    "{}  {} ({} contents)",
                    paint(&course.created_date(), Color::DIM, use_color),
                    paint(&course.name, Color::BOLD, use_color),
                    count
                );
            }
        }
    }

    Ok(())
}

pub fn run_add(app: &App, name: &str, format: &OutputFormat) -> Result<()> {
    let course = app
        .storage
        .create_course(name)
        .with_context(|| format!("Failed to create course '{}'", name))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&course)?),
        OutputFormat::Plain => println!("Created course: {} ({})", course.name, course.id),
    }
    Ok(())
}

pub fn run_delete(app: &App, course: &str, format: &OutputFormat) -> Result<()> {
    let course = app.find_course(course)?;
    let deleted = app
        .storage
        .delete_course(course.id)
        .with_context(|| format!("Failed to delete course '{}'", course.name))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&deleted)?),
        OutputFormat::Plain => println!("Deleted course: {}", deleted.name),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_corrupt_content_list_is_reported() {
        let temp = TempDir::new().unwrap();
        let app = App::new(Some(temp.path().to_path_buf())).unwrap();
        let course = app.storage.create_course("Math").unwrap();
        fs::write(app.course_store(&course).root().join("content_list.json"), "{oops").unwrap();

        assert!(run_list(&app, &OutputFormat::Plain, false).is_err());
        assert!(run_list(&app, &OutputFormat::Json, false).is_err());
    }
}
