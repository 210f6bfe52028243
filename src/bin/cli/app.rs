use std::cell::OnceCell;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use smartstudy_lib::config::StudyConfig;
use smartstudy_lib::generation::{OpenAiGenerator, TextGenerator};
use smartstudy_lib::navigation::NavigationContext;
use smartstudy_lib::storage::{locate_base_directory, locator, Course, CourseStore, StudyStorage};

/// Shared application state for CLI commands
pub struct App {
    pub storage: StudyStorage,
    pub config: StudyConfig,
}

impl App {
    /// Initialize from an explicit directory or the located base directory
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let base_path = match data_dir {
            Some(dir) => locator::locate_in(&[dir.clone()], &dir)
                .with_context(|| format!("Cannot use data directory {}", dir.display()))?,
            None => locate_base_directory().context("Failed to locate a storage directory")?,
        };

        let storage = StudyStorage::new(base_path);
        storage.init().context("Failed to initialize storage")?;
        let config = StudyConfig::load(storage.base_path()).context("Failed to load config.toml")?;

        Ok(Self { storage, config })
    }

    /// Generator configured from config.toml and the stored API key.
    /// The key is only required once something is actually generated.
    pub fn generator(&self) -> LazyGenerator<'_> {
        LazyGenerator { app: self, inner: OnceCell::new() }
    }

    pub fn list_courses(&self) -> Result<Vec<Course>> {
        self.storage.list_courses().context("Failed to list courses")
    }

    /// Find a course by id, or by name (case-insensitive prefix match)
    pub fn find_course(&self, name: &str) -> Result<Course> {
        let courses = self.list_courses()?;

        if let Ok(id) = Uuid::parse_str(name) {
            if let Some(course) = courses.iter().find(|c| c.id == id) {
                return Ok(course.clone());
            }
        }

        let names: Vec<String> = courses.iter().map(|c| c.name.clone()).collect();
        let index = match_name(&names, name, "course")?;
        Ok(courses[index].clone())
    }

    pub fn course_store(&self, course: &Course) -> CourseStore {
        self.storage.course(course.id)
    }

    /// Resolve course, content and topic names into a navigation context
    pub fn navigate(
        &self,
        course: &str,
        content: Option<&str>,
        topic: Option<&str>,
    ) -> Result<NavigationContext> {
        let mut ctx = NavigationContext::new();
        let course = self.find_course(course)?;
        let store = self.course_store(&course);
        ctx.select_course(course);

        if let Some(content) = content {
            let contents = store.list_contents().context("Failed to list contents")?;
            let content = contents[match_name(&contents, content, "content")?].clone();

            if let Some(topic) = topic {
                let topics = store.list_topics(&content).context("Failed to list topics")?;
                let topic = topics[match_name(&topics, topic, "topic")?].clone();
                ctx.select_content(content);
                ctx.select_topic(topic);
            } else {
                ctx.select_content(content);
            }
        }

        Ok(ctx)
    }
}

pub struct LazyGenerator<'a> {
    app: &'a App,
    inner: OnceCell<OpenAiGenerator>,
}

impl TextGenerator for LazyGenerator<'_> {
    fn generate(&self, prompt: &str) -> smartstudy_lib::Result<String> {
        let generator = match self.inner.get() {
            Some(generator) => generator,
            None => {
                let generator = OpenAiGenerator::from_storage(
                    &self.app.storage,
                    self.app.config.generator.clone(),
                )?;
                self.inner.get_or_init(|| generator)
            }
        };
        generator.generate(prompt)
    }
}

/// Index of `name` in `candidates`: exact match, then case-insensitive
/// exact, then unique case-insensitive prefix
fn match_name(candidates: &[String], name: &str, kind: &str) -> Result<usize> {
    if let Some(i) = candidates.iter().position(|c| c == name) {
        return Ok(i);
    }

    let name_lower = name.to_lowercase();
    if let Some(i) = candidates.iter().position(|c| c.to_lowercase() == name_lower) {
        return Ok(i);
    }

    let matches: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| c.to_lowercase().starts_with(&name_lower))
        .map(|(i, _)| i)
        .collect();

    match matches.len() {
        0 => bail!(
            "No {} matching '{}'. Available:\n{}",
            kind,
            name,
            candidates.iter().map(|c| format!("  - {}", c)).collect::<Vec<_>>().join("\n")
        ),
        1 => Ok(matches[0]),
        _ => bail!(
            "Ambiguous {} name '{}'. Matches:\n{}",
            kind,
            name,
            matches.iter().map(|&i| format!("  - {}", candidates[i])).collect::<Vec<_>>().join("\n")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_match_name() {
        let items = names(&["Sorting", "Searching", "Graphs", "graphs advanced"]);
        assert_eq!(match_name(&items, "Graphs", "content").unwrap(), 2);
        assert_eq!(match_name(&items, "sor", "content").unwrap(), 0);
        assert!(match_name(&items, "s", "content").is_err());
        assert!(match_name(&items, "trees", "content").is_err());
    }
}
