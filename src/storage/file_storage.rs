use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::keys::{storage_key, topic_key, topic_prefix, validate_name};
use super::models::Course;
use crate::error::{Result, StudyError};

const COURSES_FILE: &str = "courses.json";
const API_KEY_FILE: &str = "api_key.txt";
const REVISIONS_DIR: &str = "revisions";
const TMP_SUFFIX: &str = ".tmp";

/// Load an ordered list of names. Missing file means an empty list.
pub fn load_list(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| StudyError::corrupt(path, e))
}

/// Persist an ordered list of names as pretty JSON
pub fn save_list(path: &Path, items: &[String]) -> Result<()> {
    let json = serde_json::to_string_pretty(items).map_err(|e| StudyError::corrupt(path, e))?;
    write_atomic(path, json.as_bytes())
}

/// Whole-file write through a sibling temp file and a rename, so a crash
/// never leaves a truncated file behind.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = tmp_path_for(path);
    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

pub(crate) fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(TMP_SUFFIX);
    path.with_file_name(name)
}

/// Read a text file, treating a missing file as `None`
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Course registry and global files at the root of the storage directory
pub struct StudyStorage {
    base_path: PathBuf,
}

impl StudyStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Initialize storage directories
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.revisions_dir())?;
        Ok(())
    }

    fn revisions_dir(&self) -> PathBuf {
        self.base_path.join(REVISIONS_DIR)
    }

    fn courses_path(&self) -> PathBuf {
        self.base_path.join(COURSES_FILE)
    }

    fn course_dir(&self, course_id: Uuid) -> PathBuf {
        self.revisions_dir().join(course_id.to_string())
    }

    // ===== Course Operations =====

    pub fn list_courses(&self) -> Result<Vec<Course>> {
        let path = self.courses_path();
        match read_optional(&path)? {
            Some(content) => serde_json::from_str(&content).map_err(|e| StudyError::corrupt(&path, e)),
            None => Ok(Vec::new()),
        }
    }

    fn save_courses(&self, courses: &[Course]) -> Result<()> {
        let path = self.courses_path();
        let json = serde_json::to_string_pretty(courses).map_err(|e| StudyError::corrupt(&path, e))?;
        write_atomic(&path, json.as_bytes())
    }

    pub fn get_course(&self, course_id: Uuid) -> Result<Course> {
        self.list_courses()?
            .into_iter()
            .find(|c| c.id == course_id)
            .ok_or_else(|| StudyError::NotFound(format!("course {}", course_id)))
    }

    pub fn create_course(&self, name: &str) -> Result<Course> {
        let course = Course::new(validate_name(name)?);

        let mut courses = self.list_courses()?;
        courses.push(course.clone());
        self.save_courses(&courses)?;
        fs::create_dir_all(self.course_dir(course.id))?;

        log::info!("Created course {} ({})", course.name, course.id);
        Ok(course)
    }

    /// Delete a course and its whole revision subtree
    pub fn delete_course(&self, course_id: Uuid) -> Result<Course> {
        let mut courses = self.list_courses()?;
        let pos = courses
            .iter()
            .position(|c| c.id == course_id)
            .ok_or_else(|| StudyError::NotFound(format!("course {}", course_id)))?;
        let course = courses.remove(pos);
        self.save_courses(&courses)?;

        let course_dir = self.course_dir(course_id);
        if course_dir.exists() {
            fs::remove_dir_all(&course_dir)?;
        }

        log::info!("Deleted course {} ({})", course.name, course.id);
        Ok(course)
    }

    /// Note store for one course
    pub fn course(&self, course_id: Uuid) -> CourseStore {
        CourseStore::new(self.course_dir(course_id))
    }

    // ===== API key =====

    pub fn load_api_key(&self) -> Result<Option<String>> {
        Ok(read_optional(&self.base_path.join(API_KEY_FILE))?
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty()))
    }

    pub fn save_api_key(&self, key: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(StudyError::InvalidName(key.to_string()));
        }
        write_atomic(&self.base_path.join(API_KEY_FILE), key.as_bytes())
    }
}

/// Contents, topics, notes and derived artifacts of one course.
///
/// Directory structure:
/// ```text
/// revisions/{course-id}/
/// ├── content_list.json
/// ├── topics/{content}.json
/// ├── notes/{content}_{topic}.md
/// ├── flashcards/{content}.md
/// ├── flashcards/{content}_{topic}.md
/// ├── quiz/{content}.json
/// └── quiz/{content}_hash.txt
/// ```
pub struct CourseStore {
    root: PathBuf,
}

impl CourseStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn content_list_path(&self) -> PathBuf {
        self.root.join("content_list.json")
    }

    fn topics_dir(&self) -> PathBuf {
        self.root.join("topics")
    }

    fn notes_dir(&self) -> PathBuf {
        self.root.join("notes")
    }

    pub fn flashcards_dir(&self) -> PathBuf {
        self.root.join("flashcards")
    }

    fn quiz_dir(&self) -> PathBuf {
        self.root.join("quiz")
    }

    pub fn topic_list_path(&self, content: &str) -> PathBuf {
        self.topics_dir().join(format!("{}.json", storage_key(content)))
    }

    pub fn note_path(&self, content: &str, topic: &str) -> PathBuf {
        self.notes_dir().join(format!("{}.md", topic_key(content, topic)))
    }

    pub fn topic_deck_path(&self, content: &str, topic: &str) -> PathBuf {
        self.flashcards_dir().join(format!("{}.md", topic_key(content, topic)))
    }

    pub fn content_deck_path(&self, content: &str) -> PathBuf {
        self.flashcards_dir().join(format!("{}.md", storage_key(content)))
    }

    pub fn quiz_path(&self, content: &str) -> PathBuf {
        self.quiz_dir().join(format!("{}.json", storage_key(content)))
    }

    pub fn quiz_fingerprint_path(&self, content: &str) -> PathBuf {
        self.quiz_dir().join(format!("{}_hash.txt", storage_key(content)))
    }

    // ===== Content Operations =====

    pub fn list_contents(&self) -> Result<Vec<String>> {
        load_list(&self.content_list_path())
    }

    /// Append a content; returns false when it already exists
    pub fn add_content(&self, name: &str) -> Result<bool> {
        let name = validate_name(name)?;
        let mut contents = self.list_contents()?;
        if contents.contains(&name) {
            return Ok(false);
        }
        contents.push(name);
        save_list(&self.content_list_path(), &contents)?;
        Ok(true)
    }

    /// Remove a content and every artifact derived from it
    pub fn remove_content(&self, name: &str) -> Result<()> {
        let mut contents = self.list_contents()?;
        let before = contents.len();
        contents.retain(|c| c != name);
        if contents.len() == before {
            return Err(StudyError::NotFound(format!("content {:?}", name)));
        }
        save_list(&self.content_list_path(), &contents)?;

        for path in self.content_artifact_paths(name)? {
            fs::remove_file(&path)?;
            log::debug!("Removed {}", path.display());
        }
        log::info!("Deleted content {:?}", name);
        Ok(())
    }

    /// Every existing file that belongs to a content: its topic list, the
    /// notes, topic decks, aggregate deck, quiz deck and fingerprint, plus
    /// temp files an interrupted write left behind for any of them.
    pub fn content_artifact_paths(&self, content: &str) -> Result<Vec<PathBuf>> {
        let key = storage_key(content);
        let prefix = topic_prefix(content);
        let mut paths = Vec::new();

        let topic_list = self.topic_list_path(content);
        let topic_list_tmp = tmp_path_for(&topic_list);
        if topic_list_tmp.exists() {
            log::warn!("Found leftover temp file {}", topic_list_tmp.display());
            paths.push(topic_list_tmp);
        }
        if topic_list.exists() {
            paths.push(topic_list);
        }

        let exact_names = [format!("{}.md", key), format!("{}.json", key)];
        for dir in [self.notes_dir(), self.flashcards_dir(), self.quiz_dir()] {
            for path in list_files(&dir)? {
                let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                let name = file_name.strip_suffix(TMP_SUFFIX).unwrap_or(file_name);
                if !(name.starts_with(&prefix) || exact_names.iter().any(|n| n == name)) {
                    continue;
                }
                if name.len() != file_name.len() {
                    log::warn!("Found leftover temp file {}", path.display());
                }
                paths.push(path);
            }
        }

        paths.sort();
        Ok(paths)
    }

    // ===== Topic Operations =====

    pub fn list_topics(&self, content: &str) -> Result<Vec<String>> {
        load_list(&self.topic_list_path(content))
    }

    pub fn add_topic(&self, content: &str, topic: &str) -> Result<bool> {
        if !self.list_contents()?.iter().any(|c| c == content) {
            return Err(StudyError::NotFound(format!("content {:?}", content)));
        }
        let topic = validate_name(topic)?;
        let mut topics = self.list_topics(content)?;
        if topics.contains(&topic) {
            return Ok(false);
        }
        topics.push(topic);
        save_list(&self.topic_list_path(content), &topics)?;
        Ok(true)
    }

    /// Remove a topic together with its note and topic-level deck
    pub fn remove_topic(&self, content: &str, topic: &str) -> Result<()> {
        let mut topics = self.list_topics(content)?;
        let before = topics.len();
        topics.retain(|t| t != topic);
        if topics.len() == before {
            return Err(StudyError::NotFound(format!("topic {:?} in {:?}", topic, content)));
        }
        save_list(&self.topic_list_path(content), &topics)?;

        for path in [self.note_path(content, topic), self.topic_deck_path(content, topic)] {
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    // ===== Note Operations =====

    pub fn load_note(&self, content: &str, topic: &str) -> Result<String> {
        Ok(read_optional(&self.note_path(content, topic))?.unwrap_or_default())
    }

    pub fn save_note(&self, content: &str, topic: &str, text: &str) -> Result<()> {
        write_atomic(&self.note_path(content, topic), text.as_bytes())
    }
}

/// Regular files directly inside `dir`, temp files included
pub(crate) fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if !dir.exists() {
        return Ok(files);
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}
