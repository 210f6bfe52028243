//! Current selection while moving between views (course → content → topic).
//!
//! Selecting a level clears every level below it, so a stale topic or quiz
//! can never outlive the content it belonged to.

use crate::error::{Result, StudyError};
use crate::quiz::QuizSession;
use crate::storage::Course;

#[derive(Debug, Default)]
pub struct NavigationContext {
    course: Option<Course>,
    content: Option<String>,
    topic: Option<String>,
    quiz: Option<QuizSession>,
}

impl NavigationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_course(&mut self, course: Course) {
        self.course = Some(course);
        self.content = None;
        self.topic = None;
        self.quiz = None;
    }

    pub fn select_content(&mut self, content: String) {
        self.content = Some(content);
        self.topic = None;
        self.quiz = None;
    }

    pub fn select_topic(&mut self, topic: String) {
        self.topic = Some(topic);
    }

    pub fn course(&self) -> Option<&Course> {
        self.course.as_ref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn require_course(&self) -> Result<&Course> {
        self.course
            .as_ref()
            .ok_or_else(|| StudyError::NotFound("no course selected".to_string()))
    }

    pub fn require_content(&self) -> Result<&str> {
        self.content
            .as_deref()
            .ok_or_else(|| StudyError::NotFound("no content selected".to_string()))
    }

    pub fn require_topic(&self) -> Result<&str> {
        self.topic
            .as_deref()
            .ok_or_else(|| StudyError::NotFound("no topic selected".to_string()))
    }

    /// Attach a quiz run to the selected content
    pub fn start_quiz(&mut self, session: QuizSession) -> Result<&mut QuizSession> {
        self.require_content()?;
        Ok(self.quiz.insert(session))
    }

    pub fn quiz(&self) -> Option<&QuizSession> {
        self.quiz.as_ref()
    }

    pub fn quiz_mut(&mut self) -> Option<&mut QuizSession> {
        self.quiz.as_mut()
    }

    pub fn leave_quiz(&mut self) -> Option<QuizSession> {
        self.quiz.take()
    }
}
