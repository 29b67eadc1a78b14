//! Course-state types the cache and fingerprinting layers operate on.
//!
//! These are read-only inputs from the caller's point of view; the core
//! never mutates course state, it only derives fingerprints and cached
//! artifacts from it.

use serde::{Deserialize, Serialize};

/// Kind of learning activity a tool selection can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    Lesson,
    Quiz,
    Practice,
    Flashcard,
    Review,
    Summary,
}

impl ToolType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lesson => "lesson",
            Self::Quiz => "quiz",
            Self::Practice => "practice",
            Self::Flashcard => "flashcard",
            Self::Review => "review",
            Self::Summary => "summary",
        }
    }
}

/// One prior interaction in a learner's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub kind: ToolType,
    pub topic: String,
}

/// Per-topic memory the learner has accumulated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicMemory {
    pub confidence: Option<f64>,
}

/// Compacted long-term memory for a course.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Memory {
    pub summary: Option<String>,
    pub weaknesses: Vec<String>,
    pub topics: std::collections::HashMap<String, TopicMemory>,
}

/// The learner's evolving state within one course. Read-only input to the core.
#[derive(Debug, Clone)]
pub struct CourseState {
    pub course_id: String,
    pub user_id: String,
    pub progress: u32,
    pub steps: Vec<Step>,
    pub memory: Option<Memory>,
}

impl CourseState {
    #[must_use]
    pub fn new(course_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            user_id: user_id.into(),
            progress: 0,
            steps: Vec::new(),
            memory: None,
        }
    }
}

/// Result of deciding what the learner should do next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSelection {
    pub tool: String,
    pub topic: String,
    pub reason: String,
}

/// A pre-generated step, cached per `(courseID, userID)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedStep {
    pub tool: String,
    pub topic: String,
    pub content: String,
}

/// A pre-generated content block, cached per `(courseID, lessonID, blockID)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub content: String,
}
