use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::ids::{ContentId, ModuleId, QuestionId, VideoId};

// --- course ---

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CourseCategory {
    Programming,
    Design,
    Business,
    Marketing,
    Science,
}

#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Course {
    pub title: String,
    pub description: String,
    pub category: Option<CourseCategory>,
    #[serde(default)]
    pub difficulty: Difficulty,
}

// --- modules ---

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModuleStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Lesson,
    Video,
    Assignment,
    Resource,
    Quiz,
    Discussion,
}

impl ContentType {
    pub fn label(self) -> &'static str {
        match self {
            ContentType::Lesson => "Lesson",
            ContentType::Video => "Video",
            ContentType::Assignment => "Assignment",
            ContentType::Resource => "Resource",
            ContentType::Quiz => "Quiz",
            ContentType::Discussion => "Discussion",
        }
    }
}

#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContentItem {
    pub id: ContentId,
    #[serde(rename = "type")]
    pub kind: ContentType,
    pub title: String,
    pub description: String,
    pub content: String,
    pub duration: Option<String>,
    pub file: Option<String>,
    pub completed: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Module {
    pub id: ModuleId,
    pub title: String,
    pub description: String,
    pub content: Vec<ContentItem>,
    pub status: ModuleStatus,
}

// --- quiz ---

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestionType {
    #[default]
    #[serde(rename = "multiple")]
    Multiple,
    #[serde(rename = "true-false")]
    TrueFalse,
    #[serde(rename = "short")]
    Short,
}

/// Answer shape carried by a stored question.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Answer {
    #[serde(rename = "multiple")]
    Multiple { options: Vec<String>, correct: usize },
    #[serde(rename = "true-false")]
    TrueFalse { options: Vec<String>, correct: usize },
    #[serde(rename = "short")]
    Short,
}

impl Answer {
    pub fn question_type(&self) -> QuestionType {
        match self {
            Answer::Multiple { .. } => QuestionType::Multiple,
            Answer::TrueFalse { .. } => QuestionType::TrueFalse,
            Answer::Short => QuestionType::Short,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QuizQuestion {
    pub id: QuestionId,
    pub question: String,
    #[serde(flatten)]
    pub answer: Answer,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Quiz {
    pub title: String,
    pub time_limit: u32,
    pub passing_score: u32,
    pub questions: Vec<QuizQuestion>,
}

impl Default for Quiz {
    fn default() -> Self {
        Self {
            title: String::new(),
            time_limit: 30,
            passing_score: 70,
            questions: Vec::new(),
        }
    }
}

// --- library ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VideoRecord {
    pub id: VideoId,
    pub title: String,
    pub url: String,
    pub thumbnail: String,
    pub duration: String,
    pub upload_date: NaiveDate,
    pub instructor: String,
    pub category: String,
}

// --- requests ---

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ModuleDraftReq {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdateModuleReq {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MoveModuleReq {
    pub direction: Direction,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StatusReq {
    pub status: ModuleStatus,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AddContentReq {
    #[serde(rename = "type")]
    pub kind: ContentType,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TemplateReq {
    pub template: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct QuestionDraftReq {
    pub question: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<QuestionType>,
    pub options: Option<Vec<String>>,
    pub correct: Option<usize>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct QuizSettingsReq {
    pub title: Option<String>,
    pub time_limit: Option<u32>,
    pub passing_score: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LibraryQuery {
    #[serde(default)]
    pub search: String,
    pub category: Option<String>,
    pub sort: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EditVideoReq {
    pub title: String,
    pub instructor: String,
    pub category: String,
    #[serde(default)]
    pub thumbnail: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}
