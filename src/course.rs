use serde::Serialize;

use crate::error::{StudioError, StudioResult};
use crate::ids::ModuleId;
use crate::models::{Course, CourseCategory, Difficulty, Module, ModuleStatus, Quiz};

pub const HOURS_PER_MODULE: usize = 2;
pub const DEFAULT_QUIZ_TITLE: &str = "Course Quiz";

/// Checks the course form at submit time; on success the values replace the course.
pub fn validate_course(course: &Course) -> StudioResult<Course> {
    if course.title.trim().is_empty() {
        return Err(StudioError::MissingField("course title"));
    }
    if course.description.trim().is_empty() {
        return Err(StudioError::MissingField("course description"));
    }
    Ok(course.clone())
}

pub fn check_publishable(course: &Course, modules: &[Module]) -> StudioResult<()> {
    if course.title.trim().is_empty() || modules.is_empty() {
        return Err(StudioError::NotPublishable);
    }
    Ok(())
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ModuleOutline {
    pub position: usize,
    pub id: ModuleId,
    pub title: String,
    pub description: String,
    pub status: ModuleStatus,
    pub items: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct QuizSummary {
    pub title: String,
    pub time_limit: u32,
    pub passing_score: u32,
    pub questions: usize,
}

/// Read-only aggregate shown on the preview tab.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Preview {
    pub title: String,
    pub description: String,
    pub category: Option<CourseCategory>,
    pub difficulty: Difficulty,
    pub module_count: usize,
    pub question_count: usize,
    pub estimated_hours: usize,
    pub passing_score: u32,
    pub outline: Vec<ModuleOutline>,
    pub quiz: Option<QuizSummary>,
}

pub fn preview(course: &Course, modules: &[Module], quiz: &Quiz) -> Preview {
    let outline = modules
        .iter()
        .enumerate()
        .map(|(i, m)| ModuleOutline {
            position: i + 1,
            id: m.id,
            title: m.title.clone(),
            description: m.description.clone(),
            status: m.status,
            items: m.content.len(),
        })
        .collect();
    let quiz_summary = (!quiz.questions.is_empty()).then(|| QuizSummary {
        title: if quiz.title.trim().is_empty() {
            DEFAULT_QUIZ_TITLE.to_string()
        } else {
            quiz.title.clone()
        },
        time_limit: quiz.time_limit,
        passing_score: quiz.passing_score,
        questions: quiz.questions.len(),
    });
    Preview {
        title: course.title.clone(),
        description: course.description.clone(),
        category: course.category,
        difficulty: course.difficulty,
        module_count: modules.len(),
        question_count: quiz.questions.len(),
        estimated_hours: modules.len() * HOURS_PER_MODULE,
        passing_score: quiz.passing_score,
        outline,
        quiz: quiz_summary,
    }
}
