use serde::Serialize;

use crate::error::{StudioError, StudioResult};
use crate::ids::{IdGen, QuestionId};
use crate::models::{Answer, QuestionDraftReq, QuestionType, Quiz, QuizQuestion, QuizSettingsReq};

pub const DEFAULT_OPTION_COUNT: usize = 4;
pub const TIME_LIMIT_RANGE: (u32, u32) = (1, 180);
pub const PASSING_SCORE_RANGE: (u32, u32) = (0, 100);

/// The question being composed in the builder form.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct QuestionDraft {
    pub question: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub options: Vec<String>,
    pub correct: usize,
}

impl Default for QuestionDraft {
    fn default() -> Self {
        Self {
            question: String::new(),
            kind: QuestionType::Multiple,
            options: vec![String::new(); DEFAULT_OPTION_COUNT],
            correct: 0,
        }
    }
}

fn true_false_options() -> Vec<String> {
    vec!["True".to_string(), "False".to_string()]
}

impl QuestionDraft {
    fn set_kind(&mut self, kind: QuestionType) {
        if kind == self.kind {
            return;
        }
        self.kind = kind;
        self.correct = 0;
        self.options = match kind {
            QuestionType::Multiple => vec![String::new(); DEFAULT_OPTION_COUNT],
            QuestionType::TrueFalse => true_false_options(),
            QuestionType::Short => Vec::new(),
        };
    }

    fn to_answer(&self) -> StudioResult<Answer> {
        let check_correct = |options: &[String]| {
            if self.correct >= options.len() {
                return Err(StudioError::OutOfRange {
                    field: "correct option",
                    min: 0,
                    max: options.len().saturating_sub(1) as u32,
                });
            }
            Ok(())
        };
        match self.kind {
            QuestionType::Multiple => {
                if self.options.is_empty() || self.options.iter().any(|o| o.trim().is_empty()) {
                    return Err(StudioError::EmptyOption);
                }
                check_correct(&self.options)?;
                Ok(Answer::Multiple { options: self.options.clone(), correct: self.correct })
            }
            QuestionType::TrueFalse => {
                let options = true_false_options();
                check_correct(&options)?;
                Ok(Answer::TrueFalse { options, correct: self.correct })
            }
            QuestionType::Short => Ok(Answer::Short),
        }
    }
}

#[derive(Debug, Default)]
pub struct QuizBuilder {
    quiz: Quiz,
    draft: QuestionDraft,
}

impl QuizBuilder {
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn draft(&self) -> &QuestionDraft {
        &self.draft
    }

    pub fn edit_draft(&mut self, req: QuestionDraftReq) -> &QuestionDraft {
        if let Some(kind) = req.kind {
            self.draft.set_kind(kind);
        }
        if let Some(question) = req.question {
            self.draft.question = question;
        }
        // true/false options are fixed
        if let Some(options) = req.options {
            if self.draft.kind == QuestionType::Multiple {
                self.draft.options = options;
            }
        }
        if let Some(correct) = req.correct {
            self.draft.correct = correct;
        }
        &self.draft
    }

    pub fn add_question(&mut self, ids: &mut IdGen) -> StudioResult<&QuizQuestion> {
        if self.draft.question.trim().is_empty() {
            return Err(StudioError::MissingField("question text"));
        }
        let answer = self.draft.to_answer()?;
        let question = QuizQuestion {
            id: ids.next(),
            question: std::mem::take(&mut self.draft).question,
            answer,
        };
        tracing::info!(question_id = %question.id, kind = ?question.answer.question_type(), "question added");
        self.quiz.questions.push(question);
        Ok(&self.quiz.questions[self.quiz.questions.len() - 1])
    }

    pub fn remove_question(&mut self, id: QuestionId) -> StudioResult<QuizQuestion> {
        let idx = self
            .quiz
            .questions
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| StudioError::not_found("question", id))?;
        Ok(self.quiz.questions.remove(idx))
    }

    /// Applies all settings or none of them.
    pub fn update_settings(&mut self, req: QuizSettingsReq) -> StudioResult<&Quiz> {
        let in_range = |field, v: u32, (min, max): (u32, u32)| {
            if v < min || v > max {
                Err(StudioError::OutOfRange { field, min, max })
            } else {
                Ok(v)
            }
        };
        let time_limit = req
            .time_limit
            .map(|v| in_range("time limit", v, TIME_LIMIT_RANGE))
            .transpose()?;
        let passing_score = req
            .passing_score
            .map(|v| in_range("passing score", v, PASSING_SCORE_RANGE))
            .transpose()?;

        if let Some(title) = req.title {
            self.quiz.title = title;
        }
        if let Some(v) = time_limit {
            self.quiz.time_limit = v;
        }
        if let Some(v) = passing_score {
            self.quiz.passing_score = v;
        }
        Ok(&self.quiz)
    }
}
