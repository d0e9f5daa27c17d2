//! crates/learning_path_core/src/quiz.rs
//!
//! The answer sheet behind both quiz views.

use crate::domain::{QuizQuestion, QuizResult};

/// How a sheet treats repeated selections for the same question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerMode {
    /// Answers can change until the whole sheet is submitted.
    Revisable,
    /// The first selection is final and is graded immediately.
    LockOnFirst,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerFeedback {
    Correct,
    Wrong { correct_answer: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SheetError {
    #[error("question {0} does not exist")]
    UnknownQuestion(usize),
    #[error("'{option}' is not an option for question {index}")]
    UnknownOption { index: usize, option: String },
    #[error("question {0} has already been answered")]
    AlreadyAnswered(usize),
    #[error("{0} question(s) still unanswered")]
    Incomplete(usize),
    #[error("the quiz has no questions")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSheet {
    questions: Vec<QuizQuestion>,
    answers: Vec<Option<String>>,
    mode: AnswerMode,
}

impl QuizSheet {
    pub fn new(questions: Vec<QuizQuestion>, mode: AnswerMode) -> Self {
        let answers = vec![None; questions.len()];
        Self {
            questions,
            answers,
            mode,
        }
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn mode(&self) -> AnswerMode {
        self.mode
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(index).and_then(|a| a.as_deref())
    }

    /// Records `option` for question `index` and grades it.
    pub fn select(&mut self, index: usize, option: &str) -> Result<AnswerFeedback, SheetError> {
        let question = self
            .questions
            .get(index)
            .ok_or(SheetError::UnknownQuestion(index))?;
        if !question.has_option(option) {
            return Err(SheetError::UnknownOption {
                index,
                option: option.to_string(),
            });
        }
        let slot = &mut self.answers[index];
        if self.mode == AnswerMode::LockOnFirst && slot.is_some() {
            return Err(SheetError::AlreadyAnswered(index));
        }
        *slot = Some(option.to_string());
        Ok(grade(question, option))
    }

    /// Feedback for an answered question, `None` while unanswered.
    pub fn feedback(&self, index: usize) -> Option<AnswerFeedback> {
        let question = self.questions.get(index)?;
        self.answer(index).map(|answer| grade(question, answer))
    }

    pub fn unanswered(&self) -> usize {
        self.answers.iter().filter(|a| a.is_none()).count()
    }

    pub fn is_complete(&self) -> bool {
        !self.questions.is_empty() && self.unanswered() == 0
    }

    pub fn score(&self) -> u32 {
        self.questions
            .iter()
            .zip(&self.answers)
            .filter(|(q, a)| a.as_deref().is_some_and(|a| q.is_correct(a)))
            .count() as u32
    }

    pub fn result(&self) -> Result<QuizResult, SheetError> {
        if self.questions.is_empty() {
            return Err(SheetError::Empty);
        }
        let missing = self.unanswered();
        if missing > 0 {
            return Err(SheetError::Incomplete(missing));
        }
        QuizResult::new(self.score(), self.questions.len() as u32).map_err(|_| SheetError::Empty)
    }
}

fn grade(question: &QuizQuestion, answer: &str) -> AnswerFeedback {
    if question.is_correct(answer) {
        AnswerFeedback::Correct
    } else {
        AnswerFeedback::Wrong {
            correct_answer: question.correct_answer.clone(),
        }
    }
}
