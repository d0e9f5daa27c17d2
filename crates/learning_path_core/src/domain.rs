//! crates/learning_path_core/src/domain.rs
//!
//! Defines the pure data structures of a learning path session.
//! These types are independent of any transport or rendering format.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt;

/// Badge awarded for a quiz answered without a single mistake.
pub const QUIZ_MASTER_BADGE: &str = "Quiz Master";

/// Flat XP weight per correct answer.
pub const XP_PER_CORRECT_ANSWER: u32 = 10;

/// The only resume format the upload endpoint accepts.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

//=========================================================================================
// Stages and Pages
//=========================================================================================

/// The five mutually exclusive phases of the main learning flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Upload,
    Chat,
    Bundle,
    Quiz,
    Done,
}

impl Stage {
    /// The single stage reachable from this one. `Done` is terminal.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Upload => Some(Stage::Chat),
            Stage::Chat => Some(Stage::Bundle),
            Stage::Bundle => Some(Stage::Quiz),
            Stage::Quiz => Some(Stage::Done),
            Stage::Done => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Upload => "upload",
            Stage::Chat => "chat",
            Stage::Bundle => "bundle",
            Stage::Quiz => "quiz",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level navigation, independent of the main flow's stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Dashboard,
}

//=========================================================================================
// Resume
//=========================================================================================

/// Opaque token returned by the upload endpoint. Every later request for the
/// session is correlated through it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResumeId(String);

impl ResumeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resume file picked by the user, ready to be uploaded.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl ResumeFile {
    pub fn pdf(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: PDF_CONTENT_TYPE.to_string(),
            data: data.into(),
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type.eq_ignore_ascii_case(PDF_CONTENT_TYPE)
    }
}

//=========================================================================================
// Recommendations
//=========================================================================================

/// One recommended learning unit. Immutable once received.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub course_title: String,
    pub module_title: String,
    pub description: String,
    pub subtopics: Vec<String>,
    pub rationale: String,
    pub price: Option<f64>,
    pub duration_hours: Option<f64>,
}

/// The ordered list of recommended modules for the current session.
/// Replaced wholesale on every recommendation fetch, never edited in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bundle {
    modules: Vec<Module>,
}

impl Bundle {
    pub fn new(modules: Vec<Module>) -> Self {
        Self { modules }
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Sum of the known module prices.
    pub fn total_price(&self) -> f64 {
        self.modules.iter().filter_map(|m| m.price).sum()
    }
}

/// The skill and module the learner will be quizzed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSelection {
    pub skill: String,
    pub module: String,
}

impl QuizSelection {
    pub fn new(skill: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            skill: skill.into(),
            module: module.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.skill.trim().is_empty() || self.module.trim().is_empty()
    }
}

//=========================================================================================
// Quiz results and gamification
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("a score of {score} out of {total} is not a valid quiz result")]
pub struct InvalidQuizResult {
    pub score: u32,
    pub total: u32,
}

/// Outcome of a completed quiz. Always satisfies `score <= total` and `total > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResult {
    score: u32,
    total: u32,
}

impl QuizResult {
    pub fn new(score: u32, total: u32) -> Result<Self, InvalidQuizResult> {
        if total == 0 || score > total {
            return Err(InvalidQuizResult { score, total });
        }
        Ok(Self { score, total })
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn is_perfect(&self) -> bool {
        self.score == self.total
    }
}

/// XP and badges accumulated over the session. Never decreases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    pub xp: u32,
    pub badges: BTreeSet<String>,
}

impl Progress {
    /// Applies a quiz result and returns the XP gained.
    pub fn award(&mut self, result: &QuizResult) -> u32 {
        let gained = result.score().saturating_mul(XP_PER_CORRECT_ANSWER);
        self.xp = self.xp.saturating_add(gained);
        if result.is_perfect() {
            self.badges.insert(QUIZ_MASTER_BADGE.to_string());
        }
        gained
    }

    pub fn has_badge(&self, badge: &str) -> bool {
        self.badges.contains(badge)
    }
}

/// A quiz the learner completed during this session, shown on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizHistoryEntry {
    pub skill: String,
    pub module: String,
    pub score: u32,
    pub total: u32,
    pub taken_at: DateTime<Utc>,
}

//=========================================================================================
// Budget
//=========================================================================================

/// The learner's budget in whole euros, bounded to `MIN..=MAX` and snapped to `STEP`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Budget(u32);

impl Budget {
    pub const MIN: u32 = 100;
    pub const MAX: u32 = 1000;
    pub const STEP: u32 = 10;
    pub const DEFAULT: u32 = 200;

    pub fn new(euros: u32) -> Self {
        let clamped = euros.clamp(Self::MIN, Self::MAX);
        let snapped = (clamped + Self::STEP / 2) / Self::STEP * Self::STEP;
        Self(snapped.clamp(Self::MIN, Self::MAX))
    }

    /// Converts an amount reported by the backend. `None` for NaN or infinity.
    pub fn from_amount(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        let euros = amount.round().clamp(0.0, f64::from(Self::MAX));
        Some(Self::new(euros as u32))
    }

    pub fn euros(&self) -> u32 {
        self.0
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

//=========================================================================================
// Chat
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

/// The chat transcript as the learner sees it. Only the newest user turn is
/// ever sent to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    pub fn push(&mut self, role: ChatRole, text: impl Into<String>) {
        self.turns.push(ChatTurn {
            role,
            text: text.into(),
        });
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn last_user_text(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == ChatRole::User)
            .map(|t| t.text.as_str())
    }
}

/// The assistant's structured reply to one chat message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssistantReply {
    pub target_role: Option<String>,
    pub goal_skills: Vec<String>,
    pub budget_eur: Option<f64>,
    pub recommended_modules: Vec<Module>,
    pub complete: bool,
    pub quiz_skill: Option<String>,
    pub quiz_module: Option<String>,
    /// An explicit bundle, which takes precedence over `recommended_modules`.
    pub bundle: Option<Vec<Module>>,
}

impl AssistantReply {
    /// The modules to show as the bundle.
    pub fn modules(&self) -> &[Module] {
        match &self.bundle {
            Some(bundle) if !bundle.is_empty() => bundle,
            _ => &self.recommended_modules,
        }
    }

    /// Skill and module to quiz on: explicit fields first, then the first goal
    /// skill and the first recommended module.
    pub fn quiz_selection(&self) -> Option<QuizSelection> {
        let skill = non_blank(self.quiz_skill.as_deref())
            .or_else(|| non_blank(self.goal_skills.first().map(String::as_str)))?;
        let module = non_blank(self.quiz_module.as_deref())
            .or_else(|| non_blank(self.modules().first().map(|m| m.module_title.as_str())))?;
        Some(QuizSelection::new(skill, module))
    }

    /// The textual summary rendered as the assistant's chat turn.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        if let Some(role) = non_blank(self.target_role.as_deref()) {
            lines.push(format!("Target role: {role}"));
        }
        if !self.goal_skills.is_empty() {
            lines.push(format!("Goal skills: {}", self.goal_skills.join(", ")));
        }
        if let Some(budget) = self.budget_eur {
            lines.push(format!("Budget: €{budget}"));
        }
        let modules = self.modules();
        if !modules.is_empty() {
            lines.push("Recommended modules:".to_string());
            for (i, module) in modules.iter().enumerate() {
                if module.course_title.is_empty() {
                    lines.push(format!("  {}. {}", i + 1, module.module_title));
                } else {
                    lines.push(format!(
                        "  {}. {} ({})",
                        i + 1,
                        module.module_title,
                        module.course_title
                    ));
                }
            }
        }
        if self.complete {
            lines.push("I have everything I need to build your learning bundle.".to_string());
        } else if lines.is_empty() {
            lines.push("Tell me more about the role you are aiming for.".to_string());
        }
        lines.join("\n")
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

//=========================================================================================
// Quiz items
//=========================================================================================

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl QuizQuestion {
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(title: &str) -> Module {
        Module {
            course_title: "Python Foundations".to_string(),
            module_title: title.to_string(),
            description: String::new(),
            subtopics: Vec::new(),
            rationale: String::new(),
            price: Some(120.0),
            duration_hours: Some(6.0),
        }
    }

    #[test]
    fn stages_form_a_single_chain() {
        let mut stage = Stage::Upload;
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            seen.push(next);
            stage = next;
        }
        assert_eq!(
            seen,
            vec![Stage::Upload, Stage::Chat, Stage::Bundle, Stage::Quiz, Stage::Done]
        );
    }

    #[test]
    fn quiz_result_rejects_impossible_scores() {
        assert!(QuizResult::new(0, 0).is_err());
        assert!(QuizResult::new(4, 3).is_err());
        assert!(QuizResult::new(0, 3).is_ok());
        assert!(QuizResult::new(3, 3).unwrap().is_perfect());
    }

    #[test]
    fn award_accumulates_and_badges_are_a_set() {
        let mut progress = Progress::default();
        assert_eq!(progress.award(&QuizResult::new(3, 3).unwrap()), 30);
        assert_eq!(progress.award(&QuizResult::new(2, 3).unwrap()), 20);
        progress.award(&QuizResult::new(1, 1).unwrap());
        assert_eq!(progress.xp, 60);
        assert_eq!(progress.badges.len(), 1);
        assert!(progress.has_badge(QUIZ_MASTER_BADGE));
    }

    #[test]
    fn huge_scores_saturate_instead_of_overflowing() {
        let mut progress = Progress::default();
        let huge = QuizResult::new(u32::MAX, u32::MAX).unwrap();
        assert_eq!(progress.award(&huge), u32::MAX);
        assert_eq!(progress.award(&QuizResult::new(u32::MAX / 10 + 1, u32::MAX).unwrap()), u32::MAX);
        assert_eq!(progress.xp, u32::MAX);
        assert!(progress.has_badge(QUIZ_MASTER_BADGE));
    }

    #[test]
    fn imperfect_score_earns_no_badge() {
        let mut progress = Progress::default();
        progress.award(&QuizResult::new(2, 3).unwrap());
        assert_eq!(progress.xp, 20);
        assert!(progress.badges.is_empty());
    }

    #[test]
    fn budget_is_clamped_and_snapped() {
        assert_eq!(Budget::default().euros(), 200);
        assert_eq!(Budget::new(0).euros(), 100);
        assert_eq!(Budget::new(5000).euros(), 1000);
        assert_eq!(Budget::new(304).euros(), 300);
        assert_eq!(Budget::new(305).euros(), 310);
        assert_eq!(Budget::from_amount(299.6).map(|b| b.euros()), Some(300));
        assert_eq!(Budget::from_amount(-20.0).map(|b| b.euros()), Some(100));
        assert_eq!(Budget::from_amount(f64::NAN), None);
    }

    #[test]
    fn explicit_quiz_fields_win_over_fallbacks() {
        let reply = AssistantReply {
            goal_skills: vec!["SQL".to_string()],
            recommended_modules: vec![module("Joins")],
            complete: true,
            quiz_skill: Some("Python".to_string()),
            quiz_module: Some("Intro to Python".to_string()),
            ..Default::default()
        };
        assert_eq!(
            reply.quiz_selection(),
            Some(QuizSelection::new("Python", "Intro to Python"))
        );
    }

    #[test]
    fn quiz_selection_falls_back_to_first_skill_and_module() {
        let reply = AssistantReply {
            goal_skills: vec!["SQL".to_string(), "Python".to_string()],
            recommended_modules: vec![module("Joins"), module("Indexes")],
            quiz_skill: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(reply.quiz_selection(), Some(QuizSelection::new("SQL", "Joins")));
        assert_eq!(AssistantReply::default().quiz_selection(), None);
    }

    #[test]
    fn explicit_bundle_takes_precedence() {
        let reply = AssistantReply {
            recommended_modules: vec![module("Joins")],
            bundle: Some(vec![module("Intro to Python")]),
            ..Default::default()
        };
        assert_eq!(reply.modules()[0].module_title, "Intro to Python");

        let empty_bundle = AssistantReply {
            recommended_modules: vec![module("Joins")],
            bundle: Some(Vec::new()),
            ..Default::default()
        };
        assert_eq!(empty_bundle.modules()[0].module_title, "Joins");
    }

    #[test]
    fn summary_lists_the_structured_reply() {
        let reply = AssistantReply {
            target_role: Some("Data Analyst".to_string()),
            goal_skills: vec!["Python".to_string(), "SQL".to_string()],
            budget_eur: Some(300.0),
            recommended_modules: vec![module("Intro to Python")],
            complete: true,
            ..Default::default()
        };
        let summary = reply.summary();
        assert!(summary.contains("Target role: Data Analyst"));
        assert!(summary.contains("Goal skills: Python, SQL"));
        assert!(summary.contains("Budget: €300"));
        assert!(summary.contains("1. Intro to Python (Python Foundations)"));
        assert!(summary.contains("everything I need"));
    }

    #[test]
    fn transcript_tracks_the_latest_user_turn() {
        let mut transcript = Transcript::default();
        assert_eq!(transcript.last_user_text(), None);
        transcript.push(ChatRole::User, "I want to learn Python");
        transcript.push(ChatRole::Assistant, "Noted.");
        assert_eq!(transcript.last_user_text(), Some("I want to learn Python"));
    }

    #[test]
    fn pdf_gate_ignores_case() {
        let mut file = ResumeFile::pdf("cv.pdf", vec![1u8, 2, 3]);
        assert!(file.is_pdf());
        file.content_type = "Application/PDF".to_string();
        assert!(file.is_pdf());
        file.content_type = "text/plain".to_string();
        assert!(!file.is_pdf());
    }
}
