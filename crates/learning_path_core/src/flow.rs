//! crates/learning_path_core/src/flow.rs
//!
//! The flow controller: owns the session state, mediates every stage
//! transition, and is the only component that talks to the backend port.
//!
//! Views receive a `Screen` snapshot and report user actions back through the
//! controller's methods. The state lock is never held across a network call,
//! so navigation stays responsive while a request is in flight.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{
    Budget, Bundle, ChatRole, InvalidQuizResult, Page, Progress, QuizHistoryEntry, QuizResult,
    QuizSelection, ResumeFile, ResumeId, Stage, Transcript,
};
use crate::notifications::{Notice, Notifications};
use crate::ports::LearningPathApi;
use crate::quiz::{AnswerFeedback, AnswerMode, QuizSheet, SheetError};

const CHAT_GREETING: &str =
    "Resume received! Tell me about the role you are aiming for and your budget.";

//=========================================================================================
// Options, Outcomes and Errors
//=========================================================================================

/// What happens when the assistant reports it has gathered enough information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvancePolicy {
    /// Fetch the bundle and leave the chat as soon as the reply arrives.
    Immediate,
    /// Wait for the learner to confirm before leaving the chat.
    Confirm,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a chat advance policy (expected 'immediate' or 'confirm')")]
pub struct ParseAdvancePolicyError(String);

impl FromStr for AdvancePolicy {
    type Err = ParseAdvancePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "immediate" => Ok(Self::Immediate),
            "confirm" => Ok(Self::Confirm),
            _ => Err(ParseAdvancePolicyError(s.to_string())),
        }
    }
}

impl fmt::Display for AdvancePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immediate => f.write_str("immediate"),
            Self::Confirm => f.write_str("confirm"),
        }
    }
}

/// Session-wide settings, resolved once when the controller is built.
#[derive(Debug, Clone)]
pub struct FlowOptions {
    pub advance: AdvancePolicy,
    /// The user id sent with quiz requests. There is no authentication.
    pub demo_user_id: String,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            advance: AdvancePolicy::Confirm,
            demo_user_id: "1".to_string(),
        }
    }
}

/// What an operation did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The main flow moved to the given stage.
    Advanced(Stage),
    /// The session changed without a stage transition.
    Updated,
    /// Nothing changed. Failures end here after posting a notice.
    Stayed,
    /// The response arrived after its view was left and was thrown away.
    Discarded,
}

/// Caller mistakes. Network failures are never reported through this type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("'{operation}' is not available in the {actual} stage")]
    WrongStage {
        operation: &'static str,
        actual: Stage,
    },
    #[error("'{0}' is only available on the dashboard")]
    NotOnDashboard(&'static str),
    #[error("a request is already in flight")]
    Busy,
    #[error("no resume has been uploaded yet")]
    MissingResume,
    #[error("only PDF resumes are accepted, got '{0}'")]
    NotPdf(String),
    #[error("the message is empty")]
    EmptyMessage,
    #[error("no quiz skill and module have been selected")]
    EmptySelection,
    #[error("the assistant has not finished gathering information")]
    NothingPending,
    #[error("no quiz has been loaded")]
    NoQuizLoaded,
    #[error("the quiz panel is not open")]
    PanelClosed,
    #[error(transparent)]
    InvalidResult(#[from] InvalidQuizResult),
    #[error(transparent)]
    Sheet(#[from] SheetError),
}

pub type FlowResult<T> = Result<T, FlowError>;

//=========================================================================================
// View Models
//=========================================================================================

/// The quiz drawer opened from the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizPanel {
    pub selection: QuizSelection,
    pub sheet: QuizSheet,
}

/// A finished panel quiz and the XP it earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelScore {
    pub result: QuizResult,
    pub xp_gained: u32,
}

/// The props for whichever view should render next.
#[derive(Debug, Clone)]
pub enum ViewModel {
    Upload {
        loading: bool,
    },
    Chat {
        transcript: Transcript,
        loading: bool,
        /// Set once the assistant is done and the learner may continue.
        ready: Option<QuizSelection>,
    },
    Bundle {
        bundle: Bundle,
        budget: Budget,
        selection: Option<QuizSelection>,
    },
    Quiz {
        selection: Option<QuizSelection>,
        sheet: Option<QuizSheet>,
        loading: bool,
    },
    Done {
        result: Option<QuizResult>,
        progress: Progress,
    },
    Dashboard {
        progress: Progress,
        history: Vec<QuizHistoryEntry>,
        panel: Option<QuizPanel>,
        loading: bool,
    },
}

/// Everything the front end needs to draw one frame.
#[derive(Debug, Clone)]
pub struct Screen {
    pub page: Page,
    pub stage: Stage,
    pub view: ViewModel,
    pub progress: Progress,
    pub notices: Vec<Notice>,
}

//=========================================================================================
// SessionState
//=========================================================================================

/// The state of one learner's journey. Created when the controller is built
/// and dropped with it; nothing is persisted.
struct SessionState {
    id: Uuid,
    stage: Stage,
    page: Page,
    resume_id: Option<ResumeId>,
    transcript: Transcript,
    pending: Option<QuizSelection>,
    bundle: Bundle,
    selection: Option<QuizSelection>,
    budget: Budget,
    progress: Progress,
    quiz: Option<QuizSheet>,
    last_result: Option<QuizResult>,
    history: Vec<QuizHistoryEntry>,
    panel: Option<QuizPanel>,
    notices: Notifications,
    home_loading: bool,
    dashboard_loading: bool,
    /// Cancelled whenever the learner leaves the corresponding page.
    home_token: CancellationToken,
    dashboard_token: CancellationToken,
}

impl SessionState {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            stage: Stage::Upload,
            page: Page::Home,
            resume_id: None,
            transcript: Transcript::default(),
            pending: None,
            bundle: Bundle::default(),
            selection: None,
            budget: Budget::default(),
            progress: Progress::default(),
            quiz: None,
            last_result: None,
            history: Vec::new(),
            panel: None,
            notices: Notifications::default(),
            home_loading: false,
            dashboard_loading: false,
            home_token: CancellationToken::new(),
            dashboard_token: CancellationToken::new(),
        }
    }

    fn require_stage(&self, operation: &'static str, expected: Stage) -> FlowResult<()> {
        if self.stage != expected {
            return Err(FlowError::WrongStage {
                operation,
                actual: self.stage,
            });
        }
        Ok(())
    }

    /// Marks a main-flow request as in flight and returns the token that
    /// decides whether its response may still be applied.
    fn begin_home_request(&mut self) -> FlowResult<CancellationToken> {
        if self.home_loading {
            return Err(FlowError::Busy);
        }
        self.home_loading = true;
        Ok(self.home_token.clone())
    }

    fn advance(&mut self, to: Stage) -> StepOutcome {
        debug_assert_eq!(self.stage.next(), Some(to));
        info!(session = %self.id, from = %self.stage, to = %to, "Stage transition");
        self.stage = to;
        StepOutcome::Advanced(to)
    }

    /// Applies a result to XP, badges and the history. The only place
    /// `progress` is ever mutated.
    fn record_result(&mut self, selection: Option<QuizSelection>, result: QuizResult) -> u32 {
        let gained = self.progress.award(&result);
        let selection = selection.unwrap_or_else(|| QuizSelection::new("", ""));
        info!(
            session = %self.id,
            module = %selection.module,
            score = result.score(),
            total = result.total(),
            gained,
            "Quiz completed"
        );
        self.history.push(QuizHistoryEntry {
            skill: selection.skill,
            module: selection.module,
            score: result.score(),
            total: result.total(),
            taken_at: Utc::now(),
        });
        gained
    }

    fn view(&self) -> ViewModel {
        if self.page == Page::Dashboard {
            return ViewModel::Dashboard {
                progress: self.progress.clone(),
                history: self.history.clone(),
                panel: self.panel.clone(),
                loading: self.dashboard_loading,
            };
        }
        match self.stage {
            Stage::Upload => ViewModel::Upload {
                loading: self.home_loading,
            },
            Stage::Chat => ViewModel::Chat {
                transcript: self.transcript.clone(),
                loading: self.home_loading,
                ready: self.pending.clone(),
            },
            Stage::Bundle => ViewModel::Bundle {
                bundle: self.bundle.clone(),
                budget: self.budget,
                selection: self.selection.clone(),
            },
            Stage::Quiz => ViewModel::Quiz {
                selection: self.selection.clone(),
                sheet: self.quiz.clone(),
                loading: self.home_loading,
            },
            Stage::Done => ViewModel::Done {
                result: self.last_result,
                progress: self.progress.clone(),
            },
        }
    }
}

//=========================================================================================
// FlowController
//=========================================================================================

/// A cheap, cloneable handle to one session.
#[derive(Clone)]
pub struct FlowController {
    api: Arc<dyn LearningPathApi>,
    options: Arc<FlowOptions>,
    state: Arc<Mutex<SessionState>>,
}

impl FlowController {
    pub fn new(api: Arc<dyn LearningPathApi>, options: FlowOptions) -> Self {
        let state = SessionState::new();
        info!(session = %state.id, advance = %options.advance, "Session created");
        Self {
            api,
            options: Arc::new(options),
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn options(&self) -> &FlowOptions {
        &self.options
    }

    // --- Snapshots ---

    pub async fn screen(&self) -> Screen {
        let state = self.state.lock().await;
        Screen {
            page: state.page,
            stage: state.stage,
            view: state.view(),
            progress: state.progress.clone(),
            notices: state.notices.notices().to_vec(),
        }
    }

    pub async fn stage(&self) -> Stage {
        self.state.lock().await.stage
    }

    pub async fn page(&self) -> Page {
        self.state.lock().await.page
    }

    /// Whether the page on screen is waiting for a response.
    pub async fn is_loading(&self) -> bool {
        let state = self.state.lock().await;
        match state.page {
            Page::Home => state.home_loading,
            Page::Dashboard => state.dashboard_loading,
        }
    }

    pub async fn resume_id(&self) -> Option<ResumeId> {
        self.state.lock().await.resume_id.clone()
    }

    pub async fn bundle(&self) -> Bundle {
        self.state.lock().await.bundle.clone()
    }

    pub async fn selection(&self) -> Option<QuizSelection> {
        self.state.lock().await.selection.clone()
    }

    pub async fn budget(&self) -> Budget {
        self.state.lock().await.budget
    }

    pub async fn progress(&self) -> Progress {
        self.state.lock().await.progress.clone()
    }

    pub async fn history(&self) -> Vec<QuizHistoryEntry> {
        self.state.lock().await.history.clone()
    }

    pub async fn notices(&self) -> Vec<Notice> {
        self.state.lock().await.notices.notices().to_vec()
    }

    // --- Upload stage ---

    /// Uploads the resume and moves to the chat on success.
    pub async fn submit_resume(&self, file: ResumeFile) -> FlowResult<StepOutcome> {
        let token = {
            let mut state = self.state.lock().await;
            state.require_stage("submit_resume", Stage::Upload)?;
            if !file.is_pdf() {
                return Err(FlowError::NotPdf(file.content_type));
            }
            state.begin_home_request()?
        };

        debug!(file = %file.file_name, bytes = file.data.len(), "Uploading resume");
        let response = self.api.upload_resume(&file).await;

        let mut state = self.state.lock().await;
        state.home_loading = false;
        if token.is_cancelled() || state.stage != Stage::Upload {
            debug!(session = %state.id, "Discarding upload response for a closed view");
            return Ok(StepOutcome::Discarded);
        }
        match response {
            Ok(resume_id) => {
                info!(session = %state.id, resume_id = %resume_id, "Resume uploaded");
                state.resume_id = Some(resume_id);
                state.transcript.push(ChatRole::System, CHAT_GREETING);
                Ok(state.advance(Stage::Chat))
            }
            Err(e) => {
                warn!(session = %state.id, error = %e, "Resume upload failed");
                state.notices.error(format!("Could not upload resume: {e}"));
                Ok(StepOutcome::Stayed)
            }
        }
    }

    // --- Chat stage ---

    /// Sends the newest chat turn. When the assistant reports it is done, the
    /// completion is either applied right away or parked for `confirm_pipeline`,
    /// depending on the configured `AdvancePolicy`.
    pub async fn send_chat_message(&self, text: &str) -> FlowResult<StepOutcome> {
        let text = text.trim();
        let (token, resume_id) = {
            let mut state = self.state.lock().await;
            state.require_stage("send_chat_message", Stage::Chat)?;
            if text.is_empty() {
                return Err(FlowError::EmptyMessage);
            }
            let resume_id = state.resume_id.clone().ok_or(FlowError::MissingResume)?;
            let token = state.begin_home_request()?;
            state.transcript.push(ChatRole::User, text);
            (token, resume_id)
        };

        debug!(resume_id = %resume_id, "Sending chat message");
        let response = self.api.recommend_bundle(&resume_id, text).await;

        let ready = {
            let mut state = self.state.lock().await;
            state.home_loading = false;
            if token.is_cancelled() || state.stage != Stage::Chat {
                debug!(session = %state.id, "Discarding chat reply for a closed view");
                return Ok(StepOutcome::Discarded);
            }
            let reply = match response {
                Ok(reply) => reply,
                Err(e) => {
                    warn!(session = %state.id, error = %e, "Chat request failed");
                    state.notices.error(format!("Could not reach the assistant: {e}"));
                    return Ok(StepOutcome::Stayed);
                }
            };

            state.transcript.push(ChatRole::Assistant, reply.summary());
            if let Some(budget) = reply.budget_eur.and_then(Budget::from_amount) {
                state.budget = budget;
            }
            if !reply.complete {
                return Ok(StepOutcome::Updated);
            }
            match reply.quiz_selection() {
                Some(selection) => {
                    info!(session = %state.id, skill = %selection.skill, module = %selection.module, "Assistant finished gathering information");
                    state.pending = Some(selection.clone());
                    selection
                }
                None => {
                    warn!(session = %state.id, "Completed reply named no skill or module");
                    state
                        .notices
                        .error("The assistant finished but did not name a module to quiz on. Please add more detail.");
                    return Ok(StepOutcome::Updated);
                }
            }
        };

        match self.options.advance {
            AdvancePolicy::Immediate => self.complete_pipeline(&ready.skill, &ready.module).await,
            AdvancePolicy::Confirm => Ok(StepOutcome::Updated),
        }
    }

    /// Continues with the skill and module the assistant settled on.
    pub async fn confirm_pipeline(&self) -> FlowResult<StepOutcome> {
        let pending = {
            let state = self.state.lock().await;
            state.require_stage("confirm_pipeline", Stage::Chat)?;
            state.pending.clone().ok_or(FlowError::NothingPending)?
        };
        self.complete_pipeline(&pending.skill, &pending.module).await
    }

    /// Fetches the recommended bundle for the uploaded resume and moves to the
    /// bundle stage.
    pub async fn complete_pipeline(&self, skill: &str, module: &str) -> FlowResult<StepOutcome> {
        let selection = QuizSelection::new(skill.trim(), module.trim());
        let (token, resume_id, transcript) = {
            let mut state = self.state.lock().await;
            state.require_stage("complete_pipeline", Stage::Chat)?;
            if selection.is_empty() {
                return Err(FlowError::EmptySelection);
            }
            let resume_id = state.resume_id.clone().ok_or(FlowError::MissingResume)?;
            let transcript = state.transcript.last_user_text().unwrap_or_default().to_string();
            (state.begin_home_request()?, resume_id, transcript)
        };

        debug!(resume_id = %resume_id, "Fetching recommended bundle");
        let response = self.api.recommend_bundle(&resume_id, &transcript).await;

        let mut state = self.state.lock().await;
        state.home_loading = false;
        if token.is_cancelled() || state.stage != Stage::Chat {
            debug!(session = %state.id, "Discarding bundle for a closed view");
            return Ok(StepOutcome::Discarded);
        }
        match response {
            Ok(reply) => {
                state.bundle = Bundle::new(reply.modules().to_vec());
                if let Some(budget) = reply.budget_eur.and_then(Budget::from_amount) {
                    state.budget = budget;
                }
                info!(session = %state.id, modules = state.bundle.len(), "Bundle received");
                state.selection = Some(selection);
                state.pending = None;
                Ok(state.advance(Stage::Bundle))
            }
            Err(e) => {
                warn!(session = %state.id, error = %e, "Bundle request failed");
                state
                    .notices
                    .error(format!("Could not load personalized bundle: {e}"));
                Ok(StepOutcome::Stayed)
            }
        }
    }

    // --- Bundle stage ---

    pub async fn set_budget(&self, euros: u32) -> Budget {
        let mut state = self.state.lock().await;
        state.budget = Budget::new(euros);
        state.budget
    }

    /// Opens the quiz for the selected module. Calling it again while the quiz
    /// is open changes nothing.
    pub async fn start_quiz(&self) -> FlowResult<StepOutcome> {
        let mut state = self.state.lock().await;
        let stage = state.stage;
        match stage {
            Stage::Quiz => Ok(StepOutcome::Stayed),
            Stage::Bundle => {
                if state.selection.as_ref().map_or(true, QuizSelection::is_empty) {
                    return Err(FlowError::EmptySelection);
                }
                state.quiz = None;
                Ok(state.advance(Stage::Quiz))
            }
            actual => Err(FlowError::WrongStage {
                operation: "start_quiz",
                actual,
            }),
        }
    }

    // --- Quiz stage ---

    /// Fetches the questions for the selected module.
    pub async fn load_quiz(&self) -> FlowResult<StepOutcome> {
        let (token, selection) = {
            let mut state = self.state.lock().await;
            state.require_stage("load_quiz", Stage::Quiz)?;
            let selection = state.selection.clone().ok_or(FlowError::EmptySelection)?;
            (state.begin_home_request()?, selection)
        };

        let response = self
            .api
            .generate_quiz(&self.options.demo_user_id, &selection.skill, &selection.module)
            .await;

        let mut state = self.state.lock().await;
        state.home_loading = false;
        if token.is_cancelled() || state.stage != Stage::Quiz {
            debug!(session = %state.id, "Discarding quiz for a closed view");
            return Ok(StepOutcome::Discarded);
        }
        match response {
            Ok(questions) if questions.is_empty() => {
                warn!(session = %state.id, module = %selection.module, "Quiz came back empty");
                state
                    .notices
                    .error(format!("No quiz is available for {}.", selection.module));
                Ok(StepOutcome::Stayed)
            }
            Ok(questions) => {
                debug!(session = %state.id, count = questions.len(), "Quiz loaded");
                state.quiz = Some(QuizSheet::new(questions, AnswerMode::Revisable));
                Ok(StepOutcome::Updated)
            }
            Err(e) => {
                warn!(session = %state.id, error = %e, "Quiz request failed");
                state.notices.error(format!("Could not load quiz: {e}"));
                Ok(StepOutcome::Stayed)
            }
        }
    }

    pub async fn answer_quiz(&self, index: usize, option: &str) -> FlowResult<()> {
        let mut state = self.state.lock().await;
        state.require_stage("answer_quiz", Stage::Quiz)?;
        let sheet = state.quiz.as_mut().ok_or(FlowError::NoQuizLoaded)?;
        sheet.select(index, option)?;
        Ok(())
    }

    /// Grades the loaded quiz and completes it.
    pub async fn submit_quiz(&self) -> FlowResult<StepOutcome> {
        let result = {
            let state = self.state.lock().await;
            state.require_stage("submit_quiz", Stage::Quiz)?;
            state.quiz.as_ref().ok_or(FlowError::NoQuizLoaded)?.result()?
        };
        self.complete_quiz(result.score(), result.total()).await
    }

    /// Awards `score * 10` XP, adds the "Quiz Master" badge for a perfect
    /// score, and finishes the flow.
    pub async fn complete_quiz(&self, score: u32, total: u32) -> FlowResult<StepOutcome> {
        let mut state = self.state.lock().await;
        state.require_stage("complete_quiz", Stage::Quiz)?;
        let result = QuizResult::new(score, total)?;
        let selection = state.selection.clone();
        state.record_result(selection, result);
        state.last_result = Some(result);
        state.quiz = None;
        Ok(state.advance(Stage::Done))
    }

    // --- Navigation ---

    /// Shows the main flow. Leaving the dashboard closes its quiz panel and
    /// discards any quiz request still in flight.
    pub async fn go_home(&self) -> Page {
        let mut state = self.state.lock().await;
        if state.page == Page::Dashboard {
            state.dashboard_token.cancel();
            state.dashboard_token = CancellationToken::new();
            state.panel = None;
            state.page = Page::Home;
            debug!(session = %state.id, "Navigated home");
        }
        state.page
    }

    /// Shows the dashboard without touching the main flow's stage. Any main
    /// flow response still in flight is discarded.
    pub async fn go_dashboard(&self) -> Page {
        let mut state = self.state.lock().await;
        if state.page == Page::Home {
            state.home_token.cancel();
            state.home_token = CancellationToken::new();
            state.page = Page::Dashboard;
            debug!(session = %state.id, "Navigated to dashboard");
        }
        state.page
    }

    // --- Dashboard ---

    /// Fetches a quiz for `module` and opens the quiz panel.
    pub async fn request_quiz(&self, module: &str) -> FlowResult<StepOutcome> {
        let module = module.trim();
        let (token, selection) = {
            let mut state = self.state.lock().await;
            if state.page != Page::Dashboard {
                return Err(FlowError::NotOnDashboard("request_quiz"));
            }
            if module.is_empty() {
                return Err(FlowError::EmptySelection);
            }
            if state.dashboard_loading {
                return Err(FlowError::Busy);
            }
            let skill = state
                .history
                .iter()
                .rev()
                .find(|entry| entry.module == module && !entry.skill.is_empty())
                .map(|entry| entry.skill.clone())
                .or_else(|| state.selection.as_ref().map(|s| s.skill.clone()))
                .unwrap_or_else(|| module.to_string());
            state.dashboard_loading = true;
            (state.dashboard_token.clone(), QuizSelection::new(skill, module))
        };

        let response = self
            .api
            .generate_quiz(&self.options.demo_user_id, &selection.skill, &selection.module)
            .await;

        let mut state = self.state.lock().await;
        state.dashboard_loading = false;
        if token.is_cancelled() {
            debug!(session = %state.id, "Discarding dashboard quiz for a closed view");
            return Ok(StepOutcome::Discarded);
        }
        match response {
            Ok(questions) if questions.is_empty() => {
                warn!(session = %state.id, module = %selection.module, "Dashboard quiz came back empty");
                state
                    .notices
                    .error(format!("No quiz is available for {}.", selection.module));
                Ok(StepOutcome::Stayed)
            }
            Ok(questions) => {
                state.panel = Some(QuizPanel {
                    selection,
                    sheet: QuizSheet::new(questions, AnswerMode::LockOnFirst),
                });
                Ok(StepOutcome::Updated)
            }
            Err(e) => {
                warn!(session = %state.id, error = %e, "Failed to fetch quiz data");
                state
                    .notices
                    .error(format!("Could not load quiz for {}: {e}", selection.module));
                Ok(StepOutcome::Stayed)
            }
        }
    }

    /// Answers one panel question. The first answer is final.
    pub async fn answer_panel(&self, index: usize, option: &str) -> FlowResult<AnswerFeedback> {
        let mut state = self.state.lock().await;
        let panel = state.panel.as_mut().ok_or(FlowError::PanelClosed)?;
        Ok(panel.sheet.select(index, option)?)
    }

    /// Closes the quiz panel. A fully answered panel counts as a completed
    /// quiz for XP, badges and history; the main flow's stage is untouched.
    pub async fn close_quiz_panel(&self) -> Option<PanelScore> {
        let mut state = self.state.lock().await;
        let panel = state.panel.take()?;
        let result = panel.sheet.result().ok()?;
        let xp_gained = state.record_result(Some(panel.selection), result);
        Some(PanelScore { result, xp_gained })
    }

    // --- Notifications ---

    pub async fn dismiss_notice(&self, id: u64) -> bool {
        self.state.lock().await.notices.dismiss(id)
    }
}
