pub mod domain;
pub mod flow;
pub mod notifications;
pub mod ports;
pub mod quiz;

pub use domain::{
    AssistantReply, Budget, Bundle, ChatRole, ChatTurn, Module, Page, Progress, QuizHistoryEntry,
    QuizQuestion, QuizResult, QuizSelection, ResumeFile, ResumeId, Stage, Transcript,
};
pub use flow::{
    AdvancePolicy, FlowController, FlowError, FlowOptions, FlowResult, PanelScore,
    ParseAdvancePolicyError, QuizPanel, Screen, StepOutcome, ViewModel,
};
pub use notifications::{Notice, NoticeLevel};
pub use ports::{LearningPathApi, PortError, PortResult};
pub use quiz::{AnswerFeedback, AnswerMode, QuizSheet};
