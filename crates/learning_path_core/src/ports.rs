//! crates/learning_path_core/src/ports.rs
//!
//! Defines the service contract between the flow controller and the learning
//! path backend. The controller is the only caller of this port, so every
//! endpoint call in the application goes through one place.

use async_trait::async_trait;

use crate::domain::{AssistantReply, QuizQuestion, ResumeFile, ResumeId};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// Errors reported by a backend adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Transport(String),
    /// Any non-2xx status, regardless of the body.
    #[error("Server responded with status {status}: {message}")]
    Status { status: u16, message: String },
    /// A 2xx response whose body is missing an expected field.
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Port (Trait)
//=========================================================================================

#[async_trait]
pub trait LearningPathApi: Send + Sync {
    /// Uploads a PDF resume and returns the identifier the backend assigned to it.
    async fn upload_resume(&self, file: &ResumeFile) -> PortResult<ResumeId>;

    /// Sends the newest chat turn for a resume and returns the assistant's
    /// structured reply. The backend keeps the conversation keyed by resume id.
    async fn recommend_bundle(
        &self,
        resume_id: &ResumeId,
        chat_transcript: &str,
    ) -> PortResult<AssistantReply>;

    /// Generates quiz items for a module.
    async fn generate_quiz(
        &self,
        user_id: &str,
        current_skill: &str,
        module_title: &str,
    ) -> PortResult<Vec<QuizQuestion>>;
}
