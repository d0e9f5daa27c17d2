//! services/client/src/adapters/mock.rs
//!
//! Canned demo data for running the front end without a backend. Chosen once
//! at startup in place of the HTTP adapter.

use std::time::Duration;

use async_trait::async_trait;
use learning_path_core::{
    AssistantReply, LearningPathApi, Module, PortResult, QuizQuestion, ResumeFile, ResumeId,
};
use tracing::debug;

pub const DEMO_RESUME_ID: &str = "demo-resume";

#[derive(Clone, Default)]
pub struct MockLearningPathAdapter {
    latency: Duration,
}

impl MockLearningPathAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every response, so loading states can be seen.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

fn intro_to_python() -> Module {
    Module {
        course_title: "Python for Data Analysis".to_string(),
        module_title: "Intro to Python".to_string(),
        description: "Variables, types, control flow and functions.".to_string(),
        subtopics: vec![
            "Variables and types".to_string(),
            "Control flow".to_string(),
            "Functions".to_string(),
        ],
        rationale: "Python is the core skill missing from your resume for the target role."
            .to_string(),
        price: Some(120.0),
        duration_hours: Some(8.0),
    }
}

fn machine_learning_101() -> Module {
    Module {
        course_title: "Applied Machine Learning".to_string(),
        module_title: "Machine Learning 101".to_string(),
        description: "Supervised learning with scikit-learn.".to_string(),
        subtopics: vec!["Regression".to_string(), "Classification".to_string()],
        rationale: "Builds on Python to reach the goal skills you mentioned.".to_string(),
        price: Some(180.0),
        duration_hours: Some(12.0),
    }
}

fn python_quiz() -> Vec<QuizQuestion> {
    vec![
        QuizQuestion {
            question: "Which of the following is a valid Python variable name?".to_string(),
            options: vec![
                "1var".to_string(),
                "var_1".to_string(),
                "var-1".to_string(),
                "var 1".to_string(),
            ],
            correct_answer: "var_1".to_string(),
        },
        QuizQuestion {
            question: "What does the 'print' function do in Python?".to_string(),
            options: vec![
                "Outputs text to the console".to_string(),
                "Reads input from the user".to_string(),
                "Defines a variable".to_string(),
                "Exits the program".to_string(),
            ],
            correct_answer: "Outputs text to the console".to_string(),
        },
        QuizQuestion {
            question: "Which symbol is used to comment a single line in Python?".to_string(),
            options: vec![
                "//".to_string(),
                "#".to_string(),
                "<!-- -->".to_string(),
                "/* */".to_string(),
            ],
            correct_answer: "#".to_string(),
        },
    ]
}

#[async_trait]
impl LearningPathApi for MockLearningPathAdapter {
    async fn upload_resume(&self, file: &ResumeFile) -> PortResult<ResumeId> {
        debug!(file = %file.file_name, "Mock upload");
        self.pause().await;
        Ok(ResumeId::new(DEMO_RESUME_ID))
    }

    async fn recommend_bundle(
        &self,
        _resume_id: &ResumeId,
        chat_transcript: &str,
    ) -> PortResult<AssistantReply> {
        debug!(text = chat_transcript, "Mock recommendation");
        self.pause().await;
        Ok(AssistantReply {
            target_role: Some("Data Analyst".to_string()),
            goal_skills: vec!["Python".to_string(), "Machine Learning".to_string()],
            budget_eur: None,
            recommended_modules: vec![intro_to_python(), machine_learning_101()],
            complete: true,
            quiz_skill: Some("Python".to_string()),
            quiz_module: Some("Intro to Python".to_string()),
            bundle: None,
        })
    }

    async fn generate_quiz(
        &self,
        _user_id: &str,
        _current_skill: &str,
        module_title: &str,
    ) -> PortResult<Vec<QuizQuestion>> {
        debug!(module = module_title, "Mock quiz");
        self.pause().await;
        Ok(python_quiz())
    }
}
