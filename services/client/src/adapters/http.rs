//! services/client/src/adapters/http.rs
//!
//! This module contains the adapter for the learning path backend's HTTP API.
//! It implements the `LearningPathApi` port from the `core` crate.
//!
//! Every call is a single attempt. Any non-2xx status is a failure no matter
//! what the body says, and a 2xx body missing an expected field is reported
//! as malformed.

use std::time::Duration;

use async_trait::async_trait;
use learning_path_core::{
    AssistantReply, LearningPathApi, Module, PortError, PortResult, QuizQuestion, ResumeFile,
    ResumeId,
};
use reqwest::{multipart, Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

const UPLOAD_RESUME_PATH: &str = "/api/upload-resume";
const RECOMMEND_BUNDLE_PATH: &str = "/api/recommend-bundle";
const QUIZ_PATH: &str = "/api/quiz";

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Debug, Deserialize)]
struct UploadResponse {
    resume_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct RecommendRequest<'a> {
    resume_id: &'a str,
    chat_transcript: &'a str,
}

#[derive(Debug, Deserialize)]
struct RecommendResponse {
    target_role: Option<String>,
    #[serde(default)]
    goal_skills: Vec<String>,
    budget_eur: Option<f64>,
    recommended_modules: Option<Vec<ModuleDto>>,
    #[serde(default)]
    complete: bool,
    #[serde(rename = "quizSkill", alias = "quiz_skill")]
    quiz_skill: Option<String>,
    #[serde(rename = "quizModule", alias = "quiz_module")]
    quiz_module: Option<String>,
    #[serde(alias = "final_bundle")]
    bundle: Option<Vec<ModuleDto>>,
}

#[derive(Debug, Deserialize)]
struct ModuleDto {
    #[serde(default)]
    course_title: String,
    #[serde(alias = "title")]
    module_title: Option<String>,
    #[serde(default, alias = "description")]
    module_description: String,
    #[serde(default, alias = "subtopics")]
    selected_subtopics: Vec<String>,
    #[serde(default, alias = "rationale")]
    why_selected: String,
    #[serde(alias = "price_eur")]
    price: Option<f64>,
    #[serde(alias = "time_hours")]
    duration_hours: Option<f64>,
}

#[derive(Debug, Serialize)]
struct QuizRequest<'a> {
    user_id: &'a str,
    current_skill: &'a str,
    module_title: &'a str,
}

#[derive(Debug, Deserialize)]
struct QuizResponse {
    quiz: Option<Vec<QuizItemDto>>,
}

#[derive(Debug, Deserialize)]
struct QuizItemDto {
    question: String,
    options: Vec<String>,
    correct_answer: String,
}

/// FastAPI-style error body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl ModuleDto {
    fn into_domain(self) -> PortResult<Module> {
        let module_title = self
            .module_title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| PortError::Malformed("module is missing 'module_title'".to_string()))?;
        Ok(Module {
            course_title: self.course_title,
            module_title,
            description: self.module_description,
            subtopics: self.selected_subtopics,
            rationale: self.why_selected,
            price: self.price,
            duration_hours: self.duration_hours,
        })
    }
}

fn modules_into_domain(modules: Vec<ModuleDto>) -> PortResult<Vec<Module>> {
    modules.into_iter().map(ModuleDto::into_domain).collect()
}

impl RecommendResponse {
    fn into_domain(self) -> PortResult<AssistantReply> {
        let recommended_modules = self.recommended_modules.ok_or_else(|| {
            PortError::Malformed("response is missing 'recommended_modules'".to_string())
        })?;
        Ok(AssistantReply {
            target_role: self.target_role,
            goal_skills: self.goal_skills,
            budget_eur: self.budget_eur,
            recommended_modules: modules_into_domain(recommended_modules)?,
            complete: self.complete,
            quiz_skill: self.quiz_skill,
            quiz_module: self.quiz_module,
            bundle: self.bundle.map(modules_into_domain).transpose()?,
        })
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `LearningPathApi` over HTTP.
#[derive(Clone)]
pub struct HttpLearningPathAdapter {
    client: Client,
    base_url: String,
}

impl HttpLearningPathAdapter {
    /// Creates a new `HttpLearningPathAdapter` for the backend at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turns a response into `T`, mapping every non-2xx status to `PortError::Status`.
async fn read_json<T: DeserializeOwned>(response: Response) -> PortResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!("Backend returned {}: {}", status, body);
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .map(|e| match e.detail {
                serde_json::Value::String(detail) => detail,
                other => other.to_string(),
            })
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or(body);
        return Err(PortError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| PortError::Transport(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| PortError::Malformed(e.to_string()))
}

fn transport(e: reqwest::Error) -> PortError {
    PortError::Transport(e.to_string())
}

//=========================================================================================
// `LearningPathApi` Trait Implementation
//=========================================================================================

#[async_trait]
impl LearningPathApi for HttpLearningPathAdapter {
    /// Posts the resume as the multipart field `file`.
    async fn upload_resume(&self, file: &ResumeFile) -> PortResult<ResumeId> {
        let part = multipart::Part::bytes(file.data.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        debug!(url = %self.url(UPLOAD_RESUME_PATH), "POST upload-resume");
        let response = self
            .client
            .post(self.url(UPLOAD_RESUME_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        let body: UploadResponse = read_json(response).await?;
        body.resume_id
            .filter(|id| !id.trim().is_empty())
            .map(ResumeId::new)
            .ok_or_else(|| PortError::Malformed("response is missing 'resume_id'".to_string()))
    }

    async fn recommend_bundle(
        &self,
        resume_id: &ResumeId,
        chat_transcript: &str,
    ) -> PortResult<AssistantReply> {
        let request = RecommendRequest {
            resume_id: resume_id.as_str(),
            chat_transcript,
        };

        debug!(url = %self.url(RECOMMEND_BUNDLE_PATH), "POST recommend-bundle");
        let response = self
            .client
            .post(self.url(RECOMMEND_BUNDLE_PATH))
            .json(&request)
            .send()
            .await
            .map_err(transport)?;

        let body: RecommendResponse = read_json(response).await?;
        body.into_domain()
    }

    async fn generate_quiz(
        &self,
        user_id: &str,
        current_skill: &str,
        module_title: &str,
    ) -> PortResult<Vec<QuizQuestion>> {
        let request = QuizRequest {
            user_id,
            current_skill,
            module_title,
        };

        debug!(url = %self.url(QUIZ_PATH), module = module_title, "POST quiz");
        let response = self
            .client
            .post(self.url(QUIZ_PATH))
            .json(&request)
            .send()
            .await
            .map_err(transport)?;

        let body: QuizResponse = read_json(response).await?;
        let items = body
            .quiz
            .ok_or_else(|| PortError::Malformed("response is missing 'quiz'".to_string()))?;
        Ok(items
            .into_iter()
            .map(|item| QuizQuestion {
                question: item.question,
                options: item.options,
                correct_answer: item.correct_answer,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recommend_response_maps_backend_field_names() {
        let body: RecommendResponse = serde_json::from_value(json!({
            "target_role": "Data Analyst",
            "goal_skills": ["Python"],
            "budget_eur": 300,
            "recommended_modules": [{
                "course_title": "Python for Data",
                "module_title": "Intro to Python",
                "module_description": "Variables and loops",
                "selected_subtopics": ["Variables"],
                "why_selected": "Closes the Python gap"
            }],
            "complete": true,
            "quizSkill": "Python",
            "quizModule": "Intro to Python",
            "bundle": [{ "title": "Intro to Python" }]
        }))
        .unwrap();

        let reply = body.into_domain().unwrap();
        assert_eq!(reply.budget_eur, Some(300.0));
        assert!(reply.complete);
        assert_eq!(reply.recommended_modules[0].rationale, "Closes the Python gap");
        assert_eq!(reply.recommended_modules[0].subtopics, vec!["Variables"]);
        assert_eq!(reply.modules()[0].module_title, "Intro to Python");
        assert_eq!(reply.quiz_skill.as_deref(), Some("Python"));
    }

    #[test]
    fn final_bundle_is_read_as_the_explicit_bundle() {
        let body: RecommendResponse = serde_json::from_value(json!({
            "recommended_modules": [{ "module_title": "SQL Joins" }],
            "complete": true,
            "final_bundle": [
                { "module_title": "Intro to Python", "price": 120 },
                { "module_title": "Pandas Basics" }
            ]
        }))
        .unwrap();

        let reply = body.into_domain().unwrap();
        let titles: Vec<_> = reply.modules().iter().map(|m| m.module_title.as_str()).collect();
        assert_eq!(titles, ["Intro to Python", "Pandas Basics"]);
        assert_eq!(reply.modules()[0].price, Some(120.0));
    }

    #[test]
    fn missing_recommended_modules_is_malformed() {
        let body: RecommendResponse =
            serde_json::from_value(json!({ "complete": false })).unwrap();
        assert!(matches!(body.into_domain(), Err(PortError::Malformed(_))));
    }

    #[test]
    fn untitled_module_is_malformed() {
        let body: RecommendResponse = serde_json::from_value(json!({
            "recommended_modules": [{ "course_title": "Python for Data" }]
        }))
        .unwrap();
        assert!(matches!(body.into_domain(), Err(PortError::Malformed(_))));
    }
}
