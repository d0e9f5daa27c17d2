//! Common test utilities: a fake learning path backend served by axum.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use client_lib::adapters::HttpLearningPathAdapter;
use learning_path_core::{AdvancePolicy, FlowController, FlowOptions, ResumeFile};
use serde_json::{json, Value};
use uuid::Uuid;

pub const UPLOAD: &str = "/api/upload-resume";
pub const RECOMMEND: &str = "/api/recommend-bundle";
pub const QUIZ: &str = "/api/quiz";

/// An upload as the backend saw it.
#[derive(Debug, Clone)]
pub struct ReceivedFile {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub len: usize,
}

/// Shared state of the fake backend. Records every request and can be told
/// to answer an endpoint with a canned status and body.
#[derive(Default)]
pub struct FakeBackend {
    pub uploads: Mutex<Vec<ReceivedFile>>,
    pub resume_ids: Mutex<Vec<String>>,
    pub recommend_requests: Mutex<Vec<Value>>,
    pub quiz_requests: Mutex<Vec<Value>>,
    pub replies: Mutex<VecDeque<Value>>,
    overrides: Mutex<HashMap<&'static str, (u16, Value)>>,
}

impl FakeBackend {
    /// Answers every call to `endpoint` with `status` and `body` from now on.
    pub fn respond(&self, endpoint: &'static str, status: u16, body: Value) {
        self.overrides
            .lock()
            .unwrap()
            .insert(endpoint, (status, body));
    }

    pub fn reset(&self, endpoint: &'static str) {
        self.overrides.lock().unwrap().remove(endpoint);
    }

    pub fn queue_reply(&self, reply: Value) {
        self.replies.lock().unwrap().push_back(reply);
    }

    fn canned(&self, endpoint: &'static str) -> Option<Response> {
        let (status, body) = self.overrides.lock().unwrap().get(endpoint).cloned()?;
        let status = StatusCode::from_u16(status).unwrap();
        Some((status, Json(body)).into_response())
    }
}

pub fn complete_reply() -> Value {
    json!({
        "target_role": "Data Analyst",
        "goal_skills": ["Python"],
        "budget_eur": 300,
        "recommended_modules": [{
            "course_title": "Python for Data",
            "module_title": "Intro to Python",
            "module_description": "Variables, types and loops.",
            "selected_subtopics": ["Variables", "Loops"],
            "why_selected": "Python is missing from the resume.",
            "price": 120,
            "duration_hours": 8
        }],
        "complete": true,
        "quizSkill": "Python",
        "quizModule": "Intro to Python"
    })
}

pub fn open_reply() -> Value {
    json!({
        "target_role": null,
        "goal_skills": [],
        "recommended_modules": [],
        "complete": false
    })
}

pub fn quiz_body() -> Value {
    json!({
        "quiz": [
            {
                "question": "Which of the following is a valid Python variable name?",
                "options": ["1var", "var_1", "var-1", "var 1"],
                "correct_answer": "var_1"
            },
            {
                "question": "Which symbol is used to comment a single line in Python?",
                "options": ["//", "#", "<!-- -->", "/* */"],
                "correct_answer": "#"
            }
        ]
    })
}

async fn upload_resume(State(backend): State<Arc<FakeBackend>>, mut multipart: Multipart) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        let received = ReceivedFile {
            field: field.name().unwrap_or_default().to_string(),
            file_name: field.file_name().unwrap_or_default().to_string(),
            content_type: field.content_type().unwrap_or_default().to_string(),
            len: 0,
        };
        let len = field.bytes().await.map(|b| b.len()).unwrap_or_default();
        backend
            .uploads
            .lock()
            .unwrap()
            .push(ReceivedFile { len, ..received });
    }
    if let Some(response) = backend.canned(UPLOAD) {
        return response;
    }
    let resume_id = format!("resume-{}", Uuid::new_v4());
    backend.resume_ids.lock().unwrap().push(resume_id.clone());
    Json(json!({ "resume_id": resume_id })).into_response()
}

async fn recommend_bundle(
    State(backend): State<Arc<FakeBackend>>,
    Json(body): Json<Value>,
) -> Response {
    backend.recommend_requests.lock().unwrap().push(body);
    if let Some(response) = backend.canned(RECOMMEND) {
        return response;
    }
    let reply = backend
        .replies
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(complete_reply);
    Json(reply).into_response()
}

async fn quiz(State(backend): State<Arc<FakeBackend>>, Json(body): Json<Value>) -> Response {
    backend.quiz_requests.lock().unwrap().push(body);
    if let Some(response) = backend.canned(QUIZ) {
        return response;
    }
    Json(quiz_body()).into_response()
}

/// Starts the fake backend on an ephemeral port and returns its base URL.
pub async fn spawn_backend() -> (String, Arc<FakeBackend>) {
    let backend = Arc::new(FakeBackend::default());
    let app = Router::new()
        .route(UPLOAD, post(upload_resume))
        .route(RECOMMEND, post(recommend_bundle))
        .route(QUIZ, post(quiz))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake backend");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), backend)
}

pub fn http_controller(base_url: &str, advance: AdvancePolicy) -> FlowController {
    let adapter = HttpLearningPathAdapter::new(base_url, Duration::from_secs(5))
        .expect("Failed to build HTTP adapter");
    FlowController::new(
        Arc::new(adapter),
        FlowOptions {
            advance,
            ..Default::default()
        },
    )
}

pub fn resume() -> ResumeFile {
    ResumeFile::pdf("jane_doe.pdf", b"%PDF-1.4 fake resume".to_vec())
}
