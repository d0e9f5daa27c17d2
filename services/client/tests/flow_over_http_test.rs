//! Drives the flow controller against a fake backend over real HTTP.

mod common;

use common::{
    http_controller, open_reply, resume, spawn_backend, QUIZ, RECOMMEND, UPLOAD,
};
use learning_path_core::{
    AdvancePolicy, FlowError, PortError, QuizSelection, Stage, StepOutcome, ViewModel,
};
use serde_json::json;

/// Test: a full journey sends the uploaded resume id verbatim on every chat call
#[tokio::test]
async fn test_resume_id_is_forwarded_verbatim() {
    let (base_url, backend) = spawn_backend().await;
    backend.queue_reply(open_reply());
    let flow = http_controller(&base_url, AdvancePolicy::Immediate);

    let outcome = flow.submit_resume(resume()).await.unwrap();
    assert_eq!(outcome, StepOutcome::Advanced(Stage::Chat));

    let uploads = backend.uploads.lock().unwrap().clone();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].field, "file");
    assert_eq!(uploads[0].file_name, "jane_doe.pdf");
    assert_eq!(uploads[0].content_type, "application/pdf");
    assert_eq!(uploads[0].len, b"%PDF-1.4 fake resume".len());

    let resume_id = backend.resume_ids.lock().unwrap()[0].clone();
    assert_eq!(
        flow.resume_id().await.map(|id| id.to_string()),
        Some(resume_id.clone())
    );

    assert_eq!(
        flow.send_chat_message("I want to learn Python").await,
        Ok(StepOutcome::Updated)
    );
    assert_eq!(
        flow.send_chat_message("I want to learn Python, budget 300").await,
        Ok(StepOutcome::Advanced(Stage::Bundle))
    );

    let requests = backend.recommend_requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 3);
    for request in &requests {
        assert_eq!(request["resume_id"], json!(resume_id));
    }
    assert_eq!(requests[0]["chat_transcript"], "I want to learn Python");
    assert_eq!(requests[1]["chat_transcript"], "I want to learn Python, budget 300");

    assert_eq!(
        flow.selection().await,
        Some(QuizSelection::new("Python", "Intro to Python"))
    );
    let bundle = flow.bundle().await;
    assert_eq!(bundle.len(), 1);
    assert_eq!(bundle.modules()[0].price, Some(120.0));
    assert_eq!(flow.budget().await.euros(), 300);
}

/// Test: the quiz stage loads items over HTTP and finishes with XP and badge
#[tokio::test]
async fn test_quiz_stage_end_to_end() {
    let (base_url, backend) = spawn_backend().await;
    let flow = http_controller(&base_url, AdvancePolicy::Confirm);

    flow.submit_resume(resume()).await.unwrap();
    flow.send_chat_message("I want to learn Python").await.unwrap();
    assert_eq!(flow.stage().await, Stage::Chat);
    flow.confirm_pipeline().await.unwrap();
    flow.start_quiz().await.unwrap();
    assert_eq!(flow.load_quiz().await, Ok(StepOutcome::Updated));

    flow.answer_quiz(0, "var_1").await.unwrap();
    flow.answer_quiz(1, "#").await.unwrap();
    assert_eq!(flow.submit_quiz().await, Ok(StepOutcome::Advanced(Stage::Done)));

    let progress = flow.progress().await;
    assert_eq!(progress.xp, 20);
    assert!(progress.has_badge("Quiz Master"));

    let quiz_requests = backend.quiz_requests.lock().unwrap().clone();
    assert_eq!(
        quiz_requests[0],
        json!({ "user_id": "1", "current_skill": "Python", "module_title": "Intro to Python" })
    );
}

/// Test: a non-2xx upload leaves the stage alone even if the body looks valid
#[tokio::test]
async fn test_upload_error_status_is_a_failure() {
    let (base_url, backend) = spawn_backend().await;
    backend.respond(UPLOAD, 400, json!({ "resume_id": "r1", "detail": "No extractable text" }));
    let flow = http_controller(&base_url, AdvancePolicy::Confirm);

    assert_eq!(flow.submit_resume(resume()).await, Ok(StepOutcome::Stayed));
    assert_eq!(flow.stage().await, Stage::Upload);
    assert_eq!(flow.resume_id().await, None);
    let notices = flow.notices().await;
    assert!(notices[0].message.contains("No extractable text"));

    backend.reset(UPLOAD);
    assert_eq!(
        flow.submit_resume(resume()).await,
        Ok(StepOutcome::Advanced(Stage::Chat))
    );
}

/// Test: chat and bundle failures keep the learner in the chat
#[tokio::test]
async fn test_recommend_error_status_keeps_chat() {
    let (base_url, backend) = spawn_backend().await;
    let flow = http_controller(&base_url, AdvancePolicy::Confirm);
    flow.submit_resume(resume()).await.unwrap();

    backend.respond(RECOMMEND, 502, json!({ "detail": "pipeline down" }));
    assert_eq!(flow.send_chat_message("hello").await, Ok(StepOutcome::Stayed));
    assert_eq!(flow.stage().await, Stage::Chat);

    backend.reset(RECOMMEND);
    flow.send_chat_message("I want to learn Python").await.unwrap();
    backend.respond(RECOMMEND, 500, json!({}));
    assert_eq!(flow.confirm_pipeline().await, Ok(StepOutcome::Stayed));
    assert_eq!(flow.stage().await, Stage::Chat);
    assert_eq!(flow.notices().await.len(), 2);
}

/// Test: a 2xx body without the expected field is reported, not applied
#[tokio::test]
async fn test_malformed_bodies_are_reported() {
    let (base_url, backend) = spawn_backend().await;
    backend.respond(UPLOAD, 200, json!({ "text": "resume text" }));
    let flow = http_controller(&base_url, AdvancePolicy::Confirm);

    assert_eq!(flow.submit_resume(resume()).await, Ok(StepOutcome::Stayed));
    let notices = flow.notices().await;
    assert!(notices[0].message.contains("resume_id"));

    backend.reset(UPLOAD);
    flow.submit_resume(resume()).await.unwrap();
    backend.respond(RECOMMEND, 200, json!({ "complete": true }));
    assert_eq!(flow.send_chat_message("hi").await, Ok(StepOutcome::Stayed));
    assert!(flow.notices().await[1].message.contains("recommended_modules"));
}

/// Test: dashboard quiz requests open the panel and never move the stage
#[tokio::test]
async fn test_dashboard_quiz_over_http() {
    let (base_url, backend) = spawn_backend().await;
    let flow = http_controller(&base_url, AdvancePolicy::Confirm);

    flow.go_dashboard().await;
    assert_eq!(
        flow.request_quiz("Machine Learning 101").await,
        Ok(StepOutcome::Updated)
    );
    match flow.screen().await.view {
        ViewModel::Dashboard { panel: Some(panel), .. } => {
            assert_eq!(panel.sheet.questions().len(), 2);
            assert_eq!(panel.selection.module, "Machine Learning 101");
        }
        other => panic!("expected an open quiz panel, got {other:?}"),
    }
    assert_eq!(flow.stage().await, Stage::Upload);

    let request = backend.quiz_requests.lock().unwrap()[0].clone();
    assert_eq!(request["user_id"], "1");
    assert_eq!(request["module_title"], "Machine Learning 101");

    backend.respond(QUIZ, 500, json!({ "detail": "quiz agent failed" }));
    flow.close_quiz_panel().await;
    assert_eq!(
        flow.request_quiz("Machine Learning 101").await,
        Ok(StepOutcome::Stayed)
    );
    let screen = flow.screen().await;
    assert!(matches!(screen.view, ViewModel::Dashboard { panel: None, .. }));
    assert!(screen.notices[0].message.contains("quiz agent failed"));
}

/// Test: an unreachable backend produces a notice instead of an error
#[tokio::test]
async fn test_transport_failure_is_a_notice() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let flow = http_controller(&format!("http://{addr}"), AdvancePolicy::Confirm);
    assert_eq!(flow.submit_resume(resume()).await, Ok(StepOutcome::Stayed));
    let notices = flow.notices().await;
    assert_eq!(notices.len(), 1);
    assert!(notices[0].message.starts_with("Could not upload resume: Network error"));
}

/// Test: the adapter maps status codes into PortError::Status
#[tokio::test]
async fn test_adapter_reports_status_codes() {
    use client_lib::adapters::HttpLearningPathAdapter;
    use learning_path_core::{LearningPathApi, ResumeId};
    use std::time::Duration;

    let (base_url, backend) = spawn_backend().await;
    backend.respond(RECOMMEND, 404, json!({ "detail": "unknown resume" }));
    let adapter = HttpLearningPathAdapter::new(base_url, Duration::from_secs(5)).unwrap();

    let error = adapter
        .recommend_bundle(&ResumeId::new("missing"), "hi")
        .await
        .unwrap_err();
    assert_eq!(
        error,
        PortError::Status {
            status: 404,
            message: "unknown resume".to_string()
        }
    );
}

/// Test: operations out of order are caller errors, not network calls
#[tokio::test]
async fn test_out_of_order_operations_do_not_hit_the_backend() {
    let (base_url, backend) = spawn_backend().await;
    let flow = http_controller(&base_url, AdvancePolicy::Confirm);

    assert!(matches!(
        flow.complete_pipeline("Python", "Intro to Python").await,
        Err(FlowError::WrongStage { .. })
    ));
    assert!(matches!(flow.load_quiz().await, Err(FlowError::WrongStage { .. })));
    assert!(backend.recommend_requests.lock().unwrap().is_empty());
    assert!(backend.quiz_requests.lock().unwrap().is_empty());
}
