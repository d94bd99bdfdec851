pub mod health;
pub mod ui;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::interview::handlers as interview;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ui::index_handler))
        .route("/health", get(health::health_handler))
        // Session lifecycle
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route("/api/v1/sessions/:id", get(session::handle_get_session))
        .route(
            "/api/v1/sessions/:id/reset",
            post(session::handle_reset_session),
        )
        .route(
            "/api/v1/sessions/:id/profile",
            put(session::handle_submit_profile),
        )
        .route(
            "/api/v1/sessions/:id/tech-stack",
            put(session::handle_set_tech_stack),
        )
        .route("/api/v1/sessions/:id/chat", post(session::handle_chat))
        // Interview
        .route(
            "/api/v1/sessions/:id/questions",
            post(interview::handle_generate_questions),
        )
        .route(
            "/api/v1/sessions/:id/answers/:question_id",
            put(interview::handle_submit_answer),
        )
        .route(
            "/api/v1/sessions/:id/finalize",
            post(session::handle_finalize),
        )
        // Exports
        .route(
            "/api/v1/sessions/:id/export",
            get(session::handle_export_session),
        )
        .route(
            "/api/v1/submissions/export",
            get(session::handle_export_submissions),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::{LlmError, TextGenerator};
    use crate::session::chat::{HELP_TEXT, MAX_MESSAGE_CHARS};

    struct Offline;

    #[async_trait]
    impl TextGenerator for Offline {
        async fn complete(&self, _prompt: &str, _max_tokens: u32) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 503,
                message: "network unreachable".to_string(),
            })
        }
    }

    fn app() -> Router {
        build_router(AppState::new(Config::default(), None))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        let request = match body {
            Some(json) => request.body(Body::from(json.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn profile() -> Value {
        json!({
            "full_name": "Jane Doe",
            "email": "jane.doe@example.com",
            "phone": "+1 123-456-7890",
            "years_experience": "6",
            "desired_positions": "Backend Engineer",
            "location": "Mumbai, India"
        })
    }

    /// Creates a session with accepted details and the given stack. Returns its base path.
    async fn ready_session(app: &Router, stack: &str) -> String {
        let created = body_json(send(app, Method::POST, "/api/v1/sessions", None).await).await;
        let base = format!("/api/v1/sessions/{}", created["id"].as_str().unwrap());

        let response = send(app, Method::PUT, &format!("{base}/profile"), Some(profile())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let response = send(
            app,
            Method::PUT,
            &format!("{base}/tech-stack"),
            Some(json!({ "tech_stack": stack })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        base
    }

    #[tokio::test]
    async fn test_health_reports_ai_disabled() {
        let response = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "talentscout");
        assert_eq!(json["ai_enabled"], false);
    }

    #[tokio::test]
    async fn test_index_serves_html() {
        let response = send(&app(), Method::GET, "/", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let uri = format!("/api/v1/sessions/{}", uuid::Uuid::new_v4());
        let response = send(&app(), Method::GET, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_invalid_profile_returns_field_errors() {
        let app = app();
        let created = body_json(send(&app, Method::POST, "/api/v1/sessions", None).await).await;
        let uri = format!("/api/v1/sessions/{}/profile", created["id"].as_str().unwrap());

        let mut form = profile();
        form["email"] = json!("abc");
        let response = send(&app, Method::PUT, &uri, Some(form)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["fields"][0]["field"], "email");
    }

    #[tokio::test]
    async fn test_generation_requires_profile_and_stack() {
        let app = app();
        let created = body_json(send(&app, Method::POST, "/api/v1/sessions", None).await).await;
        let uri = format!("/api/v1/sessions/{}/questions", created["id"].as_str().unwrap());
        let response = send(&app, Method::POST, &uri, Some(json!({}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_per_tech_out_of_range_is_rejected() {
        let app = app();
        let base = ready_session(&app, "Python").await;
        let response = send(
            &app,
            Method::POST,
            &format!("{base}/questions"),
            Some(json!({ "per_tech": 9 })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_full_interview_flow() {
        let app = app();
        let base = ready_session(&app, "Python, Docker").await;

        let response = send(
            &app,
            Method::POST,
            &format!("{base}/questions"),
            Some(json!({ "per_tech": 3, "mode": "local" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["difficulty"], "advanced");
        assert_eq!(json["session"]["phase"], "interview");
        let questions = json["session"]["questions"].as_array().unwrap();
        assert_eq!(questions.len(), 6);

        let qid = questions[0]["id"].as_str().unwrap();
        let response = send(
            &app,
            Method::PUT,
            &format!("{base}/answers/{qid}"),
            Some(json!({ "answer": "I built and deployed Python services in production" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["answered"], 1);
        assert_eq!(json["total_questions"], 6);

        let response = send(&app, Method::POST, &format!("{base}/finalize"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["session"]["phase"], "completed");
        assert_eq!(json["evaluation"]["max_points"], 60);

        let response = send(&app, Method::POST, &format!("{base}/finalize"), None).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = send(&app, Method::GET, "/api/v1/submissions/export", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("candidate_submissions_"));
        let json = body_json(response).await;
        let submissions = json.as_array().unwrap();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0]["candidate"]["email"], "ja***@example.com");
        assert_eq!(submissions[0]["questions"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_ai_network_error_falls_back_to_local() {
        let state = AppState::new(Config::default(), Some(Arc::new(Offline)));
        let app = build_router(state);
        let base = ready_session(&app, "Rust, SQL").await;

        let response = send(
            &app,
            Method::POST,
            &format!("{base}/questions"),
            Some(json!({ "mode": "ai" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let questions = json["session"]["questions"].as_array().unwrap();
        assert_eq!(questions.len(), 8);
        assert!(questions.iter().all(|q| q["source"] == "local"));
        assert_eq!(json["session"]["fallbacks"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_chat_help_generate_and_exit() {
        let app = app();
        let base = ready_session(&app, "Java").await;
        let chat = format!("{base}/chat");

        let json = body_json(send(&app, Method::POST, &chat, Some(json!({ "message": "help" }))).await).await;
        assert_eq!(json["reply"], HELP_TEXT);

        let json =
            body_json(send(&app, Method::POST, &chat, Some(json!({ "message": "generate" }))).await).await;
        assert_eq!(json["session"]["phase"], "interview");
        assert_eq!(json["session"]["questions"].as_array().unwrap().len(), 4);

        let json = body_json(send(&app, Method::POST, &chat, Some(json!({ "message": "bye" }))).await).await;
        assert_eq!(json["session"]["phase"], "ended");

        let response = send(&app, Method::POST, &format!("{base}/reset"), None).await;
        assert_eq!(body_json(response).await["phase"], "collecting");
    }

    #[tokio::test]
    async fn test_chat_generate_without_details_explains_what_is_missing() {
        let app = app();
        let created = body_json(send(&app, Method::POST, "/api/v1/sessions", None).await).await;
        let chat = format!("/api/v1/sessions/{}/chat", created["id"].as_str().unwrap());

        let json =
            body_json(send(&app, Method::POST, &chat, Some(json!({ "message": "Go, Redis" }))).await).await;
        assert!(json["reply"].as_str().unwrap().contains("Tech stack recorded: Go, Redis"));

        let json =
            body_json(send(&app, Method::POST, &chat, Some(json!({ "message": "generate" }))).await).await;
        assert!(json["reply"].as_str().unwrap().starts_with("Please provide"));
        assert_eq!(json["session"]["phase"], "collecting");
    }

    #[tokio::test]
    async fn test_session_export_is_masked_attachment() {
        let app = app();
        let base = ready_session(&app, "Python").await;
        let id = base.rsplit('/').next().unwrap().to_string();

        let response = send(&app, Method::GET, &format!("{base}/export"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert_eq!(disposition, format!("attachment; filename=\"session_{id}.json\""));

        let json = body_json(response).await;
        assert_eq!(json["session_id"], id.as_str());
        assert_eq!(json["candidate"]["email"], "ja***@example.com");
        assert_eq!(json["candidate"]["phone"], "+1123456****");
        assert_eq!(json["candidate"]["full_name"], "Jane Doe");
    }

    #[tokio::test]
    async fn test_overlong_chat_message_is_rejected() {
        let app = app();
        let created = body_json(send(&app, Method::POST, "/api/v1/sessions", None).await).await;
        let chat = format!("/api/v1/sessions/{}/chat", created["id"].as_str().unwrap());

        let message = "a".repeat(MAX_MESSAGE_CHARS + 1);
        let response = send(&app, Method::POST, &chat, Some(json!({ "message": message }))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let session = body_json(send(&app, Method::GET, &chat.replace("/chat", ""), None).await).await;
        assert_eq!(session["conversation"].as_array().unwrap().len(), 1);

        let message = "a".repeat(MAX_MESSAGE_CHARS);
        let response = send(&app, Method::POST, &chat, Some(json!({ "message": message }))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
