//! Axum route handlers for the session lifecycle, chat and exports.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::generator::{GenerationMode, GenerationSettings};
use crate::interview::handlers::run_generation;
use crate::models::answer::Evaluation;
use crate::models::candidate::{parse_tech_stack, ProfileForm};
use crate::session::chat::{classify, Intent, FALLBACK_MESSAGE, HELP_TEXT, MAX_MESSAGE_CHARS};
use crate::session::export::{export_file_name, json_attachment, SessionExport};
use crate::session::models::{ChatRole, Phase, Session, SessionView, CONCLUDED};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TechStackForm {
    pub tech_stack: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Bot turns produced by this message, joined.
    pub reply: String,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct FinalizeResponse {
    pub submission_id: Uuid,
    pub evaluation: Evaluation,
    pub session: SessionView,
}

/// What the chat handler still has to do after the lock is released.
enum FollowUp {
    None,
    Generate(GenerationMode),
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let session = state.sessions.create().await;
    (StatusCode::CREATED, Json(SessionView::from(session)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.get(id).await?;
    Ok(Json(SessionView::from(session)))
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state
        .sessions
        .update(id, |s| {
            s.reset();
            Ok(s.clone())
        })
        .await?;
    info!("Reset session {id}");
    Ok(Json(SessionView::from(session)))
}

/// PUT /api/v1/sessions/:id/profile
///
/// Rejected forms return 422 with per-field messages and leave the session untouched.
pub async fn handle_submit_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<ProfileForm>,
) -> Result<Json<SessionView>, AppError> {
    let session = state
        .sessions
        .update(id, |s| {
            s.submit_profile(form)?;
            Ok(s.clone())
        })
        .await?;
    Ok(Json(SessionView::from(session)))
}

/// PUT /api/v1/sessions/:id/tech-stack
pub async fn handle_set_tech_stack(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<TechStackForm>,
) -> Result<Json<SessionView>, AppError> {
    let stack = parse_tech_stack(&form.tech_stack);
    let session = state
        .sessions
        .update(id, |s| {
            s.set_tech_stack(stack)?;
            Ok(s.clone())
        })
        .await?;
    Ok(Json(SessionView::from(session)))
}

/// POST /api/v1/sessions/:id/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = request.message.trim().to_string();
    if message.is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::Validation(format!(
            "message cannot be longer than {MAX_MESSAGE_CHARS} characters"
        )));
    }

    let (start, follow_up) = state
        .sessions
        .update(id, |s| {
            s.hear(message.as_str());
            let start = s.conversation.len();
            Ok((start, respond(s, &message)?))
        })
        .await?;

    if let FollowUp::Generate(mode) = follow_up {
        let settings = GenerationSettings {
            per_tech: state.config.questions_per_tech,
            mode,
        };
        match run_generation(&state, id, settings).await {
            Ok(_) => {}
            Err(AppError::Validation(msg)) | Err(AppError::Conflict(msg)) => {
                state
                    .sessions
                    .update(id, |s| {
                        s.say(msg);
                        Ok(())
                    })
                    .await?;
            }
            Err(e) => return Err(e),
        }
    }

    let response = state
        .sessions
        .read(id, |s| {
            Ok(ChatResponse {
                reply: bot_turns_since(s, start),
                session: SessionView::from(s.clone()),
            })
        })
        .await?;
    Ok(Json(response))
}

/// Applies one chat message under the session lock. Generation is deferred to the caller.
fn respond(session: &mut Session, message: &str) -> Result<FollowUp, AppError> {
    if session.phase == Phase::Ended {
        session.say(CONCLUDED);
        return Ok(FollowUp::None);
    }

    match classify(message) {
        Intent::Exit => session.end(),
        Intent::Help => session.say(HELP_TEXT),
        Intent::FormHelp(field) => session.say(field.guidance()),
        Intent::DeclareStack(stack) => match session.set_tech_stack(stack) {
            Ok(()) if session.profile_accepted => {
                session.say("Say 'generate' for questions, or 'generate ai' for AI-written ones.")
            }
            Ok(()) => session.say(session.profile.info_prompt()),
            Err(AppError::Conflict(_)) => session.say(
                "The tech stack is locked once the interview starts. Reset the session to change it.",
            ),
            Err(e) => return Err(e),
        },
        Intent::Generate { ai } => {
            return Ok(FollowUp::Generate(GenerationMode::from_ai_flag(ai)));
        }
        Intent::Fallback => session.say(FALLBACK_MESSAGE),
    }
    Ok(FollowUp::None)
}

fn bot_turns_since(session: &Session, start: usize) -> String {
    session
        .conversation
        .get(start..)
        .unwrap_or_default()
        .iter()
        .filter(|t| t.role == ChatRole::Bot)
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// POST /api/v1/sessions/:id/finalize
pub async fn handle_finalize(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FinalizeResponse>, AppError> {
    let (evaluation, session) = state
        .sessions
        .update(id, |s| {
            let evaluation = s.finalize()?;
            Ok((evaluation, s.clone()))
        })
        .await?;

    let submission = state.submissions.record(&session).await;
    info!(
        "Finalized session {id}: {:.1}% over {} questions",
        evaluation.percentage, evaluation.total_questions
    );

    Ok(Json(FinalizeResponse {
        submission_id: submission.id,
        evaluation,
        session: SessionView::from(session),
    }))
}

/// GET /api/v1/sessions/:id/export
pub async fn handle_export_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let export = state
        .sessions
        .read(id, |s| Ok(SessionExport::from_session(s)))
        .await?;
    json_attachment(&export, &format!("session_{id}.json"))
}

/// GET /api/v1/submissions/export
pub async fn handle_export_submissions(
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let submissions = state.submissions.all().await;
    info!("Exporting {} submissions", submissions.len());
    json_attachment(
        &submissions,
        &export_file_name("candidate_submissions", Utc::now()),
    )
}
