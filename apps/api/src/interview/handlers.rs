//! Axum route handlers for question generation and answer submission.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::generator::{generate_for_stack, GenerationMode, GenerationSettings};
use crate::interview::question_bank::{MAX_QUESTIONS, MIN_QUESTIONS};
use crate::models::answer::AnswerRecord;
use crate::models::question::Difficulty;
use crate::session::models::{Session, SessionView};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct GenerateQuestionsRequest {
    pub per_tech: Option<usize>,
    pub mode: Option<GenerationMode>,
}

#[derive(Debug, Serialize)]
pub struct GenerateQuestionsResponse {
    pub difficulty: Difficulty,
    pub session: SessionView,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub record: AnswerRecord,
    pub answered: usize,
    pub total_questions: usize,
}

/// POST /api/v1/sessions/:id/questions
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<GenerateQuestionsRequest>,
) -> Result<Json<GenerateQuestionsResponse>, AppError> {
    let per_tech = match request.per_tech {
        Some(n) if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&n) => {
            return Err(AppError::Validation(format!(
                "per_tech must be between {MIN_QUESTIONS} and {MAX_QUESTIONS}"
            )));
        }
        Some(n) => n,
        None => state.config.questions_per_tech,
    };
    let settings = GenerationSettings {
        per_tech,
        mode: request.mode.unwrap_or_default(),
    };

    let (difficulty, session) = run_generation(&state, id, settings).await?;
    Ok(Json(GenerateQuestionsResponse {
        difficulty,
        session: SessionView::from(session),
    }))
}

/// Generates a question set for the session's stack and starts the interview.
///
/// The AI call runs without holding the session lock. Readiness is checked again
/// when the result is applied, so a reset or answer that lands in between wins.
pub async fn run_generation(
    state: &AppState,
    id: Uuid,
    settings: GenerationSettings,
) -> Result<(Difficulty, Session), AppError> {
    let (stack, years) = state
        .sessions
        .read(id, |s| {
            s.ensure_ready_for_generation()?;
            Ok((s.profile.tech_stack.clone(), s.profile.years_experience.clone()))
        })
        .await?;

    let outcome = generate_for_stack(
        &stack,
        &years,
        settings,
        state.llm.as_deref(),
        state.config.llm_timeout(),
    )
    .await;
    let difficulty = outcome.difficulty;

    let session = state
        .sessions
        .update(id, |s| {
            s.start_interview(outcome)?;
            Ok(s.clone())
        })
        .await?;

    Ok((difficulty, session))
}

/// PUT /api/v1/sessions/:id/answers/:question_id
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Path((id, question_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    let response = state
        .sessions
        .update(id, |s| {
            let record = s.record_answer(question_id, request.answer)?;
            Ok(AnswerResponse {
                record,
                answered: s.answers.len(),
                total_questions: s.questions.len(),
            })
        })
        .await?;
    Ok(Json(response))
}
