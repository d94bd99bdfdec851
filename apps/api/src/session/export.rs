//! JSON export and the in-memory submission log. Everything leaving a session passes
//! through `anonymize` first.

use std::sync::Arc;

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::answer::{AnswerScore, Evaluation};
use crate::models::candidate::CandidateProfile;
use crate::models::question::{Difficulty, QuestionCategory, QuestionSource};
use crate::session::anonymize::anonymize;
use crate::session::models::{Phase, Session};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedQuestion {
    pub question_id: Uuid,
    pub technology: String,
    pub question: String,
    pub difficulty: Difficulty,
    pub category: QuestionCategory,
    pub source: QuestionSource,
    pub answer: Option<String>,
    pub score: Option<AnswerScore>,
}

/// Downloadable view of one session with contact details masked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionExport {
    pub session_id: Uuid,
    pub exported_at: DateTime<Utc>,
    pub phase: Phase,
    pub candidate: CandidateProfile,
    pub questions: Vec<ExportedQuestion>,
    pub evaluation: Option<Evaluation>,
}

impl SessionExport {
    pub fn from_session(session: &Session) -> Self {
        let questions = session
            .questions
            .iter()
            .map(|q| {
                let record = session.answers.get(&q.id);
                ExportedQuestion {
                    question_id: q.id,
                    technology: q.technology.clone(),
                    question: q.text.clone(),
                    difficulty: q.difficulty,
                    category: q.category,
                    source: q.source,
                    answer: record.map(|r| r.answer.clone()),
                    score: record.map(|r| r.score.clone()),
                }
            })
            .collect();

        Self {
            session_id: session.id,
            exported_at: Utc::now(),
            phase: session.phase,
            candidate: anonymize(&session.profile),
            questions,
            evaluation: session.evaluation.clone(),
        }
    }

    pub fn answered_count(&self) -> usize {
        self.questions.iter().filter(|q| q.answer.is_some()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    #[serde(flatten)]
    pub session: SessionExport,
}

/// Completed sessions, anonymized, for the lifetime of the process.
#[derive(Clone, Default)]
pub struct SubmissionLog {
    entries: Arc<Mutex<Vec<Submission>>>,
}

impl SubmissionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, session: &Session) -> Submission {
        let submission = Submission {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            session: SessionExport::from_session(session),
        };
        let mut entries = self.entries.lock().await;
        entries.push(submission.clone());
        info!(
            "Recorded submission {} for session {} ({} answers, {} total submissions)",
            submission.id,
            session.id,
            submission.session.answered_count(),
            entries.len()
        );
        submission
    }

    pub async fn all(&self) -> Vec<Submission> {
        self.entries.lock().await.clone()
    }
}

pub fn export_file_name(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{prefix}_{}.json", at.timestamp())
}

/// Pretty-printed JSON served as a file download.
pub fn json_attachment<T: Serialize>(value: &T, file_name: &str) -> Result<Response, AppError> {
    let body = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize export: {e}")))?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response())
}
