use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::evaluator::{evaluate_session, score_answer};
use crate::interview::generator::{FallbackNote, GenerationOutcome};
use crate::models::answer::{AnswerRecord, Evaluation};
use crate::models::candidate::{CandidateProfile, ProfileForm};
use crate::models::question::QuestionSet;
use crate::session::validation::validate_profile;

pub const GREETING: &str = "Hello! I'm TalentScout's initial screening assistant. I will collect \
    some details and generate technical questions based on your tech stack.";
pub const FAREWELL: &str = "Thanks for your time, ending the conversation.";
pub const CONCLUDED: &str =
    "Thank you, the conversation is concluded. We will email next steps.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Details and tech stack are being collected; the profile is editable.
    Collecting,
    /// Questions exist and answers are being accepted; the profile is locked.
    Interview,
    /// Finalized and recorded in the submission log.
    Completed,
    /// The candidate left with an exit keyword.
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    Bot,
    Candidate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// One candidate's interaction, held only in process memory.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub phase: Phase,
    pub profile: CandidateProfile,
    pub profile_accepted: bool,
    pub questions: QuestionSet,
    pub answers: HashMap<Uuid, AnswerRecord>,
    pub conversation: Vec<ChatTurn>,
    pub fallbacks: Vec<FallbackNote>,
    pub evaluation: Option<Evaluation>,
}

impl Session {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    fn with_id(id: Uuid) -> Self {
        let mut session = Self {
            id,
            created_at: Utc::now(),
            phase: Phase::Collecting,
            profile: CandidateProfile::default(),
            profile_accepted: false,
            questions: QuestionSet::default(),
            answers: HashMap::new(),
            conversation: Vec::new(),
            fallbacks: Vec::new(),
            evaluation: None,
        };
        session.say(GREETING);
        session
    }

    pub fn say(&mut self, text: impl Into<String>) {
        self.push_turn(ChatRole::Bot, text.into());
    }

    pub fn hear(&mut self, text: impl Into<String>) {
        self.push_turn(ChatRole::Candidate, text.into());
    }

    fn push_turn(&mut self, role: ChatRole, text: String) {
        self.conversation.push(ChatTurn {
            role,
            text,
            at: Utc::now(),
        });
    }

    fn require_phase(&self, allowed: &[Phase], action: &str) -> Result<(), AppError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(AppError::Conflict(format!(
                "Cannot {action} while the session is {:?}",
                self.phase
            )))
        }
    }

    /// Validates and stores the details form. Nothing changes when validation fails.
    pub fn submit_profile(&mut self, form: ProfileForm) -> Result<(), AppError> {
        self.require_phase(&[Phase::Collecting], "edit details")?;

        let mut candidate = self.profile.clone();
        candidate.apply_form(form);
        validate_profile(&candidate).map_err(AppError::InvalidFields)?;

        self.profile = candidate;
        self.profile_accepted = true;
        self.say("Details saved.");
        Ok(())
    }

    pub fn set_tech_stack(&mut self, stack: Vec<String>) -> Result<(), AppError> {
        self.require_phase(&[Phase::Collecting], "change the tech stack")?;
        if stack.is_empty() {
            return Err(AppError::Validation(
                "List at least one technology, separated by commas".to_string(),
            ));
        }
        self.say(format!("Tech stack recorded: {}", stack.join(", ")));
        self.profile.tech_stack = stack;
        Ok(())
    }

    /// Questions may be (re)generated until the first answer arrives.
    pub fn ensure_ready_for_generation(&self) -> Result<(), AppError> {
        self.require_phase(&[Phase::Collecting, Phase::Interview], "generate questions")?;
        if !self.answers.is_empty() {
            return Err(AppError::Conflict(
                "Questions cannot be regenerated after answering has started".to_string(),
            ));
        }
        if self.profile.tech_stack.is_empty() {
            return Err(AppError::Validation(
                "No tech stack provided. Enter tech stack first.".to_string(),
            ));
        }
        if !self.profile_accepted {
            return Err(AppError::Validation(self.profile.info_prompt()));
        }
        Ok(())
    }

    /// Installs a freshly generated question set and locks the profile.
    pub fn start_interview(&mut self, outcome: GenerationOutcome) -> Result<(), AppError> {
        self.ensure_ready_for_generation()?;
        if outcome.questions.is_empty() {
            return Err(AppError::Internal(anyhow::anyhow!(
                "question generation produced an empty set"
            )));
        }

        let local_only = outcome.fallbacks.len() == outcome.questions.technologies().len();
        let message = if outcome.fallbacks.is_empty() {
            "Generated technical questions.".to_string()
        } else if local_only {
            "AI generation was unavailable, so I used the local question bank.".to_string()
        } else {
            let covered: Vec<&str> = outcome
                .fallbacks
                .iter()
                .map(|f| f.technology.as_str())
                .collect();
            format!(
                "Generated technical questions. The local question bank covered: {}.",
                covered.join(", ")
            )
        };

        self.questions = outcome.questions;
        self.fallbacks = outcome.fallbacks;
        self.phase = Phase::Interview;
        self.say(message);
        Ok(())
    }

    /// Scores and stores an answer, replacing any earlier answer to the same question.
    pub fn record_answer(&mut self, question_id: Uuid, answer: String) -> Result<AnswerRecord, AppError> {
        self.require_phase(&[Phase::Interview], "answer questions")?;
        let question = self
            .questions
            .get(question_id)
            .ok_or_else(|| AppError::NotFound(format!("Question {question_id} not found")))?;

        let record = AnswerRecord {
            question_id,
            score: score_answer(question, &answer),
            answer,
            answered_at: Utc::now(),
        };
        self.answers.insert(question_id, record.clone());
        Ok(record)
    }

    pub fn finalize(&mut self) -> Result<Evaluation, AppError> {
        self.require_phase(&[Phase::Interview], "finalize")?;
        let evaluation = evaluate_session(&self.questions, &self.answers);
        self.evaluation = Some(evaluation.clone());
        self.phase = Phase::Completed;
        self.say(evaluation.summary());
        self.say(CONCLUDED);
        Ok(evaluation)
    }

    /// Exit keyword. A completed session stays completed.
    pub fn end(&mut self) {
        if self.phase != Phase::Completed {
            self.phase = Phase::Ended;
        }
        self.say(FAREWELL);
    }

    /// Blank session under the same id.
    pub fn reset(&mut self) {
        *self = Self::with_id(self.id);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Session as returned to the UI, with the current information prompt attached.
#[derive(Debug, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub session: Session,
    pub info_prompt: String,
}

impl From<Session> for SessionView {
    fn from(session: Session) -> Self {
        let info_prompt = session.profile.info_prompt();
        Self {
            session,
            info_prompt,
        }
    }
}
