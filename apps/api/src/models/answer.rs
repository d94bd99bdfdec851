use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Score for a single answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerScore {
    /// 0 for a blank answer, otherwise 1 – 5.
    pub stars: u8,
    /// Share of the question's expected keywords found in the answer, 0.0 – 1.0.
    pub overlap_ratio: f32,
    pub matched_keywords: Vec<String>,
    /// Completeness heuristic, 0 – 10.
    pub points: u8,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: Uuid,
    pub answer: String,
    pub score: AnswerScore,
    pub answered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Excellent,
    Good,
    Average,
    NeedsImprovement,
}

impl Rating {
    pub fn from_percentage(pct: f32) -> Self {
        if pct >= 80.0 {
            Rating::Excellent
        } else if pct >= 60.0 {
            Rating::Good
        } else if pct >= 40.0 {
            Rating::Average
        } else {
            Rating::NeedsImprovement
        }
    }

    pub fn stars(self) -> u8 {
        match self {
            Rating::Excellent => 5,
            Rating::Good => 4,
            Rating::Average => 3,
            Rating::NeedsImprovement => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent",
            Rating::Good => "Good",
            Rating::Average => "Average",
            Rating::NeedsImprovement => "Needs Improvement",
        }
    }
}

/// Whole-session summary produced at finalize time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub answered: usize,
    pub total_questions: usize,
    pub total_points: u32,
    pub max_points: u32,
    pub percentage: f32,
    pub average_stars: f32,
    pub rating: Option<Rating>,
}

impl Evaluation {
    /// One-line result shown to the candidate when the interview is finalized.
    pub fn summary(&self) -> String {
        match self.rating {
            Some(rating) => format!(
                "You answered {} of {} questions and scored {}/{} ({:.1}%). Overall: {} {}",
                self.answered,
                self.total_questions,
                self.total_points,
                self.max_points,
                self.percentage,
                rating.label(),
                "★".repeat(usize::from(rating.stars())),
            ),
            None => "No questions were asked, so there is nothing to score.".to_string(),
        }
    }
}
