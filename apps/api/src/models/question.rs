use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
    Experience,
    Conceptual,
    Coding,
    Debugging,
    Design,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionSource {
    Local,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub technology: String,
    pub text: String,
    pub difficulty: Difficulty,
    pub category: QuestionCategory,
    pub expected_keywords: Vec<String>,
    pub source: QuestionSource,
}

/// Ordered questions, grouped by technology in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionSet(Vec<Question>);

impl QuestionSet {
    pub fn new(questions: Vec<Question>) -> Self {
        Self(questions)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.0.iter()
    }

    pub fn get(&self, id: Uuid) -> Option<&Question> {
        self.0.iter().find(|q| q.id == id)
    }

    /// Technologies in the order their questions appear.
    pub fn technologies(&self) -> Vec<&str> {
        let mut techs: Vec<&str> = Vec::new();
        for q in &self.0 {
            if !techs.contains(&q.technology.as_str()) {
                techs.push(&q.technology);
            }
        }
        techs
    }
}
