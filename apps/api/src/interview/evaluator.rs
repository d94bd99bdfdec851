//! Response evaluator: keyword overlap plus a completeness heuristic.
//!
//! Stars (0–5) come from the share of a question's expected keywords found in the
//! answer. Points (0–10) reward length, technical vocabulary and references to
//! hands-on experience. Both are pure functions of the answer text.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::models::answer::{AnswerRecord, AnswerScore, Evaluation, Rating};
use crate::models::question::{Question, QuestionSet};

pub const MAX_POINTS_PER_ANSWER: u8 = 10;

const TECH_TERMS: &[&str] = &[
    "algorithm", "data", "code", "function", "method", "class", "performance",
    "optimization", "debugging", "testing", "design", "architecture", "database", "api",
    "framework", "library",
];

const EXPERIENCE_INDICATORS: &[&str] =
    &["project", "experience", "used", "implemented", "worked", "built"];

/// Lowercase word tokens. `+` and `#` stay inside tokens so "c++" and "c#" survive.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Star rating for an overlap ratio. Non-decreasing in `ratio`; never below 1.
pub fn stars_for_ratio(ratio: f32) -> u8 {
    if ratio >= 0.8 {
        5
    } else if ratio >= 0.6 {
        4
    } else if ratio >= 0.4 {
        3
    } else if ratio >= 0.2 {
        2
    } else {
        1
    }
}

/// Scores one answer against its question. A blank answer scores zero everywhere.
pub fn score_answer(question: &Question, answer: &str) -> AnswerScore {
    let answer = answer.trim();
    if answer.is_empty() {
        return AnswerScore {
            stars: 0,
            overlap_ratio: 0.0,
            matched_keywords: vec![],
            points: 0,
            feedback: "No response provided".to_string(),
        };
    }

    let answer_tokens: HashSet<String> = tokenize(answer).into_iter().collect();

    let mut expected: Vec<&str> = Vec::new();
    for keyword in &question.expected_keywords {
        let keyword = keyword.as_str();
        if !expected.contains(&keyword) {
            expected.push(keyword);
        }
    }

    let matched_keywords: Vec<String> = expected
        .iter()
        .filter(|k| answer_tokens.contains(**k))
        .map(|k| k.to_string())
        .collect();

    let overlap_ratio = if expected.is_empty() {
        0.0
    } else {
        matched_keywords.len() as f32 / expected.len() as f32
    };

    let (points, feedback) = completeness_points(answer);

    AnswerScore {
        stars: stars_for_ratio(overlap_ratio),
        overlap_ratio,
        matched_keywords,
        points,
        feedback,
    }
}

fn completeness_points(answer: &str) -> (u8, String) {
    let mut points = 0u8;
    let mut feedback: Vec<&str> = Vec::new();

    let length = answer.chars().count();
    if length > 50 {
        points += 3;
        feedback.push("Good response length");
    } else if length > 20 {
        points += 2;
        feedback.push("Adequate response length");
    } else {
        points += 1;
        feedback.push("Brief response");
    }

    let lowered = answer.to_lowercase();
    let term_count = TECH_TERMS.iter().filter(|t| lowered.contains(*t)).count();
    if term_count >= 3 {
        points += 4;
        feedback.push("Good use of technical terminology");
    } else if term_count >= 1 {
        points += 2;
        feedback.push("Some technical terminology used");
    }

    if EXPERIENCE_INDICATORS.iter().any(|i| lowered.contains(i)) {
        points += 3;
        feedback.push("Mentions practical experience");
    }

    (points.min(MAX_POINTS_PER_ANSWER), feedback.join("; "))
}

/// Summarises a session. Unanswered questions count toward the maximum with zero points.
pub fn evaluate_session(
    questions: &QuestionSet,
    answers: &HashMap<Uuid, AnswerRecord>,
) -> Evaluation {
    let total_questions = questions.len();
    let mut answered = 0;
    let mut total_points = 0u32;
    let mut total_stars = 0u32;

    for question in questions.iter() {
        if let Some(record) = answers.get(&question.id) {
            if !record.answer.trim().is_empty() {
                answered += 1;
            }
            total_points += u32::from(record.score.points);
            total_stars += u32::from(record.score.stars);
        }
    }

    let max_points = total_questions as u32 * u32::from(MAX_POINTS_PER_ANSWER);
    let percentage = if max_points > 0 {
        total_points as f32 / max_points as f32 * 100.0
    } else {
        0.0
    };
    let average_stars = if total_questions > 0 {
        total_stars as f32 / total_questions as f32
    } else {
        0.0
    };

    Evaluation {
        answered,
        total_questions,
        total_points,
        max_points,
        percentage,
        average_stars,
        rating: (max_points > 0).then(|| Rating::from_percentage(percentage)),
    }
}
