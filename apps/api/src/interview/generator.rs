//! Question generation for a whole tech stack.
//!
//! Flow per technology: AI (when requested and configured) under a timeout,
//! then numbered-list parsing, then a local fill for any shortfall. Every AI failure falls
//! back to the local generator for that technology; generation never fails.

use std::time::{Duration, Instant};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::interview::difficulty::difficulty_for;
use crate::interview::evaluator::tokenize;
use crate::interview::prompts::{question_prompt, QUESTION_MAX_TOKENS};
use crate::interview::question_bank::{generate_local, MAX_QUESTIONS, MIN_QUESTIONS};
use crate::llm_client::{LlmError, TextGenerator};
use crate::models::question::{Difficulty, Question, QuestionCategory, QuestionSet, QuestionSource};

static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:\d+\s*[.):-]?|[-*•])\s*").expect("valid list marker regex"));

/// Words too common in interview questions to count as answer keywords.
const QUESTION_STOPWORDS: &[&str] = &[
    "about", "which", "would", "their", "there", "these", "those", "where", "while", "what",
    "when", "explain", "describe", "difference", "between", "example", "examples", "using",
    "should", "could", "other", "provide", "give", "your", "they", "them", "that", "this",
    "with", "from", "have", "into", "does", "some", "like", "each", "make", "being",
];
const MAX_DERIVED_KEYWORDS: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    #[default]
    Local,
    Ai,
}

impl GenerationMode {
    pub fn from_ai_flag(ai: bool) -> Self {
        if ai {
            GenerationMode::Ai
        } else {
            GenerationMode::Local
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GenerationSettings {
    pub per_tech: usize,
    pub mode: GenerationMode,
}

/// Why a technology was served by the local generator despite an AI request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackNote {
    pub technology: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub questions: QuestionSet,
    pub difficulty: Difficulty,
    pub fallbacks: Vec<FallbackNote>,
}

/// Generates questions for every technology in `stack`, in order.
pub async fn generate_for_stack(
    stack: &[String],
    years: &str,
    settings: GenerationSettings,
    ai: Option<&dyn TextGenerator>,
    timeout: Duration,
) -> GenerationOutcome {
    let difficulty = difficulty_for(years);
    let per_tech = settings.per_tech.clamp(MIN_QUESTIONS, MAX_QUESTIONS);
    let total_start = Instant::now();

    let mut questions = Vec::new();
    let mut fallbacks = Vec::new();

    for (i, tech) in stack.iter().enumerate() {
        let tech_start = Instant::now();
        info!(
            "Generating {per_tech} {difficulty:?} questions for {tech} ({}/{})",
            i + 1,
            stack.len()
        );

        let generated = match (settings.mode, ai) {
            (GenerationMode::Local, _) => generate_local(tech, per_tech, difficulty),
            (GenerationMode::Ai, None) => {
                warn!("AI generation requested for {tech} but no API key is configured");
                fallbacks.push(FallbackNote {
                    technology: tech.clone(),
                    reason: LlmError::Disabled.to_string(),
                });
                generate_local(tech, per_tech, difficulty)
            }
            (GenerationMode::Ai, Some(ai)) => {
                match generate_with_ai(ai, tech, per_tech, difficulty, years, timeout).await {
                    Ok(qs) => qs,
                    Err(e) => {
                        warn!("AI generation for {tech} failed, using local generator: {e}");
                        fallbacks.push(FallbackNote {
                            technology: tech.clone(),
                            reason: e.to_string(),
                        });
                        generate_local(tech, per_tech, difficulty)
                    }
                }
            }
        };

        info!(
            "{tech} questions ready in {:.2}s",
            tech_start.elapsed().as_secs_f32()
        );
        questions.extend(generated);
    }

    info!(
        "Generated {} questions for {} technologies in {:.2}s",
        questions.len(),
        stack.len(),
        total_start.elapsed().as_secs_f32()
    );

    GenerationOutcome {
        questions: QuestionSet::new(questions),
        difficulty,
        fallbacks,
    }
}

async fn generate_with_ai(
    ai: &dyn TextGenerator,
    tech: &str,
    count: usize,
    difficulty: Difficulty,
    years: &str,
    timeout: Duration,
) -> Result<Vec<Question>, LlmError> {
    let prompt = question_prompt(tech, count, difficulty, years);

    let text = tokio::time::timeout(timeout, ai.complete(&prompt, QUESTION_MAX_TOKENS))
        .await
        .map_err(|_| LlmError::Timeout(timeout))??;

    let lines = parse_numbered_list(&text);
    if lines.is_empty() {
        return Err(LlmError::EmptyContent);
    }

    let mut questions: Vec<Question> = lines
        .into_iter()
        .take(count)
        .map(|line| ai_question(tech, line, difficulty))
        .collect();

    if questions.len() < count {
        info!(
            "AI produced {} questions for {tech}, filling remaining with local generator",
            questions.len()
        );
        let missing = count - questions.len();
        questions.extend(generate_local(tech, count, difficulty).into_iter().take(missing));
    }

    Ok(questions)
}

/// Extracts question lines from a model reply. When some lines carry list markers,
/// unmarked lines (preambles like "Here are four questions:") are dropped.
pub fn parse_numbered_list(text: &str) -> Vec<String> {
    let lines: Vec<String> = text
        .lines()
        .map(|l| l.replace("**", "").trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    let any_marked = lines.iter().any(|l| starts_with_marker(l));

    lines
        .into_iter()
        .filter(|l| !any_marked || starts_with_marker(l))
        .map(|l| LIST_MARKER.replace(&l, "").trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

fn starts_with_marker(line: &str) -> bool {
    line.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '*' || c == '•')
}

fn ai_question(tech: &str, text: String, difficulty: Difficulty) -> Question {
    Question {
        id: Uuid::new_v4(),
        technology: tech.to_string(),
        category: infer_category(&text),
        expected_keywords: derive_keywords(&text, tech),
        text,
        difficulty,
        source: QuestionSource::Ai,
    }
}

fn infer_category(text: &str) -> QuestionCategory {
    let lowered = text.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| lowered.contains(w));
    if has(&["debug", "troubleshoot", "diagnose", "fails", "bug"]) {
        QuestionCategory::Debugging
    } else if has(&["write", "implement", "code", "snippet", "query"]) {
        QuestionCategory::Coding
    } else if has(&["design", "architect", "scale", "scalab", "structure"]) {
        QuestionCategory::Design
    } else if has(&["project", "experience", "your role"]) {
        QuestionCategory::Experience
    } else {
        QuestionCategory::Conceptual
    }
}

/// Keywords for AI questions: the distinctive words of the question plus the tech name.
fn derive_keywords(question: &str, tech: &str) -> Vec<String> {
    let tech_tokens = tokenize(tech);
    let mut keywords: Vec<String> = Vec::new();
    for token in tokenize(question) {
        if keywords.len() >= MAX_DERIVED_KEYWORDS {
            break;
        }
        if token.len() < 4
            || QUESTION_STOPWORDS.contains(&token.as_str())
            || tech_tokens.contains(&token)
            || keywords.contains(&token)
        {
            continue;
        }
        keywords.push(token);
    }
    keywords.extend(tech_tokens);
    keywords.dedup();
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scripted(String);

    #[async_trait]
    impl TextGenerator for Scripted {
        async fn complete(&self, _prompt: &str, _max_tokens: u32) -> Result<String, LlmError> {
            Ok(self.0.clone())
        }
    }

    /// Simulates a network failure on every call.
    struct Unreachable(AtomicUsize);

    #[async_trait]
    impl TextGenerator for Unreachable {
        async fn complete(&self, _prompt: &str, _max_tokens: u32) -> Result<String, LlmError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(LlmError::Api {
                status: 503,
                message: "connection reset by peer".to_string(),
            })
        }
    }

    struct Stalled;

    #[async_trait]
    impl TextGenerator for Stalled {
        async fn complete(&self, _prompt: &str, _max_tokens: u32) -> Result<String, LlmError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("1. too late".to_string())
        }
    }

    fn stack(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    const AI: GenerationSettings = GenerationSettings {
        per_tech: 4,
        mode: GenerationMode::Ai,
    };

    #[test]
    fn test_parse_numbered_list_strips_markers_and_preamble() {
        let reply = "Here are four questions:\n\n1. What is ownership?\n2) Explain traits.\n  3 - How do lifetimes work?\n**4.** Write a parser.";
        let lines = parse_numbered_list(reply);
        assert_eq!(
            lines,
            vec![
                "What is ownership?",
                "Explain traits.",
                "How do lifetimes work?",
                "Write a parser."
            ]
        );
    }

    #[test]
    fn test_parse_unnumbered_reply_keeps_all_lines() {
        let lines = parse_numbered_list("What is a trait?\nWhat is a closure?");
        assert_eq!(lines.len(), 2);
    }

    #[tokio::test]
    async fn test_local_mode_never_calls_ai() {
        let ai = Unreachable(AtomicUsize::new(0));
        let settings = GenerationSettings {
            per_tech: 4,
            mode: GenerationMode::Local,
        };
        let outcome = generate_for_stack(
            &stack(&["Python", "AWS"]),
            "3",
            settings,
            Some(&ai),
            Duration::from_secs(5),
        )
        .await;
        assert_eq!(outcome.questions.len(), 8);
        assert_eq!(ai.0.load(Ordering::SeqCst), 0);
        assert!(outcome.fallbacks.is_empty());
        assert_eq!(outcome.difficulty, Difficulty::Intermediate);
    }

    #[tokio::test]
    async fn test_network_error_falls_back_to_local() {
        let ai = Unreachable(AtomicUsize::new(0));
        let outcome = generate_for_stack(
            &stack(&["Rust", "React"]),
            "6",
            AI,
            Some(&ai),
            Duration::from_secs(5),
        )
        .await;

        assert_eq!(ai.0.load(Ordering::SeqCst), 2);
        assert_eq!(outcome.questions.len(), 8);
        assert!(outcome.questions.iter().all(|q| q.source == QuestionSource::Local));
        assert_eq!(outcome.fallbacks.len(), 2);
        assert!(outcome.fallbacks[0].reason.contains("503"));
        assert_eq!(outcome.questions.technologies(), vec!["Rust", "React"]);
    }

    #[tokio::test]
    async fn test_ai_without_backend_falls_back() {
        let outcome =
            generate_for_stack(&stack(&["Go"]), "", AI, None, Duration::from_secs(5)).await;
        assert_eq!(outcome.questions.len(), 4);
        assert_eq!(outcome.fallbacks.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back_to_local() {
        let outcome = generate_for_stack(
            &stack(&["Kotlin"]),
            "1",
            AI,
            Some(&Stalled),
            Duration::from_secs(30),
        )
        .await;
        assert_eq!(outcome.questions.len(), 4);
        assert!(outcome.fallbacks[0].reason.contains("timed out"));
    }

    #[tokio::test]
    async fn test_short_ai_reply_is_filled_locally() {
        let ai = Scripted("1. How does Rust's borrow checker prevent data races?".to_string());
        let outcome =
            generate_for_stack(&stack(&["Rust"]), "3", AI, Some(&ai), Duration::from_secs(5))
                .await;

        let qs: Vec<&Question> = outcome.questions.iter().collect();
        assert_eq!(qs.len(), 4);
        assert_eq!(qs[0].source, QuestionSource::Ai);
        assert!(qs[1..].iter().all(|q| q.source == QuestionSource::Local));
        assert!(outcome.fallbacks.is_empty());
    }

    #[tokio::test]
    async fn test_long_ai_reply_is_truncated() {
        let reply = (1..=9)
            .map(|i| format!("{i}. Question number {i} about caching?"))
            .collect::<Vec<_>>()
            .join("\n");
        let ai = Scripted(reply);
        let outcome =
            generate_for_stack(&stack(&["Redis"]), "", AI, Some(&ai), Duration::from_secs(5))
                .await;
        assert_eq!(outcome.questions.len(), 4);
        assert!(outcome.questions.iter().all(|q| q.source == QuestionSource::Ai));
    }

    #[tokio::test]
    async fn test_empty_ai_reply_falls_back() {
        let ai = Scripted("   \n".to_string());
        let outcome =
            generate_for_stack(&stack(&["SQL"]), "", AI, Some(&ai), Duration::from_secs(5)).await;
        assert_eq!(outcome.questions.len(), 4);
        assert_eq!(outcome.fallbacks.len(), 1);
    }

    #[test]
    fn test_derive_keywords_skips_stopwords_and_appends_tech() {
        let keywords = derive_keywords(
            "Explain the difference between ownership and borrowing in Rust.",
            "Rust",
        );
        assert_eq!(keywords, vec!["ownership", "borrowing", "rust"]);
    }

    #[test]
    fn test_infer_category() {
        assert_eq!(infer_category("How would you debug a deadlock?"), QuestionCategory::Debugging);
        assert_eq!(infer_category("Write a function to merge lists."), QuestionCategory::Coding);
        assert_eq!(infer_category("What is a monad?"), QuestionCategory::Conceptual);
    }
}
