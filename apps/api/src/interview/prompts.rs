use crate::llm_client::prompts::{INTERVIEWER_PERSONA, NUMBERED_LIST_ONLY};
use crate::models::question::Difficulty;

/// Output budget for one technology's question list.
pub const QUESTION_MAX_TOKENS: u32 = 300;

/// Builds the per-technology question prompt. The difficulty sentence is only
/// added when the candidate actually gave their years of experience.
pub fn question_prompt(tech: &str, count: usize, difficulty: Difficulty, years: &str) -> String {
    let level = match difficulty {
        Difficulty::Beginner => "beginner",
        Difficulty::Intermediate => "intermediate",
        Difficulty::Advanced => "advanced",
    };
    let years = years.trim();
    let difficulty_sentence = if years.is_empty() {
        String::new()
    } else {
        format!(
            " Generate {level}-level questions suitable for someone with {years} years of experience."
        )
    };

    format!(
        "{INTERVIEWER_PERSONA} For the technology '{tech}', produce {count} concise, clear \
         technical questions that span conceptual, coding, and debugging/design.\
         {difficulty_sentence} {NUMBERED_LIST_ONLY}"
    )
}
