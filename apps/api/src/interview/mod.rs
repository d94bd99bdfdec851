// Interview engine: difficulty placement, local question bank, AI generation with
// local fallback, and answer scoring. All AI calls go through llm_client.

pub mod difficulty;
pub mod evaluator;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod question_bank;
