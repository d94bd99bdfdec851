// Shared prompt fragments. The interview module builds its own prompts on top of these.

/// Persona line that opens every interviewer prompt.
pub const INTERVIEWER_PERSONA: &str = "You are an expert technical interviewer.";

/// Output-shape instruction the numbered-list parser relies on.
pub const NUMBERED_LIST_ONLY: &str = "Return them as a numbered list only.";
