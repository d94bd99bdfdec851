use crate::models::question::Difficulty;

/// Years below this are beginner level.
pub const INTERMEDIATE_FROM_YEARS: f32 = 2.0;
/// Years at or above this are advanced level.
pub const ADVANCED_FROM_YEARS: f32 = 5.0;

/// Maps the free-text years-of-experience field to a question difficulty.
/// Blank or unparseable input is treated as no experience.
pub fn difficulty_for(years_text: &str) -> Difficulty {
    let years = parse_years(years_text).unwrap_or(0.0);
    if years >= ADVANCED_FROM_YEARS {
        Difficulty::Advanced
    } else if years >= INTERMEDIATE_FROM_YEARS {
        Difficulty::Intermediate
    } else {
        Difficulty::Beginner
    }
}

/// Accepts plain numbers plus a trailing `+` or "years" suffix ("5+", "3 years").
pub fn parse_years(text: &str) -> Option<f32> {
    let lowered = text.trim().to_lowercase();
    let cleaned = lowered
        .trim_end_matches("years")
        .trim_end_matches("year")
        .trim_end_matches("yrs")
        .trim()
        .trim_end_matches('+')
        .trim();
    cleaned
        .parse::<f32>()
        .ok()
        .filter(|y| y.is_finite() && *y >= 0.0)
}
