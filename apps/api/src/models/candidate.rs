use serde::{Deserialize, Serialize};

/// Candidate details collected through the details and tech-stack forms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    /// Kept as entered; parsed when difficulty is derived.
    pub years_experience: String,
    pub desired_positions: String,
    pub location: String,
    pub tech_stack: Vec<String>,
}

/// Details form payload. Absent fields are treated as blank.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub years_experience: Option<String>,
    #[serde(default)]
    pub desired_positions: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

const ALL_COLLECTED: &str = "All candidate info collected. Would you like me to generate \
    technical questions based on the provided tech stack?";

impl CandidateProfile {
    /// Copies the form into the profile, trimming every value. The tech stack is untouched.
    pub fn apply_form(&mut self, form: ProfileForm) {
        let clean = |v: Option<String>| v.unwrap_or_default().trim().to_string();
        self.full_name = clean(form.full_name);
        self.email = clean(form.email);
        self.phone = clean(form.phone);
        self.years_experience = clean(form.years_experience);
        self.desired_positions = clean(form.desired_positions);
        self.location = clean(form.location);
    }

    /// Labels of the required fields that are still blank, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let required: [(&str, bool); 7] = [
            ("Full Name", self.full_name.is_empty()),
            ("Email Address", self.email.is_empty()),
            ("Phone Number", self.phone.is_empty()),
            ("Years of Experience", self.years_experience.is_empty()),
            ("Desired Position(s)", self.desired_positions.is_empty()),
            ("Current Location", self.location.is_empty()),
            ("Tech Stack (comma-separated)", self.tech_stack.is_empty()),
        ];
        required
            .into_iter()
            .filter(|(_, missing)| *missing)
            .map(|(label, _)| label)
            .collect()
    }

    /// Short prompt asking only for what is still missing.
    pub fn info_prompt(&self) -> String {
        let missing = self.missing_fields();
        if missing.is_empty() {
            ALL_COLLECTED.to_string()
        } else {
            format!("Please provide: {}", missing.join(", "))
        }
    }
}

/// Splits a free-text stack on commas or semicolons. Case-insensitive duplicates
/// keep the first spelling.
pub fn parse_tech_stack(text: &str) -> Vec<String> {
    let mut stack: Vec<String> = Vec::new();
    for item in text.split([',', ';']) {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        if stack.iter().any(|t| t.eq_ignore_ascii_case(item)) {
            continue;
        }
        stack.push(item.to_string());
    }
    stack
}
