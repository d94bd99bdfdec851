use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::FieldError;
use crate::interview::difficulty::parse_years;
use crate::models::candidate::CandidateProfile;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+\d][\d\s-]{6,}$").expect("valid phone regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Checks every details field, collecting all problems instead of stopping at the first.
/// The tech stack is submitted separately and is not checked here.
pub fn validate_profile(profile: &CandidateProfile) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    let required: [(&'static str, &str, &str); 6] = [
        ("full_name", "Full Name", profile.full_name.as_str()),
        ("email", "Email", profile.email.as_str()),
        ("phone", "Phone", profile.phone.as_str()),
        ("years_experience", "Years of Experience", profile.years_experience.as_str()),
        ("desired_positions", "Desired Position(s)", profile.desired_positions.as_str()),
        ("location", "Current Location", profile.location.as_str()),
    ];
    for (field, label, value) in required {
        if value.is_empty() {
            errors.push(FieldError {
                field,
                message: format!("{label} is required"),
            });
        }
    }

    if !profile.email.is_empty() && !is_valid_email(&profile.email) {
        errors.push(FieldError {
            field: "email",
            message: "Use a valid email address, e.g. john.doe@email.com".to_string(),
        });
    }
    if !profile.phone.is_empty() && !is_valid_phone(&profile.phone) {
        errors.push(FieldError {
            field: "phone",
            message: "Use a valid phone number; include the country code if international, \
                e.g. +1 123-456-7890"
                .to_string(),
        });
    }
    if !profile.years_experience.is_empty() && parse_years(&profile.years_experience).is_none() {
        errors.push(FieldError {
            field: "years_experience",
            message: "Years of Experience must be a number, e.g. 0.5, 2 or 5+".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> CandidateProfile {
        CandidateProfile {
            full_name: "Jane Doe".into(),
            email: "a@b.com".into(),
            phone: "+91 98765 43210".into(),
            years_experience: "2".into(),
            desired_positions: "Data Scientist".into(),
            location: "Pune".into(),
            tech_stack: vec![],
        }
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("john.doe+jobs@mail.example.org"));
        assert!(!is_valid_email("abc"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@@b.com"));
    }

    #[test]
    fn test_phone_format() {
        assert!(is_valid_phone("+1 123-456-7890"));
        assert!(is_valid_phone("9876543210"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("call me"));
        assert!(!is_valid_phone("-1234567"));
    }

    #[test]
    fn test_valid_profile_passes() {
        assert!(validate_profile(&profile()).is_ok());
    }

    #[test]
    fn test_all_problems_are_reported() {
        let mut p = profile();
        p.email = "abc".into();
        p.phone = "x".into();
        p.years_experience = "many".into();
        p.location = String::new();

        let errors = validate_profile(&p).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["location", "email", "phone", "years_experience"]);
    }
}
