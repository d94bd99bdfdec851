use crate::models::candidate::CandidateProfile;

/// `john.doe@x.com` becomes `jo***@x.com`.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let head: String = local.chars().take(2).collect();
            format!("{head}***@{domain}")
        }
        None if email.is_empty() => String::new(),
        None => "***".to_string(),
    }
}

/// Keeps all but the last four digits: `+1 123-456-7890` becomes `+1123456****`.
pub fn mask_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if phone.is_empty() {
        String::new()
    } else if digits.len() > 4 {
        format!("+{}****", &digits[..digits.len() - 4])
    } else {
        "****".to_string()
    }
}

/// Copy of the profile with contact details masked. Everything else is kept.
pub fn anonymize(profile: &CandidateProfile) -> CandidateProfile {
    CandidateProfile {
        email: mask_email(&profile.email),
        phone: mask_phone(&profile.phone),
        ..profile.clone()
    }
}
