//! Free-text chat intents. Classification is keyword based and checked in a fixed
//! order, so a message asking about "experience" gets field help before it could be
//! read as anything else.

use crate::interview::evaluator::tokenize;
use crate::models::candidate::parse_tech_stack;

/// Longest chat message accepted, in characters.
pub const MAX_MESSAGE_CHARS: usize = 2_000;

pub const EXIT_KEYWORDS: &[&str] = &["exit", "quit", "bye", "stop", "end"];

pub const HELP_TEXT: &str = "Commands:\n- Provide Details\n- Enter Tech Stack\n- Generate Questions \
    (say 'generate ai' for AI-written questions)\n- exit/quit to end\n\nYou can also ask questions like \
    'What do I write in desired positions?' or 'How do I fill the tech stack?'";

pub const FALLBACK_MESSAGE: &str = "I'm here to help! I can:\n\
    • Collect your details (use 'Provide Details' button)\n\
    • Generate technical questions based on your tech stack\n\
    • Answer questions about filling the form (try asking 'What do I write in desired positions?')\n\n\
    Type 'help' for commands or ask me about any form field!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    DesiredPosition,
    TechStack,
    Experience,
    Contact,
    Name,
}

impl FormField {
    pub fn guidance(self) -> &'static str {
        match self {
            FormField::DesiredPosition => {
                "For Desired Position(s), write the job roles you're interested in. Examples:\n\
                 • AI/ML Engineer Intern\n• Software Engineer\n• Data Scientist\n\
                 • Full Stack Developer\n• Python Developer, Backend Engineer (for multiple positions)\n\n\
                 Match it with your tech stack and experience level!"
            }
            FormField::TechStack => {
                "For Tech Stack, list technologies you know separated by commas. Examples:\n\
                 • Python, Django, PostgreSQL, AWS\n• JavaScript, React, Node.js, MongoDB\n\
                 • Java, Spring Boot, MySQL\n• Python, TensorFlow, Pandas, scikit-learn\n\n\
                 Include programming languages, frameworks, databases, and tools you're proficient in!"
            }
            FormField::Experience => {
                "For Years of Experience, enter a number representing your total programming/technical experience:\n\
                 • 0 or 0.5 for beginners/students\n• 1-2 for junior level\n• 3-5 for mid-level\n\
                 • 5+ for senior level\n\nInclude internships, projects, and professional work!"
            }
            FormField::Contact => {
                "For contact information:\n\
                 • Email: Use a professional email address (e.g., john.doe@email.com)\n\
                 • Phone: Include country code if international (e.g., +1 123-456-7890)\n\
                 • Location: City, State/Country (e.g., San Francisco, CA or Mumbai, India)"
            }
            FormField::Name => {
                "For Full Name, enter your complete name as you'd like it to appear professionally.\n\
                 Example: John Smith or Jane Doe"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Exit,
    Help,
    FormHelp(FormField),
    DeclareStack(Vec<String>),
    Generate { ai: bool },
    Fallback,
}

const FIELD_KEYWORDS: &[(FormField, &[&str])] = &[
    (FormField::DesiredPosition, &["desired position", "position", "job title", "role"]),
    (FormField::TechStack, &["tech stack", "technology", "programming", "skills"]),
    (FormField::Experience, &["experience", "years", "how long"]),
    (FormField::Contact, &["email", "phone", "contact"]),
    (FormField::Name, &["name", "full name"]),
];

pub fn classify(text: &str) -> Intent {
    let lowered = text.trim().to_lowercase();

    if EXIT_KEYWORDS.contains(&lowered.as_str()) {
        return Intent::Exit;
    }
    if lowered == "help" {
        return Intent::Help;
    }

    for (field, keywords) in FIELD_KEYWORDS {
        if keywords.iter().any(|k| lowered.contains(k)) {
            return Intent::FormHelp(*field);
        }
    }

    if lowered.contains(',') && lowered.chars().any(char::is_alphabetic) {
        let stack = parse_tech_stack(text);
        if !stack.is_empty() {
            return Intent::DeclareStack(stack);
        }
    }

    if lowered.contains("generate") {
        let tokens = tokenize(&lowered);
        let ai = tokens.iter().any(|t| t == "ai" || t == "smart");
        return Intent::Generate { ai };
    }

    Intent::Fallback
}
