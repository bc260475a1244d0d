use serde::{Deserialize, Serialize};

/// Training levels offered on the application form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl TrainingLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingLevel::Beginner => "beginner",
            TrainingLevel::Intermediate => "intermediate",
            TrainingLevel::Advanced => "advanced",
        }
    }
}

/// In-progress athlete application, one field per form input.
///
/// Text fields hold raw user input (age included, since the input box
/// accepts arbitrary text). Radio questions are `None` until answered,
/// which keeps "not answered yet" distinct from either answer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationForm {
    // Step 1: identity
    pub full_name: String,
    pub email: String,
    pub age: String,
    pub country_timezone: String,

    // Step 2: athletic background
    pub training_level: Option<TrainingLevel>,
    pub is_competitive: Option<bool>,
    pub training_history: String,
    pub has_worked_with_coach: Option<bool>,
    pub coach_experience: String,

    // Step 3: goals and consent
    pub why_work_with_me: String,
    pub short_term_goals: String,
    pub long_term_goals: String,
    pub motivation: String,
    pub gdpr_consent: bool,
}

/// Wire shape accepted by the application intake endpoint.
///
/// Optional free-text fields are `None` when the athlete left them blank,
/// and are omitted from the serialized body entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPayload {
    pub full_name: String,
    pub email: String,
    pub age: i32,
    pub country_timezone: String,
    pub training_level: TrainingLevel,
    pub is_competitive: bool,
    pub training_history: String,
    pub has_worked_with_coach: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coach_experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub why_work_with_me: Option<String>,
    pub short_term_goals: String,
    pub long_term_goals: String,
    pub motivation: String,
    pub gdpr_consent: bool,
}

/// Trimmed copy of a free-text input, or `None` when nothing was typed.
pub fn optional_text(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
