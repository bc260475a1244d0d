use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::models::application::ApplicationForm;
use crate::models::booking::BookingForm;
use crate::services::time_slots::is_bookable_date;
use chrono::NaiveDate;

// Permissive on purpose: one "@", at least one "." after it, no whitespace.
// Full RFC validation rejects too many real addresses.
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern must compile"));

pub const MIN_AGE: i32 = 13;
pub const MAX_AGE: i32 = 100;

/// First failing field of a validation pass, with a message suitable for
/// showing inline next to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: &'static str,
}

impl ValidationError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check whether an email address matches the permissive pattern.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Validate one step of the application form, stopping at the first
/// failing field. Steps outside 1..=3 always pass.
pub fn validate_step(form: &ApplicationForm, step: u8) -> Result<(), ValidationError> {
    match step {
        1 => validate_identity(form),
        2 => validate_background(form),
        3 => validate_goals(form),
        _ => Ok(()),
    }
}

/// Step 1: identity fields.
pub fn validate_identity(form: &ApplicationForm) -> Result<(), ValidationError> {
    if form.full_name.trim().is_empty() {
        return Err(ValidationError::new("fullName", "Please enter your full name"));
    }
    if !is_valid_email(form.email.trim()) {
        return Err(ValidationError::new("email", "Please enter a valid email address"));
    }
    match form.age.trim().parse::<i32>() {
        Ok(age) if (MIN_AGE..=MAX_AGE).contains(&age) => {}
        _ => {
            return Err(ValidationError::new(
                "age",
                "Please enter an age between 13 and 100",
            ))
        }
    }
    if form.country_timezone.trim().is_empty() {
        return Err(ValidationError::new(
            "countryTimezone",
            "Please enter your country and timezone",
        ));
    }
    Ok(())
}

/// Step 2: athletic background. The coach-experience text is shown only
/// when the athlete answered yes, but it is never required either way.
pub fn validate_background(form: &ApplicationForm) -> Result<(), ValidationError> {
    if form.training_level.is_none() {
        return Err(ValidationError::new(
            "trainingLevel",
            "Please select your training level",
        ));
    }
    if form.is_competitive.is_none() {
        return Err(ValidationError::new(
            "isCompetitive",
            "Please tell us whether you compete",
        ));
    }
    if form.training_history.trim().is_empty() {
        return Err(ValidationError::new(
            "trainingHistory",
            "Please describe your training history",
        ));
    }
    if form.has_worked_with_coach.is_none() {
        return Err(ValidationError::new(
            "hasWorkedWithCoach",
            "Please tell us whether you have worked with a coach",
        ));
    }
    Ok(())
}

/// Step 3: goals and consent.
pub fn validate_goals(form: &ApplicationForm) -> Result<(), ValidationError> {
    if form.short_term_goals.trim().is_empty() {
        return Err(ValidationError::new(
            "shortTermGoals",
            "Please describe your short-term goals",
        ));
    }
    if form.long_term_goals.trim().is_empty() {
        return Err(ValidationError::new(
            "longTermGoals",
            "Please describe your long-term goals",
        ));
    }
    if form.motivation.trim().is_empty() {
        return Err(ValidationError::new(
            "motivation",
            "Please tell us what motivates you",
        ));
    }
    if !form.gdpr_consent {
        return Err(ValidationError::new(
            "gdprConsent",
            "You must consent to data processing to submit",
        ));
    }
    Ok(())
}

/// Validate a consultation booking against today's date.
pub fn validate_booking(form: &BookingForm, today: NaiveDate) -> Result<(), ValidationError> {
    if form.name.trim().is_empty() {
        return Err(ValidationError::new("name", "Please enter your full name"));
    }
    if !is_valid_email(form.email.trim()) {
        return Err(ValidationError::new("email", "Please enter a valid email address"));
    }
    match form.selected_date {
        None => {
            return Err(ValidationError::new(
                "preferredDate",
                "Please select a date for your consultation",
            ))
        }
        Some(date) if !is_bookable_date(date, today) => {
            return Err(ValidationError::new(
                "preferredDate",
                "Consultations are available on weekdays from today onwards",
            ))
        }
        Some(_) => {}
    }
    if form.selected_slot.is_none() {
        return Err(ValidationError::new(
            "preferredTime",
            "Please select a time slot",
        ));
    }
    Ok(())
}
