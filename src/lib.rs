//! Athlete Intake Service
//!
//! This library implements the submission funnel for a strongman coaching
//! business: the multi-step athlete-application form flow, the
//! consultation-booking form with timezone-aware scheduling, and the intake
//! web service the forms submit to.
//!
//! # Modules
//!
//! - `services::validation`: step-scoped validation rules
//! - `services::form_flow`: the application form's state machine
//! - `services::time_slots`: Stockholm availability projected into the
//!   visitor's timezone
//! - `services::database`: CSV record store for accepted submissions
//! - `client`: IntakeClient, the submission gateway
//! - `notifier`: MailNotifier, the email notification client
//! - `handlers` / `routes`: the intake endpoints themselves

pub mod client;
pub mod handlers;
pub mod models;
pub mod notifier;
pub mod routes;
pub mod services;

// Re-export the main types for ease of use
pub use client::{IntakeClient, SubmissionError};
pub use handlers::api::AppState;
pub use models::application::{ApplicationForm, ApplicationPayload, TrainingLevel};
pub use models::booking::{BookingForm, BookingPayload};
pub use routes::create_router;
pub use services::form_flow::{ApplicationFlow, FormStep};


#[cfg(test)]
#[path = "integration_tests.rs"]
mod integration_tests;
