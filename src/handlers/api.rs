use axum::{
    extract::{Json as ExtractJson, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{error, info};

use crate::models::application::ApplicationPayload;
use crate::models::booking::BookingPayload;
use crate::models::common::{ErrorResponse, IntakeResponse};
use crate::notifier::{application_email, consultation_email, MailNotifier};
use crate::services::database::DatabaseService;

// AppState struct containing shared resources
pub struct AppState {
    pub notifier: MailNotifier,
    pub database: Arc<DatabaseService>,
    pub skip_email_notification: bool,
}

/// Failure inside an intake handler. All variants map to HTTP 500 with an
/// `{"error": ...}` body; persistence and notification are one logical
/// unit from the submitter's point of view.
#[derive(Debug)]
pub enum IntakeError {
    MissingFields,
    Storage(String),
    Notification(String),
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        let error = match self {
            IntakeError::MissingFields => "Missing required fields".to_string(),
            IntakeError::Storage(_) => "Failed to save submission".to_string(),
            IntakeError::Notification(_) => "Failed to send notification".to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error })).into_response()
    }
}

// Application intake endpoint
pub async fn submit_application(
    State(state): State<Arc<AppState>>,
    ExtractJson(payload): ExtractJson<ApplicationPayload>,
) -> Result<Json<IntakeResponse>, IntakeError> {
    info!(
        "Received application submission from {} <{}>",
        payload.full_name, payload.email
    );

    // Never trust client-side validation alone
    check_application_fields(&payload)?;

    if let Err(e) = state.database.store_application(&payload) {
        error!("Failed to store application: {}", e);
        return Err(IntakeError::Storage(e));
    }

    if state.skip_email_notification {
        info!("Email notification skipped (simulation mode)");
    } else {
        let (subject, html) = application_email(&payload);
        if let Err(e) = state.notifier.send(&subject, &html, &payload.email).await {
            error!("Failed to send application notification: {}", e);
            return Err(IntakeError::Notification(e.to_string()));
        }
    }

    info!("Application from {} accepted", payload.email);
    Ok(Json(IntakeResponse { success: true }))
}

// Consultation intake endpoint
pub async fn submit_consultation(
    State(state): State<Arc<AppState>>,
    ExtractJson(payload): ExtractJson<BookingPayload>,
) -> Result<Json<IntakeResponse>, IntakeError> {
    info!(
        "Received consultation request from {} <{}> for {} at {}",
        payload.name, payload.email, payload.preferred_date, payload.preferred_time
    );

    check_consultation_fields(&payload)?;

    if let Err(e) = state.database.store_consultation(&payload) {
        error!("Failed to store consultation request: {}", e);
        return Err(IntakeError::Storage(e));
    }

    if state.skip_email_notification {
        info!("Email notification skipped (simulation mode)");
    } else {
        let (subject, html) = consultation_email(&payload);
        if let Err(e) = state.notifier.send(&subject, &html, &payload.email).await {
            error!("Failed to send consultation notification: {}", e);
            return Err(IntakeError::Notification(e.to_string()));
        }
    }

    info!("Consultation request from {} accepted", payload.email);
    Ok(Json(IntakeResponse { success: true }))
}

// Presence checks mirroring the client-side rules. Optional fields
// (coach experience, why-work-with-me, booking message) are never checked.
fn check_application_fields(payload: &ApplicationPayload) -> Result<(), IntakeError> {
    let required = [
        &payload.full_name,
        &payload.email,
        &payload.country_timezone,
        &payload.training_history,
        &payload.short_term_goals,
        &payload.long_term_goals,
        &payload.motivation,
    ];

    if required.iter().any(|field| field.trim().is_empty()) {
        error!("Application submission is missing required fields");
        return Err(IntakeError::MissingFields);
    }

    if payload.age == 0 {
        error!("Application submission has no age");
        return Err(IntakeError::MissingFields);
    }

    if !payload.gdpr_consent {
        error!("Application submission lacks GDPR consent");
        return Err(IntakeError::MissingFields);
    }

    Ok(())
}

fn check_consultation_fields(payload: &BookingPayload) -> Result<(), IntakeError> {
    let required = [
        &payload.name,
        &payload.email,
        &payload.preferred_date,
        &payload.preferred_time,
    ];

    if required.iter().any(|field| field.trim().is_empty()) {
        error!("Consultation request is missing required fields");
        return Err(IntakeError::MissingFields);
    }

    Ok(())
}
