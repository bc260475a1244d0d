use dotenv::dotenv;
use reqwest::Client;
use serde_json::json;
use std::env;
use std::time::Duration;
use tracing::{debug, info};

use crate::models::application::ApplicationPayload;
use crate::models::booking::BookingPayload;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the Resend email API. Sends the coach one notification per
/// accepted submission, with the applicant's address as reply-to.
pub struct MailNotifier {
    client: Client,
    api_key: String,
    endpoint: String,
    from: String,
    to: String,
}

impl MailNotifier {
    /// Create a new mail notifier from environment variables.
    pub fn new() -> Self {
        dotenv().ok();

        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            api_key: env::var("RESEND_API_KEY").expect("RESEND_API_KEY must be set in environment"),
            endpoint: env::var("RESEND_API_ENDPOINT")
                .unwrap_or_else(|_| "https://api.resend.com".to_string()),
            from: env::var("NOTIFY_FROM_ADDRESS")
                .unwrap_or_else(|_| "Coaching Intake <onboarding@resend.dev>".to_string()),
            to: env::var("NOTIFY_TO_ADDRESS").expect("NOTIFY_TO_ADDRESS must be set in environment"),
        }
    }

    /// Send one notification email. Any non-success status is an error.
    pub async fn send(&self, subject: &str, html: &str, reply_to: &str) -> Result<(), reqwest::Error> {
        let url = format!("{}/emails", self.endpoint);
        debug!("Sending notification email: {}", subject);

        let body = json!({
            "from": self.from,
            "to": [self.to],
            "subject": subject,
            "html": html,
            "reply_to": reply_to,
        });

        self.client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        info!("Notification email sent: {}", subject);
        Ok(())
    }
}

impl Default for MailNotifier {
    fn default() -> Self {
        Self {
            client: Client::new(),
            api_key: "test-key".to_string(),
            endpoint: "https://api.resend.com".to_string(),
            from: "Coaching Intake <onboarding@resend.dev>".to_string(),
            to: "coach@example.com".to_string(),
        }
    }
}

/// Subject and HTML body for an application notification.
pub fn application_email(payload: &ApplicationPayload) -> (String, String) {
    let subject = format!("New Athlete Application: {}", payload.full_name);

    let mut html = String::new();
    html.push_str("<h1>New Athlete Application</h1>");

    html.push_str("<h2>Basic Information</h2><ul>");
    html.push_str(&format!("<li><strong>Name:</strong> {}</li>", payload.full_name));
    html.push_str(&format!("<li><strong>Email:</strong> {}</li>", payload.email));
    html.push_str(&format!("<li><strong>Age:</strong> {}</li>", payload.age));
    html.push_str(&format!(
        "<li><strong>Country / Time Zone:</strong> {}</li>",
        payload.country_timezone
    ));
    html.push_str("</ul>");

    html.push_str("<h2>Athletic Background</h2><ul>");
    html.push_str(&format!(
        "<li><strong>Training Level:</strong> {}</li>",
        payload.training_level.as_str()
    ));
    html.push_str(&format!(
        "<li><strong>Currently Competitive:</strong> {}</li>",
        yes_no(payload.is_competitive)
    ));
    html.push_str(&format!(
        "<li><strong>Training History:</strong><br/>{}</li>",
        nl2br(&payload.training_history)
    ));
    html.push_str(&format!(
        "<li><strong>Worked with Coach Before:</strong> {}</li>",
        yes_no(payload.has_worked_with_coach)
    ));
    if let Some(coach_experience) = &payload.coach_experience {
        html.push_str(&format!(
            "<li><strong>Coach Experience:</strong><br/>{}</li>",
            nl2br(coach_experience)
        ));
    }
    html.push_str("</ul>");

    html.push_str("<h2>Why They're Here</h2>");
    if let Some(why) = &payload.why_work_with_me {
        html.push_str(&format!(
            "<p><strong>Why work with you specifically:</strong><br/>{}</p>",
            nl2br(why)
        ));
    }
    html.push_str(&format!(
        "<p><strong>Short-term goals (3-6 months):</strong><br/>{}</p>",
        nl2br(&payload.short_term_goals)
    ));
    html.push_str(&format!(
        "<p><strong>Long-term goals (1+ year):</strong><br/>{}</p>",
        nl2br(&payload.long_term_goals)
    ));
    html.push_str(&format!(
        "<p><strong>Motivation:</strong><br/>{}</p>",
        nl2br(&payload.motivation)
    ));

    html.push_str("<hr/>");
    html.push_str(&format!(
        "<p><em>GDPR consent given: {}</em></p>",
        yes_no(payload.gdpr_consent)
    ));
    html.push_str(&format!(
        "<p><em>Submitted at: {}</em></p>",
        chrono::Utc::now().to_rfc3339()
    ));

    (subject, html)
}

/// Subject and HTML body for a consultation-request notification.
pub fn consultation_email(payload: &BookingPayload) -> (String, String) {
    let subject = format!("New Consultation Request: {}", payload.name);

    let mut html = String::new();
    html.push_str("<h1>New Consultation Request</h1><ul>");
    html.push_str(&format!("<li><strong>Name:</strong> {}</li>", payload.name));
    html.push_str(&format!("<li><strong>Email:</strong> {}</li>", payload.email));
    html.push_str(&format!(
        "<li><strong>Preferred Date:</strong> {}</li>",
        payload.preferred_date
    ));
    html.push_str(&format!(
        "<li><strong>Preferred Time:</strong> {}</li>",
        payload.preferred_time
    ));
    html.push_str("</ul>");
    if let Some(message) = &payload.message {
        html.push_str(&format!("<p><strong>Message:</strong><br/>{}</p>", nl2br(message)));
    }
    html.push_str(&format!(
        "<hr/><p><em>Submitted at: {}</em></p>",
        chrono::Utc::now().to_rfc3339()
    ));

    (subject, html)
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn nl2br(text: &str) -> String {
    text.replace('\n', "<br/>")
}
