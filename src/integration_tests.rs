#[cfg(test)]
mod integration_tests {
    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveDate;
    use chrono_tz::Tz;
    use std::sync::Arc;
    use tempfile::tempdir;
    use tower::ServiceExt;

    use crate::client::IntakeClient;
    use crate::handlers::api::AppState;
    use crate::models::application::TrainingLevel;
    use crate::models::booking::{BookingForm, SlotSelection};
    use crate::notifier::MailNotifier;
    use crate::routes::create_router;
    use crate::services::database::DatabaseService;
    use crate::services::form_flow::{ApplicationFlow, FormStep, SubmitError};
    use crate::services::time_slots::generate_slots;
    use crate::services::validation::validate_booking;

    struct TestEnvironment {
        base_url: String,
        database: Arc<DatabaseService>,
        _dir: tempfile::TempDir,
    }

    // Start the intake service on an ephemeral port, simulation mode on
    async fn setup_test_environment() -> TestEnvironment {
        let dir = tempdir().unwrap();
        let applications = dir.path().join("applications.csv");
        let consultations = dir.path().join("consultations.csv");
        let database = Arc::new(DatabaseService::new(
            applications.to_str().unwrap(),
            consultations.to_str().unwrap(),
        ));

        let app_state = Arc::new(AppState {
            notifier: MailNotifier::default(),
            database: Arc::clone(&database),
            skip_email_notification: true, // SIMULATION MODE
        });

        let app = create_router(app_state, false);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestEnvironment {
            base_url: format!("http://{}", addr),
            database,
            _dir: dir,
        }
    }

    fn completed_flow() -> ApplicationFlow {
        let mut flow = ApplicationFlow::new();
        {
            let form = flow.form_mut();
            form.full_name = "Jane Doe".to_string();
            form.email = "jane@example.com".to_string();
            form.age = "25".to_string();
            form.country_timezone = "Sweden/CET".to_string();
        }
        flow.next().unwrap();
        {
            let form = flow.form_mut();
            form.training_level = Some(TrainingLevel::Advanced);
            form.is_competitive = Some(true);
            form.training_history = "Competed in three regional shows.".to_string();
            form.has_worked_with_coach = Some(true);
            form.coach_experience = "Self-programmed after one coached year.".to_string();
        }
        flow.next().unwrap();
        {
            let form = flow.form_mut();
            form.short_term_goals = "Improve my deadlift".to_string();
            form.long_term_goals = "Win my weight class".to_string();
            form.motivation = "Unfinished business on the platform.".to_string();
            form.gdpr_consent = true;
        }
        flow
    }

    // Test the complete application funnel against the running service
    #[tokio::test]
    async fn test_complete_application_workflow() {
        let env = setup_test_environment().await;
        let gateway = IntakeClient::with_endpoint(&env.base_url);

        let mut flow = completed_flow();
        flow.submit(&gateway).await.unwrap();
        assert_eq!(flow.step(), FormStep::Submitted);

        let records = env.database.list_applications().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].full_name, "Jane Doe");
        assert_eq!(records[0].training_level, "advanced");
        assert_eq!(
            records[0].coach_experience,
            "Self-programmed after one coached year."
        );
    }

    // A gateway failure leaves the funnel on the final step for a retry
    #[tokio::test]
    async fn test_failed_submission_allows_retry() {
        // Connection-refused endpoint first
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let dead_addr = listener.local_addr().unwrap();
        drop(listener);

        let mut flow = completed_flow();
        let dead_gateway = IntakeClient::with_endpoint(&format!("http://{}", dead_addr));
        let err = flow.submit(&dead_gateway).await.unwrap_err();
        assert!(matches!(err, SubmitError::Submission(_)));
        assert_eq!(flow.step(), FormStep::Step3);
        assert_eq!(flow.form().full_name, "Jane Doe");

        // Retrying against a live service succeeds with the same state
        let env = setup_test_environment().await;
        let gateway = IntakeClient::with_endpoint(&env.base_url);
        flow.submit(&gateway).await.unwrap();
        assert_eq!(flow.step(), FormStep::Submitted);
        assert_eq!(env.database.list_applications().unwrap().len(), 1);
    }

    // Two identical submissions are both accepted and both stored
    #[tokio::test]
    async fn test_double_submission_stores_two_records() {
        let env = setup_test_environment().await;
        let gateway = IntakeClient::with_endpoint(&env.base_url);

        let payload = completed_flow().begin_submit().unwrap();
        gateway.submit_application(&payload).await.unwrap();
        gateway.submit_application(&payload).await.unwrap();

        assert_eq!(env.database.list_applications().unwrap().len(), 2);
    }

    // Test the booking path end to end: slots, validation, payload, submit
    #[tokio::test]
    async fn test_complete_booking_workflow() {
        let env = setup_test_environment().await;
        let gateway = IntakeClient::with_endpoint(&env.base_url);

        let visitor_tz: Tz = "America/New_York".parse().unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 3, 27).unwrap();
        let selected_date = NaiveDate::from_ymd_opt(2026, 3, 30).unwrap(); // Monday

        let slots = generate_slots(selected_date, visitor_tz);
        let first = &slots[0];
        assert!(first.show_both);

        let form = BookingForm {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            message: "Interested in competition prep.".to_string(),
            selected_date: Some(selected_date),
            selected_slot: Some(SlotSelection {
                reference_label: first.reference_label.clone(),
                local_label: first.local_label.clone(),
            }),
        };

        validate_booking(&form, today).unwrap();
        let payload = form.payload(visitor_tz).unwrap();

        // The Stockholm time stays canonical, annotated with the local one
        assert_eq!(payload.preferred_date, "Monday, March 30, 2026");
        assert_eq!(
            payload.preferred_time,
            "1:00 PM (Swedish time) / 7:00 AM (America/New_York)"
        );

        gateway.submit_consultation(&payload).await.unwrap();

        let records = env.database.list_consultations().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].preferred_time,
            "1:00 PM (Swedish time) / 7:00 AM (America/New_York)"
        );
        assert_eq!(records[0].message, "Interested in competition prep.");
    }

    // A Stockholm visitor submits the bare reference label
    #[tokio::test]
    async fn test_booking_in_reference_timezone_submits_single_label() {
        let visitor_tz: Tz = "Europe/Stockholm".parse().unwrap();
        let selected_date = NaiveDate::from_ymd_opt(2026, 3, 30).unwrap();

        let slots = generate_slots(selected_date, visitor_tz);
        let slot = &slots[2];

        let form = BookingForm {
            name: "Sven Svensson".to_string(),
            email: "sven@example.se".to_string(),
            message: String::new(),
            selected_date: Some(selected_date),
            selected_slot: Some(SlotSelection {
                reference_label: slot.reference_label.clone(),
                local_label: slot.local_label.clone(),
            }),
        };

        let payload = form.payload(visitor_tz).unwrap();
        assert_eq!(payload.preferred_time, "2:00 PM");
        assert_eq!(payload.message, None);
    }

    // The browser's preflight request gets permissive CORS headers back
    #[tokio::test]
    async fn test_cors_preflight() {
        let dir = tempdir().unwrap();
        let applications = dir.path().join("applications.csv");
        let consultations = dir.path().join("consultations.csv");
        let database = Arc::new(DatabaseService::new(
            applications.to_str().unwrap(),
            consultations.to_str().unwrap(),
        ));

        let app_state = Arc::new(AppState {
            notifier: MailNotifier::default(),
            database,
            skip_email_notification: true,
        });
        let app = create_router(app_state, true);

        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/applications")
            .header("origin", "https://example.com")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert!(response.status().is_success());
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .map(|v| v.to_str().unwrap()),
            Some("*")
        );
    }
}
