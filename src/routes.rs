use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::handlers::api::{submit_application, submit_consultation, AppState};
use crate::handlers::test::{health_check, test_submissions};

pub fn create_router(app_state: Arc<AppState>, is_production: bool) -> Router {
    let mut router = Router::new();

    // Health check is always available
    let health_route = Router::new().route("/health", get(health_check));
    router = router.merge(health_route);

    // Intake endpoints are always available
    let intake_routes = Router::new()
        .route("/api/applications", post(submit_application))
        .route("/api/consultations", post(submit_consultation));
    router = router.merge(intake_routes);

    // Only add sample-payload routes if not in production mode
    if !is_production {
        let test_routes = Router::new().route("/test/submissions", get(test_submissions));
        router = router.merge(test_routes);

        info!("Test routes enabled - server running in development mode");
    } else {
        info!("Running in production mode - only intake and health endpoints exposed");
    }

    // Permissive CORS so the hosted site can call the intake endpoints
    // directly; this also answers the browser's preflight OPTIONS request.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router.layer(cors).with_state(app_state)
}
