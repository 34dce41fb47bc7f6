//! Readiness endpoint

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use domain_users::{UserRepository, UserService};
use std::sync::Arc;

/// Create a readiness router
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(Arc::new(service))
}

/// Readiness check - verifies the user store can be read and parsed
async fn readiness_check<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
) -> impl IntoResponse {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "store",
        Box::pin(async {
            service
                .list_users()
                .await
                .map(|_| ())
                .map_err(|e| e.to_string())
        }),
    )];

    run_health_checks(checks).await
}
