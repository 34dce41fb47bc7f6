//! API routes module
//!
//! This module defines all HTTP API routes for the layers API.

pub mod health;

use axum::Router;
use domain_users::{UserRepository, UserService, handlers};

/// Create all API routes
/// Note: docs, fallback and tracing are added by axum_helpers::create_router
pub fn routes<R>(service: UserService<R>) -> Router
where
    R: UserRepository + Clone + 'static,
{
    Router::new()
        .nest("/users", handlers::router(service.clone()))
        .merge(health::router(service))
}
