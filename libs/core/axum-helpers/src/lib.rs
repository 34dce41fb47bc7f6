//! # Axum Helpers
//!
//! Shared building blocks for the HTTP services in this workspace.
//!
//! ## Modules
//!
//! - **[`server`]**: Router setup with API docs, health checks, graceful shutdown
//! - **[`errors`]**: `AppError`, the error-kind to status-code table
//! - **[`extractors`]**: `JsonBody`, a JSON extractor with uniform 400 rejections
//! - **[`audit`]**: Audit logging for data modifications
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_app, create_router};
//! use core_config::server::ServerConfig;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let router = create_router::<ApiDoc>(Router::new());
//!     create_app(router, &ServerConfig::default()).await
//! }
//! ```

pub mod audit;
pub mod errors;
pub mod extractors;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, create_app, create_router, health_router,
    run_health_checks, shutdown_signal,
};

pub use errors::{AppError, ErrorCode};

pub use extractors::JsonBody;

pub use audit::{AuditEvent, AuditOutcome, extract_ip_from_headers, extract_user_agent};
