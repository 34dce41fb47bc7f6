//! Users Domain
//!
//! Create, read, update and delete for user records kept in a CSV file.
//!
//! # Features
//!
//! - User CRUD operations
//! - Name and email validation
//! - Email uniqueness on create
//! - Audit metadata stamped on every write
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, uniqueness, id parsing
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + CSV and in-memory implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entity, metadata, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{handlers, CsvUserRepository, UserService};
//!
//! # async fn example() -> domain_users::UserResult<()> {
//! let repository = CsvUserRepository::open("data/data.csv").await?;
//! let service = UserService::new(repository);
//!
//! // Create Axum router, mounted under /users by the app
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod csv_repository;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use csv_repository::CsvUserRepository;
pub use error::{UserError, UserResult};
pub use models::{CreateUser, Metadata, SYSTEM_ACTOR, UpdateUser, User};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
