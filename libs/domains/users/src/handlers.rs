use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AuditEvent, AuditOutcome, JsonBody, extract_ip_from_headers, extract_user_agent,
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{CreateUser, Metadata, MetadataInput, SYSTEM_ACTOR, UpdateUser, User};
use crate::repository::UserRepository;
use crate::service::UserService;

const TAG: &str = "users";

/// OpenAPI documentation for Users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, get_user, update_user, delete_user),
    components(schemas(User, Metadata, CreateUser, UpdateUser, MetadataInput)),
    tags((name = TAG, description = "User management endpoints"))
)]
pub struct ApiDoc;

/// Create the users router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .with_state(shared_service)
}

fn audit<T>(headers: &HeaderMap, action: &str, resource: String, result: &UserResult<T>) {
    let event = match result {
        Ok(_) => AuditEvent::new(SYSTEM_ACTOR, action, Some(resource), AuditOutcome::Success),
        Err(err) => AuditEvent::new(SYSTEM_ACTOR, action, Some(resource), AuditOutcome::Failure)
            .with_details(json!({ "error": err.to_string() })),
    };

    event
        .with_ip(extract_ip_from_headers(headers))
        .with_user_agent(extract_user_agent(headers))
        .log();
}

/// List all users
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "All users in storage order", body = Vec<User>),
        (status = 500, description = "Store unreadable or corrupt", body = String)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
) -> UserResult<Json<Vec<User>>> {
    let users = service.list_users().await?;
    Ok(Json(users))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = String),
        (status = 400, description = "Invalid JSON or failed validation", body = String),
        (status = 409, description = "Email already in use", body = String),
        (status = 500, description = "Store unreadable or corrupt", body = String)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    headers: HeaderMap,
    JsonBody(input): JsonBody<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let email = input.email.clone();
    let result = service.create_user(input).await;

    let resource = match &result {
        Ok(user) => format!("user:{}", user.id),
        Err(_) => format!("email:{}", email),
    };
    audit(&headers, "user.create", resource, &result);

    result?;
    Ok((StatusCode::CREATED, "user created successfully"))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "No user with this ID", body = String),
        (status = 500, description = "Store unreadable or corrupt", body = String)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
) -> UserResult<Json<User>> {
    let user = service.get_user(&id).await?;
    Ok(Json(user))
}

/// Replace a user's name and email
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = String),
        (status = 400, description = "Invalid JSON or failed validation", body = String),
        (status = 404, description = "No user with this ID", body = String),
        (status = 500, description = "Store unreadable or corrupt", body = String)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    JsonBody(input): JsonBody<UpdateUser>,
) -> UserResult<impl IntoResponse> {
    let result = service.update_user(&id, input).await;
    audit(&headers, "user.update", format!("user:{}", id), &result);

    result?;
    Ok((StatusCode::OK, "user updated successfully"))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = String),
        (status = 404, description = "No user with this ID", body = String),
        (status = 500, description = "Store unreadable or corrupt", body = String)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> UserResult<impl IntoResponse> {
    let result = service.delete_user(&id).await;
    audit(&headers, "user.delete", format!("user:{}", id), &result);

    result?;
    Ok((StatusCode::OK, "user deleted successfully"))
}
