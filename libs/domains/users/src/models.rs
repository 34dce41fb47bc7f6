use chrono::{DateTime, SubsecRound, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{UserError, UserResult};

/// Actor recorded in audit metadata for every write.
pub const SYSTEM_ACTOR: &str = "webapp";

/// ASCII letters plus tab, newline, form feed, carriage return and space. Vertical tab is
/// not accepted.
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\t\n\f\r ]+$").unwrap());

/// local@domain.tld with a TLD of at least two letters
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").unwrap()
});

/// Check a display name, reporting the empty case separately.
pub fn validate_name(name: &str) -> UserResult<()> {
    if name.is_empty() {
        return Err(UserError::Validation("name cannot be empty".to_string()));
    }
    if !NAME_PATTERN.is_match(name) {
        return Err(UserError::Validation(
            "name must only contain alphabetic characters and spaces".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> UserResult<()> {
    if !EMAIL_PATTERN.is_match(email) {
        return Err(UserError::Validation("invalid email address".to_string()));
    }
    Ok(())
}

/// Current time at whole-second precision, the resolution the store keeps.
pub fn audit_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// User entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique identifier, assigned on create
    pub id: Uuid,
    /// Display name (ASCII letters and spaces)
    pub name: String,
    /// Email address (unique across users)
    pub email: String,
    pub metadata: Metadata,
}

impl User {
    /// Build a new user with a fresh id and metadata stamped by `SYSTEM_ACTOR`.
    pub fn new(name: String, email: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            name,
            email,
            metadata: Metadata::stamped(audit_timestamp(), SYSTEM_ACTOR),
        }
    }
}

/// Audit metadata kept alongside each user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Metadata {
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl Metadata {
    /// Creation and update fields set to the same instant and actor.
    pub fn stamped(at: DateTime<Utc>, actor: &str) -> Self {
        Self {
            created_at: at,
            created_by: actor.to_string(),
            updated_at: at,
            updated_by: actor.to_string(),
        }
    }

    /// Record a modification, leaving the creation fields alone.
    pub fn touch(&mut self, at: DateTime<Utc>, actor: &str) {
        self.updated_at = at;
        self.updated_by = actor.to_string();
    }
}

/// DTO for creating a new user
///
/// Missing fields decode as empty strings and are then rejected by validation.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// DTO for updating an existing user
///
/// Both fields are replaced; partial updates are not supported.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Accepted for compatibility with clients that echo a fetched user back; ignored.
    #[serde(default)]
    pub metadata: Option<MetadataInput>,
}

/// Client-supplied metadata, never trusted
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct MetadataInput {
    pub created_at: Option<String>,
    pub created_by: Option<String>,
    pub updated_at: Option<String>,
    pub updated_by: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_name_validation() {
        for ok in ["Ada", "Mary Ann", "Jean  Luc", "Tab\tName"] {
            assert!(validate_name(ok).is_ok(), "{} should be valid", ok);
        }

        let empty = validate_name("").unwrap_err();
        assert_eq!(empty.to_string(), "name cannot be empty");

        for bad in ["John3", "O'Brien", "Zoë", "Anne-Marie", "Vertical\x0BTab", "No\u{a0}Break"] {
            let err = validate_name(bad).unwrap_err();
            assert_eq!(
                err.to_string(),
                "name must only contain alphabetic characters and spaces",
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_email_validation() {
        for ok in ["ada@example.com", "first.last+tag@mail.example.co", "a_b%c@x-y.io"] {
            assert!(validate_email(ok).is_ok(), "{} should be valid", ok);
        }

        for bad in ["", "not-an-email", "ada@example", "ada@example.c", "@example.com"] {
            let err = validate_email(bad).unwrap_err();
            assert_eq!(err.to_string(), "invalid email address", "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_new_user_metadata_is_stamped_by_system_actor() {
        let user = User::new("Ada Lovelace".to_string(), "ada@example.com".to_string());

        assert_eq!(user.metadata.created_by, SYSTEM_ACTOR);
        assert_eq!(user.metadata.updated_by, SYSTEM_ACTOR);
        assert_eq!(user.metadata.created_at, user.metadata.updated_at);
        assert_eq!(user.metadata.created_at.nanosecond(), 0);
    }

    #[test]
    fn test_touch_keeps_creation_fields() {
        let created = audit_timestamp() - chrono::Duration::hours(1);
        let mut metadata = Metadata::stamped(created, "importer");

        metadata.touch(audit_timestamp(), SYSTEM_ACTOR);

        assert_eq!(metadata.created_at, created);
        assert_eq!(metadata.created_by, "importer");
        assert_eq!(metadata.updated_by, SYSTEM_ACTOR);
        assert!(metadata.updated_at > metadata.created_at);
    }

    #[test]
    fn test_user_json_shape() {
        let user = User::new("Ada".to_string(), "ada@example.com".to_string());
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["name"], "Ada");
        assert_eq!(json["metadata"]["created_by"], "webapp");
        assert!(json["metadata"]["updated_at"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_update_accepts_echoed_metadata() {
        let input: UpdateUser = serde_json::from_str(
            r#"{"name":"Ada","email":"ada@example.com","metadata":{"created_by":"someone"}}"#,
        )
        .unwrap();

        assert_eq!(input.name, "Ada");
        assert!(input.metadata.is_some());
    }

    #[test]
    fn test_missing_fields_decode_empty() {
        let input: CreateUser = serde_json::from_str("{}").unwrap();

        assert!(input.name.is_empty());
        assert!(input.email.is_empty());
    }
}
