//! Store tests for the CSV-backed service
//!
//! These tests drive `UserService` over a real CSV file in a temp directory and then
//! inspect the file itself, checking what ends up on disk after each operation.

use domain_users::*;
use test_utils::assertions::{assert_single_line_containing, assert_some};
use test_utils::{CSV_HEADER, TestDataBuilder, TestStore};

async fn service_for(store: &TestStore) -> UserService<CsvUserRepository> {
    let repository = CsvUserRepository::open(store.path()).await.unwrap();
    UserService::new(repository)
}

fn input(name: &str, email: &str) -> CreateUser {
    CreateUser {
        name: name.to_string(),
        email: email.to_string(),
    }
}

#[tokio::test]
async fn test_create_then_get_returns_same_user() {
    let store = TestStore::new();
    let service = service_for(&store).await;
    let builder = TestDataBuilder::from_test_name("csv_create_get");

    let created = service
        .create_user(input(&builder.name("main"), &builder.email("main")))
        .await
        .unwrap();

    let fetched = service.get_user(&created.id.to_string()).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.metadata.created_by, SYSTEM_ACTOR);
    assert_eq!(fetched.metadata.created_at, fetched.metadata.updated_at);
}

#[tokio::test]
async fn test_duplicate_email_leaves_store_unchanged() {
    let store = TestStore::new();
    let service = service_for(&store).await;

    service.create_user(input("Ada", "ada@example.com")).await.unwrap();
    let before = store.contents().await;

    let result = service.create_user(input("Other Ada", "ada@example.com")).await;

    assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    assert_eq!(store.contents().await, before);
}

#[tokio::test]
async fn test_invalid_input_is_never_written() {
    let store = TestStore::new();
    let service = service_for(&store).await;

    assert!(service.create_user(input("John3", "john@example.com")).await.is_err());
    assert!(service.create_user(input("John", "not-an-email")).await.is_err());

    assert!(store.data_lines().await.is_empty());
}

#[tokio::test]
async fn test_update_keeps_creation_and_advances_update() {
    let store = TestStore::new();
    let service = service_for(&store).await;
    let created = service.create_user(input("Ada", "ada@example.com")).await.unwrap();
    let id = created.id.to_string();

    service
        .update_user(
            &id,
            UpdateUser {
                name: "Ada King".to_string(),
                email: "countess@example.com".to_string(),
                metadata: None,
            },
        )
        .await
        .unwrap();

    let updated = service.get_user(&id).await.unwrap();
    assert_eq!(updated.name, "Ada King");
    assert_eq!(updated.email, "countess@example.com");
    assert_eq!(updated.metadata.created_at, created.metadata.created_at);
    assert_eq!(updated.metadata.created_by, created.metadata.created_by);
    assert_eq!(updated.metadata.updated_by, SYSTEM_ACTOR);
    assert!(updated.metadata.updated_at >= updated.metadata.created_at);
}

#[tokio::test]
async fn test_delete_removes_exactly_one_row() {
    let store = TestStore::new();
    let service = service_for(&store).await;
    let ada = service.create_user(input("Ada", "ada@example.com")).await.unwrap();
    let grace = service.create_user(input("Grace", "grace@example.com")).await.unwrap();
    let alan = service.create_user(input("Alan", "alan@example.com")).await.unwrap();

    service.delete_user(&grace.id.to_string()).await.unwrap();

    let lines = store.data_lines().await;
    assert_eq!(lines.len(), 2);
    assert_single_line_containing(&lines, &ada.id.to_string(), "ada survives");
    assert_single_line_containing(&lines, &alan.id.to_string(), "alan survives");
    assert!(matches!(
        service.get_user(&grace.id.to_string()).await,
        Err(UserError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_creates_round_trip_in_order() {
    let store = TestStore::new();
    let service = service_for(&store).await;
    let names = ["Ada", "Grace", "Alan", "Barbara", "Edsger"];

    let mut created = Vec::new();
    for name in names {
        let email = format!("{}@example.com", name.to_lowercase());
        created.push(service.create_user(input(name, &email)).await.unwrap());
    }

    let listed = service.list_users().await.unwrap();
    assert_eq!(listed, created);

    // A fresh handle on the same file sees the same rows
    let reopened = service_for(&store).await;
    assert_eq!(reopened.list_users().await.unwrap(), created);
}

#[tokio::test]
async fn test_header_survives_every_mutation() {
    let store = TestStore::new();
    let service = service_for(&store).await;

    let user = service.create_user(input("Ada", "ada@example.com")).await.unwrap();
    assert!(store.contents().await.starts_with(CSV_HEADER));

    service
        .update_user(
            &user.id.to_string(),
            UpdateUser {
                name: "Ada".to_string(),
                email: "ada@example.org".to_string(),
                metadata: None,
            },
        )
        .await
        .unwrap();
    assert!(store.contents().await.starts_with(CSV_HEADER));

    service.delete_user(&user.id.to_string()).await.unwrap();
    assert_eq!(store.contents().await, format!("{}\n", CSV_HEADER));
}

#[tokio::test]
async fn test_unrelated_rows_are_preserved_verbatim() {
    let foreign = "0190c6d2-8a1f-7c3e-9b5a-1d2e3f4a5b6c,Imported User,imported@example.com,\
                   2023-01-02T03:04:05Z,2023-01-02T03:04:05Z,importer,importer";
    let store = TestStore::with_contents(&format!("{}\n{}\n", CSV_HEADER, foreign));
    let service = service_for(&store).await;

    let user = service.create_user(input("Ada", "ada@example.com")).await.unwrap();
    service.delete_user(&user.id.to_string()).await.unwrap();

    assert_eq!(store.data_lines().await, vec![foreign.to_string()]);
}

#[tokio::test]
async fn test_fields_with_commas_and_quotes_round_trip() {
    let store = TestStore::new();
    let repository = CsvUserRepository::open(store.path()).await.unwrap();
    let mut user = User::new("Ada".to_string(), "ada@example.com".to_string());
    user.metadata.created_by = "batch, \"nightly\"".to_string();

    repository.create(user.clone()).await.unwrap();

    let fetched = repository.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.metadata.created_by, "batch, \"nightly\"");
    assert_eq!(store.data_lines().await.len(), 1);
}

#[tokio::test]
async fn test_corrupt_row_is_reported_with_line() {
    let store = TestStore::with_contents(&format!(
        "{}\n0190c6d2-8a1f-7c3e-9b5a-1d2e3f4a5b6c,Ada,ada@example.com,soon,later,webapp,webapp\n",
        CSV_HEADER
    ));
    let service = service_for(&store).await;

    match service.list_users().await {
        Err(UserError::CorruptRecord { line, reason }) => {
            assert_eq!(line, 2);
            assert!(reason.contains("created_at"), "unexpected reason: {}", reason);
        }
        other => panic!("expected CorruptRecord, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_and_malformed_ids() {
    let store = TestStore::new();
    let service = service_for(&store).await;

    assert!(matches!(service.get_user("").await, Err(UserError::InvalidInput(_))));
    assert!(matches!(service.get_user("nope").await, Err(UserError::NotFound(_))));
    assert!(matches!(
        service.delete_user("0190c6d2-8a1f-7c3e-9b5a-1d2e3f4a5b6c").await,
        Err(UserError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_concurrent_creates_with_same_email_store_one() {
    let store = TestStore::new();
    let service = std::sync::Arc::new(service_for(&store).await);

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move {
                service.create_user(input("Ada", "ada@example.com")).await
            })
        })
        .collect();

    let mut created = 0;
    for task in tasks {
        if task.await.unwrap().is_ok() {
            created += 1;
        }
    }

    assert_eq!(created, 1);
    let users = service.list_users().await.unwrap();
    let ada = assert_some(users.first(), "stored user");
    assert_eq!(ada.email, "ada@example.com");
    assert_eq!(users.len(), 1);
}
