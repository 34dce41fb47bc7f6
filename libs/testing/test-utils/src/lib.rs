//! Shared test utilities for domain testing
//!
//! This crate provides reusable test infrastructure for the domain crates:
//! - `TestStore`: temporary CSV store with automatic cleanup
//! - `TestDataBuilder`: deterministic test data generation
//! - `assertions`: custom assertion helpers
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDataBuilder, TestStore};
//!
//! #[tokio::test]
//! async fn my_store_test() {
//!     let store = TestStore::new();
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let name = builder.name("main");
//!     let email = builder.email("main");
//! }
//! ```

use uuid::Uuid;

mod store;

pub use store::{CSV_HEADER, TestStore};

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// This is the recommended way to create a builder for consistent test data.
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_user");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a deterministic user ID for testing
    pub fn user_id(&self) -> Uuid {
        let bytes = self.seed.to_le_bytes();
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&bytes);
        uuid_bytes[8..16].copy_from_slice(&bytes);
        Uuid::from_bytes(uuid_bytes)
    }

    /// Generate a person name that passes name validation
    ///
    /// Names only contain ASCII letters and spaces, so the seed is spelled with letters.
    ///
    /// # Arguments
    ///
    /// * `suffix` - A unique identifier within the test, letters only (e.g., "main", "other")
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(42);
    /// assert_eq!(builder.name("main"), "Test ec main");
    /// ```
    pub fn name(&self, suffix: &str) -> String {
        format!("Test {} {}", self.seed_letters(), suffix)
    }

    /// Generate a unique email address that passes email validation
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(42);
    /// assert_eq!(builder.email("main"), "main.42@example.com");
    /// ```
    pub fn email(&self, suffix: &str) -> String {
        format!("{}.{}@example.com", suffix, self.seed)
    }

    fn seed_letters(&self) -> String {
        self.seed
            .to_string()
            .bytes()
            .map(|digit| char::from(b'a' + (digit - b'0')))
            .collect()
    }
}

/// Test assertion helpers
pub mod assertions {
    use uuid::Uuid;

    /// Assert that two UUIDs are equal with a nice error message
    pub fn assert_uuid_eq(actual: Uuid, expected: Uuid, context: &str) {
        assert_eq!(
            actual, expected,
            "{}: expected UUID {}, got {}",
            context, expected, actual
        );
    }

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that `lines` contains `needle` exactly once
    pub fn assert_single_line_containing(lines: &[String], needle: &str, context: &str) {
        let matches = lines.iter().filter(|line| line.contains(needle)).count();
        assert_eq!(
            matches, 1,
            "{}: expected exactly one line containing '{}', found {}",
            context, needle, matches
        );
    }
}
