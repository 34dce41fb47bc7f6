//! CSV store test infrastructure
//!
//! Provides a `TestStore` helper that owns a temporary directory holding a user CSV file.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Header line every bootstrapped store starts with.
pub const CSV_HEADER: &str = "id,name,email,created_at,updated_at,created_by,updated_by";

/// Temporary CSV store that ensures proper cleanup
///
/// The directory and everything in it is removed when this struct is dropped.
pub struct TestStore {
    dir: TempDir,
    path: PathBuf,
}

impl TestStore {
    /// Create a store containing only the header line
    ///
    /// # Example
    ///
    /// ```no_run
    /// use test_utils::TestStore;
    ///
    /// let store = TestStore::new();
    /// // Point your repository at store.path()
    /// ```
    pub fn new() -> Self {
        Self::with_contents(&format!("{}\n", CSV_HEADER))
    }

    /// Create a store seeded with raw file contents, header included
    pub fn with_contents(contents: &str) -> Self {
        let store = Self::unbootstrapped();
        std::fs::write(&store.path, contents).expect("Failed to seed test store");
        tracing::debug!(path = %store.path.display(), "Seeded test store");
        store
    }

    /// Reserve a store path without creating the file
    pub fn unbootstrapped() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("data.csv");
        Self { dir, path }
    }

    /// Path to a file inside a directory that does not exist yet
    pub fn missing_path(&self) -> PathBuf {
        self.dir.path().join("nested").join("store").join("data.csv")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file back
    pub async fn contents(&self) -> String {
        tokio::fs::read_to_string(&self.path)
            .await
            .expect("Failed to read test store")
    }

    /// Data lines only, header and blank lines skipped
    pub async fn data_lines(&self) -> Vec<String> {
        self.contents()
            .await
            .lines()
            .skip(1)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}
