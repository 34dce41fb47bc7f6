//! CSV file implementation of [`UserRepository`].
//!
//! The file starts with the header line below, followed by one row per user in insertion
//! order. Creates append a single row; updates and deletes rewrite the whole file through a
//! sibling `.tmp` file that is renamed over the store file. Rows other than the target are
//! written back byte-for-byte as the CSV reader saw them.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use csv::StringRecord;
use std::ffi::OsString;
use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{Metadata, SYSTEM_ACTOR, User, audit_timestamp};
use crate::repository::UserRepository;

const FIELD_COUNT: usize = 7;

/// Column order of the store.
pub const HEADER: [&str; FIELD_COUNT] = [
    "id",
    "name",
    "email",
    "created_at",
    "updated_at",
    "created_by",
    "updated_by",
];

/// User repository backed by a single CSV file.
///
/// Clones share the same lock, so every handle in the process serializes writes against
/// each other. Other processes touching the file are not coordinated with.
#[derive(Debug, Clone)]
pub struct CsvUserRepository {
    path: PathBuf,
    lock: Arc<RwLock<()>>,
}

impl CsvUserRepository {
    /// Point at `path` without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(RwLock::new(())),
        }
    }

    /// Point at `path`, creating parent directories and a header-only file when the store
    /// is missing or empty.
    pub async fn open(path: impl Into<PathBuf>) -> UserResult<Self> {
        let repository = Self::new(path);
        repository.bootstrap().await?;
        Ok(repository)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn bootstrap(&self) -> UserResult<()> {
        let _guard = self.lock.write().await;

        match fs::metadata(&self.path).await {
            Ok(meta) if meta.len() > 0 => return Ok(()),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)
                        .await
                        .map_err(|e| self.storage_error("create directory for", e))?;
                }
            }
            Err(e) => return Err(self.storage_error("inspect", e)),
        }

        self.replace_all(&[]).await?;
        info!(path = %self.path.display(), "Initialized user store");
        Ok(())
    }

    fn storage_error(&self, action: &str, err: io::Error) -> UserError {
        io_failure(action, &self.path, err)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Data rows as the reader saw them; the first line is always treated as the header.
    async fn read_records(&self) -> UserResult<Vec<StringRecord>> {
        let bytes = fs::read(&self.path)
            .await
            .map_err(|e| self.storage_error("read", e))?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes.as_slice());

        let records = reader.records().collect::<Result<Vec<_>, _>>()?;
        debug!(path = %self.path.display(), rows = records.len(), "Read user store");
        Ok(records)
    }

    /// Rewrite the store with the canonical header followed by `records`.
    async fn replace_all(&self, records: &[StringRecord]) -> UserResult<()> {
        let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
        writer.write_record(HEADER)?;
        for record in records {
            writer.write_record(record)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| UserError::Storage(e.to_string()))?;

        let temp = self.temp_path();
        if let Err(e) = write_synced(&temp, &bytes).await {
            if let Err(cleanup) = fs::remove_file(&temp).await {
                warn!(path = %temp.display(), error = %cleanup, "Failed to remove temp file");
            }
            return Err(io_failure("write", &temp, e));
        }

        fs::rename(&temp, &self.path)
            .await
            .map_err(|e| self.storage_error("replace", e))
    }

    async fn append(&self, record: &[String; FIELD_COUNT]) -> UserResult<()> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.storage_error("open", e))?;

        let tail = file_tail(&mut file)
            .await
            .map_err(|e| self.storage_error("read", e))?;

        let mut buf = Vec::new();
        if let Tail::Unterminated = tail {
            buf.push(b'\n');
        }
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(buf);
        match tail {
            Tail::Empty => writer.write_record(HEADER)?,
            Tail::Unterminated | Tail::Terminated => {}
        }
        writer.write_record(record)?;
        let bytes = writer
            .into_inner()
            .map_err(|e| UserError::Storage(e.to_string()))?;

        file.write_all(&bytes)
            .await
            .map_err(|e| self.storage_error("append to", e))?;
        file.flush()
            .await
            .map_err(|e| self.storage_error("append to", e))
    }
}

fn io_failure(action: &str, path: &Path, err: io::Error) -> UserError {
    UserError::Storage(format!("failed to {} {}: {}", action, path.display(), err))
}

async fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

/// How the store file currently ends.
enum Tail {
    /// Zero bytes, not even a header.
    Empty,
    Terminated,
    /// Last line has no `\n`.
    Unterminated,
}

async fn file_tail(file: &mut fs::File) -> io::Result<Tail> {
    let len = file.metadata().await?.len();
    if len == 0 {
        return Ok(Tail::Empty);
    }

    file.seek(SeekFrom::Start(len - 1)).await?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last).await?;
    Ok(if last[0] == b'\n' {
        Tail::Terminated
    } else {
        Tail::Unterminated
    })
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|at| at.with_timezone(&Utc))
}

fn record_id(record: &StringRecord) -> Option<Uuid> {
    record.get(0).and_then(|raw| Uuid::parse_str(raw).ok())
}

fn to_record(user: &User) -> [String; FIELD_COUNT] {
    [
        user.id.to_string(),
        user.name.clone(),
        user.email.clone(),
        format_timestamp(user.metadata.created_at),
        format_timestamp(user.metadata.updated_at),
        user.metadata.created_by.clone(),
        user.metadata.updated_by.clone(),
    ]
}

fn parse_record(record: &StringRecord) -> UserResult<User> {
    let line = record.position().map(|p| p.line()).unwrap_or_default();
    let corrupt = |reason: String| UserError::CorruptRecord { line, reason };

    if record.len() != FIELD_COUNT {
        return Err(corrupt(format!(
            "expected {} fields, found {}",
            FIELD_COUNT,
            record.len()
        )));
    }

    let id = Uuid::parse_str(&record[0])
        .map_err(|e| corrupt(format!("invalid id '{}': {}", &record[0], e)))?;
    let created_at = parse_timestamp(&record[3])
        .map_err(|e| corrupt(format!("invalid created_at '{}': {}", &record[3], e)))?;
    let updated_at = parse_timestamp(&record[4])
        .map_err(|e| corrupt(format!("invalid updated_at '{}': {}", &record[4], e)))?;

    Ok(User {
        id,
        name: record[1].to_string(),
        email: record[2].to_string(),
        metadata: Metadata {
            created_at,
            created_by: record[5].to_string(),
            updated_at,
            updated_by: record[6].to_string(),
        },
    })
}

#[async_trait]
impl UserRepository for CsvUserRepository {
    async fn get_all(&self) -> UserResult<Vec<User>> {
        let _guard = self.lock.read().await;
        self.read_records().await?.iter().map(parse_record).collect()
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<User> {
        let _guard = self.lock.read().await;
        let records = self.read_records().await?;

        records
            .iter()
            .find(|record| record_id(record) == Some(id))
            .map(parse_record)
            .unwrap_or_else(|| Err(UserError::NotFound(id.to_string())))
    }

    async fn create(&self, user: User) -> UserResult<()> {
        let _guard = self.lock.write().await;
        self.append(&to_record(&user)).await?;

        info!(user_id = %user.id, email = %user.email, "Created user");
        Ok(())
    }

    async fn update(&self, id: Uuid, name: String, email: String) -> UserResult<()> {
        let _guard = self.lock.write().await;
        let mut records = self.read_records().await?;

        let target = records
            .iter_mut()
            .find(|record| record_id(record) == Some(id))
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;

        let mut user = parse_record(target)?;
        user.name = name;
        user.email = email;
        user.metadata.touch(audit_timestamp(), SYSTEM_ACTOR);
        *target = StringRecord::from(to_record(&user).to_vec());

        self.replace_all(&records).await?;

        info!(user_id = %id, "Updated user");
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> UserResult<()> {
        let _guard = self.lock.write().await;
        let mut records = self.read_records().await?;

        let before = records.len();
        records.retain(|record| record_id(record) != Some(id));
        if records.len() == before {
            return Err(UserError::NotFound(id.to_string()));
        }

        self.replace_all(&records).await?;

        info!(user_id = %id, removed = before - records.len(), "Deleted user");
        Ok(())
    }
}
