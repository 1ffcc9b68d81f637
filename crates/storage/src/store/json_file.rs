use async_trait::async_trait;
use serde::Serialize;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use super::{StudentDocument, StudentStore};
use crate::error::{Result, StorageError};
use crate::models::StudentRecord;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Serialize)]
struct DocumentRef<'a> {
    students: &'a [StudentRecord],
}

/// Stores the collection as a pretty-printed JSON file.
///
/// Saves go through a sibling temporary file, unique per process and per
/// save, that is renamed over the target, so a concurrent load sees either
/// the previous or the new document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("students.json"));
        name.push(format!(
            ".{}.{}.tmp",
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StudentStore for JsonFileStore {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    async fn load(&self) -> Result<Vec<StudentRecord>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(StorageError::StoreMissing),
            Err(e) => return Err(StorageError::Read(e)),
        };

        let document: StudentDocument =
            serde_json::from_str(&contents).map_err(StorageError::Parse)?;

        tracing::debug!(
            "Loaded {} student record(s) from {}",
            document.students.len(),
            self.path.display()
        );

        Ok(document.students)
    }

    async fn save(&self, students: &[StudentRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(&DocumentRef { students })
            .map_err(StorageError::Serialize)?;

        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, json)
            .await
            .map_err(StorageError::Write)?;

        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StorageError::Write(e));
        }

        tracing::debug!(
            "Saved {} student record(s) to {}",
            students.len(),
            self.path.display()
        );

        Ok(())
    }
}
