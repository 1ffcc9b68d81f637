use async_trait::async_trait;
use tokio::sync::Mutex;

use super::StudentStore;
use crate::error::{Result, StorageError};
use crate::models::StudentRecord;

/// In-process store. `None` stands for a store that was never provisioned.
#[derive(Debug)]
pub struct MemoryStore {
    students: Mutex<Option<Vec<StudentRecord>>>,
}

impl MemoryStore {
    pub fn with_students(students: Vec<StudentRecord>) -> Self {
        Self {
            students: Mutex::new(Some(students)),
        }
    }

    pub fn empty() -> Self {
        Self::with_students(Vec::new())
    }

    pub fn missing() -> Self {
        Self {
            students: Mutex::new(None),
        }
    }

    pub async fn snapshot(&self) -> Option<Vec<StudentRecord>> {
        self.students.lock().await.clone()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::empty()
    }
}

#[async_trait]
impl StudentStore for MemoryStore {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    async fn exists(&self) -> bool {
        self.students.lock().await.is_some()
    }

    async fn load(&self) -> Result<Vec<StudentRecord>> {
        self.students
            .lock()
            .await
            .clone()
            .ok_or(StorageError::StoreMissing)
    }

    async fn save(&self, students: &[StudentRecord]) -> Result<()> {
        *self.students.lock().await = Some(students.to_vec());
        Ok(())
    }
}
