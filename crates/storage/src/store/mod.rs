use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::StudentRecord;

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// On-disk layout: `{ "students": [...] }`.
///
/// A document without a `students` key reads as an empty collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentDocument {
    #[serde(default)]
    pub students: Vec<StudentRecord>,
}

/// Backing medium for the student collection.
///
/// Every read returns the whole collection and every write replaces it.
#[async_trait]
pub trait StudentStore: Send + Sync + 'static {
    /// Human readable location, used in logs.
    fn describe(&self) -> String;

    async fn exists(&self) -> bool;

    async fn load(&self) -> Result<Vec<StudentRecord>>;

    async fn save(&self, students: &[StudentRecord]) -> Result<()>;
}
