pub mod dto;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod store;

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use store::{JsonFileStore, StudentStore};

/// Shared handle to the student store.
///
/// Cloning is cheap. All clones share one write lock so that
/// load-modify-save cycles never interleave; reads do not take it.
#[derive(Clone)]
pub struct Database {
    store: Arc<dyn StudentStore>,
    writer: Arc<Mutex<()>>,
}

impl Database {
    /// Opens the JSON file store at `path`. The file is not touched until
    /// the first request.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_store(JsonFileStore::new(path))
    }

    pub fn with_store(store: impl StudentStore) -> Self {
        Self {
            store: Arc::new(store),
            writer: Arc::new(Mutex::new(())),
        }
    }

    pub fn store(&self) -> &dyn StudentStore {
        self.store.as_ref()
    }

    pub(crate) async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().await
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("store", &self.store.describe())
            .finish()
    }
}
