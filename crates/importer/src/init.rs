use std::path::Path;

use storage::store::{JsonFileStore, StudentStore};

use crate::{ImporterError, Result};

/// Writes an empty `{"students": []}` document at `path`, creating parent
/// directories as needed.
pub async fn init_store(path: &Path, force: bool) -> Result<()> {
    let store = JsonFileStore::new(path);

    if store.exists().await {
        if !force {
            return Err(ImporterError::StoreExists(path.to_path_buf()));
        }
        tracing::warn!("Overwriting existing store {}", path.display());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| ImporterError::CreateDirError {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    store.save(&[]).await?;
    tracing::info!("Initialized empty store at {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[tokio::test]
    async fn test_init_creates_nested_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("students.json");

        init_store(&path, false).await.unwrap();

        let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved, json!({ "students": [] }));
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.json");
        std::fs::write(&path, r#"{"students":[{"id":"2403880d"}]}"#).unwrap();

        let err = init_store(&path, false).await.unwrap_err();
        assert!(matches!(err, ImporterError::StoreExists(_)));
        assert!(std::fs::read_to_string(&path).unwrap().contains("2403880d"));

        init_store(&path, true).await.unwrap();
        assert!(!std::fs::read_to_string(&path).unwrap().contains("2403880d"));
    }
}
