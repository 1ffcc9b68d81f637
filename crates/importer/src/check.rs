use storage::{
    services::integrity::{self, CorruptedRecord},
    store::StudentStore,
};
use tracing::{info, warn};

use crate::Result;

#[derive(Debug, Default)]
pub struct CheckReport {
    pub total: usize,
    pub corrupted: Vec<CorruptedRecord>,
    pub duplicates: Vec<String>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.corrupted.is_empty() && self.duplicates.is_empty()
    }

    pub fn log(&self) {
        info!("Checked {} record(s)", self.total);
        integrity::log_corrupted(&self.corrupted);
        for id in &self.duplicates {
            warn!("Duplicate id: {}", id);
        }
    }
}

/// Scans the whole store for records the API would refuse to rank and for
/// ids used more than once.
pub async fn check_store(store: &dyn StudentStore) -> Result<CheckReport> {
    let records = store.load().await?;

    Ok(CheckReport {
        total: records.len(),
        corrupted: integrity::find_corrupted(&records),
        duplicates: integrity::duplicate_ids(&records),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storage::{error::StorageError, models::StudentRecord, store::MemoryStore};

    fn record(id: &str, rapid: serde_json::Value) -> StudentRecord {
        serde_json::from_value(json!({
            "id": id,
            "rapid": rapid,
            "blitz": 1400,
            "bullet": 1300,
            "createdAt": "2025-01-04T09:30:00Z"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_clean_store() {
        let store = MemoryStore::with_students(vec![record("2403880d", json!(1500))]);
        let report = check_store(&store).await.unwrap();
        assert_eq!(report.total, 1);
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn test_reports_corruption_and_duplicates() {
        let store = MemoryStore::with_students(vec![
            record("2403880d", json!(1500)),
            record("2402133b", json!("fast")),
            record("2403880d", json!(1200)),
        ]);

        let report = check_store(&store).await.unwrap();

        assert!(!report.is_clean());
        assert_eq!(report.corrupted.len(), 1);
        assert_eq!(report.corrupted[0].index, 1);
        assert_eq!(report.duplicates, vec!["2403880d".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_store() {
        let err = check_store(&MemoryStore::missing()).await.unwrap_err();
        assert!(matches!(
            err,
            crate::ImporterError::StorageError(StorageError::StoreMissing)
        ));
    }
}
