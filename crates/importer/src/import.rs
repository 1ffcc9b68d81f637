use std::collections::HashSet;
use std::path::Path;

use storage::{
    models::{StudentRecord, is_valid_student_id},
    services::integrity,
    store::{StudentDocument, StudentStore},
};

use crate::{ImporterError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    /// Position in the incoming `students` array.
    pub index: usize,
    pub id: Option<String>,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub accepted: Vec<String>,
    pub skipped: Vec<String>,
    pub rejected: Vec<RejectedRecord>,
}

impl ImportReport {
    pub fn log(&self) {
        for id in &self.skipped {
            tracing::info!("Skipping {}: already in the store", id);
        }
        for rejected in &self.rejected {
            tracing::warn!(
                "Rejecting record #{} ({}): {}",
                rejected.index,
                rejected.id.as_deref().unwrap_or("no id"),
                rejected.reason
            );
        }
        tracing::info!(
            "{} accepted, {} skipped, {} rejected",
            self.accepted.len(),
            self.skipped.len(),
            self.rejected.len()
        );
    }
}

pub async fn read_document(path: &Path) -> Result<StudentDocument> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ImporterError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(serde_json::from_str(&content)?)
}

/// Appends every clean incoming record whose id is not yet taken. Nothing is
/// written when `dry_run` is set or when no record was accepted.
pub async fn import_records(
    store: &dyn StudentStore,
    incoming: Vec<StudentRecord>,
    dry_run: bool,
) -> Result<ImportReport> {
    let mut students = store.load().await?;
    let (accepted, report) = plan(&students, incoming);

    if dry_run {
        tracing::info!("Dry run: {} record(s) would be added", accepted.len());
    } else if !accepted.is_empty() {
        students.extend(accepted);
        store.save(&students).await?;
        tracing::info!("Saved {} record(s) to {}", students.len(), store.describe());
    }

    Ok(report)
}

fn plan(existing: &[StudentRecord], incoming: Vec<StudentRecord>) -> (Vec<StudentRecord>, ImportReport) {
    let mut taken: HashSet<String> = existing
        .iter()
        .filter_map(StudentRecord::id_str)
        .map(str::to_string)
        .collect();
    let mut accepted = Vec::new();
    let mut report = ImportReport::default();

    for (index, record) in incoming.into_iter().enumerate() {
        let id = record.id_str().map(str::to_string);

        if let Err(violations) = integrity::inspect(&record) {
            let reason = violations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            report.rejected.push(RejectedRecord { index, id, reason });
            continue;
        }

        let Some(id) = id else { continue };

        if !is_valid_student_id(&id) {
            report.rejected.push(RejectedRecord {
                index,
                id: Some(id),
                reason: "'id' must be 7 digits followed by a letter a-e".to_string(),
            });
            continue;
        }

        if !taken.insert(id.clone()) {
            report.skipped.push(id);
            continue;
        }

        report.accepted.push(id);
        accepted.push(record);
    }

    (accepted, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use storage::store::{JsonFileStore, MemoryStore};

    fn record(id: &str, rapid: Value) -> StudentRecord {
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
    async fn test_import_appends_new_clean_records() {
        let store = MemoryStore::with_students(vec![record("2403880d", json!(1500))]);

        let report = import_records(
            &store,
            vec![
                record("2403880d", json!(1700)),
                record("2402133b", json!(1600)),
                record("2402133c", Value::Null),
                record("2402133Z", json!(1600)),
                record("2402133b", json!(1000)),
            ],
            false,
        )
        .await
        .unwrap();

        assert_eq!(report.accepted, vec!["2402133b".to_string()]);
        assert_eq!(
            report.skipped,
            vec!["2403880d".to_string(), "2402133b".to_string()]
        );
        let rejected: Vec<usize> = report.rejected.iter().map(|r| r.index).collect();
        assert_eq!(rejected, vec![2, 3]);

        let saved = store.snapshot().await.unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].rapid, json!(1500));
        assert_eq!(saved[1], record("2402133b", json!(1600)));
    }

    #[tokio::test]
    async fn test_dry_run_leaves_store_untouched() {
        let store = MemoryStore::empty();

        let report = import_records(&store, vec![record("2403880d", json!(1500))], true)
            .await
            .unwrap();

        assert_eq!(report.accepted.len(), 1);
        assert!(store.snapshot().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_into_missing_store() {
        let err = import_records(&MemoryStore::missing(), Vec::new(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, ImporterError::StorageError(_)));
    }

    #[tokio::test]
    async fn test_read_document_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("incoming.json");
        std::fs::write(
            &source,
            json!({ "students": [record("2403880d", json!(1500))] }).to_string(),
        )
        .unwrap();
        let target = JsonFileStore::new(dir.path().join("students.json"));
        target.save(&[]).await.unwrap();

        let document = read_document(&source).await.unwrap();
        import_records(&target, document.students, false).await.unwrap();

        assert_eq!(target.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_read_document_missing_file() {
        let err = read_document(Path::new("/nonexistent/incoming.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, ImporterError::ReadError { .. }));
    }
}
