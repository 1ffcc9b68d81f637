use thiserror::Error;

use crate::dto::ranking::SortField;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Store file not found")]
    StoreMissing,

    #[error("Failed to read store: {0}")]
    Read(#[source] std::io::Error),

    #[error("Failed to parse store: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Failed to serialize store: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to write store: {0}")]
    Write(#[source] std::io::Error),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Outcome of a ranking query that did not produce rankings.
///
/// Variants are ordered the way the query evaluates them; the `Display`
/// strings are the messages returned to clients.
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("Invalid sort field. Must be one of: {}", SortField::names().join(", "))]
    InvalidSortField(String),

    #[error("Database file not found")]
    StoreMissing,

    #[error("Failed to retrieve rankings")]
    StoreRead(String),

    #[error("No students found in the database.")]
    Empty,

    #[error("Found {0} corrupted records in the database")]
    Corrupted(usize),
}

impl From<StorageError> for RankingError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::StoreMissing => RankingError::StoreMissing,
            other => RankingError::StoreRead(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_messages() {
        assert_eq!(
            RankingError::InvalidSortField("elo".into()).to_string(),
            "Invalid sort field. Must be one of: rapid, blitz, bullet"
        );
        assert_eq!(
            RankingError::Corrupted(2).to_string(),
            "Found 2 corrupted records in the database"
        );
        assert_eq!(RankingError::Empty.to_string(), "No students found in the database.");
    }

    #[test]
    fn test_store_missing_maps_to_its_own_outcome() {
        assert!(matches!(
            RankingError::from(StorageError::StoreMissing),
            RankingError::StoreMissing
        ));

        let read = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        match RankingError::from(StorageError::Read(read)) {
            RankingError::StoreRead(detail) => assert!(detail.contains("denied")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
