use crate::Database;
use crate::dto::ranking::{RankedStudent, RankingQuery, SortField};
use crate::error::RankingError;
use crate::services::{integrity, ranking};

pub struct RankingRepository<'a> {
    db: &'a Database,
}

impl<'a> RankingRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Ranks every student by the requested dimension.
    ///
    /// Guards run in a fixed order and the first failing one decides the
    /// outcome: sort field, store availability, emptiness, integrity.
    pub async fn get_rankings(
        &self,
        query: &RankingQuery,
    ) -> Result<(SortField, Vec<RankedStudent>), RankingError> {
        let sort_by = query.sort_field()?;

        let records = self.db.store().load().await?;

        if records.is_empty() {
            return Err(RankingError::Empty);
        }

        let students = integrity::validate_collection(&records).map_err(|corrupted| {
            integrity::log_corrupted(&corrupted);
            RankingError::Corrupted(corrupted.len())
        })?;

        let entries: Vec<_> = records.into_iter().zip(students).collect();

        Ok((sort_by, ranking::rank(&entries, sort_by)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StudentRecord;
    use crate::store::MemoryStore;
    use serde_json::{Value, json};

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

    fn query(sort_by: &str) -> RankingQuery {
        RankingQuery {
            sort_by: Some(sort_by.to_string()),
        }
    }

    #[tokio::test]
    async fn test_invalid_sort_field_wins_over_store_state() {
        for store in [
            MemoryStore::missing(),
            MemoryStore::empty(),
            MemoryStore::with_students(vec![record("2403880d", Value::Null)]),
        ] {
            let db = Database::with_store(store);
            let result = RankingRepository::new(&db).get_rankings(&query("elo")).await;
            assert!(matches!(result, Err(RankingError::InvalidSortField(ref f)) if f == "elo"));
        }
    }

    #[tokio::test]
    async fn test_missing_store() {
        let db = Database::with_store(MemoryStore::missing());
        let result = RankingRepository::new(&db)
            .get_rankings(&RankingQuery::default())
            .await;
        assert!(matches!(result, Err(RankingError::StoreMissing)));
    }

    #[tokio::test]
    async fn test_empty_store() {
        let db = Database::with_store(MemoryStore::empty());
        let result = RankingRepository::new(&db).get_rankings(&query("blitz")).await;
        assert!(matches!(result, Err(RankingError::Empty)));
    }

    #[tokio::test]
    async fn test_corrupted_records_are_counted() {
        let db = Database::with_store(MemoryStore::with_students(vec![
            record("2403880d", json!(1500)),
            record("2402133b", Value::Null),
            record("2402133i", json!("1600")),
        ]));
        let result = RankingRepository::new(&db).get_rankings(&query("rapid")).await;
        assert!(matches!(result, Err(RankingError::Corrupted(2))));
    }

    #[tokio::test]
    async fn test_ranked_by_requested_field() {
        let db = Database::with_store(MemoryStore::with_students(vec![
            record("2409876d", json!(2000)),
            record("2402133b", json!(1500)),
            record("2402133i", json!(1600)),
        ]));

        let (sort_by, rankings) = RankingRepository::new(&db)
            .get_rankings(&RankingQuery::default())
            .await
            .unwrap();

        assert_eq!(sort_by, SortField::Rapid);
        let order: Vec<(&str, usize)> = rankings
            .iter()
            .map(|entry| (entry.record.id_str().unwrap(), entry.rank))
            .collect();
        assert_eq!(order, vec![("2409876d", 1), ("2402133i", 2), ("2402133b", 3)]);
    }

    #[tokio::test]
    async fn test_ranked_rows_match_the_store() {
        let mut stored = record("2403880d", json!(1500));
        stored.created_at = json!("2025-01-04");
        stored.extra.insert("name".to_string(), json!("Ann"));
        let db = Database::with_store(MemoryStore::with_students(vec![stored.clone()]));

        let (_, rankings) = RankingRepository::new(&db)
            .get_rankings(&RankingQuery::default())
            .await
            .unwrap();

        assert_eq!(rankings[0].record, stored);
    }
}
