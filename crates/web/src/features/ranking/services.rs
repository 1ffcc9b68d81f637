use storage::{
    Database,
    dto::ranking::{RankedStudent, RankingQuery, SortField},
    error::RankingError,
    repository::ranking::RankingRepository,
};

/// Rank every student by the dimension named in `query`
pub async fn get_rankings(
    db: &Database,
    query: &RankingQuery,
) -> Result<(SortField, Vec<RankedStudent>), RankingError> {
    let repo = RankingRepository::new(db);
    repo.get_rankings(query).await
}
