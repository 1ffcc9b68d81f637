use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::ranking::{RankingQuery, RankingsResponse},
    error::RankingError,
};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/rankings",
    params(RankingQuery),
    responses(
        (status = 200, description = "Students ranked by the requested rating", body = RankingsResponse),
        (status = 400, description = "Invalid sort field"),
        (status = 404, description = "No students in the store"),
        (status = 422, description = "The store contains corrupted records"),
        (status = 500, description = "The store is missing or unreadable")
    ),
    tag = "rankings"
)]
pub async fn get_rankings(
    State(db): State<Database>,
    query: Result<Query<RankingQuery>, QueryRejection>,
) -> Result<Response, WebError> {
    let Query(query) =
        query.map_err(|rejection| RankingError::InvalidSortField(rejection.body_text()))?;

    let (sort_by, rankings) = services::get_rankings(&db, &query).await?;

    tracing::debug!("Ranked {} student(s) by {}", rankings.len(), sort_by);

    Ok(Json(RankingsResponse::new(sort_by, rankings)).into_response())
}
