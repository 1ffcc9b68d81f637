use std::path::Path;

use axum::Router;
use storage::Database;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod error;
pub mod features;
pub mod routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::students::handlers::list_students,
        features::students::handlers::get_student,
        features::students::handlers::create_student,
        features::students::handlers::login_student,
        features::students::handlers::update_scores,
        features::students::handlers::delete_student,
        features::ranking::handlers::get_rankings,
    ),
    components(
        schemas(
            storage::dto::student::CreateStudentRequest,
            storage::dto::student::UpdateScoresRequest,
            storage::dto::student::LoginRequest,
            storage::dto::student::StudentResponse,
            storage::dto::student::StudentMessageResponse,
            storage::dto::student::StudentListResponse,
            storage::dto::student::RatingChange,
            storage::dto::student::ScoreChanges,
            storage::dto::student::ScoreUpdateResponse,
            storage::dto::student::DeletedStudent,
            storage::dto::student::DeleteStudentResponse,
            storage::dto::ranking::SortField,
            storage::dto::ranking::RankedStudent,
            storage::dto::ranking::RankingsResponse,
            storage::models::Student,
            storage::models::StudentRecord,
            storage::models::StudentId,
            storage::models::Rating,
        )
    ),
    tags(
        (name = "students", description = "Student account endpoints"),
        (name = "rankings", description = "Club leaderboard endpoints"),
    )
)]
pub struct ApiDoc;

/// Builds the full application: JSON API, API docs, and the static site as
/// fallback for every other path.
pub fn app(db: Database, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .nest("/api", routes::api_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}
