use axum::Router;
use storage::Database;

use crate::features::{ranking, students};

/// Every JSON endpoint, mounted under `/api`.
pub fn api_routes() -> Router<Database> {
    Router::new()
        .nest("/students", students::routes::routes())
        .nest("/rankings", ranking::routes::routes())
        .merge(students::routes::login_routes())
}
