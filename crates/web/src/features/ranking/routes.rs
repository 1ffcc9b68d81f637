use axum::{routing::get, Router};
use storage::Database;

use super::handlers::get_rankings;

pub fn routes() -> Router<Database> {
    Router::new().route("/", get(get_rankings))
}
