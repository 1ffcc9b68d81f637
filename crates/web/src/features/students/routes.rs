use axum::{
    routing::{get, post},
    Router,
};
use storage::Database;

use super::handlers::{
    create_student, delete_student, get_student, list_students, login_student, update_scores,
};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route(
            "/:id",
            get(get_student).put(update_scores).delete(delete_student),
        )
}

pub fn login_routes() -> Router<Database> {
    Router::new().route("/login", post(login_student))
}
