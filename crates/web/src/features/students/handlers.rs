use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::student::{
        CreateStudentRequest, DeleteStudentResponse, LoginRequest, NewStudent,
        ScoreUpdateResponse, StudentListResponse, StudentMessageResponse, StudentResponse,
        UpdateScoresRequest,
    },
    models::Scores,
};
use validator::Validate;

use crate::error::{ErrorContext, WebError};

use super::services;

const LIST: ErrorContext = ErrorContext::new("Failed to retrieve student data")
    .store_missing("Database file not found. Please create student accounts first.")
    .collection("students");

const GET: ErrorContext =
    ErrorContext::new("Failed to retrieve student data").not_found("Student not found.");

const CREATE: ErrorContext = ErrorContext::new("Failed to create student account");

const LOGIN: ErrorContext = ErrorContext::new("Failed to login. Please try again.")
    .not_found("Student ID not found. Please check your ID and try again.");

const UPDATE: ErrorContext = ErrorContext::new("Failed to update scores. Please try again.")
    .not_found("Student ID not found. Cannot update scores.");

const DELETE: ErrorContext = ErrorContext::new("Failed to delete account. Please try again.")
    .not_found("Student ID not found. Cannot delete account.")
    .store_missing("Database file not found. Cannot delete account.");

#[utoipa::path(
    get,
    path = "/api/students",
    responses(
        (status = 200, description = "All students in store order", body = StudentListResponse),
        (status = 404, description = "No students in the store"),
        (status = 500, description = "The store is missing or unreadable")
    ),
    tag = "students"
)]
pub async fn list_students(State(db): State<Database>) -> Result<Response, WebError> {
    let students = services::list_students(&db)
        .await
        .map_err(WebError::storage(LIST))?;

    if students.is_empty() {
        return Err(WebError::NotFound {
            message: "No students found in the database.",
            collection: Some("students"),
        });
    }

    Ok(Json(StudentListResponse::new(students)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(
        ("id" = String, Path, description = "Student id")
    ),
    responses(
        (status = 200, description = "Student found", body = StudentResponse),
        (status = 404, description = "Student not found")
    ),
    tag = "students"
)]
pub async fn get_student(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<Response, WebError> {
    let student = services::get_student(&db, &id)
        .await
        .map_err(WebError::storage(GET))?;

    Ok(Json(StudentResponse::new(student)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created successfully", body = StudentMessageResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Student id already exists")
    ),
    tag = "students"
)]
pub async fn create_student(
    State(db): State<Database>,
    payload: Result<Json<CreateStudentRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let Json(req) = payload?;
    req.validate()?;

    let new_student = NewStudent::try_from(&req).map_err(WebError::BadRequest)?;

    let student = services::create_student(&db, &new_student)
        .await
        .map_err(WebError::storage(CREATE))?;

    Ok((
        StatusCode::CREATED,
        Json(StudentMessageResponse::new(
            "Student account created successfully!",
            student,
        )),
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Student exists", body = StudentMessageResponse),
        (status = 400, description = "Missing student id"),
        (status = 404, description = "Student not found")
    ),
    tag = "students"
)]
pub async fn login_student(
    State(db): State<Database>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let Json(req) = payload?;
    req.validate()?;

    let id = req.id.unwrap_or_default();
    let student = services::get_student(&db, &id)
        .await
        .map_err(WebError::storage(LOGIN))?;

    tracing::info!("Student {} logged in", id);

    Ok(Json(StudentMessageResponse::new("Login successful!", student)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(
        ("id" = String, Path, description = "Student id")
    ),
    request_body = UpdateScoresRequest,
    responses(
        (status = 200, description = "Scores updated successfully", body = ScoreUpdateResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Student not found")
    ),
    tag = "students"
)]
pub async fn update_scores(
    State(db): State<Database>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateScoresRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let Json(req) = payload?;
    req.validate()?;

    let scores = Scores::try_from(&req).map_err(WebError::BadRequest)?;

    let (student, changes) = services::update_scores(&db, &id, &scores)
        .await
        .map_err(WebError::storage(UPDATE))?;

    Ok(Json(ScoreUpdateResponse::new(student, changes)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(
        ("id" = String, Path, description = "Student id")
    ),
    responses(
        (status = 200, description = "Student deleted successfully", body = DeleteStudentResponse),
        (status = 404, description = "Student not found")
    ),
    tag = "students"
)]
pub async fn delete_student(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<Response, WebError> {
    let (deleted, remaining) = services::delete_student(&db, &id)
        .await
        .map_err(WebError::storage(DELETE))?;

    Ok(Json(DeleteStudentResponse::new(deleted, remaining)).into_response())
}
