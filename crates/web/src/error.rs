use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::fmt;
use storage::error::{RankingError, StorageError};
use validator::ValidationErrors;

/// Request fields in the order their validation messages take precedence.
const FIELD_ORDER: &[&str] = &["id", "rapid", "blitz", "bullet"];

/// Messages one operation reports for storage failures.
#[derive(Debug, Clone, Copy)]
pub struct ErrorContext {
    /// Reported, together with the error detail, for any unexpected failure.
    pub failed: &'static str,
    pub not_found: &'static str,
    /// Reported instead of `failed` when the store file is absent.
    pub store_missing: Option<&'static str>,
    /// Key of an empty array echoed in error bodies, e.g. `students`.
    pub collection: Option<&'static str>,
}

impl ErrorContext {
    pub const fn new(failed: &'static str) -> Self {
        Self {
            failed,
            not_found: "Resource not found",
            store_missing: None,
            collection: None,
        }
    }

    pub const fn not_found(mut self, message: &'static str) -> Self {
        self.not_found = message;
        self
    }

    pub const fn store_missing(mut self, message: &'static str) -> Self {
        self.store_missing = Some(message);
        self
    }

    pub const fn collection(mut self, key: &'static str) -> Self {
        self.collection = Some(key);
        self
    }
}

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError, ErrorContext),
    Ranking(RankingError),
    Validation(ValidationErrors),
    InvalidBody(JsonRejection),
    BadRequest(String),
    NotFound {
        message: &'static str,
        collection: Option<&'static str>,
    },
}

impl WebError {
    /// Attaches an operation's messages to a storage error.
    pub fn storage(context: ErrorContext) -> impl FnOnce(StorageError) -> Self {
        move |error| Self::Storage(error, context)
    }
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e, _) => write!(f, "Storage error: {}", e),
            Self::Ranking(e) => write!(f, "Ranking error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::InvalidBody(e) => write!(f, "Invalid request body: {}", e.body_text()),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::NotFound { message, .. } => write!(f, "Not found: {}", message),
        }
    }
}

struct ErrorBody {
    status: StatusCode,
    message: String,
    detail: Option<String>,
    collection: Option<&'static str>,
}

impl ErrorBody {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            detail: None,
            collection: None,
        }
    }

    fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    fn collection(mut self, key: Option<&'static str>) -> Self {
        self.collection = key;
        self
    }
}

impl IntoResponse for ErrorBody {
    fn into_response(self) -> Response {
        let mut body = json!({
            "success": false,
            "message": self.message,
        });

        if let Some(detail) = self.detail {
            body["error"] = Value::String(detail);
        }
        if let Some(key) = self.collection {
            body[key] = json!([]);
        }

        (self.status, Json(body)).into_response()
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let body = match self {
            Self::Storage(StorageError::NotFound, context) => {
                ErrorBody::new(StatusCode::NOT_FOUND, context.not_found)
            }
            Self::Storage(StorageError::ConstraintViolation(msg), _) => {
                ErrorBody::new(StatusCode::CONFLICT, msg)
            }
            Self::Storage(StorageError::StoreMissing, context) if context.store_missing.is_some() => {
                tracing::error!("Student store is missing");
                ErrorBody::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    context.store_missing.unwrap_or(context.failed),
                )
                .collection(context.collection)
            }
            Self::Storage(e, context) => {
                tracing::error!("Storage error: {:?}", e);
                ErrorBody::new(StatusCode::INTERNAL_SERVER_ERROR, context.failed)
                    .detail(e.to_string())
                    .collection(context.collection)
            }
            Self::Ranking(e) => ranking_body(e),
            Self::Validation(errors) => {
                ErrorBody::new(StatusCode::BAD_REQUEST, validation_message(&errors))
            }
            Self::InvalidBody(rejection) => {
                ErrorBody::new(StatusCode::BAD_REQUEST, "Invalid request body")
                    .detail(rejection.body_text())
            }
            Self::BadRequest(msg) => ErrorBody::new(StatusCode::BAD_REQUEST, msg),
            Self::NotFound {
                message,
                collection,
            } => ErrorBody::new(StatusCode::NOT_FOUND, message).collection(collection),
        };

        body.into_response()
    }
}

fn ranking_body(error: RankingError) -> ErrorBody {
    let message = error.to_string();

    match error {
        RankingError::InvalidSortField(_) => ErrorBody::new(StatusCode::BAD_REQUEST, message),
        RankingError::StoreMissing => {
            tracing::error!("Student store is missing");
            ErrorBody::new(StatusCode::INTERNAL_SERVER_ERROR, message).collection(Some("rankings"))
        }
        RankingError::StoreRead(detail) => {
            tracing::error!("Failed to read student store: {}", detail);
            ErrorBody::new(StatusCode::INTERNAL_SERVER_ERROR, message)
                .detail(detail)
                .collection(Some("rankings"))
        }
        RankingError::Empty => {
            ErrorBody::new(StatusCode::NOT_FOUND, message).collection(Some("rankings"))
        }
        RankingError::Corrupted(_) => {
            ErrorBody::new(StatusCode::UNPROCESSABLE_ENTITY, message).collection(Some("rankings"))
        }
    }
}

/// Picks a single message: missing fields first, then the first offending
/// field in request order.
fn validation_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();

    let mut ordered: Vec<_> = field_errors.iter().collect();
    ordered.sort_by_key(|(field, _)| field_rank(field));

    let missing = ordered
        .iter()
        .flat_map(|(_, errors)| errors.iter())
        .find(|e| e.code == "required");

    missing
        .or_else(|| ordered.iter().flat_map(|(_, errors)| errors.iter()).next())
        .map(|e| {
            e.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| e.code.to_string())
        })
        .unwrap_or_else(|| "Validation failed".to_string())
}

fn field_rank(field: &str) -> usize {
    FIELD_ORDER
        .iter()
        .position(|known| *known == field)
        .unwrap_or(FIELD_ORDER.len())
}

impl From<RankingError> for WebError {
    fn from(error: RankingError) -> Self {
        Self::Ranking(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

impl From<JsonRejection> for WebError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection)
    }
}
