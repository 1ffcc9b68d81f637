use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::{Rating, Scores, StudentId, StudentRecord, is_valid_student_id};

pub const MISSING_FIELDS_MESSAGE: &str =
    "Missing required fields. Please provide ID, Rapid, Blitz, and Bullet scores.";
pub const INVALID_ID_MESSAGE: &str =
    "Invalid ID format. Must be 7 digits followed by a letter (a-e), e.g., 2403880d";
pub const INVALID_SCORES_MESSAGE: &str = "Invalid scores. All ratings must be between 0 and 3000.";
pub const DUPLICATE_ID_MESSAGE: &str = "Student ID already exists. Please use a different ID.";

/// Request payload for creating a new student account
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateStudentRequest {
    #[validate(
        required(message = "Missing required fields. Please provide ID, Rapid, Blitz, and Bullet scores."),
        custom(function = "validate_new_student_id")
    )]
    #[schema(example = "2403880d")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient_rating")]
    #[validate(
        required(message = "Missing required fields. Please provide ID, Rapid, Blitz, and Bullet scores."),
        range(min = 0, max = 3000, message = "Invalid scores. All ratings must be between 0 and 3000.")
    )]
    #[schema(value_type = u16, example = 1500)]
    pub rapid: Option<i64>,

    #[serde(default, deserialize_with = "lenient_rating")]
    #[validate(
        required(message = "Missing required fields. Please provide ID, Rapid, Blitz, and Bullet scores."),
        range(min = 0, max = 3000, message = "Invalid scores. All ratings must be between 0 and 3000.")
    )]
    #[schema(value_type = u16, example = 1400)]
    pub blitz: Option<i64>,

    #[serde(default, deserialize_with = "lenient_rating")]
    #[validate(
        required(message = "Missing required fields. Please provide ID, Rapid, Blitz, and Bullet scores."),
        range(min = 0, max = 3000, message = "Invalid scores. All ratings must be between 0 and 3000.")
    )]
    #[schema(value_type = u16, example = 1300)]
    pub bullet: Option<i64>,
}

/// Request payload for replacing a student's three ratings
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateScoresRequest {
    #[serde(default, deserialize_with = "lenient_rating")]
    #[validate(
        required(message = "All rating fields (Rapid, Blitz, Bullet) are required."),
        range(min = 0, max = 3000, message = "Invalid scores. All ratings must be between 0 and 3000.")
    )]
    #[schema(value_type = u16, example = 1550)]
    pub rapid: Option<i64>,

    #[serde(default, deserialize_with = "lenient_rating")]
    #[validate(
        required(message = "All rating fields (Rapid, Blitz, Bullet) are required."),
        range(min = 0, max = 3000, message = "Invalid scores. All ratings must be between 0 and 3000.")
    )]
    #[schema(value_type = u16, example = 1450)]
    pub blitz: Option<i64>,

    #[serde(default, deserialize_with = "lenient_rating")]
    #[validate(
        required(message = "All rating fields (Rapid, Blitz, Bullet) are required."),
        range(min = 0, max = 3000, message = "Invalid scores. All ratings must be between 0 and 3000.")
    )]
    #[schema(value_type = u16, example = 1350)]
    pub bullet: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(
        required(message = "Student ID is required."),
        length(min = 1, message = "Student ID is required.")
    )]
    #[schema(example = "2403880d")]
    pub id: Option<String>,
}

/// Validated input for a new student.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub id: StudentId,
    pub scores: Scores,
}

impl TryFrom<&CreateStudentRequest> for NewStudent {
    type Error = String;

    fn try_from(req: &CreateStudentRequest) -> Result<Self, Self::Error> {
        let id = req.id.as_deref().ok_or(MISSING_FIELDS_MESSAGE)?;
        let id = StudentId::parse(id).map_err(|_| INVALID_ID_MESSAGE.to_string())?;
        let scores = scores_from(req.rapid, req.blitz, req.bullet)?;
        Ok(Self { id, scores })
    }
}

impl TryFrom<&UpdateScoresRequest> for Scores {
    type Error = String;

    fn try_from(req: &UpdateScoresRequest) -> Result<Self, Self::Error> {
        scores_from(req.rapid, req.blitz, req.bullet)
    }
}

fn scores_from(rapid: Option<i64>, blitz: Option<i64>, bullet: Option<i64>) -> Result<Scores, String> {
    let rating = |value: Option<i64>| {
        value
            .and_then(|v| Rating::new(v as f64))
            .ok_or_else(|| INVALID_SCORES_MESSAGE.to_string())
    };

    Ok(Scores {
        rapid: rating(rapid)?,
        blitz: rating(blitz)?,
        bullet: rating(bullet)?,
    })
}

// An empty id is reported as missing rather than malformed.
fn validate_new_student_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some(Cow::Borrowed(MISSING_FIELDS_MESSAGE));
        return Err(error);
    }

    if is_valid_student_id(id) {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_student_id");
        error.message = Some(Cow::Borrowed(INVALID_ID_MESSAGE));
        Err(error)
    }
}

/// Accepts ratings sent as JSON numbers or numeric strings; fractional
/// parts are truncated.
fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|value| value.trunc() as i64))
            .map(Some)
            .ok_or_else(|| de::Error::custom("rating is not a number")),
        Some(Value::String(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(|value| Some(value.trunc() as i64))
            .ok_or_else(|| de::Error::custom(format!("rating '{}' is not a number", text))),
        Some(other) => Err(de::Error::custom(format!(
            "rating must be a number, got {}",
            other
        ))),
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentResponse {
    pub success: bool,
    pub student: StudentRecord,
}

impl StudentResponse {
    pub fn new(student: StudentRecord) -> Self {
        Self {
            success: true,
            student,
        }
    }
}

/// Returned by create and login.
#[derive(Debug, Serialize, ToSchema)]
pub struct StudentMessageResponse {
    pub success: bool,
    pub message: String,
    pub student: StudentRecord,
}

impl StudentMessageResponse {
    pub fn new(message: impl Into<String>, student: StudentRecord) -> Self {
        Self {
            success: true,
            message: message.into(),
            student,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentListResponse {
    pub success: bool,
    pub message: String,
    pub count: usize,
    pub students: Vec<StudentRecord>,
}

impl StudentListResponse {
    pub fn new(students: Vec<StudentRecord>) -> Self {
        Self {
            success: true,
            message: format!("Found {} student(s)", students.len()),
            count: students.len(),
            students,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RatingChange {
    #[schema(value_type = u16)]
    pub old: Value,
    pub new: Rating,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ScoreChanges {
    pub rapid: RatingChange,
    pub blitz: RatingChange,
    pub bullet: RatingChange,
}

impl ScoreChanges {
    /// Captures the previous values of `record` against the incoming scores.
    pub fn between(record: &StudentRecord, scores: &Scores) -> Self {
        Self {
            rapid: RatingChange {
                old: record.rapid.clone(),
                new: scores.rapid,
            },
            blitz: RatingChange {
                old: record.blitz.clone(),
                new: scores.blitz,
            },
            bullet: RatingChange {
                old: record.bullet.clone(),
                new: scores.bullet,
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreUpdateResponse {
    pub success: bool,
    pub message: String,
    pub student: StudentRecord,
    pub changes: ScoreChanges,
}

impl ScoreUpdateResponse {
    pub fn new(student: StudentRecord, changes: ScoreChanges) -> Self {
        Self {
            success: true,
            message: "Scores updated successfully!".to_string(),
            student,
            changes,
        }
    }
}

/// Ratings of a removed account, echoed back as confirmation.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedStudent {
    #[schema(value_type = String)]
    pub id: Value,
    #[schema(value_type = u16)]
    pub rapid: Value,
    #[schema(value_type = u16)]
    pub blitz: Value,
    #[schema(value_type = u16)]
    pub bullet: Value,
}

impl From<StudentRecord> for DeletedStudent {
    fn from(record: StudentRecord) -> Self {
        Self {
            id: record.id,
            rapid: record.rapid,
            blitz: record.blitz,
            bullet: record.bullet,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteStudentResponse {
    pub success: bool,
    pub message: String,
    pub deleted_student: DeletedStudent,
    pub remaining_students: usize,
}

impl DeleteStudentResponse {
    pub fn new(deleted: StudentRecord, remaining_students: usize) -> Self {
        Self {
            success: true,
            message: "Account deleted successfully. You have left the Chess Club.".to_string(),
            deleted_student: DeletedStudent::from(deleted),
            remaining_students,
        }
    }
}
