use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

use crate::dto::ranking::SortField;

lazy_static! {
    /// Ids handed out to new members: 7 digits and a lowercase letter a-e.
    static ref STUDENT_ID: Regex = Regex::new(r"^[0-9]{7}[a-e]$").expect("valid student id pattern");

    /// Ids already present in the store are accepted with any ASCII letter, in either case.
    static ref STORED_STUDENT_ID: Regex =
        Regex::new(r"^[0-9]{7}[A-Za-z]$").expect("valid stored student id pattern");
}

/// Returns true when `id` is acceptable for a newly created student.
pub fn is_valid_student_id(id: &str) -> bool {
    STUDENT_ID.is_match(id)
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid student id: '{0}'")]
pub struct InvalidStudentId(pub String);

/// Club member identifier, e.g. `2403880d`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "2403880d")]
pub struct StudentId(String);

impl StudentId {
    pub fn parse(raw: &str) -> Result<Self, InvalidStudentId> {
        if is_valid_student_id(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(InvalidStudentId(raw.to_string()))
        }
    }

    pub(crate) fn parse_stored(raw: &str) -> Result<Self, InvalidStudentId> {
        if STORED_STUDENT_ID.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(InvalidStudentId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A rating on one of the three time controls, always within
/// [`Rating::MIN`, `Rating::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, ToSchema)]
#[schema(value_type = u16, example = 1500)]
pub struct Rating(f64);

impl Rating {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 3000.0;

    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && (Self::MIN..=Self::MAX).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn to_json(self) -> Value {
        if self.0.fract() == 0.0 {
            Value::from(self.0 as u64)
        } else {
            Value::from(self.0)
        }
    }

    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[cfg(test)]
impl From<u16> for Rating {
    fn from(value: u16) -> Self {
        Self::new(f64::from(value)).expect("rating within range")
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.fract() == 0.0 {
            serializer.serialize_u64(self.0 as u64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

/// The three ratings written together by create and update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scores {
    pub rapid: Rating,
    pub blitz: Rating,
    pub bullet: Rating,
}

/// A fully validated student.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub rapid: Rating,
    pub blitz: Rating,
    pub bullet: Rating,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Student {
    pub fn new(id: StudentId, scores: Scores, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            rapid: scores.rapid,
            blitz: scores.blitz,
            bullet: scores.bullet,
            created_at,
            updated_at: None,
        }
    }

    pub fn rating(&self, field: SortField) -> Rating {
        match field {
            SortField::Rapid => self.rapid,
            SortField::Blitz => self.blitz,
            SortField::Bullet => self.bullet,
        }
    }
}

/// One entry of the `students` array exactly as persisted.
///
/// Every field is kept as raw JSON so that a damaged entry can be loaded,
/// reported by the integrity check, and written back untouched by mutations
/// on other entries. Use [`crate::services::integrity::inspect`] to obtain a
/// [`Student`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    #[schema(value_type = String, example = "2403880d")]
    pub id: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    #[schema(value_type = u16, example = 1500)]
    pub rapid: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    #[schema(value_type = u16, example = 1400)]
    pub blitz: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    #[schema(value_type = u16, example = 1300)]
    pub bullet: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub updated_at: Value,
    /// Keys this service does not interpret, written back as found.
    #[serde(flatten)]
    #[schema(ignore)]
    pub extra: Map<String, Value>,
}

impl StudentRecord {
    pub fn id_str(&self) -> Option<&str> {
        self.id.as_str()
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.id_str() == Some(id)
    }

    /// Overwrites the three ratings and stamps `updatedAt`.
    pub fn apply_scores(&mut self, scores: Scores, at: DateTime<Utc>) {
        self.rapid = scores.rapid.to_json();
        self.blitz = scores.blitz.to_json();
        self.bullet = scores.bullet.to_json();
        self.updated_at = Value::String(format_timestamp(at));
    }
}

impl From<&Student> for StudentRecord {
    fn from(student: &Student) -> Self {
        Self {
            id: Value::String(student.id.to_string()),
            rapid: student.rapid.to_json(),
            blitz: student.blitz.to_json(),
            bullet: student.bullet.to_json(),
            created_at: Value::String(format_timestamp(student.created_at)),
            updated_at: student
                .updated_at
                .map(|at| Value::String(format_timestamp(at)))
                .unwrap_or(Value::Null),
            extra: Map::new(),
        }
    }
}

/// Timestamp format written to the store, e.g. `2025-01-04T09:30:00.000Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses the timestamp shapes found in stores: RFC 3339, a naive
/// date-time (read as UTC), or a bare date.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
