use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

use crate::models::{Rating, Student, StudentId, StudentRecord, parse_timestamp};

/// A single reason a stored record cannot be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    MissingField(&'static str),
    NotANumber(&'static str),
    OutOfRange(&'static str),
    InvalidDate,
    InvalidId,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing field '{}'", field),
            Self::NotANumber(field) => write!(f, "'{}' is not a number", field),
            Self::OutOfRange(field) => write!(
                f,
                "'{}' is outside {}..={}",
                field,
                Rating::MIN,
                Rating::MAX
            ),
            Self::InvalidDate => write!(f, "'createdAt' is not a valid date"),
            Self::InvalidId => write!(f, "'id' must be 7 digits followed by a letter"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorruptedRecord {
    /// Position in the store's `students` array.
    pub index: usize,
    pub id: Option<String>,
    pub violations: Vec<Violation>,
}

impl CorruptedRecord {
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => format!("#{} ({})", self.index, id),
            None => format!("#{}", self.index),
        }
    }

    pub fn describe(&self) -> String {
        self.violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Checks one stored record, returning the typed student when it is clean
/// or every rule it breaks otherwise.
pub fn inspect(record: &StudentRecord) -> Result<Student, Vec<Violation>> {
    let mut violations = Vec::new();

    let id = match &record.id {
        Value::Null => {
            violations.push(Violation::MissingField("id"));
            None
        }
        Value::String(raw) if raw.is_empty() => {
            violations.push(Violation::MissingField("id"));
            None
        }
        Value::String(raw) => match StudentId::parse_stored(raw) {
            Ok(id) => Some(id),
            Err(_) => {
                violations.push(Violation::InvalidId);
                None
            }
        },
        _ => {
            violations.push(Violation::InvalidId);
            None
        }
    };

    let rapid = check_rating("rapid", &record.rapid, &mut violations);
    let blitz = check_rating("blitz", &record.blitz, &mut violations);
    let bullet = check_rating("bullet", &record.bullet, &mut violations);

    let created_at = match &record.created_at {
        Value::Null => {
            violations.push(Violation::MissingField("createdAt"));
            None
        }
        Value::String(raw) if raw.is_empty() => {
            violations.push(Violation::MissingField("createdAt"));
            None
        }
        Value::String(raw) => {
            let parsed = parse_timestamp(raw);
            if parsed.is_none() {
                violations.push(Violation::InvalidDate);
            }
            parsed
        }
        _ => {
            violations.push(Violation::InvalidDate);
            None
        }
    };

    match (id, rapid, blitz, bullet, created_at) {
        (Some(id), Some(rapid), Some(blitz), Some(bullet), Some(created_at))
            if violations.is_empty() =>
        {
            Ok(Student {
                id,
                rapid,
                blitz,
                bullet,
                created_at,
                updated_at: record.updated_at.as_str().and_then(parse_timestamp),
            })
        }
        _ => Err(violations),
    }
}

fn check_rating(
    field: &'static str,
    value: &Value,
    violations: &mut Vec<Violation>,
) -> Option<Rating> {
    match value {
        Value::Null => {
            violations.push(Violation::MissingField(field));
            None
        }
        Value::Number(number) => match number.as_f64() {
            Some(raw) if raw.is_finite() => {
                let rating = Rating::new(raw);
                if rating.is_none() {
                    violations.push(Violation::OutOfRange(field));
                }
                rating
            }
            _ => {
                violations.push(Violation::NotANumber(field));
                None
            }
        },
        _ => {
            violations.push(Violation::NotANumber(field));
            None
        }
    }
}

/// Lists every record that fails [`inspect`], in store order.
pub fn find_corrupted(records: &[StudentRecord]) -> Vec<CorruptedRecord> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            inspect(record).err().map(|violations| CorruptedRecord {
                index,
                id: record.id_str().map(str::to_string),
                violations,
            })
        })
        .collect()
}

/// All-or-nothing: the typed students when every record is clean,
/// otherwise the full list of offenders.
pub fn validate_collection(
    records: &[StudentRecord],
) -> Result<Vec<Student>, Vec<CorruptedRecord>> {
    let mut students = Vec::with_capacity(records.len());
    let mut corrupted = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match inspect(record) {
            Ok(student) => students.push(student),
            Err(violations) => corrupted.push(CorruptedRecord {
                index,
                id: record.id_str().map(str::to_string),
                violations,
            }),
        }
    }

    if corrupted.is_empty() {
        Ok(students)
    } else {
        Err(corrupted)
    }
}

/// Ids that appear on more than one record, in order of first appearance.
pub fn duplicate_ids(records: &[StudentRecord]) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut duplicates = Vec::new();

    for id in records.iter().filter_map(StudentRecord::id_str) {
        let count = seen.entry(id).or_insert(0);
        *count += 1;
        if *count == 2 {
            duplicates.push(id.to_string());
        }
    }

    duplicates
}

pub fn log_corrupted(corrupted: &[CorruptedRecord]) {
    for record in corrupted {
        warn!("Corrupted record {}: {}", record.label(), record.describe());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> StudentRecord {
        serde_json::from_value(value).unwrap()
    }

    fn clean(id: &str, rapid: u16) -> StudentRecord {
        record(json!({
            "id": id,
            "rapid": rapid,
            "blitz": 1400,
            "bullet": 1300,
            "createdAt": "2025-01-04T09:30:00Z"
        }))
    }

    #[test]
    fn test_clean_record_becomes_student() {
        let student = inspect(&clean("2403880d", 1500)).unwrap();
        assert_eq!(student.id.as_str(), "2403880d");
        assert_eq!(student.rapid, Rating::from(1500));
        assert!(student.updated_at.is_none());
    }

    #[test]
    fn test_legacy_ids_are_accepted() {
        assert!(inspect(&clean("2402133i", 1500)).is_ok());
        assert!(inspect(&clean("2402133B", 1500)).is_ok());
    }

    #[test]
    fn test_null_rating_is_missing() {
        let mut bad = clean("2403880d", 1500);
        bad.rapid = Value::Null;
        assert_eq!(inspect(&bad).unwrap_err(), vec![Violation::MissingField("rapid")]);
    }

    #[test]
    fn test_string_rating_is_not_a_number() {
        let mut bad = clean("2403880d", 1500);
        bad.blitz = json!("1400");
        assert_eq!(inspect(&bad).unwrap_err(), vec![Violation::NotANumber("blitz")]);
    }

    #[test]
    fn test_out_of_range_ratings() {
        let mut bad = clean("2403880d", 1500);
        bad.rapid = json!(-1);
        bad.bullet = json!(3001);
        assert_eq!(
            inspect(&bad).unwrap_err(),
            vec![Violation::OutOfRange("rapid"), Violation::OutOfRange("bullet")]
        );
    }

    #[test]
    fn test_bad_date_and_id() {
        let mut bad = clean("24038d", 1500);
        bad.created_at = json!("not a date");
        assert_eq!(
            inspect(&bad).unwrap_err(),
            vec![Violation::InvalidId, Violation::InvalidDate]
        );
    }

    #[test]
    fn test_missing_everything() {
        let violations = inspect(&StudentRecord::default()).unwrap_err();
        assert_eq!(violations.len(), 5);
        assert!(violations.contains(&Violation::MissingField("createdAt")));
    }

    #[test]
    fn test_find_corrupted_reports_index_and_id() {
        let mut bad = clean("2402133b", 1500);
        bad.rapid = Value::Null;
        let records = vec![clean("2403880d", 1500), bad, clean("2402133i", 1600)];

        let corrupted = find_corrupted(&records);
        assert_eq!(corrupted.len(), 1);
        assert_eq!(corrupted[0].index, 1);
        assert_eq!(corrupted[0].id.as_deref(), Some("2402133b"));
        assert_eq!(corrupted[0].label(), "#1 (2402133b)");
    }

    #[test]
    fn test_validate_collection_is_all_or_nothing() {
        let records = vec![clean("2403880d", 1500), clean("2402133i", 1600)];
        assert_eq!(validate_collection(&records).unwrap().len(), 2);

        let mut records = records;
        records.push(record(json!({ "id": "2402133b" })));
        let corrupted = validate_collection(&records).unwrap_err();
        assert_eq!(corrupted.len(), 1);
    }

    #[test]
    fn test_duplicate_ids() {
        let records = vec![
            clean("2403880d", 1500),
            clean("2402133i", 1600),
            clean("2403880d", 1700),
            clean("2403880d", 1800),
        ];
        assert_eq!(duplicate_ids(&records), vec!["2403880d".to_string()]);
    }
}
