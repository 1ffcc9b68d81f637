use crate::dto::ranking::{RankedStudent, SortField};
use crate::models::{Student, StudentRecord};

/// Orders `entries` by `field`, highest rating first, and numbers them from 1.
///
/// Each entry pairs a stored record with its validated form; the rating is
/// read from the validated student and the output carries the stored record
/// unchanged. The sort is stable: equal ratings keep their store order.
pub fn rank(entries: &[(StudentRecord, Student)], field: SortField) -> Vec<RankedStudent> {
    let mut ordered: Vec<&(StudentRecord, Student)> = entries.iter().collect();
    ordered.sort_by(|(_, a), (_, b)| b.rating(field).total_cmp(&a.rating(field)));

    ordered
        .into_iter()
        .enumerate()
        .map(|(position, (record, _))| RankedStudent {
            rank: position + 1,
            record: record.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::integrity;
    use serde_json::{Value, json};

    fn entry(raw: Value) -> (StudentRecord, Student) {
        let record: StudentRecord = serde_json::from_value(raw).unwrap();
        let student = integrity::inspect(&record).unwrap();
        (record, student)
    }

    fn student(id: &str, rapid: u16, blitz: u16, bullet: u16) -> (StudentRecord, Student) {
        entry(json!({
            "id": id,
            "rapid": rapid,
            "blitz": blitz,
            "bullet": bullet,
            "createdAt": "2025-01-04T09:30:00Z"
        }))
    }

    fn ids(ranked: &[RankedStudent]) -> Vec<&str> {
        ranked.iter().filter_map(|entry| entry.record.id_str()).collect()
    }

    #[test]
    fn test_rank_by_rapid() {
        let students = vec![
            student("2409876d", 2000, 1000, 1000),
            student("2402133b", 1500, 1000, 1000),
            student("2402133i", 1600, 1000, 1000),
        ];

        let ranked = rank(&students, SortField::Rapid);

        assert_eq!(ids(&ranked), vec!["2409876d", "2402133i", "2402133b"]);
        assert_eq!(ranked.iter().map(|e| e.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_each_dimension_sorts_descending() {
        let students = vec![
            student("2400001a", 1200, 1800, 900),
            student("2400002b", 1900, 1100, 2500),
            student("2400003c", 1500, 1500, 1500),
        ];

        for field in SortField::ALL {
            let ranked = rank(&students, field);
            let values: Vec<f64> = ranked
                .iter()
                .map(|e| integrity::inspect(&e.record).unwrap().rating(field).value())
                .collect();
            assert!(values.windows(2).all(|pair| pair[0] >= pair[1]));
        }

        assert_eq!(ids(&rank(&students, SortField::Blitz)), vec!["2400001a", "2400003c", "2400002b"]);
        assert_eq!(ids(&rank(&students, SortField::Bullet)), vec!["2400002b", "2400003c", "2400001a"]);
    }

    #[test]
    fn test_ties_keep_store_order_and_distinct_ranks() {
        let students = vec![
            student("2400001a", 1500, 0, 0),
            student("2400002b", 1700, 0, 0),
            student("2400003c", 1500, 0, 0),
            student("2400004d", 1500, 0, 0),
        ];

        let ranked = rank(&students, SortField::Rapid);

        assert_eq!(ids(&ranked), vec!["2400002b", "2400001a", "2400003c", "2400004d"]);
        assert_eq!(ranked.iter().map(|e| e.rank).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_rows_echo_the_stored_record() {
        let first = json!({
            "id": "2403880d",
            "rapid": 1500,
            "blitz": 1400,
            "bullet": 1300,
            "createdAt": "2025-01-04T09:30:00.000Z",
            "name": "Ann"
        });
        let second = json!({
            "id": "2402133b",
            "rapid": 1800,
            "blitz": 1400,
            "bullet": 1300,
            "createdAt": "2025-01-04",
            "updatedAt": "garbage"
        });
        let students = vec![entry(first.clone()), entry(second.clone())];

        let ranked = rank(&students, SortField::Rapid);

        let mut expected_first = second;
        expected_first["rank"] = json!(1);
        let mut expected_second = first;
        expected_second["rank"] = json!(2);
        assert_eq!(
            serde_json::to_value(&ranked).unwrap(),
            json!([expected_first, expected_second])
        );
    }

    #[test]
    fn test_input_is_not_reordered() {
        let students = vec![student("2400001a", 100, 0, 0), student("2400002b", 200, 0, 0)];
        let before = students.clone();

        let _ = rank(&students, SortField::Rapid);

        assert_eq!(students, before);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank(&[], SortField::Bullet).is_empty());
    }
}
