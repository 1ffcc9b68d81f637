pub mod student;

pub use student::{
    InvalidStudentId, Rating, Scores, Student, StudentId, StudentRecord, format_timestamp,
    is_valid_student_id, parse_timestamp,
};
