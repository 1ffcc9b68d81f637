pub mod ranking;
pub mod student;
