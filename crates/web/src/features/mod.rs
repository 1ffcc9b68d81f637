pub mod ranking;
pub mod students;
