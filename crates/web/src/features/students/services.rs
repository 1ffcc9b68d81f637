use storage::{
    Database,
    dto::student::{NewStudent, ScoreChanges},
    error::Result,
    models::{Scores, StudentRecord},
    repository::student::StudentRepository,
};

/// List all students
pub async fn list_students(db: &Database) -> Result<Vec<StudentRecord>> {
    let repo = StudentRepository::new(db);
    repo.list().await
}

/// Get student by id
pub async fn get_student(db: &Database, id: &str) -> Result<StudentRecord> {
    let repo = StudentRepository::new(db);
    repo.find_by_id(id).await
}

/// Create a new student
pub async fn create_student(db: &Database, new_student: &NewStudent) -> Result<StudentRecord> {
    let repo = StudentRepository::new(db);
    repo.create(new_student).await
}

/// Replace a student's ratings
pub async fn update_scores(
    db: &Database,
    id: &str,
    scores: &Scores,
) -> Result<(StudentRecord, ScoreChanges)> {
    let repo = StudentRepository::new(db);
    repo.update_scores(id, scores).await
}

/// Delete a student
pub async fn delete_student(db: &Database, id: &str) -> Result<(StudentRecord, usize)> {
    let repo = StudentRepository::new(db);
    repo.delete(id).await
}
