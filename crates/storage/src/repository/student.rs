use chrono::Utc;

use crate::Database;
use crate::dto::student::{DUPLICATE_ID_MESSAGE, NewStudent, ScoreChanges};
use crate::error::{Result, StorageError};
use crate::models::{Scores, Student, StudentRecord};

pub struct StudentRepository<'a> {
    db: &'a Database,
}

impl<'a> StudentRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// List all students in store order
    pub async fn list(&self) -> Result<Vec<StudentRecord>> {
        self.db.store().load().await
    }

    /// Find a student by exact id
    pub async fn find_by_id(&self, id: &str) -> Result<StudentRecord> {
        self.db
            .store()
            .load()
            .await?
            .into_iter()
            .find(|student| student.has_id(id))
            .ok_or(StorageError::NotFound)
    }

    /// Append a new student, rejecting an id that is already taken
    pub async fn create(&self, new_student: &NewStudent) -> Result<StudentRecord> {
        let _guard = self.db.lock_writes().await;

        let mut students = self.db.store().load().await?;

        if students
            .iter()
            .any(|student| student.has_id(new_student.id.as_str()))
        {
            return Err(StorageError::ConstraintViolation(
                DUPLICATE_ID_MESSAGE.to_string(),
            ));
        }

        let student = Student::new(new_student.id.clone(), new_student.scores, Utc::now());
        let record = StudentRecord::from(&student);

        students.push(record.clone());
        self.db.store().save(&students).await?;

        tracing::info!("Created student {}", new_student.id);

        Ok(record)
    }

    /// Replace the three ratings of an existing student
    pub async fn update_scores(
        &self,
        id: &str,
        scores: &Scores,
    ) -> Result<(StudentRecord, ScoreChanges)> {
        let _guard = self.db.lock_writes().await;

        let mut students = self.db.store().load().await?;

        let student = students
            .iter_mut()
            .find(|student| student.has_id(id))
            .ok_or(StorageError::NotFound)?;

        let changes = ScoreChanges::between(student, scores);
        student.apply_scores(*scores, Utc::now());
        let updated = student.clone();

        self.db.store().save(&students).await?;

        tracing::info!("Updated scores for student {}", id);

        Ok((updated, changes))
    }

    /// Remove a student, returning the removed record and how many remain
    pub async fn delete(&self, id: &str) -> Result<(StudentRecord, usize)> {
        let _guard = self.db.lock_writes().await;

        let mut students = self.db.store().load().await?;

        let index = students
            .iter()
            .position(|student| student.has_id(id))
            .ok_or(StorageError::NotFound)?;

        let deleted = students.remove(index);
        self.db.store().save(&students).await?;

        tracing::info!("Deleted student {}", id);

        Ok((deleted, students.len()))
    }
}
