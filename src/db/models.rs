use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::{JobApplication, JobApplicationStatus};

/// Database representation of a job application with all columns
#[derive(Debug, FromRow)]
pub struct JobApplicationRow {
    pub id: String,
    pub user_id: String,
    pub company: String,
    pub title: String,
    pub position: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub cv: Option<String>,
    pub cover_letter: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub applied_on: DateTime<Utc>,
    pub status: String,
}

impl From<JobApplicationRow> for JobApplication {
    fn from(row: JobApplicationRow) -> Self {
        JobApplication {
            id: row.id,
            user_id: row.user_id,
            company: row.company,
            title: row.title,
            position: row.position,
            description: row.description,
            notes: row.notes,
            cv: row.cv,
            cover_letter: row.cover_letter,
            applied_on: row.applied_on,
            status: JobApplicationStatus::from_label(&row.status),
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

/// Timestamps the database settled on after an upsert
#[derive(Debug, FromRow)]
pub struct SavedTimestamps {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
