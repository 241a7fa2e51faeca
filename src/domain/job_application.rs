use chrono::{DateTime, Duration, SubsecRound, Utc};
use uuid::Uuid;

use super::status::JobApplicationStatus;

/// Current time at the precision the database keeps (microseconds).
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// A timestamp strictly after `previous`, normally the current time.
fn next_after(previous: DateTime<Utc>) -> DateTime<Utc> {
    let current = now();
    if current > previous {
        current
    } else {
        previous + Duration::microseconds(1)
    }
}

/// One tracked job application
#[derive(Debug, Clone, PartialEq)]
pub struct JobApplication {
    pub id: String,
    pub user_id: String,
    pub company: String,
    pub title: String,
    pub position: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub cv: Option<String>,
    pub cover_letter: Option<String>,
    pub applied_on: DateTime<Utc>,
    pub status: JobApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker; `None` while the application is active.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Values for a brand-new application
#[derive(Debug, Clone)]
pub struct NewJobApplication {
    pub user_id: String,
    pub company: String,
    pub title: String,
    pub position: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub cv: Option<String>,
    pub cover_letter: Option<String>,
    pub applied_on: DateTime<Utc>,
    pub status: JobApplicationStatus,
}

/// Replacement values for every mutable field of an application
#[derive(Debug, Clone)]
pub struct UpdateJobApplication {
    pub company: String,
    pub title: String,
    pub position: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub cv: Option<String>,
    pub cover_letter: Option<String>,
    pub applied_on: DateTime<Utc>,
    pub status: JobApplicationStatus,
}

impl JobApplication {
    /// Build a new application with a fresh id and `created_at == updated_at`.
    pub fn create(params: NewJobApplication) -> Self {
        let now = now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: params.user_id,
            company: params.company,
            title: params.title,
            position: params.position,
            description: params.description,
            notes: params.notes,
            cv: params.cv,
            cover_letter: params.cover_letter,
            applied_on: params.applied_on,
            status: params.status,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Replace the mutable fields in place. `id`, `user_id` and `created_at`
    /// are left untouched.
    pub fn update(&mut self, params: UpdateJobApplication) {
        self.company = params.company;
        self.title = params.title;
        self.position = params.position;
        self.description = params.description;
        self.notes = params.notes;
        self.cv = params.cv;
        self.cover_letter = params.cover_letter;
        self.applied_on = params.applied_on;
        self.status = params.status;
        self.touch();
    }

    /// Move the application to another status, optionally re-ordering it
    /// within the target column. Any transition is allowed.
    pub fn change_status(&mut self, status: JobApplicationStatus, position: Option<String>) {
        self.status = status;
        if let Some(position) = position {
            self.position = position;
        }
        self.touch();
    }

    /// Soft-delete. Calling it again just moves the marker forward.
    pub fn delete(&mut self) {
        self.touch();
        self.deleted_at = Some(self.updated_at);
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    fn touch(&mut self) {
        self.updated_at = next_after(self.updated_at);
    }
}
