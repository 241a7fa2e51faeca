#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use job_tracker::api::auth::Claims;
use job_tracker::api::job_application::dto::{
    CreateJobApplicationRequest, UpdateJobApplicationRequest,
};
use job_tracker::db::{JobApplicationRepository, RepositoryError};
use job_tracker::domain::JobApplication;
use job_tracker::domain::job_application::now;

pub const SECRET: &[u8] = b"test-secret-that-is-long-enough-for-hmac";

/// Repository double with the same upsert and soft-delete rules as the
/// PostgreSQL implementation.
#[derive(Default)]
pub struct InMemoryJobApplicationRepository {
    rows: Mutex<HashMap<String, JobApplication>>,
    failure: Mutex<Option<String>>,
    saves: AtomicUsize,
}

impl InMemoryJobApplicationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a database protocol error.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Raw row, including soft-deleted ones.
    pub fn raw(&self, id: &str) -> Option<JobApplication> {
        self.rows.lock().unwrap().get(id).cloned()
    }

    fn check(&self) -> Result<(), RepositoryError> {
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(RepositoryError::Database(sqlx::Error::Protocol(
                message.clone(),
            ))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl JobApplicationRepository for InMemoryJobApplicationRepository {
    async fn save(&self, application: &mut JobApplication) -> Result<(), RepositoryError> {
        self.check()?;
        self.saves.fetch_add(1, Ordering::SeqCst);

        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&application.id) {
            Some(existing) if existing.is_deleted() => {
                return Err(RepositoryError::NotFound(application.id.clone()));
            }
            Some(existing) => {
                existing.company = application.company.clone();
                existing.title = application.title.clone();
                existing.position = application.position.clone();
                existing.description = application.description.clone();
                existing.notes = application.notes.clone();
                existing.cv = application.cv.clone();
                existing.cover_letter = application.cover_letter.clone();
                existing.applied_on = application.applied_on;
                existing.status = application.status;
                existing.deleted_at = application.deleted_at;
                existing.updated_at = application.updated_at;
                application.created_at = existing.created_at;
            }
            None => {
                let stamp = now();
                application.created_at = stamp;
                application.updated_at = stamp;
                rows.insert(application.id.clone(), application.clone());
            }
        }
        Ok(())
    }

    async fn find(&self, id: &str) -> Result<Option<JobApplication>, RepositoryError> {
        self.check()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(id)
            .filter(|application| !application.is_deleted())
            .cloned())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<JobApplication>, RepositoryError> {
        self.check()?;
        let mut applications: Vec<JobApplication> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|application| application.user_id == user_id && !application.is_deleted())
            .cloned()
            .collect();
        applications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(applications)
    }
}

pub fn create_request(company: &str, title: &str, status: i32) -> CreateJobApplicationRequest {
    CreateJobApplicationRequest {
        company: company.to_string(),
        title: title.to_string(),
        position: "a0".to_string(),
        description: None,
        notes: Some("met the team at a meetup".to_string()),
        cv: Some("cv.pdf".to_string()),
        cover_letter: None,
        applied_on: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
        status,
    }
}

pub fn update_request(company: &str, status: i32) -> UpdateJobApplicationRequest {
    UpdateJobApplicationRequest {
        company: company.to_string(),
        title: "Staff Engineer".to_string(),
        position: "b0".to_string(),
        description: Some("platform".to_string()),
        notes: None,
        cv: Some("cv-v2.pdf".to_string()),
        cover_letter: Some(String::new()),
        applied_on: Utc.with_ymd_and_hms(2025, 3, 2, 9, 0, 0).unwrap(),
        status,
    }
}

/// A signed HS256 bearer token for `sub`.
pub fn token_for(sub: &str) -> String {
    let claims = Claims {
        sub: Some(sub.to_string()),
        email: Some(format!("{sub}@example.com")),
        role: Some("authenticated".to_string()),
        aud: Some("authenticated".to_string()),
        exp: Utc::now().timestamp() + 3600,
        nbf: None,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET))
        .expect("encoding should succeed")
}
