use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::JobApplication;

// Optional text fields are `Option<String>` on both sides: a missing or null
// value is "absent", while `""` is a present empty string.

/// Body of a create request
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateJobApplicationRequest {
    #[validate(length(min = 1, max = 255, message = "Company must be between 1 and 255 characters"))]
    pub company: String,
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 255, message = "Position must be at most 255 characters"))]
    pub position: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub cv: Option<String>,
    #[serde(default)]
    pub cover_letter: Option<String>,
    pub applied_on: DateTime<Utc>,
    /// Integer status code; unknown codes are stored as unspecified.
    #[serde(default)]
    pub status: i32,
}

/// Body of an update request. Every field replaces the stored value.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct UpdateJobApplicationRequest {
    #[validate(length(min = 1, max = 255, message = "Company must be between 1 and 255 characters"))]
    pub company: String,
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 255, message = "Position must be at most 255 characters"))]
    pub position: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub cv: Option<String>,
    #[serde(default)]
    pub cover_letter: Option<String>,
    pub applied_on: DateTime<Utc>,
    #[serde(default)]
    pub status: i32,
}

/// Body of a status change (kanban move)
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct UpdateJobApplicationStatusRequest {
    pub status: i32,
    /// New ordering key inside the target column; kept as-is when absent.
    #[serde(default)]
    #[validate(length(max = 255, message = "Position must be at most 255 characters"))]
    pub position: Option<String>,
}

/// Public representation of a job application
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct JobApplicationResponse {
    pub id: String,
    pub company: String,
    pub title: String,
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub applied_on: DateTime<Utc>,
    pub status: i32,
}

impl From<JobApplication> for JobApplicationResponse {
    fn from(application: JobApplication) -> Self {
        Self {
            id: application.id,
            company: application.company,
            title: application.title,
            position: application.position,
            description: application.description,
            notes: application.notes,
            cv: application.cv,
            cover_letter: application.cover_letter,
            created_at: application.created_at,
            updated_at: application.updated_at,
            applied_on: application.applied_on,
            status: application.status.code(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateJobApplicationResponse {
    pub job_application: JobApplicationResponse,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ListJobApplicationsResponse {
    pub job_applications: Vec<JobApplicationResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateJobApplicationResponse {
    pub job_application: JobApplicationResponse,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateJobApplicationStatusResponse {
    pub job_application: JobApplicationResponse,
}

/// Empty acknowledgement
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DeleteJobApplicationResponse {}
