use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use crate::api::auth::CallerIdentity;
use crate::api::error::ServiceError;
use crate::db::JobApplicationRepository;
use crate::domain::{
    JobApplication, JobApplicationStatus, NewJobApplication, UpdateJobApplication,
};
use super::dto::{
    CreateJobApplicationRequest, CreateJobApplicationResponse, DeleteJobApplicationResponse,
    JobApplicationResponse, ListJobApplicationsResponse, UpdateJobApplicationRequest,
    UpdateJobApplicationResponse, UpdateJobApplicationStatusRequest,
    UpdateJobApplicationStatusResponse,
};

/// Run the request's validator rules, flattening failures into one message
fn validate(request: &impl Validate) -> Result<(), ServiceError> {
    request
        .validate()
        .map_err(|errors| ServiceError::Validation(errors.to_string()))
}

/// Job application service containing business logic
///
/// Every operation acts on behalf of an already identified caller. Lookups and
/// ownership checks happen before any mutation, so a rejected request never
/// writes anything.
pub struct JobApplicationService {
    repository: Arc<dyn JobApplicationRepository>,
}

impl JobApplicationService {
    /// Create a new JobApplicationService over any repository implementation
    pub fn new(repository: Arc<dyn JobApplicationRepository>) -> Self {
        Self { repository }
    }

    /// Create an application owned by the caller
    ///
    /// # Business Logic
    /// - Validates the request
    /// - Builds a new entity with a fresh id, owned by the caller
    /// - Decodes the wire status code, unknown codes becoming `Unspecified`
    /// - Saves it; the repository stamps both timestamps
    ///
    /// # Returns
    /// - `Ok(CreateJobApplicationResponse)` - Application created
    /// - `Err(ServiceError)` - Validation or storage failed
    pub async fn create_job_application(
        &self,
        caller: &CallerIdentity,
        request: CreateJobApplicationRequest,
    ) -> Result<CreateJobApplicationResponse, ServiceError> {
        validate(&request)?;
        info!(
            "Service: Creating job application for user={} company={}",
            caller.user_id(),
            request.company
        );

        let mut application = JobApplication::create(NewJobApplication {
            user_id: caller.user_id().to_string(),
            company: request.company,
            title: request.title,
            position: request.position,
            description: request.description,
            notes: request.notes,
            cv: request.cv,
            cover_letter: request.cover_letter,
            applied_on: request.applied_on,
            status: JobApplicationStatus::from_code(request.status),
        });

        // Timestamps come back from the store
        self.repository.save(&mut application).await?;

        info!("Service: Job application created with id={}", application.id);
        Ok(CreateJobApplicationResponse {
            job_application: application.into(),
        })
    }

    /// List the caller's active applications, most recently created first
    ///
    /// Soft-deleted applications and those owned by other users are never
    /// returned.
    pub async fn list_job_applications(
        &self,
        caller: &CallerIdentity,
    ) -> Result<ListJobApplicationsResponse, ServiceError> {
        let applications = self.repository.list(caller.user_id()).await?;

        info!(
            "Service: Listed {} job applications for user={}",
            applications.len(),
            caller.user_id()
        );
        Ok(ListJobApplicationsResponse {
            job_applications: applications
                .into_iter()
                .map(JobApplicationResponse::from)
                .collect(),
        })
    }

    /// Replace every mutable field of one of the caller's applications
    ///
    /// # Business Logic
    /// - Validates the request
    /// - Loads the application and checks the caller owns it
    /// - Overwrites the mutable fields; an absent optional field clears it
    /// - Saves it with a strictly later `updated_at`
    ///
    /// # Returns
    /// - `Ok(UpdateJobApplicationResponse)` - The stored application
    /// - `Err(ServiceError::NotFound)` - Missing, or deleted meanwhile
    /// - `Err(ServiceError::PermissionDenied)` - Owned by another user
    pub async fn update_job_application(
        &self,
        caller: &CallerIdentity,
        id: &str,
        request: UpdateJobApplicationRequest,
    ) -> Result<UpdateJobApplicationResponse, ServiceError> {
        validate(&request)?;
        let mut application = self.find_owned(caller, id, "update").await?;

        application.update(UpdateJobApplication {
            company: request.company,
            title: request.title,
            position: request.position,
            description: request.description,
            notes: request.notes,
            cv: request.cv,
            cover_letter: request.cover_letter,
            applied_on: request.applied_on,
            status: JobApplicationStatus::from_code(request.status),
        });
        // A delete that lands between find and save surfaces as NotFound here
        self.repository.save(&mut application).await?;

        info!("Service: Job application updated: id={}", id);
        Ok(UpdateJobApplicationResponse {
            job_application: application.into(),
        })
    }

    /// Move one of the caller's applications to another status
    ///
    /// Any transition is accepted, including backwards ones. The board
    /// position is only replaced when the request carries one.
    ///
    /// # Returns
    /// - `Ok(UpdateJobApplicationStatusResponse)` - The stored application
    /// - `Err(ServiceError)` - Same failures as `update_job_application`
    pub async fn update_job_application_status(
        &self,
        caller: &CallerIdentity,
        id: &str,
        request: UpdateJobApplicationStatusRequest,
    ) -> Result<UpdateJobApplicationStatusResponse, ServiceError> {
        validate(&request)?;
        let mut application = self.find_owned(caller, id, "update").await?;

        let status = JobApplicationStatus::from_code(request.status);
        let previous = application.status;
        application.change_status(status, request.position);
        self.repository.save(&mut application).await?;

        info!(
            "Service: Job application {} moved from {} to {}",
            id, previous, status
        );
        Ok(UpdateJobApplicationStatusResponse {
            job_application: application.into(),
        })
    }

    /// Soft-delete one of the caller's applications
    ///
    /// # Business Logic
    /// - Loads the application and checks the caller owns it
    /// - Stamps `deleted_at`; the row stays in storage
    ///
    /// Deleting an already deleted application reports `NotFound`.
    pub async fn delete_job_application(
        &self,
        caller: &CallerIdentity,
        id: &str,
    ) -> Result<DeleteJobApplicationResponse, ServiceError> {
        let mut application = self.find_owned(caller, id, "delete").await?;

        application.delete();
        self.repository.save(&mut application).await?;

        info!("Service: Job application deleted: id={}", id);
        Ok(DeleteJobApplicationResponse {})
    }

    /// Load an active application and make sure the caller owns it
    ///
    /// The existence check runs first, so a missing id is `NotFound` for
    /// every caller.
    async fn find_owned(
        &self,
        caller: &CallerIdentity,
        id: &str,
        action: &str,
    ) -> Result<JobApplication, ServiceError> {
        let application = self
            .repository
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;

        if !application.is_owned_by(caller.user_id()) {
            warn!(
                "Service: user={} attempted to {} job application {} owned by another user",
                caller.user_id(),
                action,
                id
            );
            return Err(ServiceError::PermissionDenied(format!(
                "you are not allowed to {} this job application",
                action
            )));
        }

        Ok(application)
    }
}
