use async_trait::async_trait;

use crate::domain::JobApplication;

/// Errors raised by a job application store
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The row a save targeted is gone, either never stored or soft-deleted
    /// by another request after the caller loaded it.
    #[error("job application not found: {0}")]
    NotFound(String),
}

/// Persistence contract for job applications.
///
/// Soft-deleted rows are invisible to `find` and `list`, and `save` never
/// writes to them again.
#[async_trait]
pub trait JobApplicationRepository: Send + Sync {
    /// Insert or update by id.
    ///
    /// On insert the store stamps `created_at`/`updated_at` with its own
    /// clock and writes them back into `application`. On update every mutable
    /// column is overwritten; `user_id` and `created_at` never change.
    ///
    /// Returns `RepositoryError::NotFound` when the stored row is already
    /// soft-deleted; the row is left untouched.
    async fn save(&self, application: &mut JobApplication) -> Result<(), RepositoryError>;

    /// The active application with this id, if any.
    async fn find(&self, id: &str) -> Result<Option<JobApplication>, RepositoryError>;

    /// Active applications owned by `user_id`, most recently created first.
    async fn list(&self, user_id: &str) -> Result<Vec<JobApplication>, RepositoryError>;
}
