use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::{debug, warn};

use crate::db::models::{JobApplicationRow, SavedTimestamps};
use crate::db::repository::{JobApplicationRepository, RepositoryError};
use crate::domain::job_application::{self, JobApplication};

const COLUMNS: &str = "id, user_id, company, title, position, description, notes, cv, \
     cover_letter, created_at, updated_at, deleted_at, applied_on, status";

/// PostgreSQL-backed repository for job applications
#[derive(Clone)]
pub struct PgJobApplicationRepository {
    pool: Pool<Postgres>,
}

impl PgJobApplicationRepository {
    /// Create a repository over an existing connection pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobApplicationRepository for PgJobApplicationRepository {
    /// Insert or update a job application in a single statement
    ///
    /// # Behaviour
    /// - New id: inserts the row, stamping `created_at` and `updated_at`
    ///   with the repository clock (`$10` is bound to both)
    /// - Existing active row: overwrites the mutable columns and sets
    ///   `updated_at` to the entity's own value (`$14`)
    /// - Existing soft-deleted row: the `WHERE` on `DO UPDATE` skips it, so
    ///   no row comes back
    ///
    /// `user_id` and `created_at` are never part of the update set.
    ///
    /// # Returns
    /// - `Ok(())` - Row written; stored timestamps copied into `application`
    /// - `Err(RepositoryError::NotFound)` - Row was already soft-deleted
    /// - `Err(RepositoryError::Database)` - Query failed
    async fn save(&self, application: &mut JobApplication) -> Result<(), RepositoryError> {
        debug!(
            "Saving job application: id={}, status={}",
            application.id, application.status
        );

        let saved = sqlx::query_as::<_, SavedTimestamps>(
            r#"
            INSERT INTO job_applications (
                id, user_id, company, title, position, description, notes, cv,
                cover_letter, created_at, updated_at, deleted_at, applied_on, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10, $11, $12, $13)
            ON CONFLICT (id) DO UPDATE SET
                company = EXCLUDED.company,
                title = EXCLUDED.title,
                position = EXCLUDED.position,
                description = EXCLUDED.description,
                notes = EXCLUDED.notes,
                cv = EXCLUDED.cv,
                cover_letter = EXCLUDED.cover_letter,
                deleted_at = EXCLUDED.deleted_at,
                applied_on = EXCLUDED.applied_on,
                status = EXCLUDED.status,
                updated_at = $14
            WHERE job_applications.deleted_at IS NULL
            RETURNING created_at, updated_at
            "#,
        )
        .bind(&application.id)
        .bind(&application.user_id)
        .bind(&application.company)
        .bind(&application.title)
        .bind(&application.position)
        .bind(&application.description)
        .bind(&application.notes)
        .bind(&application.cv)
        .bind(&application.cover_letter)
        .bind(job_application::now())
        .bind(application.deleted_at)
        .bind(application.applied_on)
        .bind(application.status.as_label())
        .bind(application.updated_at)
        .fetch_optional(&self.pool)
        .await?;

        // No row back means the conflict target was already soft-deleted.
        let Some(saved) = saved else {
            warn!(
                "Refusing to save job application {}: it was deleted",
                application.id
            );
            return Err(RepositoryError::NotFound(application.id.clone()));
        };

        application.created_at = saved.created_at;
        application.updated_at = saved.updated_at;

        debug!("Job application saved: id={}", application.id);
        Ok(())
    }

    /// Fetch one active job application by id
    async fn find(&self, id: &str) -> Result<Option<JobApplication>, RepositoryError> {
        let query = format!(
            "SELECT {COLUMNS} FROM job_applications WHERE id = $1 AND deleted_at IS NULL"
        );
        let row = sqlx::query_as::<_, JobApplicationRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        debug!("Lookup of job application {}: found={}", id, row.is_some());
        Ok(row.map(JobApplication::from))
    }

    /// Fetch a user's active job applications, newest first
    ///
    /// Served by the partial `(user_id, created_at DESC)` index.
    async fn list(&self, user_id: &str) -> Result<Vec<JobApplication>, RepositoryError> {
        let query = format!(
            "SELECT {COLUMNS} FROM job_applications
             WHERE user_id = $1 AND deleted_at IS NULL
             ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, JobApplicationRow>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        debug!("Listed {} job applications for user={}", rows.len(), user_id);
        Ok(rows.into_iter().map(JobApplication::from).collect())
    }
}
