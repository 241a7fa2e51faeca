pub mod connection;
pub mod job_application_repository;
pub mod migrations;
pub mod models;
pub mod repository;

pub use job_application_repository::PgJobApplicationRepository;
pub use repository::{JobApplicationRepository, RepositoryError};
