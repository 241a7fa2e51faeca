pub mod auth;
pub mod error;
pub mod health;
pub mod job_application;
pub mod middleware;
pub mod validation;
