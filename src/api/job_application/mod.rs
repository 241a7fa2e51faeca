pub mod dto;
pub mod handlers;
pub mod service;

// Re-export commonly used types
pub use handlers::job_application_config;
pub use service::JobApplicationService;
