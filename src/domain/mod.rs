pub mod job_application;
pub mod status;

pub use job_application::{JobApplication, NewJobApplication, UpdateJobApplication};
pub use status::JobApplicationStatus;
