use actix_web::{
    HttpResponse, delete, get, patch, post, put,
    web::{Data, Path, ServiceConfig, scope},
};
use actix_web_validator::Json;

use crate::api::auth::CallerIdentity;
use crate::api::error::ServiceError;
use super::dto::{
    CreateJobApplicationRequest, UpdateJobApplicationRequest, UpdateJobApplicationStatusRequest,
};
use super::service::JobApplicationService;

#[post("")]
async fn create_job_application(
    service: Data<JobApplicationService>,
    caller: CallerIdentity,
    request: Json<CreateJobApplicationRequest>,
) -> Result<HttpResponse, ServiceError> {
    let response = service
        .create_job_application(&caller, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(response))
}

#[get("")]
async fn list_job_applications(
    service: Data<JobApplicationService>,
    caller: CallerIdentity,
) -> Result<HttpResponse, ServiceError> {
    let response = service.list_job_applications(&caller).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[put("/{id}")]
async fn update_job_application(
    service: Data<JobApplicationService>,
    caller: CallerIdentity,
    id: Path<String>,
    request: Json<UpdateJobApplicationRequest>,
) -> Result<HttpResponse, ServiceError> {
    let response = service
        .update_job_application(&caller, &id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[patch("/{id}/status")]
async fn update_job_application_status(
    service: Data<JobApplicationService>,
    caller: CallerIdentity,
    id: Path<String>,
    request: Json<UpdateJobApplicationStatusRequest>,
) -> Result<HttpResponse, ServiceError> {
    let response = service
        .update_job_application_status(&caller, &id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[delete("/{id}")]
async fn delete_job_application(
    service: Data<JobApplicationService>,
    caller: CallerIdentity,
    id: Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.delete_job_application(&caller, &id).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn job_application_config(config: &mut ServiceConfig) {
    config.service(
        scope("/api/v1/job-applications")
            .service(create_job_application)
            .service(list_job_applications)
            .service(update_job_application)
            .service(update_job_application_status)
            .service(delete_job_application),
    );
}
