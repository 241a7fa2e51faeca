//! Service-level tests against the in-memory repository.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{InMemoryJobApplicationRepository, create_request, update_request};
use job_tracker::api::auth::CallerIdentity;
use job_tracker::api::error::ServiceError;
use job_tracker::api::job_application::JobApplicationService;
use job_tracker::api::job_application::dto::UpdateJobApplicationStatusRequest;
use job_tracker::db::JobApplicationRepository;
use job_tracker::domain::JobApplicationStatus;

const APPLIED: i32 = 1;
const INTERVIEW: i32 = 3;
const OFFER: i32 = 4;

fn setup() -> (Arc<InMemoryJobApplicationRepository>, JobApplicationService) {
    let repository = Arc::new(InMemoryJobApplicationRepository::new());
    let service = JobApplicationService::new(repository.clone());
    (repository, service)
}

fn u1() -> CallerIdentity {
    CallerIdentity::new("u1")
}

fn u2() -> CallerIdentity {
    CallerIdentity::new("u2")
}

#[tokio::test]
async fn create_returns_fresh_application_owned_by_caller() {
    let (repository, service) = setup();

    let created = service
        .create_job_application(&u1(), create_request("Acme", "Engineer", APPLIED))
        .await
        .unwrap()
        .job_application;

    assert!(!created.id.is_empty());
    assert_eq!(created.status, APPLIED);
    assert_eq!(created.created_at, created.updated_at);
    assert_eq!(created.notes.as_deref(), Some("met the team at a meetup"));
    assert_eq!(created.description, None);

    let stored = repository.find(&created.id).await.unwrap().unwrap();
    assert_eq!(stored.user_id, "u1");
    assert_eq!(stored.status, JobApplicationStatus::Applied);
}

#[tokio::test]
async fn create_assigns_unique_ids() {
    let (_, service) = setup();
    let a = service
        .create_job_application(&u1(), create_request("Acme", "Engineer", APPLIED))
        .await
        .unwrap();
    let b = service
        .create_job_application(&u1(), create_request("Acme", "Engineer", APPLIED))
        .await
        .unwrap();
    assert_ne!(a.job_application.id, b.job_application.id);
}

#[tokio::test]
async fn create_with_unknown_status_code_stores_unspecified() {
    let (repository, service) = setup();
    let created = service
        .create_job_application(&u1(), create_request("Acme", "Engineer", 99))
        .await
        .unwrap()
        .job_application;

    assert_eq!(created.status, 0);
    let stored = repository.raw(&created.id).unwrap();
    assert_eq!(stored.status, JobApplicationStatus::Unspecified);
}

#[tokio::test]
async fn create_rejects_blank_company() {
    let (repository, service) = setup();
    let err = service
        .create_job_application(&u1(), create_request("", "Engineer", APPLIED))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(repository.save_count(), 0);
}

#[tokio::test]
async fn list_returns_only_callers_active_applications_newest_first() {
    let (_, service) = setup();
    let first = service
        .create_job_application(&u1(), create_request("First", "Engineer", APPLIED))
        .await
        .unwrap()
        .job_application;
    tokio::time::sleep(Duration::from_millis(2)).await;
    let second = service
        .create_job_application(&u1(), create_request("Second", "Engineer", APPLIED))
        .await
        .unwrap()
        .job_application;
    service
        .create_job_application(&u2(), create_request("Other", "Engineer", APPLIED))
        .await
        .unwrap();

    let listed = service.list_job_applications(&u1()).await.unwrap().job_applications;

    let ids: Vec<&str> = listed.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
}

#[tokio::test]
async fn list_is_empty_for_new_user() {
    let (_, service) = setup();
    let listed = service.list_job_applications(&u1()).await.unwrap();
    assert!(listed.job_applications.is_empty());
}

#[tokio::test]
async fn update_by_owner_replaces_fields_and_bumps_updated_at() {
    let (repository, service) = setup();
    let created = service
        .create_job_application(&u1(), create_request("Acme", "Engineer", APPLIED))
        .await
        .unwrap()
        .job_application;

    let updated = service
        .update_job_application(&u1(), &created.id, update_request("Globex", INTERVIEW))
        .await
        .unwrap()
        .job_application;

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
    assert_eq!(updated.company, "Globex");
    assert_eq!(updated.status, INTERVIEW);
    assert_eq!(updated.notes, None);
    assert_eq!(updated.cover_letter.as_deref(), Some(""));

    let stored = repository.find(&created.id).await.unwrap().unwrap();
    assert_eq!(stored.user_id, "u1");
    assert_eq!(stored.company, "Globex");
    assert_eq!(stored.updated_at, updated.updated_at);
}

#[tokio::test]
async fn update_by_other_user_is_denied_and_changes_nothing() {
    let (repository, service) = setup();
    let created = service
        .create_job_application(&u1(), create_request("Acme", "Engineer", APPLIED))
        .await
        .unwrap()
        .job_application;
    let before = repository.raw(&created.id).unwrap();
    let saves = repository.save_count();

    let err = service
        .update_job_application(&u2(), &created.id, update_request("Hijacked", OFFER))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::PermissionDenied(_)));
    assert_eq!(repository.raw(&created.id).unwrap(), before);
    assert_eq!(repository.save_count(), saves);
}

#[tokio::test]
async fn update_of_missing_application_is_not_found() {
    let (_, service) = setup();
    let err = service
        .update_job_application(&u1(), "does-not-exist", update_request("Acme", APPLIED))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(id) if id == "does-not-exist"));
}

#[tokio::test]
async fn status_change_moves_application_and_keeps_other_fields() {
    let (_, service) = setup();
    let created = service
        .create_job_application(&u1(), create_request("Acme", "Engineer", APPLIED))
        .await
        .unwrap()
        .job_application;

    let moved = service
        .update_job_application_status(
            &u1(),
            &created.id,
            UpdateJobApplicationStatusRequest {
                status: OFFER,
                position: Some("c5".to_string()),
            },
        )
        .await
        .unwrap()
        .job_application;

    assert_eq!(moved.status, OFFER);
    assert_eq!(moved.position, "c5");
    assert_eq!(moved.company, "Acme");
    assert!(moved.updated_at > created.updated_at);

    // Backwards transitions are allowed.
    let back = service
        .update_job_application_status(
            &u1(),
            &created.id,
            UpdateJobApplicationStatusRequest {
                status: APPLIED,
                position: None,
            },
        )
        .await
        .unwrap()
        .job_application;
    assert_eq!(back.status, APPLIED);
    assert_eq!(back.position, "c5");
}

#[tokio::test]
async fn status_change_by_other_user_is_denied() {
    let (repository, service) = setup();
    let created = service
        .create_job_application(&u1(), create_request("Acme", "Engineer", APPLIED))
        .await
        .unwrap()
        .job_application;
    let before = repository.raw(&created.id).unwrap();

    let err = service
        .update_job_application_status(
            &u2(),
            &created.id,
            UpdateJobApplicationStatusRequest {
                status: OFFER,
                position: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::PermissionDenied(_)));
    assert_eq!(repository.raw(&created.id).unwrap(), before);
}

#[tokio::test]
async fn delete_hides_application_from_find_and_list() {
    let (repository, service) = setup();
    let created = service
        .create_job_application(&u1(), create_request("Acme", "Engineer", APPLIED))
        .await
        .unwrap()
        .job_application;

    service
        .delete_job_application(&u1(), &created.id)
        .await
        .unwrap();

    assert!(service
        .list_job_applications(&u1())
        .await
        .unwrap()
        .job_applications
        .is_empty());
    assert!(repository.find(&created.id).await.unwrap().is_none());

    // Still physically present, marked deleted.
    let raw = repository.raw(&created.id).unwrap();
    assert!(raw.deleted_at.is_some());
    assert!(raw.updated_at > created.updated_at);
}

#[tokio::test]
async fn deleting_twice_reports_not_found() {
    let (_, service) = setup();
    let created = service
        .create_job_application(&u1(), create_request("Acme", "Engineer", APPLIED))
        .await
        .unwrap()
        .job_application;

    service.delete_job_application(&u1(), &created.id).await.unwrap();
    let err = service
        .delete_job_application(&u1(), &created.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn delete_by_other_user_is_denied_and_changes_nothing() {
    let (repository, service) = setup();
    let created = service
        .create_job_application(&u1(), create_request("Acme", "Engineer", APPLIED))
        .await
        .unwrap()
        .job_application;
    let before = repository.raw(&created.id).unwrap();

    let err = service
        .delete_job_application(&u2(), &created.id)
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::PermissionDenied(_)));
    assert_eq!(repository.raw(&created.id).unwrap(), before);
    assert_eq!(service.list_job_applications(&u1()).await.unwrap().job_applications.len(), 1);
}

#[tokio::test]
async fn storage_failures_propagate_unchanged() {
    let (repository, service) = setup();
    repository.fail_with("connection reset");

    let err = service.list_job_applications(&u1()).await.unwrap_err();
    assert!(matches!(err, ServiceError::Storage(_)));
    let message = err.to_string();
    assert!(message.starts_with("database error:"), "{message}");
    assert!(message.ends_with("connection reset"), "{message}");

    let err = service
        .create_job_application(&u1(), create_request("Acme", "Engineer", APPLIED))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Storage(_)));
}

#[tokio::test]
async fn stale_copy_cannot_restore_a_deleted_application() {
    let (repository, service) = setup();
    let created = service
        .create_job_application(&u1(), create_request("Acme", "Engineer", APPLIED))
        .await
        .unwrap()
        .job_application;

    // A concurrent request loaded the row before it was deleted.
    let mut stale = repository.find(&created.id).await.unwrap().unwrap();
    service.delete_job_application(&u1(), &created.id).await.unwrap();
    let deleted = repository.raw(&created.id).unwrap();

    stale.change_status(JobApplicationStatus::Offer, None);
    let err = repository.save(&mut stale).await.unwrap_err();

    assert!(matches!(ServiceError::from(err), ServiceError::NotFound(id) if id == created.id));
    assert_eq!(repository.raw(&created.id).unwrap(), deleted);
    assert!(repository.find(&created.id).await.unwrap().is_none());
}
