use std::sync::Arc;

use chrono::NaiveDate;
use database::{
    ConnectionSettings, Domain, Priority, SqliteTaskRepository, TaskError, TaskFilter,
    TaskRepository,
};
use futures::future::join_all;
use mocks::*;
use taskhub_core::TaskService;
use uuid::Uuid;

async fn create_test_repository() -> SqliteTaskRepository {
    let repo = SqliteTaskRepository::in_memory().await.unwrap();
    repo.migrate().await.unwrap();
    repo
}

async fn create_test_service() -> TaskService<SqliteTaskRepository> {
    TaskService::new(Arc::new(create_test_repository().await))
}

#[tokio::test]
async fn test_walkthrough_against_sqlite() {
    let service = create_test_service().await;

    let report = service.create_task(write_report_draft()).await.unwrap();
    let rust = service.create_task(learn_rust_draft()).await.unwrap();
    assert_eq!(report.deadline, NaiveDate::from_ymd_opt(2025, 6, 1));
    assert!(rust.is_backlog);

    assert_titles(
        &service.get_all_tasks().await.unwrap(),
        &["Write report", "Learn Rust"],
    );
    assert_titles(&service.search_tasks("report").await.unwrap(), &["Write report"]);

    let toggled = service.toggle_status(report.id).await.unwrap();
    assert!(toggled.completed);
    assert!(toggled.updated_at > report.updated_at);

    let done = service
        .get_task_by_filter(&TaskFilterBuilder::new().with_completed(true).build())
        .await
        .unwrap();
    assert_titles(&done, &["Write report"]);

    let mut conflicting = rust.to_draft();
    conflicting.deadline = NaiveDate::from_ymd_opt(2025, 7, 1);
    assert_eq!(
        service.update_task(rust.id, conflicting).await,
        Err(TaskError::BacklogDeadlineConflict)
    );
    assert_eq!(service.get_task_by_id(rust.id).await.unwrap(), rust);

    assert_eq!(service.bulk_delete_tasks(&[report.id, rust.id]).await.unwrap(), 2);
    assert!(service.get_all_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_round_trip_preserves_every_field() {
    let repo = create_test_repository().await;
    let draft = TaskDraftBuilder::new()
        .with_title("Lab report")
        .with_description("Sections 2 and 3")
        .with_priority(Priority::Low)
        .with_domain(Domain::University)
        .with_project(Uuid::new_v4())
        .with_uni_module(Uuid::new_v4())
        .with_deadline(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap())
        .completed()
        .build();

    let created = repo.create(&draft).await.unwrap();
    assert_task_matches_draft(&created, &draft);

    let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_update_moves_task_to_backlog() {
    let service = create_test_service().await;
    let task = service
        .create_task(scheduled_draft("Plan trip"))
        .await
        .unwrap();

    let patch = UpdateTaskBuilder::new()
        .clear_deadline()
        .with_backlog(true)
        .with_domain("travel")
        .build();
    let updated = service
        .update_task(task.id, patch.apply_to(&task))
        .await
        .unwrap();

    assert!(updated.is_backlog);
    assert_eq!(updated.deadline, None);
    assert_eq!(updated.domain, Domain::Travel);
    assert_eq!(updated.created_at, task.created_at);
}

#[tokio::test]
async fn test_not_found_and_missing_id() {
    let service = create_test_service().await;
    let unknown = Uuid::new_v4();

    assert_not_found(&service.get_task_by_id(unknown).await);
    assert_not_found(&service.toggle_status(unknown).await);
    assert_not_found(&service.update_task(unknown, scheduled_draft("x")).await);
    assert!(service.delete_task(unknown).await.is_ok());
    assert_eq!(service.get_task_by_id(Uuid::nil()).await, Err(TaskError::MissingId));
}

#[tokio::test]
async fn test_filter_combinations_match_in_memory_evaluation() {
    let repo = create_test_repository().await;
    for draft in create_test_drafts(22) {
        repo.create(&draft).await.unwrap();
    }
    let all = repo.list_all().await.unwrap();

    let filters = [
        TaskFilter::default(),
        TaskFilterBuilder::new().with_priority(Priority::High).build(),
        TaskFilterBuilder::new().with_domain(Domain::Coding).build(),
        TaskFilterBuilder::new()
            .with_priority(Priority::Medium)
            .with_backlog(true)
            .build(),
        TaskFilterBuilder::new()
            .with_domain(Domain::Work)
            .with_backlog(false)
            .with_completed(false)
            .build(),
    ];

    for filter in filters {
        let expected: Vec<_> = all.iter().filter(|t| filter.matches(t)).cloned().collect();
        let actual = repo.list_filtered(&filter).await.unwrap();
        assert_eq!(actual, expected, "filter {filter:?}");
    }
}

#[tokio::test]
async fn test_search_treats_input_as_data() {
    let repo = create_test_repository().await;
    repo.create(&scheduled_draft("keep me")).await.unwrap();

    for hostile in ["'; DROP TABLE tasks; --", "\" OR \"1\"=\"1", "%' OR '1'='1", "\\"] {
        assert!(repo.search(hostile).await.unwrap().is_empty(), "{hostile}");
    }
    assert_eq!(repo.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_search_case_folding() {
    let repo = create_test_repository().await;
    repo.create(&scheduled_draft("Quarterly REPORT")).await.unwrap();
    repo.create(&scheduled_draft("Übung Mathe")).await.unwrap();

    assert_eq!(repo.search("report").await.unwrap().len(), 1);
    assert_eq!(repo.search("QUARTERLY").await.unwrap().len(), 1);
    assert_eq!(repo.search("rly rep").await.unwrap().len(), 1);
    assert_titles(&repo.search("übung").await.unwrap(), &["Übung Mathe"]);
    assert_titles(&repo.search("ÜBUNG MATHE").await.unwrap(), &["Übung Mathe"]);
}

#[tokio::test]
async fn test_concurrent_writes_on_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("tasks.db").display());
    let repo = SqliteTaskRepository::new(&url, ConnectionSettings::default())
        .await
        .unwrap();
    repo.migrate().await.unwrap();
    let service = TaskService::new(Arc::new(repo));

    let creates = (0..25).map(|i| {
        let service = service.clone();
        async move { service.create_task(scheduled_draft(&format!("task {i}"))).await }
    });
    let created: Vec<_> = join_all(creates)
        .await
        .into_iter()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(created.len(), 25);

    let ids: Vec<Uuid> = created.iter().map(|t| t.id).collect();
    let toggles = ids.iter().map(|id| service.toggle_status(*id));
    for toggled in join_all(toggles).await {
        assert!(toggled.unwrap().completed);
    }

    assert_eq!(service.bulk_delete_tasks(&ids).await.unwrap(), 25);
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("tasks.db").display());

    let id = {
        let repo = SqliteTaskRepository::new(&url, ConnectionSettings::default())
            .await
            .unwrap();
        repo.migrate().await.unwrap();
        let id = repo.create(&backlog_draft("persisted")).await.unwrap().id;
        repo.close().await;
        id
    };

    let repo = SqliteTaskRepository::new(&url, ConnectionSettings::default())
        .await
        .unwrap();
    // Re-running migrations on an existing database is a no-op
    repo.migrate().await.unwrap();
    let task = repo.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(task.title, "persisted");
}

#[tokio::test]
async fn test_closed_pool_reports_database_error() {
    let repo = create_test_repository().await;
    repo.close().await;

    let err = repo.list_all().await.unwrap_err();
    assert!(err.is_database(), "{err:?}");
}
