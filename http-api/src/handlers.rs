//! Route handlers
//!
//! Each handler parses its input, calls one `TaskService` operation and maps
//! the result to a response. Parse failures never reach the service.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use taskhub_core::{TaskId, TaskRepository, TaskService};
use tracing::warn;

use crate::{
    dto::{
        BulkDeleteRequest, BulkDeleteResponse, CreateTaskRequest, FilterQuery, SearchQuery,
        TaskResponse, UpdateTaskRequest,
    },
    error::ApiError,
};

/// Shared handler state
pub type AppState = TaskService<dyn TaskRepository>;

type ApiResult<T> = Result<T, ApiError>;

fn to_responses(tasks: Vec<taskhub_core::Task>) -> Json<Vec<TaskResponse>> {
    Json(tasks.into_iter().map(TaskResponse::from).collect())
}

pub async fn health(State(service): State<AppState>) -> impl IntoResponse {
    match service.health_check().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(err) => {
            warn!(error = %err, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}

pub async fn create_task(
    State(service): State<AppState>,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let Json(request) = body?;
    let task = service.create_task(request.into_draft()?).await?;
    Ok((StatusCode::CREATED, Json(task.into())))
}

/// All tasks, or the filtered subset when any filter parameter is present
pub async fn list_tasks(
    State(service): State<AppState>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let Query(query) = query?;
    let filter = query.into_filter()?;
    let tasks = service.get_task_by_filter(&filter).await?;
    Ok(to_responses(tasks))
}

pub async fn search_tasks(
    State(service): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let Query(query) = query?;
    let tasks = service.search_tasks(&query.q).await?;
    Ok(to_responses(tasks))
}

pub async fn get_task(
    State(service): State<AppState>,
    id: Result<Path<TaskId>, PathRejection>,
) -> ApiResult<Json<TaskResponse>> {
    let Path(id) = id?;
    let task = service.get_task_by_id(id).await?;
    Ok(Json(task.into()))
}

/// Fetch, merge the partial body onto the stored task, then validate and store
pub async fn update_task(
    State(service): State<AppState>,
    id: Result<Path<TaskId>, PathRejection>,
    body: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> ApiResult<Json<TaskResponse>> {
    let Path(id) = id?;
    let Json(request) = body?;
    let update = request.into_update()?;

    let existing = service.get_task_by_id(id).await?;
    let task = service.update_task(id, update.apply_to(&existing)).await?;
    Ok(Json(task.into()))
}

pub async fn delete_task(
    State(service): State<AppState>,
    id: Result<Path<TaskId>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    service.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn bulk_delete_tasks(
    State(service): State<AppState>,
    body: Result<Json<BulkDeleteRequest>, JsonRejection>,
) -> ApiResult<Json<BulkDeleteResponse>> {
    let Json(request) = body?;
    let deleted = service.bulk_delete_tasks(&request.ids).await?;
    Ok(Json(BulkDeleteResponse { deleted }))
}

pub async fn toggle_task(
    State(service): State<AppState>,
    id: Result<Path<TaskId>, PathRejection>,
) -> ApiResult<Json<TaskResponse>> {
    let Path(id) = id?;
    let task = service.toggle_status(id).await?;
    Ok(Json(task.into()))
}
