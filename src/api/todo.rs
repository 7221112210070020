use crate::domain::todo::driving_ports::TaskPort;
use crate::external_connections::ExternalConnectivity;
use crate::persistence::db_todo_driven_ports::DbTaskGateway;
use crate::persistence::db_user_driven_ports::DbUserGateway;
use crate::routing_utils::{AnyContentJson, BasicErrorResponse, DomainErrorResponse, Json, Path};
use crate::{AppState, SharedData, domain, dto};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use axum::routing::{get, post};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(
    create_task,
    all_tasks,
    get_task,
    complete_task,
    delete_task,
    tasks_for_user
))]
/// Defines the OpenAPI documentation for the task API
pub struct TaskApi;
/// Constant used to group task endpoints in OpenAPI documentation
pub const TASK_API_GROUP: &str = "Tasks";

/// Adds routes under "/task" to the application router
pub fn task_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/task",
            post(
                |State(app_state): AppState,
                 AnyContentJson(new_task): AnyContentJson<dto::task::NewTask>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let task_service = domain::todo::TaskService {};

                    create_task(new_task, &mut ext_cxn, &task_service).await
                },
            )
            .get(|State(app_state): AppState| async move {
                let mut ext_cxn = app_state.ext_cxn.clone();
                let task_service = domain::todo::TaskService {};

                all_tasks(&mut ext_cxn, &task_service).await
            }),
        )
        .route(
            "/task/:task_id",
            get(
                |State(app_state): AppState, Path(task_id): Path<i32>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let task_service = domain::todo::TaskService {};

                    get_task(task_id, &mut ext_cxn, &task_service).await
                },
            )
            .put(
                |State(app_state): AppState, Path(task_id): Path<i32>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let task_service = domain::todo::TaskService {};

                    complete_task(task_id, &mut ext_cxn, &task_service).await
                },
            )
            .delete(
                |State(app_state): AppState, Path(task_id): Path<i32>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let task_service = domain::todo::TaskService {};

                    delete_task(task_id, &mut ext_cxn, &task_service).await
                },
            ),
        )
        .route(
            "/task/user/:user_id",
            get(
                |State(app_state): AppState, Path(user_id): Path<i32>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let task_service = domain::todo::TaskService {};

                    tasks_for_user(user_id, &mut ext_cxn, &task_service).await
                },
            ),
        )
}

#[utoipa::path(
    post,
    path = "/task",
    tag = TASK_API_GROUP,
    request_body = dto::task::NewTask,
    responses(
        (status = 201, description = "Task created", body = dto::task::TodoTask),
        (status = 400, description = "Invalid task or unknown owner", body = BasicErrorResponse),
        (status = 500, description = "Storage failure", body = BasicErrorResponse),
    ),
)]
#[tracing::instrument(skip_all)]
/// Creates a task for an existing user
async fn create_task(
    new_task: dto::task::NewTask,
    ext_cxn: &mut impl ExternalConnectivity,
    task_service: &impl TaskPort,
) -> Result<(StatusCode, Json<dto::task::TodoTask>), ErrorResponse> {
    info!("Creating a task for user {}", new_task.userid);
    let domain_task = domain::todo::NewTask::from(new_task);
    let user_service = domain::user::UserService {};

    let created_task = task_service
        .create_task(
            &domain_task,
            &mut *ext_cxn,
            &user_service,
            &DbUserGateway,
            &DbTaskGateway,
        )
        .await
        .map_err(DomainErrorResponse::from)?;

    Ok((
        StatusCode::CREATED,
        Json(dto::task::TodoTask::from(created_task)),
    ))
}

#[utoipa::path(
    get,
    path = "/task",
    tag = TASK_API_GROUP,
    responses(
        (status = 200, description = "Every task in the system", body = Vec<dto::task::TodoTask>),
        (status = 500, description = "Storage failure", body = BasicErrorResponse),
    ),
)]
#[tracing::instrument(skip_all)]
/// Retrieves all tasks regardless of owner
async fn all_tasks(
    ext_cxn: &mut impl ExternalConnectivity,
    task_service: &impl TaskPort,
) -> Result<Json<Vec<dto::task::TodoTask>>, ErrorResponse> {
    info!("Requested all tasks");
    let tasks = task_service
        .all_tasks(&mut *ext_cxn, &DbTaskGateway)
        .await
        .map_err(DomainErrorResponse::from)?;

    Ok(Json(tasks.into_iter().map(dto::task::TodoTask::from).collect()))
}

#[utoipa::path(
    get,
    path = "/task/{task_id}",
    tag = TASK_API_GROUP,
    params(("task_id" = i32, Path, description = "ID of the task")),
    responses(
        (status = 200, description = "The requested task", body = dto::task::TodoTask),
        (status = 400, description = "Non-numeric task ID", body = BasicErrorResponse),
        (status = 404, description = "Task does not exist", body = BasicErrorResponse),
        (status = 500, description = "Storage failure", body = BasicErrorResponse),
    ),
)]
#[tracing::instrument(skip(ext_cxn, task_service))]
/// Retrieves a single task
async fn get_task(
    task_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    task_service: &impl TaskPort,
) -> Result<Json<dto::task::TodoTask>, ErrorResponse> {
    info!("Get task {task_id}");
    let task = task_service
        .get_task(task_id, &mut *ext_cxn, &DbTaskGateway)
        .await
        .map_err(DomainErrorResponse::from)?;

    Ok(Json(dto::task::TodoTask::from(task)))
}

#[utoipa::path(
    put,
    path = "/task/{task_id}",
    tag = TASK_API_GROUP,
    params(("task_id" = i32, Path, description = "ID of the task")),
    responses(
        (status = 200, description = "Task marked as complete", body = String),
        (status = 400, description = "Non-numeric task ID", body = BasicErrorResponse),
        (status = 404, description = "Task does not exist", body = BasicErrorResponse),
        (status = 500, description = "Storage failure", body = BasicErrorResponse),
    ),
)]
#[tracing::instrument(skip(ext_cxn, task_service))]
/// Marks a task as complete
async fn complete_task(
    task_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    task_service: &impl TaskPort,
) -> Result<(StatusCode, String), ErrorResponse> {
    info!("Completing task {task_id}");
    task_service
        .complete_task(task_id, &mut *ext_cxn, &DbTaskGateway)
        .await
        .map_err(DomainErrorResponse::from)?;

    Ok((StatusCode::OK, format!("Task {task_id} marked as complete")))
}

#[utoipa::path(
    delete,
    path = "/task/{task_id}",
    tag = TASK_API_GROUP,
    params(("task_id" = i32, Path, description = "ID of the task")),
    responses(
        (status = 200, description = "Task deleted", body = String),
        (status = 400, description = "Non-numeric task ID", body = BasicErrorResponse),
        (status = 404, description = "Task does not exist", body = BasicErrorResponse),
        (status = 500, description = "Storage failure", body = BasicErrorResponse),
    ),
)]
#[tracing::instrument(skip(ext_cxn, task_service))]
/// Deletes a task
async fn delete_task(
    task_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    task_service: &impl TaskPort,
) -> Result<(StatusCode, String), ErrorResponse> {
    info!("Deleting task {task_id}");
    task_service
        .delete_task(task_id, &mut *ext_cxn, &DbTaskGateway)
        .await
        .map_err(DomainErrorResponse::from)?;

    Ok((StatusCode::OK, format!("Task {task_id} deleted")))
}

#[utoipa::path(
    get,
    path = "/task/user/{user_id}",
    tag = TASK_API_GROUP,
    params(("user_id" = i32, Path, description = "ID of the user owning the tasks")),
    responses(
        (status = 200, description = "Tasks owned by the user", body = Vec<dto::task::TodoTask>),
        (status = 400, description = "Non-numeric user ID", body = BasicErrorResponse),
        (status = 404, description = "User does not exist", body = BasicErrorResponse),
        (status = 500, description = "Storage failure", body = BasicErrorResponse),
    ),
)]
#[tracing::instrument(skip(ext_cxn, task_service))]
/// Retrieves the tasks owned by a user
async fn tasks_for_user(
    user_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    task_service: &impl TaskPort,
) -> Result<Json<Vec<dto::task::TodoTask>>, ErrorResponse> {
    info!("Get tasks for user {user_id}");
    let user_service = domain::user::UserService {};

    let tasks = task_service
        .tasks_for_user(
            user_id,
            &mut *ext_cxn,
            &user_service,
            &DbUserGateway,
            &DbTaskGateway,
        )
        .await
        .map_err(DomainErrorResponse::from)?;

    Ok(Json(tasks.into_iter().map(dto::task::TodoTask::from).collect()))
}
