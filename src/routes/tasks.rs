use crate::{
    auth::OwnerScope,
    error::AppError,
    models::{TaskCreate, TaskPage, TaskUpdate},
    store::tasks,
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

const TASK_NOT_FOUND: &str = "Task not found";

/// `(user_id, id)` of `/{user_id}/tasks/{id}`. The user id is checked by `OwnerScope`.
type TaskPath = web::Path<(i64, i64)>;

#[derive(Debug, Deserialize)]
pub struct CompletionQuery {
    #[serde(default = "CompletionQuery::default_completed")]
    pub is_completed: bool,
}

impl CompletionQuery {
    fn default_completed() -> bool {
        true
    }
}

/// Lists the caller's tasks.
///
/// ## Query Parameters:
/// - `skip` (optional, default 0): number of tasks to skip.
/// - `limit` (optional, default 100): maximum number of tasks returned.
///
/// ## Responses:
/// - `200 OK`: JSON array of tasks in creation order.
/// - `401 Unauthorized`: missing or invalid token.
/// - `403 Forbidden`: `{user_id}` is not the caller.
#[get("/{user_id}/tasks")]
pub async fn list_tasks(
    pool: web::Data<SqlitePool>,
    scope: OwnerScope,
    page: web::Query<TaskPage>,
) -> Result<impl Responder, AppError> {
    let tasks = tasks::list(&pool, scope.owner_id, page.into_inner()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task owned by the caller.
///
/// Any owner information in the body is ignored; the owner is always the
/// authenticated account.
///
/// ## Responses:
/// - `200 OK`: the created task.
/// - `403 Forbidden`: `{user_id}` is not the caller.
/// - `422 Unprocessable Entity`: blank title or over-long fields.
#[post("/{user_id}/tasks")]
pub async fn create_task(
    pool: web::Data<SqlitePool>,
    scope: OwnerScope,
    task_data: web::Json<TaskCreate>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let task = tasks::create(&pool, scope.owner_id, task_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Fetches one task.
///
/// ## Responses:
/// - `200 OK`: the task.
/// - `403 Forbidden`: `{user_id}` is not the caller.
/// - `404 Not Found`: no such task, or it belongs to another account.
#[get("/{user_id}/tasks/{id}")]
pub async fn get_task(
    pool: web::Data<SqlitePool>,
    scope: OwnerScope,
    path: TaskPath,
) -> Result<impl Responder, AppError> {
    tasks::get(&pool, path.1, scope.owner_id)
        .await?
        .map(|task| HttpResponse::Ok().json(task))
        .ok_or_else(|| AppError::NotFound(TASK_NOT_FOUND.into()))
}

/// Applies a partial update. Fields absent from the body keep their values.
///
/// ## Responses:
/// - `200 OK`: the updated task.
/// - `403 Forbidden`, `404 Not Found`, `422 Unprocessable Entity`.
#[put("/{user_id}/tasks/{id}")]
pub async fn update_task(
    pool: web::Data<SqlitePool>,
    scope: OwnerScope,
    path: TaskPath,
    task_data: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    tasks::update(&pool, path.1, scope.owner_id, task_data.into_inner())
        .await?
        .map(|task| HttpResponse::Ok().json(task))
        .ok_or_else(|| AppError::NotFound(TASK_NOT_FOUND.into()))
}

/// Marks a task complete, or incomplete with `?is_completed=false`.
#[patch("/{user_id}/tasks/{id}/complete")]
pub async fn complete_task(
    pool: web::Data<SqlitePool>,
    scope: OwnerScope,
    path: TaskPath,
    query: web::Query<CompletionQuery>,
) -> Result<impl Responder, AppError> {
    tasks::set_completed(&pool, path.1, scope.owner_id, query.is_completed)
        .await?
        .ok_or_else(|| AppError::NotFound(TASK_NOT_FOUND.into()))?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Task updated successfully" })))
}

#[delete("/{user_id}/tasks/{id}")]
pub async fn delete_task(
    pool: web::Data<SqlitePool>,
    scope: OwnerScope,
    path: TaskPath,
) -> Result<impl Responder, AppError> {
    if !tasks::delete(&pool, path.1, scope.owner_id).await? {
        return Err(AppError::NotFound(TASK_NOT_FOUND.into()));
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted successfully" })))
}
