//! Task repository.
//!
//! Every statement filters on both the task id and the owning account id, so a
//! task that belongs to someone else behaves exactly like one that does not exist.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::{Task, TaskCreate, TaskPage, TaskUpdate};

const TASK_COLUMNS: &str = "id, title, description, is_completed, user_id, due_date, \
                            priority_level, category, created_at, updated_at";

/// Lists the owner's tasks in insertion order.
pub async fn list(pool: &SqlitePool, owner_id: i64, page: TaskPage) -> Result<Vec<Task>, AppError> {
    let tasks = sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks WHERE user_id = ? ORDER BY id LIMIT ? OFFSET ?",
        TASK_COLUMNS
    ))
    .bind(owner_id)
    .bind(i64::from(page.limit))
    .bind(i64::from(page.skip))
    .fetch_all(pool)
    .await?;
    Ok(tasks)
}

pub async fn get(pool: &SqlitePool, task_id: i64, owner_id: i64) -> Result<Option<Task>, AppError> {
    let task = sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks WHERE id = ? AND user_id = ?",
        TASK_COLUMNS
    ))
    .bind(task_id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;
    Ok(task)
}

/// Inserts a task owned by `owner_id`.
pub async fn create(pool: &SqlitePool, owner_id: i64, input: TaskCreate) -> Result<Task, AppError> {
    let now = Utc::now();
    let task = sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (title, description, is_completed, user_id, due_date, priority_level, category, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(input.title.trim())
    .bind(input.description)
    .bind(input.is_completed)
    .bind(owner_id)
    .bind(input.due_date)
    .bind(input.priority_level)
    .bind(input.category)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    log::debug!("account {} created task {}", owner_id, task.id);
    Ok(task)
}

/// Applies the fields present in `changes` and refreshes `updated_at`.
pub async fn update(
    pool: &SqlitePool,
    task_id: i64,
    owner_id: i64,
    changes: TaskUpdate,
) -> Result<Option<Task>, AppError> {
    let task = sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks SET
             title = COALESCE(?, title),
             description = COALESCE(?, description),
             is_completed = COALESCE(?, is_completed),
             due_date = COALESCE(?, due_date),
             priority_level = COALESCE(?, priority_level),
             category = COALESCE(?, category),
             updated_at = ?
         WHERE id = ? AND user_id = ?
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(changes.title.as_deref().map(str::trim))
    .bind(changes.description)
    .bind(changes.is_completed)
    .bind(changes.due_date)
    .bind(changes.priority_level)
    .bind(changes.category)
    .bind(Utc::now())
    .bind(task_id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;
    Ok(task)
}

/// Sets only the completion flag.
pub async fn set_completed(
    pool: &SqlitePool,
    task_id: i64,
    owner_id: i64,
    completed: bool,
) -> Result<Option<Task>, AppError> {
    let task = sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks SET is_completed = ?, updated_at = ?
         WHERE id = ? AND user_id = ?
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(completed)
    .bind(Utc::now())
    .bind(task_id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;
    Ok(task)
}

/// Returns whether a row was removed.
pub async fn delete(pool: &SqlitePool, task_id: i64, owner_id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
        .bind(task_id)
        .bind(owner_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
