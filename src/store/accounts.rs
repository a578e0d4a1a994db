//! Account directory: creation, lookup and credential checks over the `users` table.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::auth::CredentialCodec;
use crate::error::AppError;
use crate::models::{Account, AccountRole};

const ACCOUNT_COLUMNS: &str = "id, email, username, role, hashed_password, is_active, created_at";

pub const EMAIL_TAKEN: &str = "Email already registered";
pub const USERNAME_TAKEN: &str = "Username already taken";
pub const CURRENT_PASSWORD_INCORRECT: &str = "Current password is incorrect";

/// Registers a new account.
///
/// The email check always runs before the username check, so a request
/// colliding on both reports the email.
pub async fn create(
    pool: &SqlitePool,
    codec: &CredentialCodec,
    email: &str,
    username: &str,
    password: &str,
) -> Result<Account, AppError> {
    if find_by_email(pool, email).await?.is_some() {
        return Err(AppError::Conflict(EMAIL_TAKEN.into()));
    }
    if find_by_username(pool, username).await?.is_some() {
        return Err(AppError::Conflict(USERNAME_TAKEN.into()));
    }

    let hashed_password = codec.hash(password)?;

    let account = sqlx::query_as::<_, Account>(&format!(
        "INSERT INTO users (email, username, role, hashed_password, is_active, created_at)
         VALUES (?, ?, ?, ?, TRUE, ?)
         RETURNING {}",
        ACCOUNT_COLUMNS
    ))
    .bind(email)
    .bind(username)
    .bind(AccountRole::User)
    .bind(hashed_password)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(signup_conflict)?;

    log::info!("registered account {} ({})", account.id, account.username);
    Ok(account)
}

/// Maps an insert failure, naming the column when a concurrent signup won the race
/// between the checks above and the insert.
fn signup_conflict(error: sqlx::Error) -> AppError {
    match &error {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            if db_err.message().contains("users.username") {
                AppError::Conflict(USERNAME_TAKEN.into())
            } else {
                AppError::Conflict(EMAIL_TAKEN.into())
            }
        }
        _ => AppError::from(error),
    }
}

/// Looks up `email` and checks `password` against the stored hash.
///
/// Unknown email and wrong password both yield `None`.
pub async fn authenticate(
    pool: &SqlitePool,
    codec: &CredentialCodec,
    email: &str,
    password: &str,
) -> Result<Option<Account>, AppError> {
    let account = find_by_email(pool, email).await?;
    Ok(account.filter(|account| codec.verify(password, &account.hashed_password)))
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Account>, AppError> {
    let account = sqlx::query_as::<_, Account>(&format!(
        "SELECT {} FROM users WHERE email = ?",
        ACCOUNT_COLUMNS
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(account)
}

pub async fn find_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<Account>, AppError> {
    let account = sqlx::query_as::<_, Account>(&format!(
        "SELECT {} FROM users WHERE username = ?",
        ACCOUNT_COLUMNS
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(account)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Account>, AppError> {
    let account = sqlx::query_as::<_, Account>(&format!(
        "SELECT {} FROM users WHERE id = ?",
        ACCOUNT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(account)
}

/// Replaces the stored hash after checking `current_password`.
///
/// Runs in one transaction so the check and the write see the same row.
pub async fn change_password(
    pool: &SqlitePool,
    codec: &CredentialCodec,
    account_id: i64,
    current_password: &str,
    new_password: &str,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let (stored_hash,): (String,) =
        sqlx::query_as("SELECT hashed_password FROM users WHERE id = ?")
            .bind(account_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(AppError::invalid_credentials)?;

    if !codec.verify(current_password, &stored_hash) {
        return Err(AppError::BadRequest(CURRENT_PASSWORD_INCORRECT.into()));
    }

    sqlx::query("UPDATE users SET hashed_password = ? WHERE id = ?")
        .bind(codec.hash(new_password)?)
        .bind(account_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    log::info!("password changed for account {}", account_id);
    Ok(())
}
