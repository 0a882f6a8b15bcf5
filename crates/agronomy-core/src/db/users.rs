use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::DbPool;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub user_id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

pub async fn find_by_username(pool: &DbPool, username: &str) -> Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT user_id, username, password_hash, created_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await
    .with_context(|| format!("failed to look up user {username}"))
}

/// Inserts a new user. Returns `Ok(None)` when the username is taken.
pub async fn insert_user(pool: &DbPool, username: &str, password_hash: &str) -> Result<Option<User>> {
    let result = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (user_id, username, password_hash)
        VALUES ($1, $2, $3)
        RETURNING user_id, username, password_hash, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(password_hash)
    .fetch_one(pool)
    .await;

    match result {
        Ok(user) => Ok(Some(user)),
        Err(sqlx::Error::Database(err)) if err.is_unique_violation() => Ok(None),
        Err(err) => Err(err).with_context(|| format!("failed to insert user {username}")),
    }
}
