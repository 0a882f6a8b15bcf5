use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::DbPool;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ContactMessage {
    pub contact_id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

pub async fn insert_contact(pool: &DbPool, contact: &ContactMessage) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO contacts (contact_id, name, email, subject, message, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(contact.contact_id)
    .bind(&contact.name)
    .bind(&contact.email)
    .bind(&contact.subject)
    .bind(&contact.message)
    .bind(contact.created_at)
    .execute(pool)
    .await
    .with_context(|| "failed to insert contact message")?;
    Ok(())
}
