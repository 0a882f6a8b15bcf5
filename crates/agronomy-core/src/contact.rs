use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::db::contacts::{self, ContactMessage};
use crate::db::DbPool;
use crate::validation::{validate_email, EmailError};

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Invalid email address: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Please fill in the {0} field.")]
    MissingField(&'static str),

    #[error("The {field} field must be at most {max} characters.")]
    TooLong { field: &'static str, max: usize },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Column widths of `contacts.name` and `contacts.subject`.
pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_SUBJECT_CHARS: usize = 100;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    /// Builds the message that would be stored, without touching the database.
    pub fn validate(&self) -> Result<ContactMessage, ContactError> {
        let email = validate_email(&self.email)?;
        for (field, value) in [
            ("name", &self.name),
            ("subject", &self.subject),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(ContactError::MissingField(field));
            }
        }
        for (field, value, max) in [
            ("name", &self.name, MAX_NAME_CHARS),
            ("subject", &self.subject, MAX_SUBJECT_CHARS),
        ] {
            if value.trim().chars().count() > max {
                return Err(ContactError::TooLong { field, max });
            }
        }

        Ok(ContactMessage {
            contact_id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            email,
            subject: self.subject.trim().to_string(),
            message: self.message.clone(),
            created_at: Utc::now(),
        })
    }
}

pub async fn submit(pool: &DbPool, form: &ContactForm) -> Result<ContactMessage, ContactError> {
    let contact = form.validate()?;
    contacts::insert_contact(pool, &contact).await?;
    info!(contact_id = %contact.contact_id, "Stored contact message");
    Ok(contact)
}
