//! User registration, password hashing and login checks.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use anyhow::Context;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::info;

use crate::db::users::{self, User};
use crate::db::DbPool;
use crate::validation::{validate_email, EmailError};

pub const PBKDF2_ITERATIONS: u32 = 600_000;
const SALT_LENGTH: usize = 16;
const HASH_LENGTH: usize = 32;
const HASH_SCHEME: &str = "pbkdf2_sha256";

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Password must not be empty.")]
    EmptyPassword,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Email already in use.")]
    EmailInUse,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    /// Returns the normalised email on success.
    pub fn validate(&self) -> Result<String, AccountError> {
        let email = validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(AccountError::EmptyPassword);
        }
        if self.password != self.confirm_password {
            return Err(AccountError::PasswordMismatch);
        }
        Ok(email)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Encodes as `pbkdf2_sha256$<iterations>$<salt>$<hash>` with unpadded base64.
pub fn hash_password(password: &str) -> String {
    hash_password_with(password, PBKDF2_ITERATIONS)
}

pub fn hash_password_with(password: &str, iterations: u32) -> String {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    let hash = derive(password, &salt, iterations);
    format!(
        "{HASH_SCHEME}${iterations}${}${}",
        STANDARD_NO_PAD.encode(salt),
        STANDARD_NO_PAD.encode(hash)
    )
}

/// False for a wrong password and for any hash this module did not produce.
pub fn verify_password(password: &str, encoded: &str) -> bool {
    let mut parts = encoded.split('$');
    let (Some(HASH_SCHEME), Some(iterations), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };

    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (
        STANDARD_NO_PAD.decode(salt),
        STANDARD_NO_PAD.decode(expected),
    ) else {
        return false;
    };
    if iterations == 0 || expected.len() != HASH_LENGTH {
        return false;
    }

    let actual = derive(password, &salt, iterations);
    actual.as_slice().ct_eq(expected.as_slice()).into()
}

/// [`hash_password`] on the blocking thread pool.
pub async fn hash_password_blocking(password: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("password hashing task failed")
}

/// [`verify_password`] on the blocking thread pool.
pub async fn verify_password_blocking(password: String, encoded: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &encoded))
        .await
        .context("password verification task failed")
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LENGTH] {
    let mut hash = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut hash);
    hash
}

pub async fn register(pool: &DbPool, form: &SignupForm) -> Result<User, AccountError> {
    let email = form.validate()?;
    if users::find_by_username(pool, &email).await?.is_some() {
        return Err(AccountError::EmailInUse);
    }

    let password_hash = hash_password_blocking(form.password.clone()).await?;
    let user = users::insert_user(pool, &email, &password_hash)
        .await?
        .ok_or(AccountError::EmailInUse)?;
    info!(username = %user.username, "Registered user");
    Ok(user)
}

/// Returns the user when the credentials match, `None` otherwise.
pub async fn authenticate(pool: &DbPool, form: &LoginForm) -> anyhow::Result<Option<User>> {
    let username = match validate_email(&form.email) {
        Ok(email) => email,
        Err(_) => form.email.trim().to_string(),
    };
    let Some(user) = users::find_by_username(pool, &username).await? else {
        return Ok(None);
    };
    let matches =
        verify_password_blocking(form.password.clone(), user.password_hash.clone()).await?;
    Ok(matches.then_some(user))
}
