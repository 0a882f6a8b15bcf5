// crates/agronomy-core/src/validation.rs

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Also the width of the `users.username` and `contacts.email` columns.
pub const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_LEN: usize = 64;

static LOCAL_PART: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*$")
        .expect("local part pattern compiles")
});

static DOMAIN_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?$").expect("domain label pattern compiles")
});

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("The email address is empty.")]
    Empty,

    #[error("The email address is too long.")]
    TooLong,

    #[error("The email address is not valid. It must have exactly one @-sign.")]
    AtSign,

    #[error("There must be something before the @-sign.")]
    EmptyLocalPart,

    #[error("The part before the @-sign contains invalid characters.")]
    InvalidLocalPart,

    #[error("There must be something after the @-sign.")]
    EmptyDomain,

    #[error("The part after the @-sign is not valid. It should have a period.")]
    DomainWithoutPeriod,

    #[error("The part after the @-sign contains invalid characters or labels.")]
    InvalidDomain,
}

/// Syntax check for an email address. Returns the address trimmed, with the
/// domain lowercased. Deliverability is not checked.
pub fn validate_email(raw: &str) -> Result<String, EmailError> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(EmailError::Empty);
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(EmailError::TooLong);
    }

    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err(EmailError::AtSign),
    };

    if local.is_empty() {
        return Err(EmailError::EmptyLocalPart);
    }
    if local.len() > MAX_LOCAL_LEN || !LOCAL_PART.is_match(local) {
        return Err(EmailError::InvalidLocalPart);
    }

    if domain.is_empty() {
        return Err(EmailError::EmptyDomain);
    }
    if !domain.contains('.') {
        return Err(EmailError::DomainWithoutPeriod);
    }
    let labels: Vec<&str> = domain.split('.').collect();
    let tld_is_alpha = labels
        .last()
        .map(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
        .unwrap_or(false);
    if !tld_is_alpha || !labels.iter().all(|label| DOMAIN_LABEL.is_match(label)) {
        return Err(EmailError::InvalidDomain);
    }

    Ok(format!("{local}@{}", domain.to_ascii_lowercase()))
}
