//! Cookie-keyed, in-memory sessions carrying the signed-in user and
//! one-shot flash messages.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts, Request};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::error::WebError;

pub const SESSION_COOKIE: &str = "agronomy_session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Danger,
    Info,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Danger => "danger",
            FlashLevel::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
struct SessionData {
    user: Option<SessionUser>,
    flashes: Vec<Flash>,
}

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, SessionData>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    async fn user(&self, token: &str) -> Option<SessionUser> {
        self.inner
            .read()
            .await
            .get(token)
            .and_then(|data| data.user.clone())
    }

    async fn update<F>(&self, token: &str, apply: F)
    where
        F: FnOnce(&mut SessionData),
    {
        let mut sessions = self.inner.write().await;
        let data = sessions.entry(token.to_string()).or_default();
        apply(data);
        if data.user.is_none() && data.flashes.is_empty() {
            sessions.remove(token);
        }
    }

    async fn take_flashes(&self, token: &str) -> Vec<Flash> {
        let mut flashes = Vec::new();
        self.update(token, |data| flashes = std::mem::take(&mut data.flashes))
            .await;
        flashes
    }
}

#[derive(Debug, Clone)]
struct SessionToken(String);

fn is_valid_token(token: &str) -> bool {
    token.len() == 32 && token.bytes().all(|b| b.is_ascii_hexdigit())
}

pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, token)| *name == SESSION_COOKIE && is_valid_token(token))
        .map(|(_, token)| token.to_string())
}

/// Attaches a session token to every request, issuing a cookie when the
/// client did not present one.
pub async fn ensure_session(mut req: Request, next: Next) -> Response {
    let (token, issued) = match token_from_headers(req.headers()) {
        Some(token) => (token, false),
        None => (Uuid::new_v4().simple().to_string(), true),
    };
    req.extensions_mut().insert(SessionToken(token.clone()));

    let mut response = next.run(req).await;
    if issued {
        let cookie = format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }
    response
}

/// Handle to the current request's session.
pub struct Session {
    token: String,
    store: SessionStore,
}

impl<S> FromRequestParts<S> for Session
where
    SessionStore: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .extensions
            .get::<SessionToken>()
            .map(|token| token.0.clone())
            .ok_or_else(|| WebError::Internal("session middleware is not installed".into()))?;
        Ok(Self {
            token,
            store: SessionStore::from_ref(state),
        })
    }
}

impl Session {
    pub async fn user(&self) -> Option<SessionUser> {
        self.store.user(&self.token).await
    }

    pub async fn login(&self, user: SessionUser) {
        self.store
            .update(&self.token, |data| data.user = Some(user))
            .await;
    }

    pub async fn logout(&self) {
        self.store.update(&self.token, |data| data.user = None).await;
    }

    pub async fn flash(&self, level: FlashLevel, message: impl Into<String>) {
        let flash = Flash {
            level,
            message: message.into(),
        };
        self.store
            .update(&self.token, |data| data.flashes.push(flash))
            .await;
    }

    pub async fn take_flashes(&self) -> Vec<Flash> {
        self.store.take_flashes(&self.token).await
    }
}
