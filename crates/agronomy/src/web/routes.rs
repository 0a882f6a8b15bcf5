use std::collections::HashMap;

use agronomy_core::accounts::{self, AccountError, LoginForm, SignupForm};
use agronomy_core::contact::{self, ContactError, ContactForm};
use agronomy_core::db::predictions::{self, PredictionRecord};
use agronomy_core::RawSubmission;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::Serialize;
use tracing::{info, warn};

use super::error::WebError;
use super::pages::{self, Layout, StaticPage};
use super::session::{FlashLevel, Session, SessionUser};
use super::AppState;

async fn render(session: &Session, title: &str, body: &str) -> Html<String> {
    let user = session.user().await;
    let flashes = session.take_flashes().await;
    Layout {
        user: user.as_ref(),
        flashes: &flashes,
    }
    .render(title, body)
}

async fn static_page(session: &Session, page: StaticPage) -> Html<String> {
    render(session, page.title(), page.body()).await
}

pub async fn index(session: Session) -> Html<String> {
    static_page(&session, StaticPage::Index).await
}

pub async fn about(session: Session) -> Html<String> {
    static_page(&session, StaticPage::About).await
}

pub async fn services(session: Session) -> Html<String> {
    static_page(&session, StaticPage::Services).await
}

pub async fn products(session: Session) -> Html<String> {
    static_page(&session, StaticPage::Products).await
}

pub async fn blogs(session: Session) -> Html<String> {
    static_page(&session, StaticPage::Blogs).await
}

pub async fn predict_page(session: Session) -> Html<String> {
    render(&session, "Predict", &pages::predict_body(None)).await
}

pub async fn predict(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Html<String>, WebError> {
    let submission = RawSubmission::from_form(&form);
    let prediction = state.pipeline.predict(&submission).map_err(|err| {
        if err.is_client_error() {
            warn!(error = %err, "Rejected prediction request");
        }
        WebError::from(err)
    })?;
    info!(
        class_id = prediction.class_id,
        crop = prediction.crop.unwrap_or("<unmapped>"),
        "Prediction served"
    );
    if !prediction.is_recommendation() {
        warn!(class_id = prediction.class_id, "Classifier returned an id outside the label table");
    }

    if let Some(pool) = &state.db {
        let user_id = session.user().await.map(|user| user.user_id);
        let record = PredictionRecord::from_prediction(&prediction, user_id);
        if let Err(err) = predictions::insert_prediction(pool, &record).await {
            tracing::error!(error = %format!("{err:#}"), "Failed to store prediction");
        }
    }

    Ok(render(&session, "Predict", &pages::predict_body(Some(&prediction.message))).await)
}

pub async fn contact_page(session: Session) -> Html<String> {
    render(&session, "Contact", &pages::contact_body(None)).await
}

pub async fn contact(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ContactForm>,
) -> Result<Response, WebError> {
    let pool = state.require_db()?;
    match contact::submit(pool, &form).await {
        Ok(_) => {
            session
                .flash(FlashLevel::Success, "Your message has been sent successfully!")
                .await;
            Ok(Redirect::to("/contact").into_response())
        }
        Err(ContactError::Storage(err)) => Err(err.into()),
        Err(err) => {
            let body = pages::contact_body(Some(&err.to_string()));
            Ok(render(&session, "Contact", &body).await.into_response())
        }
    }
}

pub async fn signup_page(session: Session) -> Html<String> {
    render(&session, "Sign up", &pages::signup_body(None)).await
}

pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignupForm>,
) -> Result<Response, WebError> {
    let pool = state.require_db()?;
    match accounts::register(pool, &form).await {
        Ok(_) => {
            session
                .flash(
                    FlashLevel::Success,
                    "Account created successfully! You can now log in.",
                )
                .await;
            Ok(Redirect::to("/login").into_response())
        }
        Err(AccountError::Storage(err)) => Err(err.into()),
        Err(err) => {
            let body = pages::signup_body(Some(&err.to_string()));
            Ok(render(&session, "Sign up", &body).await.into_response())
        }
    }
}

pub async fn login_page(session: Session) -> Html<String> {
    render(&session, "Log in", &pages::login_body(None)).await
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    let pool = state.require_db()?;
    match accounts::authenticate(pool, &form).await? {
        Some(user) => {
            info!(username = %user.username, "User logged in");
            session
                .login(SessionUser {
                    user_id: user.user_id,
                    username: user.username,
                })
                .await;
            session.flash(FlashLevel::Success, "Login successful!").await;
            Ok(Redirect::to("/").into_response())
        }
        None => {
            let body = pages::login_body(Some("Invalid Credentials. Please try again."));
            Ok(render(&session, "Log in", &body).await.into_response())
        }
    }
}

pub async fn logout(session: Session) -> Redirect {
    session.logout().await;
    session.flash(FlashLevel::Info, "You have been logged out.").await;
    Redirect::to("/login")
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub database: bool,
    pub classifier: &'static str,
}

pub async fn healthz(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        database: state.db.is_some(),
        classifier: state.pipeline.classifier_name(),
    })
}
