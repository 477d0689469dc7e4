//! # routes::account
//!
//! | Method | Path        | Description                               |
//! |--------|-------------|-------------------------------------------|
//! | GET    | `/login`    | Forget the session, show the login form   |
//! | POST   | `/login`    | Check credentials, remember the user      |
//! | GET    | `/logout`   | Forget the session                        |
//! | GET    | `/register` | Registration form                         |
//! | POST   | `/register` | Create the account and log in             |

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use tracing::{info, warn};

use super::bounce;
use crate::{
    auth,
    db,
    error::AppError,
    forms::CredentialsForm,
    session::{Session, SessionUser},
    state::SharedState,
    views::{self, PageContext},
};

// ─── Login / Logout ───────────────────────────────────────────────────────────

pub async fn login_form(Extension(session): Extension<Session>) -> Response {
    session.clear().await;
    let ctx = PageContext::load(&session).await;
    views::login(&ctx).into_response()
}

pub async fn login(
    State(state):       State<SharedState>,
    Extension(session): Extension<Session>,
    Form(form):         Form<CredentialsForm>,
) -> Result<Response, AppError> {
    session.clear().await;

    let username = form.username.trim();
    if username.is_empty() {
        return Err(AppError::forbidden("must provide username"));
    }
    if form.password.is_empty() {
        return Err(AppError::forbidden("must provide password"));
    }

    let found = db::find_user_by_name(&state.db, username).await?;
    let verified = match &found {
        Some(user) => auth::verify_password_blocking(user.hash.clone(), form.password).await?,
        None => false,
    };
    let user = match found {
        Some(user) if verified => user,
        _ => {
            warn!(username, "❌ Failed login");
            return Err(AppError::forbidden("invalid username and/or password"));
        }
    };

    info!(user_id = user.id, "🔑 Logged in");
    session.regenerate().await;
    session.log_in(SessionUser { id: user.id, username: user.username }).await;
    Ok(Redirect::to("/").into_response())
}

pub async fn logout(Extension(session): Extension<Session>) -> Redirect {
    session.clear().await;
    Redirect::to("/")
}

// ─── Register ─────────────────────────────────────────────────────────────────

pub async fn register_form(Extension(session): Extension<Session>) -> Response {
    let ctx = PageContext::load(&session).await;
    views::register(&ctx).into_response()
}

pub async fn register(
    State(state):       State<SharedState>,
    Extension(session): Extension<Session>,
    Form(form):         Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let username = form.username.trim();

    if username.is_empty() || form.password.is_empty() || form.password != form.confirmation {
        let msg = if username.is_empty() {
            "Registration unsuccessful, invalid username"
        } else {
            "Registration unsuccessful, passwords do not match"
        };
        return bounce(&session, "/register", msg).await;
    }

    if db::find_user_by_name(&state.db, username).await?.is_some() {
        return bounce(&session, "/register", "Username already in use").await;
    }

    let hash = auth::hash_password_blocking(form.password.clone()).await?;

    // a concurrent registration can still win the UNIQUE constraint
    let Some(id) = db::create_user(&state.db, username, &hash, state.config.starting_cash).await? else {
        return bounce(&session, "/register", "Username already in use").await;
    };

    info!(user_id = id, username, "🆕 Registered");
    session.regenerate().await;
    session.log_in(SessionUser { id, username: username.to_string() }).await;
    Ok(Redirect::to("/").into_response())
}
