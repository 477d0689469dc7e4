//! HTTP handlers, grouped by page.

pub mod account;
pub mod health;
pub mod history;
pub mod portfolio;
pub mod quote;
pub mod trade;

use axum::response::{IntoResponse, Redirect, Response};

use crate::error::AppError;
use crate::session::Session;

/// Flash `message` and send the browser back to `to`.
pub(crate) async fn bounce(
    session: &Session,
    to:      &str,
    message: impl Into<String>,
) -> Result<Response, AppError> {
    session.flash(message).await;
    Ok(Redirect::to(to).into_response())
}
