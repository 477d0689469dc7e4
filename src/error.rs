//! # error
//!
//! Centralised application error type.
//!
//! Handlers return `Result<_, AppError>`. Ordinary input mistakes never get
//! here: they are flashed and redirected by the handler itself. What remains
//! renders as an apology page:
//!
//! - [`AppError::Apology`]: a user-facing refusal (bad credentials → 403)
//! - [`AppError::Database`] / [`AppError::Internal`]: logged, shown as 500

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::ledger::LedgerError;
use crate::views;

#[derive(Debug, Error)]
pub enum AppError {
    /// Refusal shown to the user as-is.
    #[error("{message}")]
    Apology { status: StatusCode, message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Catch-all for unexpected failures.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn apology(status: StatusCode, message: impl Into<String>) -> Self {
        AppError::Apology { status, message: message.into() }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::apology(StatusCode::FORBIDDEN, message)
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Database(e) => AppError::Database(e),
            LedgerError::UnknownUser => AppError::forbidden("unknown user, please log in again"),
            rejection => AppError::apology(StatusCode::BAD_REQUEST, rejection.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Apology { status, message } => (status, message),
            AppError::Database(err) => {
                error!(error = %err, "database failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "database error".to_string())
            }
            AppError::Internal(err) => {
                error!(error = %err, "internal failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };

        (status, views::apology(status, &message)).into_response()
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
