//! # auth — Passwords & Login Guard
//!
//! Passwords are stored as Argon2id PHC strings (`$argon2id$v=19$...`), salt
//! included. [`CurrentUser`] is the extractor every protected handler takes:
//! without a logged-in session the request is redirected to `/login`.

use anyhow::anyhow;
use argon2::{
    password_hash::{
        rand_core::OsRng, Error as PasswordHashError, PasswordHash, PasswordHasher,
        PasswordVerifier, SaltString,
    },
    Argon2,
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};

use crate::error::AppError;
use crate::session::Session;

// ─── Passwords ────────────────────────────────────────────────────────────────

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow!("password hashing failed: {e}")))
}

/// `Ok(false)` on a wrong password; `Err` only for a corrupt stored hash.
pub fn verify_password(stored_hash: &str, candidate: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::Internal(anyhow!("invalid stored password hash: {e}")))?;

    match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(e) => Err(AppError::Internal(anyhow!("password verification failed: {e}"))),
    }
}

/// [`hash_password`] on tokio's blocking pool.
pub async fn hash_password_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(anyhow!("password hashing task failed: {e}")))?
}

/// [`verify_password`] on tokio's blocking pool.
pub async fn verify_password_blocking(stored_hash: String, candidate: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&stored_hash, &candidate))
        .await
        .map_err(|e| AppError::Internal(anyhow!("password verification task failed: {e}")))?
}

// ─── Login Guard ──────────────────────────────────────────────────────────────

/// The logged-in user of this request, plus their session.
#[derive(Clone)]
pub struct CurrentUser {
    pub id:       i64,
    pub username: String,
    pub session:  Session,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal(anyhow!("session layer not installed")).into_response())?;

        match session.user().await {
            Some(user) => Ok(CurrentUser { id: user.id, username: user.username, session }),
            None => Err(Redirect::to("/login").into_response()),
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
