//! # models::user

use sqlx::FromRow;

use crate::money::Cents;

/// Row of the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id:       i64,
    pub username: String,
    /// Argon2 PHC string
    pub hash:     String,
    pub cash:     Cents,
}
