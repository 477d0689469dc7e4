//! # models::portfolio
//!
//! One [`Holding`] per `(userid, symbol)`. Rows are never deleted: selling
//! everything leaves `count = 0`, and the views filter those out.

use sqlx::FromRow;

/// Row of the `portfolio` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Holding {
    pub userid: i64,
    pub symbol: String,
    pub name:   String,
    /// Shares owned, never negative
    pub count:  i64,
}
