//! # ledger — Accounting Rules
//!
//! Keeps the three tables consistent:
//!
//! | Table          | Buy                  | Sell                   |
//! |----------------|----------------------|------------------------|
//! | `users.cash`   | − cost               | + proceeds             |
//! | `portfolio`    | + shares (or insert) | − shares (must own)    |
//! | `transactions` | `buy` row            | `sell` row             |
//!
//! Each flow runs in a single SQL transaction: a rejection or an error rolls
//! everything back, so a failed order never leaves a half-written ledger.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Holding, LedgerEntry, OrderType};
use crate::money::{usd, Cents};
use crate::quotes::Quote;

// ─── Errors ───────────────────────────────────────────────────────────────────

/// Why an order did not go through. The `Display` text is what the user sees.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("You do not own enough shares for this transaction")]
    InsufficientShares,

    #[error("You do not own this stock")]
    NotOwned,

    /// `price × shares` (or a share count) does not fit in an `i64`.
    #[error("Not a valid number")]
    Overflow,

    #[error("Unknown user")]
    UnknownUser,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl LedgerError {
    /// `true` for outcomes caused by the user's order, as opposed to failures
    /// of the store.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, LedgerError::Database(_) | LedgerError::UnknownUser)
    }
}

// ─── Receipt ──────────────────────────────────────────────────────────────────

/// A filled order.
#[derive(Debug, Clone)]
pub struct Trade {
    pub order_type: OrderType,
    pub symbol:     String,
    pub name:       String,
    pub shares:     i64,
    /// Per-share price the order filled at
    pub price:      Cents,
    /// Cost of a buy, proceeds of a sell
    pub amount:     Cents,
    pub cash_after: Cents,
    /// Shares held after the order
    pub holding:    i64,
}

// ─── Portfolio Update ─────────────────────────────────────────────────────────

/// Apply `shares` of `order` to the user's portfolio row for `symbol`.
///
/// * buy, row exists → count += shares
/// * buy, no row     → insert row with `shares`
/// * sell, count ≥ shares → count −= shares
/// * sell, count < shares → [`LedgerError::InsufficientShares`]
/// * sell, no row    → [`LedgerError::NotOwned`]
///
/// Returns the new share count.
pub async fn update_portfolio(
    conn:    &mut SqliteConnection,
    user_id: i64,
    order:   OrderType,
    symbol:  &str,
    name:    &str,
    shares:  i64,
) -> Result<i64, LedgerError> {
    let current: Option<i64> =
        sqlx::query_scalar("SELECT count FROM portfolio WHERE userid = ? AND symbol = ?")
            .bind(user_id)
            .bind(symbol)
            .fetch_optional(&mut *conn)
            .await?;

    let updated = match (order, current) {
        (OrderType::Buy, Some(count)) => count.checked_add(shares).ok_or(LedgerError::Overflow)?,
        (OrderType::Buy, None) => {
            sqlx::query("INSERT INTO portfolio (userid, symbol, name, count) VALUES (?, ?, ?, ?)")
                .bind(user_id)
                .bind(symbol)
                .bind(name)
                .bind(shares)
                .execute(&mut *conn)
                .await?;
            return Ok(shares);
        }
        (OrderType::Sell, Some(count)) if count >= shares => count - shares,
        (OrderType::Sell, Some(count)) => {
            debug!(user_id, symbol, owned = count, requested = shares, "sell exceeds holding");
            return Err(LedgerError::InsufficientShares);
        }
        (OrderType::Sell, None) => return Err(LedgerError::NotOwned),
    };

    sqlx::query("UPDATE portfolio SET count = ?, name = ? WHERE userid = ? AND symbol = ?")
        .bind(updated)
        .bind(name)
        .bind(user_id)
        .bind(symbol)
        .execute(&mut *conn)
        .await?;

    Ok(updated)
}

// ─── Orders ───────────────────────────────────────────────────────────────────

/// Dispatch on `order`.
pub async fn execute(
    pool:    &SqlitePool,
    user_id: i64,
    order:   OrderType,
    quote:   &Quote,
    shares:  i64,
    now:     DateTime<Utc>,
) -> Result<Trade, LedgerError> {
    match order {
        OrderType::Buy  => buy(pool, user_id, quote, shares, now).await,
        OrderType::Sell => sell(pool, user_id, quote, shares, now).await,
    }
}

/// Buy `shares` of `quote.symbol` at `quote.price`.
pub async fn buy(
    pool:    &SqlitePool,
    user_id: i64,
    quote:   &Quote,
    shares:  i64,
    now:     DateTime<Utc>,
) -> Result<Trade, LedgerError> {
    let cost = quote.price.checked_mul(shares).ok_or(LedgerError::Overflow)?;

    let mut tx = pool.begin().await?;

    let cash = cash_in(&mut tx, user_id).await?;
    if cost > cash {
        debug!(user_id, cost, cash, "buy rejected: insufficient funds");
        return Err(LedgerError::InsufficientFunds);
    }

    record(&mut tx, now, user_id, OrderType::Buy, quote, shares, cost).await?;
    let cash_after = adjust_cash(&mut tx, user_id, -cost).await?;
    let holding = update_portfolio(
        &mut tx, user_id, OrderType::Buy, &quote.symbol, &quote.name, shares,
    )
    .await?;

    tx.commit().await?;

    info!(user_id, symbol = %quote.symbol, shares, cost = %usd(cost), "🟢 Bought");
    Ok(Trade {
        order_type: OrderType::Buy,
        symbol:     quote.symbol.clone(),
        name:       quote.name.clone(),
        shares,
        price:      quote.price,
        amount:     cost,
        cash_after,
        holding,
    })
}

/// Sell `shares` of `quote.symbol` at `quote.price`.
pub async fn sell(
    pool:    &SqlitePool,
    user_id: i64,
    quote:   &Quote,
    shares:  i64,
    now:     DateTime<Utc>,
) -> Result<Trade, LedgerError> {
    let proceeds = quote.price.checked_mul(shares).ok_or(LedgerError::Overflow)?;

    let mut tx = pool.begin().await?;

    // existence check first so an unknown user is not reported as "not owned"
    cash_in(&mut tx, user_id).await?;

    let holding = update_portfolio(
        &mut tx, user_id, OrderType::Sell, &quote.symbol, &quote.name, shares,
    )
    .await?;
    record(&mut tx, now, user_id, OrderType::Sell, quote, shares, proceeds).await?;
    let cash_after = adjust_cash(&mut tx, user_id, proceeds).await?;

    tx.commit().await?;

    info!(user_id, symbol = %quote.symbol, shares, proceeds = %usd(proceeds), "🔴 Sold");
    Ok(Trade {
        order_type: OrderType::Sell,
        symbol:     quote.symbol.clone(),
        name:       quote.name.clone(),
        shares,
        price:      quote.price,
        amount:     proceeds,
        cash_after,
        holding,
    })
}

/// Credit `amount` to the user's cash. Returns the new balance.
pub async fn deposit(pool: &SqlitePool, user_id: i64, amount: Cents) -> Result<Cents, LedgerError> {
    let mut conn = pool.acquire().await?;
    let cash = adjust_cash(&mut conn, user_id, amount).await?;
    info!(user_id, amount = %usd(amount), "💵 Cash deposited");
    Ok(cash)
}

// ─── Reads ────────────────────────────────────────────────────────────────────

pub async fn cash(pool: &SqlitePool, user_id: i64) -> Result<Cents, LedgerError> {
    let mut conn = pool.acquire().await?;
    cash_in(&mut conn, user_id).await
}

/// Portfolio rows with a non-zero share count, by symbol.
pub async fn holdings(pool: &SqlitePool, user_id: i64) -> Result<Vec<Holding>, LedgerError> {
    let rows = sqlx::query_as::<_, Holding>(
        "SELECT userid, symbol, name, count FROM portfolio \
         WHERE userid = ? AND NOT count = 0 ORDER BY symbol",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Every ledger row of the user, newest first.
pub async fn history(pool: &SqlitePool, user_id: i64) -> Result<Vec<LedgerEntry>, LedgerError> {
    let rows = sqlx::query_as::<_, LedgerEntry>(
        "SELECT id, time, userid, type, symbol, name, shares, cost FROM transactions \
         WHERE userid = ? ORDER BY time DESC, cost, id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

// ─── Internals ────────────────────────────────────────────────────────────────

async fn cash_in(conn: &mut SqliteConnection, user_id: i64) -> Result<Cents, LedgerError> {
    sqlx::query_scalar::<_, Cents>("SELECT cash FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(LedgerError::UnknownUser)
}

async fn adjust_cash(
    conn:    &mut SqliteConnection,
    user_id: i64,
    delta:   Cents,
) -> Result<Cents, LedgerError> {
    sqlx::query_scalar::<_, Cents>("UPDATE users SET cash = cash + ? WHERE id = ? RETURNING cash")
        .bind(delta)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(LedgerError::UnknownUser)
}

async fn record(
    conn:    &mut SqliteConnection,
    now:     DateTime<Utc>,
    user_id: i64,
    order:   OrderType,
    quote:   &Quote,
    shares:  i64,
    amount:  Cents,
) -> Result<(), LedgerError> {
    sqlx::query(
        "INSERT INTO transactions (time, userid, type, symbol, name, shares, cost) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(now.timestamp_micros())
    .bind(user_id)
    .bind(order.as_str())
    .bind(&quote.symbol)
    .bind(&quote.name)
    .bind(shares)
    .bind(amount)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::db;

    async fn make_pool() -> SqlitePool {
        db::init_pool("sqlite::memory:").await.unwrap()
    }

    async fn make_user(pool: &SqlitePool, cash: Cents) -> i64 {
        db::create_user(pool, "trader", "hash", cash).await.unwrap().unwrap()
    }

    fn make_quote(symbol: &str, price: Cents) -> Quote {
        Quote { symbol: symbol.to_string(), name: format!("{symbol} Corp."), price }
    }

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[tokio::test]
    async fn test_update_portfolio_branches() {
        let pool = make_pool().await;
        let user = make_user(&pool, 0).await;
        let mut conn = pool.acquire().await.unwrap();

        // buy, new row
        let n = update_portfolio(&mut conn, user, OrderType::Buy, "AAPL", "Apple", 3).await.unwrap();
        assert_eq!(n, 3);
        // buy, existing row
        let n = update_portfolio(&mut conn, user, OrderType::Buy, "AAPL", "Apple", 2).await.unwrap();
        assert_eq!(n, 5);
        // sell, enough shares
        let n = update_portfolio(&mut conn, user, OrderType::Sell, "AAPL", "Apple", 5).await.unwrap();
        assert_eq!(n, 0);
        // sell, not enough shares (row exists with 0)
        let err = update_portfolio(&mut conn, user, OrderType::Sell, "AAPL", "Apple", 1).await.unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientShares));
        // sell, never owned
        let err = update_portfolio(&mut conn, user, OrderType::Sell, "MSFT", "Microsoft", 1).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotOwned));
    }

    #[tokio::test]
    async fn test_buy_debits_cash_and_records() {
        let pool = make_pool().await;
        let user = make_user(&pool, 100_000).await;

        let trade = buy(&pool, user, &make_quote("AAPL", 12_345), 3, t0()).await.unwrap();
        assert_eq!(trade.amount, 37_035);
        assert_eq!(trade.cash_after, 100_000 - 37_035);
        assert_eq!(trade.holding, 3);

        assert_eq!(cash(&pool, user).await.unwrap(), 62_965);
        let rows = history(&pool, user).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, "buy");
        assert_eq!(rows[0].cost, 37_035);
        assert_eq!(rows[0].name, "AAPL Corp.");
    }

    #[tokio::test]
    async fn test_buy_insufficient_funds_changes_nothing() {
        let pool = make_pool().await;
        let user = make_user(&pool, 10_000).await;

        let err = buy(&pool, user, &make_quote("AAPL", 5_001), 2, t0()).await.unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds));
        assert!(err.is_rejection());

        assert_eq!(cash(&pool, user).await.unwrap(), 10_000);
        assert!(holdings(&pool, user).await.unwrap().is_empty());
        assert!(history(&pool, user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_buy_exactly_all_cash() {
        let pool = make_pool().await;
        let user = make_user(&pool, 10_000).await;

        let trade = buy(&pool, user, &make_quote("F", 2_500), 4, t0()).await.unwrap();
        assert_eq!(trade.cash_after, 0);
    }

    #[tokio::test]
    async fn test_buy_overflow_is_rejected() {
        let pool = make_pool().await;
        let user = make_user(&pool, 10_000).await;

        let err = buy(&pool, user, &make_quote("F", i64::MAX / 2), 3, t0()).await.unwrap_err();
        assert!(matches!(err, LedgerError::Overflow));
    }

    #[tokio::test]
    async fn test_sell_more_than_owned_rolls_back() {
        let pool = make_pool().await;
        let user = make_user(&pool, 100_000).await;
        let quote = make_quote("KO", 6_000);

        buy(&pool, user, &quote, 2, t0()).await.unwrap();
        let err = sell(&pool, user, &quote, 3, t0() + Duration::seconds(1)).await.unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientShares));

        assert_eq!(cash(&pool, user).await.unwrap(), 88_000);
        assert_eq!(history(&pool, user).await.unwrap().len(), 1);
        assert_eq!(holdings(&pool, user).await.unwrap()[0].count, 2);
    }

    #[tokio::test]
    async fn test_sell_unowned_stock() {
        let pool = make_pool().await;
        let user = make_user(&pool, 100_000).await;

        let err = sell(&pool, user, &make_quote("KO", 6_000), 1, t0()).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotOwned));
        assert_eq!(err.to_string(), "You do not own this stock");
    }

    #[tokio::test]
    async fn test_buy_then_sell_round_trip_cash() {
        let pool = make_pool().await;
        let user = make_user(&pool, 100_000).await;

        buy(&pool, user, &make_quote("NKE", 9_418), 5, t0()).await.unwrap();
        // price moved up by the time we sell
        let trade = sell(&pool, user, &make_quote("NKE", 9_500), 5, t0() + Duration::minutes(1))
            .await
            .unwrap();

        assert_eq!(trade.amount, 47_500);
        assert_eq!(trade.holding, 0);
        assert_eq!(cash(&pool, user).await.unwrap(), 100_000 - 47_090 + 47_500);
        // fully sold rows are hidden
        assert!(holdings(&pool, user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_is_newest_first() {
        let pool = make_pool().await;
        let user = make_user(&pool, 1_000_000).await;
        let quote = make_quote("V", 27_433);

        buy(&pool, user, &quote, 1, t0()).await.unwrap();
        buy(&pool, user, &quote, 2, t0() + Duration::seconds(10)).await.unwrap();
        sell(&pool, user, &quote, 1, t0() + Duration::seconds(20)).await.unwrap();

        let rows = history(&pool, user).await.unwrap();
        let kinds: Vec<_> = rows.iter().map(|r| (r.kind.as_str(), r.signed_shares())).collect();
        assert_eq!(kinds, vec![("sell", -1), ("buy", 2), ("buy", 1)]);
    }

    #[tokio::test]
    async fn test_deposit() {
        let pool = make_pool().await;
        let user = make_user(&pool, 500).await;

        assert_eq!(deposit(&pool, user, 100_000).await.unwrap(), 100_500);
        let err = deposit(&pool, user + 1, 100).await.unwrap_err();
        assert!(matches!(err, LedgerError::UnknownUser));
        assert!(!err.is_rejection());
    }

    #[tokio::test]
    async fn test_execute_dispatches() {
        let pool = make_pool().await;
        let user = make_user(&pool, 100_000).await;
        let quote = make_quote("T", 1_708);

        let t = execute(&pool, user, OrderType::Buy, &quote, 10, t0()).await.unwrap();
        assert_eq!(t.order_type, OrderType::Buy);
        let t = execute(&pool, user, OrderType::Sell, &quote, 4, t0()).await.unwrap();
        assert_eq!(t.order_type, OrderType::Sell);
        assert_eq!(t.holding, 6);
    }
}
