//! # models::transaction
//!
//! [`LedgerEntry`] is an immutable row of the `transactions` table. `cost` is
//! always positive: the amount paid for a buy, the proceeds of a sell.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::money::Cents;

// ─── OrderType ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Buy,
    Sell,
}

impl OrderType {
    /// Value stored in `transactions.type`
    pub fn as_str(self) -> &'static str {
        match self {
            OrderType::Buy  => "buy",
            OrderType::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = UnknownOrderType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy"  => Ok(OrderType::Buy),
            "sell" => Ok(OrderType::Sell),
            _      => Err(UnknownOrderType),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Transaction not supported")]
pub struct UnknownOrderType;

// ─── LedgerEntry ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, FromRow)]
pub struct LedgerEntry {
    pub id:     i64,
    /// Unix time in microseconds (UTC)
    pub time:   i64,
    pub userid: i64,
    #[sqlx(rename = "type")]
    pub kind:   String,
    pub symbol: String,
    pub name:   String,
    pub shares: i64,
    pub cost:   Cents,
}

impl LedgerEntry {
    pub fn order_type(&self) -> Result<OrderType, UnknownOrderType> {
        self.kind.parse()
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_micros(self.time)
    }

    /// Share count as shown in history: negative for sells.
    pub fn signed_shares(&self) -> i64 {
        match self.order_type() {
            Ok(OrderType::Sell) => -self.shares,
            _ => self.shares,
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
