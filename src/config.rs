//! # config — read configuration from environment variables
//!
//! `.env` is loaded by `main` before this runs, so every key below can live
//! there as well.
//!
//! | Key                    | Default               |
//! |------------------------|-----------------------|
//! | `BIND_ADDR`            | `0.0.0.0:3000`        |
//! | `DATABASE_URL`         | `sqlite://finance.db` |
//! | `STARTING_CASH`        | `10000` (dollars)     |
//! | `QUOTE_VOLATILITY_BPS` | `150`                 |
//! | `SESSION_IDLE_MINUTES` | `120`                 |

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context};

use crate::money::{self, Cents};

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr:        SocketAddr,
    /// sqlx connection string, e.g. `sqlite://finance.db` or `sqlite::memory:`
    pub database_url:     String,
    /// Balance credited to every newly registered user
    pub starting_cash:    Cents,
    /// Max random move applied to a reference price per lookup, in basis points
    pub quote_volatility_bps: u32,
    /// Sessions untouched for this long are dropped
    pub session_idle:     Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr: SocketAddr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .context("BIND_ADDR must be a socket address, e.g. 0.0.0.0:3000")?;

        let starting_dollars: i64 = std::env::var("STARTING_CASH")
            .unwrap_or_else(|_| "10000".to_string())
            .parse()
            .context("STARTING_CASH must be a whole number of dollars")?;
        if starting_dollars < 0 {
            bail!("STARTING_CASH must not be negative");
        }
        let starting_cash = money::dollars(starting_dollars)
            .context("STARTING_CASH is too large")?;

        let quote_volatility_bps: u32 = std::env::var("QUOTE_VOLATILITY_BPS")
            .unwrap_or_else(|_| "150".to_string())
            .parse()
            .context("QUOTE_VOLATILITY_BPS must be a number")?;
        if quote_volatility_bps >= 10_000 {
            bail!("QUOTE_VOLATILITY_BPS must be below 10000 (100%)");
        }

        let idle_min: u64 = std::env::var("SESSION_IDLE_MINUTES")
            .unwrap_or_else(|_| "120".to_string())
            .parse()
            .context("SESSION_IDLE_MINUTES must be a number")?;

        Ok(Self {
            bind_addr,
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://finance.db".to_string()),
            starting_cash,
            quote_volatility_bps,
            session_idle: idle_duration(idle_min)?,
        })
    }
}

fn idle_duration(minutes: u64) -> anyhow::Result<Duration> {
    minutes
        .checked_mul(60)
        .map(Duration::from_secs)
        .context("SESSION_IDLE_MINUTES is too large")
}

impl Default for Config {
    /// In-memory database, fixed prices. Used by tests.
    fn default() -> Self {
        Self {
            bind_addr:            SocketAddr::from(([127, 0, 0, 1], 3000)),
            database_url:         "sqlite::memory:".to_string(),
            starting_cash:        1_000_000,
            quote_volatility_bps: 0,
            session_idle:         Duration::from_secs(120 * 60),
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
