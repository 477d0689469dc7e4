//! # state
//!
//! `AppState` shared by every handler: the SQLite pool, the quote source and
//! the session store.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;
use crate::quotes::{QuoteSource, SimulatedMarket};
use crate::session::SessionStore;

// ─── AppState ─────────────────────────────────────────────────────────────────

/// Top-level shared state injected into every Axum handler.
#[derive(Clone)]
pub struct AppState {
    pub db:       SqlitePool,
    /// Where prices come from; the simulated market unless a test swaps it
    pub quotes:   Arc<dyn QuoteSource>,
    pub sessions: SessionStore,
    pub config:   Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, db: SqlitePool, quotes: Arc<dyn QuoteSource>) -> Self {
        Self {
            db,
            quotes,
            sessions: SessionStore::new(config.session_idle),
            config:   Arc::new(config),
        }
    }
}

/// Convenience type alias
pub type SharedState = Arc<AppState>;

/// Open the database and wire the default simulated market.
pub async fn build_state(config: &Config) -> anyhow::Result<SharedState> {
    let pool = db::init_pool(&config.database_url).await?;
    let quotes: Arc<dyn QuoteSource> = Arc::new(SimulatedMarket::new(config.quote_volatility_bps));
    Ok(Arc::new(AppState::new(config.clone(), pool, quotes)))
}
