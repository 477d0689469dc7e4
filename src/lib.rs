//! # Finance — Paper-Trading Web App
//!
//! ```text
//!  Browser ──form POST──▶ routes ──▶ ledger ──▶ SQLite (users · portfolio · transactions)
//!     ▲                     │  ▲
//!     │                     │  └── quotes (SimulatedMarket)
//!     └──── HTML / 303 ◀────┘
//!              session cookie → SessionStore (user + flash messages)
//! ```
//!
//! Every page except `/login` and `/register` requires a logged-in session.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod ledger;
pub mod models;
pub mod money;
pub mod quotes;
pub mod routes;
pub mod session;
pub mod state;
pub mod views;

use axum::{
    http::{
        header::{CACHE_CONTROL, EXPIRES, PRAGMA},
        HeaderValue,
    },
    middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use routes::{account, health, history, portfolio, quote, trade};
use state::SharedState;

pub use config::Config;
pub use state::{build_state, AppState};

/// All routes, middleware attached, state bound.
pub fn app_router(state: SharedState) -> Router {
    // ── Pages (session cookie) ────────────────────────────────────────────────
    let pages = Router::new()
        .route("/",         get(portfolio::index).post(portfolio::index_action))
        .route("/buy",      get(trade::buy_form).post(trade::buy))
        .route("/sell",     get(trade::sell_form).post(trade::sell))
        .route("/quote",    get(quote::quote_form).post(quote::quote))
        .route("/history",  get(history::history))
        .route("/login",    get(account::login_form).post(account::login))
        .route("/logout",   get(account::logout))
        .route("/register", get(account::register_form).post(account::register))
        .layer(middleware::from_fn_with_state(state.clone(), session::session_layer));

    // ── Responses must never be cached ────────────────────────────────────────
    let no_cache = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        ))
        .layer(SetResponseHeaderLayer::overriding(EXPIRES, HeaderValue::from_static("0")))
        .layer(SetResponseHeaderLayer::overriding(PRAGMA, HeaderValue::from_static("no-cache")));

    Router::new()
        .merge(pages)
        .route("/symbols", get(quote::search_symbols))
        .route("/health",  get(health::health_check))
        .layer(no_cache)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
