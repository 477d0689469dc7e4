//! Binary entry point: load `.env`, set up tracing, open the database, serve.
//!
//! ## Environment Variables
//!
//! | Variable               | Default               | Description                         |
//! |------------------------|-----------------------|-------------------------------------|
//! | `BIND_ADDR`            | `0.0.0.0:3000`        | Address Axum listens on             |
//! | `DATABASE_URL`         | `sqlite://finance.db` | SQLite database                     |
//! | `STARTING_CASH`        | `10000`               | Dollars credited on registration    |
//! | `QUOTE_VOLATILITY_BPS` | `150`                 | Random price move per quote (bps)   |
//! | `SESSION_IDLE_MINUTES` | `120`                 | Idle time before a session expires  |
//! | `RUST_LOG`             | `finance=debug`       | Tracing filter                      |

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use finance::{app_router, build_state, money::usd, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env ──────────────────────────────────────────────────────────
    dotenvy::dotenv().ok();

    // ── 2. Structured logging ─────────────────────────────────────────────────
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("finance=debug".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    // ── 3. Config & shared state ──────────────────────────────────────────────
    let config = Config::from_env()?;
    info!(
        starting_cash = %usd(config.starting_cash),
        volatility_bps = config.quote_volatility_bps,
        "Configuration loaded"
    );
    let state = build_state(&config).await?;

    // ── 4. Bind & Serve ───────────────────────────────────────────────────────
    let app = app_router(state);

    info!(addr = ?config.bind_addr, "🚀 Finance server starting");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
