//! # db — SQLite Database Layer
//!
//! `sqlx` over SQLite. Queries are runtime-checked (`query_as::<_, T>`) so
//! the crate builds without a live `DATABASE_URL`.
//!
//! ## Setup
//! Nothing to do: the database file is created on first start and
//! `migrations/001_init.sql` is applied (every statement is idempotent).

use std::str::FromStr;

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tracing::info;

use crate::models::User;
use crate::money::Cents;

// ─── Pool Init ────────────────────────────────────────────────────────────────

/// Open the pool and run migrations.
pub async fn init_pool(database_url: &str) -> anyhow::Result<SqlitePool> {
    info!(database_url, "Opening SQLite database...");

    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid DATABASE_URL: {database_url}"))?
        .create_if_missing(true)
        .foreign_keys(true);

    // An in-memory database lives and dies with its connection: keep exactly
    // one, forever.
    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect_with(options)
        .await
        .context("Failed to open SQLite database")?;

    run_migrations(&pool).await?;

    info!("✅ Database ready");
    Ok(pool)
}

async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    let script = include_str!("../migrations/001_init.sql");

    for statement in script
        .split(';')
        .map(strip_sql_comments)
        .filter(|s| !s.is_empty())
    {
        sqlx::query(&statement)
            .execute(pool)
            .await
            .with_context(|| format!("Migration statement failed: {statement}"))?;
    }

    Ok(())
}

fn strip_sql_comments(chunk: &str) -> String {
    chunk
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

// ─── Users ────────────────────────────────────────────────────────────────────

pub async fn find_user_by_name(pool: &SqlitePool, username: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT id, username, hash, cash FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn find_user(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT id, username, hash, cash FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Insert a new user. `Ok(None)` when the username is already taken.
pub async fn create_user(
    pool:     &SqlitePool,
    username: &str,
    hash:     &str,
    cash:     Cents,
) -> sqlx::Result<Option<i64>> {
    let result = sqlx::query("INSERT INTO users (username, hash, cash) VALUES (?, ?, ?)")
        .bind(username)
        .bind(hash)
        .bind(cash)
        .execute(pool)
        .await;

    match result {
        Ok(done) => Ok(Some(done.last_insert_rowid())),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(None),
        Err(e) => Err(e),
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
