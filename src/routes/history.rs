//! # routes::history

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{
    auth::CurrentUser,
    error::AppError,
    ledger,
    state::SharedState,
    views::{self, PageContext},
};

/// GET /history: every buy and sell, newest first
pub async fn history(
    State(state): State<SharedState>,
    user:         CurrentUser,
) -> Result<Response, AppError> {
    let entries = ledger::history(&state.db, user.id).await?;
    let ctx = PageContext::load(&user.session).await;
    Ok(views::history(&ctx, &entries).into_response())
}
