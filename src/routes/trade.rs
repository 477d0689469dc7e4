//! # routes::trade
//!
//! | Method | Path    | Description                         |
//! |--------|---------|-------------------------------------|
//! | GET    | `/buy`  | Buy form                            |
//! | POST   | `/buy`  | Buy shares at the current quote     |
//! | GET    | `/sell` | Sell form listing owned symbols     |
//! | POST   | `/sell` | Sell shares at the current quote    |

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use chrono::Utc;
use tracing::debug;

use super::bounce;
use crate::{
    auth::CurrentUser,
    error::AppError,
    forms::{self, OrderForm, SharesError},
    ledger,
    models::OrderType,
    money::usd,
    state::SharedState,
    views::{self, PageContext},
};

// ─── GET ──────────────────────────────────────────────────────────────────────

pub async fn buy_form(user: CurrentUser) -> Response {
    let ctx = PageContext::load(&user.session).await;
    views::buy(&ctx).into_response()
}

pub async fn sell_form(
    State(state): State<SharedState>,
    user:         CurrentUser,
) -> Result<Response, AppError> {
    let owned: Vec<String> = ledger::holdings(&state.db, user.id)
        .await?
        .into_iter()
        .map(|h| h.symbol)
        .collect();

    let ctx = PageContext::load(&user.session).await;
    Ok(views::sell(&ctx, &owned).into_response())
}

// ─── POST ─────────────────────────────────────────────────────────────────────

pub async fn buy(
    State(state): State<SharedState>,
    user:         CurrentUser,
    Form(form):   Form<OrderForm>,
) -> Result<Response, AppError> {
    place_order(&state, &user, OrderType::Buy, &form, "/buy").await
}

pub async fn sell(
    State(state): State<SharedState>,
    user:         CurrentUser,
    Form(form):   Form<OrderForm>,
) -> Result<Response, AppError> {
    place_order(&state, &user, OrderType::Sell, &form, "/sell").await
}

/// Validate the form, quote the symbol, run the order through the ledger.
/// Any rejection is flashed and redirects to `back`; a fill redirects to `/`.
pub(crate) async fn place_order(
    state: &SharedState,
    user:  &CurrentUser,
    order: OrderType,
    form:  &OrderForm,
    back:  &str,
) -> Result<Response, AppError> {
    let session = &user.session;

    let symbol = forms::normalize_symbol(&form.symbol);
    if symbol.is_empty() {
        let msg = match order {
            OrderType::Buy  => "Please input a symbol to buy shares",
            OrderType::Sell => "Please input a symbol to sell shares",
        };
        return bounce(session, back, msg).await;
    }

    let Some(quote) = state.quotes.lookup(&symbol) else {
        return bounce(session, back, "Invalid symbol").await;
    };

    let shares = match forms::parse_shares(&form.shares) {
        Ok(n) => n,
        Err(SharesError::NotPositive) => {
            let msg = match order {
                OrderType::Buy  => "Please input a whole number of shares greater than 0",
                OrderType::Sell => "Please input a number of shares greater than 0",
            };
            return bounce(session, back, msg).await;
        }
        Err(SharesError::TooLarge) => return bounce(session, back, "Not a valid number").await,
    };

    match ledger::execute(&state.db, user.id, order, &quote, shares, Utc::now()).await {
        Ok(trade) => {
            debug!(
                user = %user.username,
                symbol = %trade.symbol,
                cash_after = %usd(trade.cash_after),
                holding = trade.holding,
                "order filled"
            );
            let msg = match order {
                OrderType::Buy  => "Purchase successful",
                OrderType::Sell => "Sold!",
            };
            session.flash(msg).await;
            Ok(Redirect::to("/").into_response())
        }
        Err(e) if e.is_rejection() => bounce(session, back, e.to_string()).await,
        Err(e) => Err(e.into()),
    }
}
