//! # routes::portfolio
//!
//! `GET /` shows holdings valued at current quotes; `POST /` adds cash or
//! places a quick order from a portfolio row.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};

use super::{bounce, trade::place_order};
use crate::{
    auth::CurrentUser,
    error::AppError,
    forms::{self, AddCashError, IndexForm},
    ledger,
    models::OrderType,
    state::SharedState,
    views::{self, PageContext, PortfolioRow},
};

pub async fn index(
    State(state): State<SharedState>,
    user:         CurrentUser,
) -> Result<Response, AppError> {
    let holdings = ledger::holdings(&state.db, user.id).await?;
    let cash = ledger::cash(&state.db, user.id).await?;

    let mut stocks_total: i64 = 0;
    let rows: Vec<PortfolioRow> = holdings
        .into_iter()
        .map(|h| {
            let price = state.quotes.lookup(&h.symbol).map(|q| q.price);
            let total = price.and_then(|p| p.checked_mul(h.count));
            stocks_total = stocks_total.saturating_add(total.unwrap_or(0));
            PortfolioRow { symbol: h.symbol, name: h.name, shares: h.count, price, total }
        })
        .collect();

    let ctx = PageContext::load(&user.session).await;
    Ok(views::index(&ctx, &rows, cash, cash.saturating_add(stocks_total)).into_response())
}

pub async fn index_action(
    State(state): State<SharedState>,
    user:         CurrentUser,
    Form(form):   Form<IndexForm>,
) -> Result<Response, AppError> {
    // quick order from a portfolio row
    if let Some(kind) = form.ordertype.as_deref().filter(|k| !k.trim().is_empty()) {
        return match kind.parse::<OrderType>() {
            Ok(order) => place_order(&state, &user, order, &form.order(), "/").await,
            Err(e) => bounce(&user.session, "/", e.to_string()).await,
        };
    }

    let raw = form.addcash.unwrap_or_default();
    let amount = match forms::parse_add_cash(&raw) {
        Ok(amount) => amount,
        Err(AddCashError::NotANumber) => return bounce(&user.session, "/", "Not a valid number").await,
        Err(AddCashError::NotOffered) => {
            return bounce(&user.session, "/", "Please select from the drop down menu to add cash").await
        }
    };

    ledger::deposit(&state.db, user.id, amount).await?;
    user.session.flash("Cash added!").await;
    Ok(Redirect::to("/").into_response())
}
