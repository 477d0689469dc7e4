//! # routes::quote
//!
//! | Method | Path          | Description                             |
//! |--------|---------------|-----------------------------------------|
//! | GET    | `/quote`      | Quote form                              |
//! | POST   | `/quote`      | Current price of one share              |
//! | GET    | `/symbols?q=` | Ticker search for the symbol datalist   |

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Form, Json,
};

use super::bounce;
use crate::{
    auth::CurrentUser,
    error::AppError,
    forms::{self, QuoteForm, SymbolQuery},
    quotes::{Listing, SEARCH_LIMIT},
    state::SharedState,
    views::{self, PageContext},
};

pub async fn quote_form(user: CurrentUser) -> Response {
    let ctx = PageContext::load(&user.session).await;
    views::quote(&ctx).into_response()
}

pub async fn quote(
    State(state): State<SharedState>,
    user:         CurrentUser,
    Form(form):   Form<QuoteForm>,
) -> Result<Response, AppError> {
    let symbol = forms::normalize_symbol(&form.symbol);
    if symbol.is_empty() {
        return bounce(&user.session, "/quote", "Please submit a stock's symbol to quote").await;
    }

    let Some(quote) = state.quotes.lookup(&symbol) else {
        return bounce(&user.session, "/quote", "Invalid symbol, try again").await;
    };

    let ctx = PageContext::load(&user.session).await;
    Ok(views::quoted(&ctx, &quote).into_response())
}

/// GET /symbols?q=: up to ten matching listings, JSON `[{symbol, name}]`
pub async fn search_symbols(
    State(state): State<SharedState>,
    Query(query): Query<SymbolQuery>,
) -> Json<Vec<Listing>> {
    Json(state.quotes.search(&query.q, SEARCH_LIMIT))
}
