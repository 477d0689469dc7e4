//! Page bodies, one function per template.

use axum::{http::StatusCode, response::Html};

use super::{escape, layout, PageContext};
use crate::forms::ADD_CASH_CHOICES;
use crate::models::LedgerEntry;
use crate::money::{usd, Cents};
use crate::quotes::Quote;

/// A portfolio table row. `price` is `None` when the symbol no longer quotes.
#[derive(Debug, Clone)]
pub struct PortfolioRow {
    pub symbol: String,
    pub name:   String,
    pub shares: i64,
    pub price:  Option<Cents>,
    pub total:  Option<Cents>,
}

fn money_cell(cents: Option<Cents>) -> String {
    cents.map(usd).unwrap_or_else(|| "N/A".to_string())
}

// ─── Portfolio ────────────────────────────────────────────────────────────────

pub fn index(ctx: &PageContext, rows: &[PortfolioRow], cash: Cents, total: Cents) -> Html<String> {
    let body_rows: String = rows
        .iter()
        .map(|row| {
            let symbol = escape(&row.symbol);
            format!(
                r#"        <tr>
          <td>{symbol}</td>
          <td>{name}</td>
          <td class="num">{shares}</td>
          <td class="num">{price}</td>
          <td class="num">{total}</td>
          <td>
            <form class="inline" action="/" method="post">
              <input type="hidden" name="symbol" value="{symbol}">
              <input name="shares" type="number" min="1" placeholder="Shares" required>
              <button name="ordertype" value="buy" type="submit">Buy</button>
              <button name="ordertype" value="sell" type="submit">Sell</button>
            </form>
          </td>
        </tr>
"#,
                name   = escape(&row.name),
                shares = row.shares,
                price  = money_cell(row.price),
                total  = money_cell(row.total),
            )
        })
        .collect();

    let options: String = ADD_CASH_CHOICES
        .iter()
        .map(|d| format!(r#"<option value="{d}">{}</option>"#, usd(d * 100)))
        .collect();

    let main = format!(
        r#"      <table>
        <thead>
          <tr><th>Symbol</th><th>Name</th><th class="num">Shares</th><th class="num">Price</th><th class="num">TOTAL</th><th></th></tr>
        </thead>
        <tbody>
{body_rows}        </tbody>
        <tfoot>
          <tr><td colspan="4" class="num"><b>Cash</b></td><td class="num">{cash}</td><td></td></tr>
          <tr><td colspan="4" class="num"><b>TOTAL</b></td><td class="num">{total}</td><td></td></tr>
        </tfoot>
      </table>
      <form action="/" method="post">
        <select name="addcash">
          <option disabled selected value="">Add cash</option>
          {options}
        </select>
        <button type="submit">Add</button>
      </form>"#,
        cash  = usd(cash),
        total = usd(total),
    );

    layout(ctx, "Portfolio", &main)
}

// ─── Trading ──────────────────────────────────────────────────────────────────

pub fn buy(ctx: &PageContext) -> Html<String> {
    let main = r#"      <form action="/buy" method="post">
        <input autocomplete="off" autofocus name="symbol" placeholder="Symbol" type="text" list="symbols">
        <input name="shares" placeholder="Shares" type="number" min="1">
        <button type="submit">Buy</button>
      </form>"#;
    layout(ctx, "Buy", main)
}

pub fn sell(ctx: &PageContext, owned: &[String]) -> Html<String> {
    let options: String = owned
        .iter()
        .map(|s| {
            let s = escape(s);
            format!(r#"<option value="{s}">{s}</option>"#)
        })
        .collect();

    let main = format!(
        r#"      <form action="/sell" method="post">
        <select name="symbol">
          <option disabled selected value="">Symbol</option>
          {options}
        </select>
        <input name="shares" placeholder="Shares" type="number" min="1">
        <button type="submit">Sell</button>
      </form>"#
    );
    layout(ctx, "Sell", &main)
}

// ─── Quotes ───────────────────────────────────────────────────────────────────

pub fn quote(ctx: &PageContext) -> Html<String> {
    let main = r#"      <form action="/quote" method="post">
        <input autocomplete="off" autofocus name="symbol" placeholder="Symbol" type="text" list="symbols">
        <button type="submit">Quote</button>
      </form>"#;
    layout(ctx, "Quote", main)
}

pub fn quoted(ctx: &PageContext, quote: &Quote) -> Html<String> {
    let main = format!(
        "      <p>A share of {name} ({symbol}) costs {price}.</p>",
        name   = escape(&quote.name),
        symbol = escape(&quote.symbol),
        price  = usd(quote.price),
    );
    layout(ctx, "Quoted", &main)
}

// ─── History ──────────────────────────────────────────────────────────────────

pub fn history(ctx: &PageContext, entries: &[LedgerEntry]) -> Html<String> {
    let rows: String = entries
        .iter()
        .map(|entry| {
            let time = entry
                .timestamp()
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_default();
            format!(
                r#"        <tr><td>{time}</td><td>{kind}</td><td>{symbol}</td><td>{name}</td><td class="num">{shares}</td><td class="num">{cost}</td></tr>
"#,
                kind   = escape(&entry.kind.to_uppercase()),
                symbol = escape(&entry.symbol),
                name   = escape(&entry.name),
                shares = entry.signed_shares(),
                cost   = usd(entry.cost),
            )
        })
        .collect();

    let main = format!(
        r#"      <table>
        <thead>
          <tr><th>Time</th><th>Type</th><th>Symbol</th><th>Name</th><th class="num">Shares</th><th class="num">Amount</th></tr>
        </thead>
        <tbody>
{rows}        </tbody>
      </table>"#
    );
    layout(ctx, "History", &main)
}

// ─── Accounts ─────────────────────────────────────────────────────────────────

pub fn login(ctx: &PageContext) -> Html<String> {
    let main = r#"      <form action="/login" method="post">
        <div><input autocomplete="off" autofocus name="username" placeholder="Username" type="text"></div>
        <div><input name="password" placeholder="Password" type="password"></div>
        <button type="submit">Log In</button>
      </form>"#;
    layout(ctx, "Log In", main)
}

pub fn register(ctx: &PageContext) -> Html<String> {
    let main = r#"      <form action="/register" method="post">
        <div><input autocomplete="off" autofocus name="username" placeholder="Username" type="text"></div>
        <div><input name="password" placeholder="Password" type="password"></div>
        <div><input name="confirmation" placeholder="Confirm password" type="password"></div>
        <button type="submit">Register</button>
      </form>"#;
    layout(ctx, "Register", main)
}

pub fn apology(status: StatusCode, message: &str) -> Html<String> {
    let main = format!(
        r#"      <h1>{code}</h1>
      <p class="apology">{message}</p>"#,
        code    = status.as_u16(),
        message = escape(message),
    );
    layout(&PageContext::default(), "Apology", &main)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
