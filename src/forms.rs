//! # forms
//!
//! URL-encoded form bodies. Every field defaults to empty so a missing field
//! is reported as a validation message, never as a 422 from the extractor.

use serde::Deserialize;

use crate::money::{self, Cents};

/// Amounts (whole dollars) offered by the add-cash drop-down.
pub const ADD_CASH_CHOICES: [i64; 3] = [1_000, 10_000, 50_000];

// ─── Bodies ───────────────────────────────────────────────────────────────────

/// `/buy`, `/sell`
#[derive(Debug, Default, Deserialize)]
pub struct OrderForm {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub shares: String,
}

/// `POST /`: either an add-cash request or a quick order from a portfolio row
#[derive(Debug, Default, Deserialize)]
pub struct IndexForm {
    #[serde(default)]
    pub addcash:   Option<String>,
    #[serde(default)]
    pub ordertype: Option<String>,
    #[serde(default)]
    pub symbol:    String,
    #[serde(default)]
    pub shares:    String,
}

impl IndexForm {
    pub fn order(&self) -> OrderForm {
        OrderForm { symbol: self.symbol.clone(), shares: self.shares.clone() }
    }
}

/// `/quote`
#[derive(Debug, Default, Deserialize)]
pub struct QuoteForm {
    #[serde(default)]
    pub symbol: String,
}

/// `/login`, `/register`
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username:     String,
    #[serde(default)]
    pub password:     String,
    #[serde(default)]
    pub confirmation: String,
}

/// `GET /symbols?q=`
#[derive(Debug, Default, Deserialize)]
pub struct SymbolQuery {
    #[serde(default)]
    pub q: String,
}

// ─── Field Parsing ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharesError {
    /// Empty, signed, fractional, non-digit or zero
    NotPositive,
    /// All digits but does not fit
    TooLarge,
}

/// Share counts are plain digit strings greater than zero: no sign, no
/// decimal point, no surrounding whitespace.
pub fn parse_shares(raw: &str) -> Result<i64, SharesError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SharesError::NotPositive);
    }
    match raw.parse::<i64>() {
        Ok(0) => Err(SharesError::NotPositive),
        Ok(n) => Ok(n),
        Err(_) => Err(SharesError::TooLarge),
    }
}

/// Normalised ticker: trimmed, upper-case.
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddCashError {
    NotANumber,
    NotOffered,
}

/// The add-cash amount in cents; only the drop-down values are accepted.
pub fn parse_add_cash(raw: &str) -> Result<Cents, AddCashError> {
    let dollars: i64 = raw.trim().parse().map_err(|_| AddCashError::NotANumber)?;
    if !ADD_CASH_CHOICES.contains(&dollars) {
        return Err(AddCashError::NotOffered);
    }
    money::dollars(dollars).ok_or(AddCashError::NotOffered)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
