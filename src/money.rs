//! # money
//!
//! All balances, prices and costs are whole **cents** (`i64`). Nothing in the
//! ledger ever touches a float, so `price × shares` is exact and a balance can
//! be reconciled against the transaction table to the cent.

/// Amount in US cents.
pub type Cents = i64;

/// Whole dollars → cents. `None` on overflow.
pub fn dollars(amount: i64) -> Option<Cents> {
    amount.checked_mul(100)
}

/// Formats cents as US dollars: `$1,234.56`, `-$0.50`.
pub fn usd(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let whole = (abs / 100).to_string();
    let frac = abs % 100;

    // thousands separators
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{frac:02}")
}

// ─── Tests ────────────────────────────────────────────────────────────────────
