//! # quotes — Simulated Market
//!
//! There is no market data feed. [`SimulatedMarket`] serves quotes for a fixed
//! catalog of listings: each lookup takes the listing's reference price and
//! moves it by a random amount of at most `volatility_bps` basis points.
//!
//! Handlers only see the [`QuoteSource`] trait, so a test can pin prices with
//! `volatility_bps = 0` or supply its own source.

use rand::Rng;
use serde::Serialize;

use crate::money::Cents;

/// Max results returned by a ticker search.
pub const SEARCH_LIMIT: usize = 10;

// ─── Types ────────────────────────────────────────────────────────────────────

/// A tradable symbol in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub symbol: &'static str,
    pub name:   &'static str,
    /// Reference price in cents; live quotes wander around it.
    #[serde(skip)]
    pub reference_price: Cents,
}

/// The current price of one share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub symbol: String,
    pub name:   String,
    pub price:  Cents,
}

pub trait QuoteSource: Send + Sync {
    /// Case-insensitive lookup. `None` for unknown symbols.
    fn lookup(&self, symbol: &str) -> Option<Quote>;

    /// Listings whose symbol or name contains `query` (case-insensitive),
    /// catalog order, at most `limit` entries.
    fn search(&self, query: &str, limit: usize) -> Vec<Listing>;
}

// ─── Catalog ──────────────────────────────────────────────────────────────────

macro_rules! listing {
    ($symbol:literal, $name:literal, $price:literal) => {
        Listing { symbol: $symbol, name: $name, reference_price: $price }
    };
}

pub static CATALOG: &[Listing] = &[
    listing!("AAPL",  "Apple Inc.",                       18_950),
    listing!("ADBE",  "Adobe Inc.",                       52_310),
    listing!("AMD",   "Advanced Micro Devices, Inc.",     16_240),
    listing!("AMZN",  "Amazon.com, Inc.",                 17_880),
    listing!("BA",    "The Boeing Company",               20_415),
    listing!("BAC",   "Bank of America Corporation",       3_572),
    listing!("CSCO",  "Cisco Systems, Inc.",               4_963),
    listing!("DIS",   "The Walt Disney Company",          11_208),
    listing!("F",     "Ford Motor Company",                1_237),
    listing!("GOOGL", "Alphabet Inc.",                    15_372),
    listing!("IBM",   "International Business Machines",  18_904),
    listing!("INTC",  "Intel Corporation",                 3_081),
    listing!("JNJ",   "Johnson & Johnson",                15_640),
    listing!("JPM",   "JPMorgan Chase & Co.",             19_875),
    listing!("KO",    "The Coca-Cola Company",             6_254),
    listing!("MA",    "Mastercard Incorporated",          46_120),
    listing!("MCD",   "McDonald's Corporation",           27_093),
    listing!("META",  "Meta Platforms, Inc.",             49_836),
    listing!("MSFT",  "Microsoft Corporation",            41_566),
    listing!("NFLX",  "Netflix, Inc.",                    62_904),
    listing!("NKE",   "NIKE, Inc.",                        9_418),
    listing!("NVDA",  "NVIDIA Corporation",               12_105),
    listing!("ORCL",  "Oracle Corporation",               13_877),
    listing!("PEP",   "PepsiCo, Inc.",                    16_952),
    listing!("PFE",   "Pfizer Inc.",                       2_893),
    listing!("PG",    "The Procter & Gamble Company",     16_510),
    listing!("SBUX",  "Starbucks Corporation",             7_724),
    listing!("T",     "AT&T Inc.",                         1_708),
    listing!("TSLA",  "Tesla, Inc.",                      18_214),
    listing!("V",     "Visa Inc.",                        27_433),
    listing!("WMT",   "Walmart Inc.",                      6_879),
    listing!("XOM",   "Exxon Mobil Corporation",          11_795),
];

// ─── SimulatedMarket ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SimulatedMarket {
    listings:       &'static [Listing],
    volatility_bps: u32,
}

impl SimulatedMarket {
    pub fn new(volatility_bps: u32) -> Self {
        Self::with_listings(CATALOG, volatility_bps)
    }

    pub fn with_listings(listings: &'static [Listing], volatility_bps: u32) -> Self {
        Self { listings, volatility_bps }
    }

    fn find(&self, symbol: &str) -> Option<&Listing> {
        let symbol = symbol.trim();
        self.listings
            .iter()
            .find(|l| l.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Reference price moved by a uniform random step in `[-bps, +bps]`.
    /// Never drops below one cent.
    fn jitter(&self, reference: Cents) -> Cents {
        if self.volatility_bps == 0 {
            return reference;
        }
        let bound = i64::from(self.volatility_bps);
        let step = rand::thread_rng().gen_range(-bound..=bound);
        (reference + reference * step / 10_000).max(1)
    }
}

impl QuoteSource for SimulatedMarket {
    fn lookup(&self, symbol: &str) -> Option<Quote> {
        let listing = self.find(symbol)?;
        Some(Quote {
            symbol: listing.symbol.to_string(),
            name:   listing.name.to_string(),
            price:  self.jitter(listing.reference_price),
        })
    }

    fn search(&self, query: &str, limit: usize) -> Vec<Listing> {
        let needle = query.trim().to_lowercase();
        self.listings
            .iter()
            .filter(|l| {
                l.symbol.to_lowercase().contains(&needle)
                    || l.name.to_lowercase().contains(&needle)
            })
            .take(limit)
            .cloned()
            .collect()
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
