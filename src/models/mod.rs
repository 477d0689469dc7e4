//! Domain models: the three persisted entities.

pub mod portfolio;
pub mod transaction;
pub mod user;

pub use portfolio::Holding;
pub use transaction::{LedgerEntry, OrderType};
pub use user::User;
