//! Domain errors for the expense tracker.
//!
//! Storage failures travel as `anyhow::Error`; the variants here are the
//! conditions a user can cause and is expected to fix.

use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    /// The database file is missing or has no schema yet
    #[error("database {} is not initialized; run `init` first", .path.display())]
    NotInitialized { path: PathBuf },

    /// A budget, expense or report referenced a user id with no row
    #[error("user {0} does not exist")]
    UnknownUser(i64),

    #[error("a user with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("amount must not be negative (got {0})")]
    NegativeAmount(Decimal),

    #[error("'{0}' is not a valid amount")]
    InvalidAmount(String),

    #[error("'{0}' is not a valid date, expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A total ran past the largest value `Decimal` can hold
    #[error("total exceeds the largest supported amount")]
    AmountOverflow,

    /// A required text value was blank
    #[error("{0} must not be empty")]
    Empty(&'static str),
}
