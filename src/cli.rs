use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::error::LedgerError;
use crate::models::{parse_amount, Period};

#[derive(Parser, Debug)]
#[command(
    name = "expense",
    version,
    about = "Local-only expense and budget tracker",
    long_about = "Record users, monthly per-category budgets and individual expenses \
                  in a local SQLite file, and report spending against budget."
)]
pub(crate) struct Cli {
    /// Path to the database file
    #[arg(long, global = true, env = "EXPENSE_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Create the database and its tables (safe to run again)
    Init,

    /// Register a user
    AddUser {
        #[arg(long, value_parser = non_empty_name)]
        name: String,
        #[arg(long, value_parser = non_empty_email)]
        email: String,
    },

    /// Set (or replace) a user's budget for one category and month
    SetBudget {
        #[command(flatten)]
        scope: ScopeArgs,
        #[arg(long, value_parser = non_empty_category)]
        category: String,
        #[arg(long, value_parser = parse_amount)]
        amount: Decimal,
    },

    /// Record an expense
    AddExpense {
        #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
        user: i64,
        #[arg(long, value_parser = non_empty_category)]
        category: String,
        #[arg(long, value_parser = parse_amount)]
        amount: Decimal,
        #[arg(long)]
        note: Option<String>,
        /// Day of the expense, YYYY-MM-DD (default: today)
        #[arg(long, value_parser = date_arg)]
        date: Option<NaiveDate>,
    },

    /// Total spending for a month, compared with budget
    ReportTotal {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Only count this category
        #[arg(long, value_parser = non_empty_category)]
        category: Option<String>,
    },

    /// Spending and budget per category for a month
    ReportByCategory {
        #[command(flatten)]
        scope: ScopeArgs,
    },
}

/// `--user`, `--year` and `--month`, shared by budget and report commands.
#[derive(clap::Args, Debug, Clone, Copy)]
pub(crate) struct ScopeArgs {
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
    pub user: i64,
    #[arg(long, value_parser = clap::value_parser!(i32).range(1..=9999))]
    pub year: i32,
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: u32,
}

impl ScopeArgs {
    pub fn period(&self) -> Period {
        Period::new(self.year, self.month)
    }
}

fn date_arg(s: &str) -> Result<NaiveDate, LedgerError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| LedgerError::InvalidDate(s.to_string()))
}

fn non_empty(s: &str, what: &'static str) -> Result<String, LedgerError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        Err(LedgerError::Empty(what))
    } else {
        Ok(trimmed.to_string())
    }
}

fn non_empty_name(s: &str) -> Result<String, LedgerError> {
    non_empty(s, "name")
}

fn non_empty_email(s: &str) -> Result<String, LedgerError> {
    non_empty(s, "email")
}

fn non_empty_category(s: &str) -> Result<String, LedgerError> {
    non_empty(s, "category")
}

#[cfg(test)]
mod tests;
