use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::Path;
use tracing::info;

use crate::cli::{Command, ScopeArgs};
use crate::db::{Database, SchemaState};
use crate::error::LedgerError;
use crate::models::*;

/// Run one command against the database at `db_path`.
pub(crate) fn command(cmd: Command, db_path: &Path) -> Result<()> {
    match cmd {
        Command::Init => init(db_path),
        Command::AddUser { name, email } => add_user(&Database::open(db_path)?, name, email),
        Command::SetBudget {
            scope,
            category,
            amount,
        } => set_budget(&mut Database::open(db_path)?, scope, category, amount),
        Command::AddExpense {
            user,
            category,
            amount,
            note,
            date,
        } => add_expense(&mut Database::open(db_path)?, user, category, amount, note, date),
        Command::ReportTotal { scope, category } => {
            report_total(&Database::open(db_path)?, scope, category.as_deref())
        }
        Command::ReportByCategory { scope } => {
            report_by_category(&Database::open(db_path)?, scope)
        }
    }
}

fn init(db_path: &Path) -> Result<()> {
    let (db, state) = Database::create(db_path)?;
    match state {
        SchemaState::Created => println!("Initialized database {}", db.path().display()),
        SchemaState::Upgraded { from } => println!(
            "Upgraded database {} from schema version {from}",
            db.path().display()
        ),
        SchemaState::Current => println!("Database {} already initialized", db.path().display()),
    }
    let counts = db.table_counts()?;
    let tables: Vec<String> = counts
        .iter()
        .map(|(table, rows)| format!("{table} ({rows} rows)"))
        .collect();
    println!("  Tables: {}", tables.join(", "));
    Ok(())
}

fn add_user(db: &Database, name: String, email: String) -> Result<()> {
    let user = User::new(name, email);
    let id = db.insert_user(&user)?;
    info!(id, "registered user");
    println!("Created user id={id}: {user}");
    Ok(())
}

fn set_budget(
    db: &mut Database,
    scope: ScopeArgs,
    category: String,
    amount: Decimal,
) -> Result<()> {
    let budget = Budget::new(scope.user, category, scope.period(), amount);
    let write = db.upsert_budget(&budget)?;
    let verb = match write {
        BudgetWrite::Inserted(_) => "Set",
        BudgetWrite::Updated(_) => "Updated",
    };
    println!(
        "{verb} budget id={} for user {}: {} {} = {:.2}",
        write.id(),
        budget.user_id,
        budget.category,
        budget.period,
        budget.amount,
    );
    Ok(())
}

fn add_expense(
    db: &mut Database,
    user: i64,
    category: String,
    amount: Decimal,
    note: Option<String>,
    date: Option<NaiveDate>,
) -> Result<()> {
    let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let expense = Expense::new(user, category, amount, date).with_note(note.unwrap_or_default());
    let id = db.insert_expense(&expense)?;
    info!(id, period = %expense.period(), "recorded expense");
    println!(
        "Added expense id={id}: user={} category={} amount={:.2} date={}",
        expense.user_id, expense.category, expense.amount, expense.date,
    );
    Ok(())
}

fn report_total(db: &Database, scope: ScopeArgs, category: Option<&str>) -> Result<()> {
    let user = db
        .get_user_by_id(scope.user)?
        .ok_or(LedgerError::UnknownUser(scope.user))?;
    let report = db.get_total_report(scope.user, scope.period(), category)?;

    let label = match &report.category {
        Some(c) => format!("{c} spending"),
        None => "Total spending".to_string(),
    };
    println!(
        "{label} for user {} ({}) in {}: {:.2}",
        report.user_id, user.name, report.period, report.spent
    );
    match (report.budget, report.remaining()) {
        (Some(budget), Some(remaining)) if remaining < Decimal::ZERO => {
            println!("  Budget: {budget:.2} (over by {:.2})", remaining.abs())
        }
        (Some(budget), Some(remaining)) => {
            println!("  Budget: {budget:.2} (remaining {remaining:.2})")
        }
        _ => println!("  No budget set for this period"),
    }
    Ok(())
}

fn report_by_category(db: &Database, scope: ScopeArgs) -> Result<()> {
    let user = db
        .get_user_by_id(scope.user)?
        .ok_or(LedgerError::UnknownUser(scope.user))?;
    let period = scope.period();
    let lines = db.get_category_report(scope.user, period)?;

    println!(
        "Spending by category for user {} ({}) in {period}:",
        scope.user, user.name
    );
    if lines.is_empty() {
        println!("  No spending or budgets");
        return Ok(());
    }
    for line in &lines {
        match line.budget {
            Some(budget) => println!(
                "  {:<20} spent {:>10.2}  budget {:>10.2}",
                line.category, line.spent, budget
            ),
            None => println!("  {:<20} spent {:>10.2}", line.category, line.spent),
        }
    }
    let total = checked_sum(lines.iter().map(|l| l.spent))?;
    println!("  {:<20} spent {:>10.2}", "Total", total);
    Ok(())
}
