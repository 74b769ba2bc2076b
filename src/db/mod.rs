mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, ErrorCode};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::LedgerError;
use crate::models::*;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) struct Database {
    conn: Connection,
    path: PathBuf,
}

/// What `Database::migrate` found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SchemaState {
    Created,
    Upgraded { from: i32 },
    Current,
}

impl Database {
    /// Open the database at `path`, creating the file and schema if needed.
    pub(crate) fn create(path: &Path) -> Result<(Self, SchemaState)> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
        }
        let mut db = Self::connect(path)?;
        let state = db.migrate().context("Database migration failed")?;
        Ok((db, state))
    }

    /// Open an existing database. Fails unless `create` has run against it before.
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let not_initialized = || LedgerError::NotInitialized {
            path: path.to_path_buf(),
        };
        if !path.exists() {
            return Err(not_initialized().into());
        }
        let db = Self::connect(path)?;
        if db.schema_version()?.is_none() {
            return Err(not_initialized().into());
        }
        Ok(db)
    }

    fn connect(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        debug!(path = %path.display(), "opened database");
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self {
            conn,
            path: PathBuf::from(":memory:"),
        };
        db.migrate()?;
        Ok(db)
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn schema_version(&self) -> Result<Option<i32>> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;
        if !has_version_table {
            return Ok(None);
        }

        let result = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            });
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(Some(0)),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn migrate(&mut self) -> Result<SchemaState> {
        let Some(current) = self.schema_version()? else {
            let tx = self.conn.transaction()?;
            tx.execute_batch(schema::SCHEMA_V1)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tx.commit()?;
            info!(version = schema::CURRENT_VERSION, "created schema");
            return Ok(SchemaState::Created);
        };

        if current >= schema::CURRENT_VERSION {
            debug!(version = current, "schema is current");
            return Ok(SchemaState::Current);
        }

        let tx = self.conn.transaction()?;
        // DDL is all IF NOT EXISTS; this fills in whatever an older version lacks.
        tx.execute_batch(schema::SCHEMA_V1)?;
        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                tx.execute_batch(sql)?;
            }
        }
        tx.execute("DELETE FROM schema_version", [])?;
        tx.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![schema::CURRENT_VERSION],
        )?;
        tx.commit()?;
        info!(from = current, to = schema::CURRENT_VERSION, "upgraded schema");
        Ok(SchemaState::Upgraded { from: current })
    }

    /// Row counts for every data table, in schema order.
    pub(crate) fn table_counts(&self) -> Result<Vec<(&'static str, i64)>> {
        schema::TABLES
            .iter()
            .map(|&table| -> Result<(&'static str, i64)> {
                let count: i64 =
                    self.conn
                        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                            row.get(0)
                        })?;
                Ok((table, count))
            })
            .collect()
    }

    // ── Users ─────────────────────────────────────────────────

    pub(crate) fn insert_user(&self, user: &User) -> Result<i64> {
        let result = self.conn.execute(
            "INSERT INTO users (name, email, created_at) VALUES (?1, ?2, ?3)",
            params![user.name, user.email, user.created_at],
        );
        match result {
            Ok(_) => {
                let id = self.conn.last_insert_rowid();
                debug!(id, email = %user.email, "inserted user");
                Ok(id)
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(LedgerError::DuplicateEmail(user.email.clone()).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let result = self.conn.query_row(
            "SELECT id, name, email, created_at FROM users WHERE id = ?1",
            params![id],
            |row| {
                Ok(User {
                    id: Some(row.get(0)?),
                    name: row.get(1)?,
                    email: row.get(2)?,
                    created_at: row.get(3)?,
                })
            },
        );
        match result {
            Ok(u) => Ok(Some(u)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Fails with `LedgerError::UnknownUser` when no user has this id.
    pub(crate) fn require_user(&self, id: i64) -> Result<()> {
        ensure_user(&self.conn, id)
    }

    // ── Budgets ───────────────────────────────────────────────

    /// Write the budget for its scope, replacing the amount if one is already set.
    pub(crate) fn upsert_budget(&mut self, budget: &Budget) -> Result<BudgetWrite> {
        let tx = self.conn.transaction()?;
        ensure_user(&tx, budget.user_id)?;

        let existing = tx.query_row(
            "SELECT id FROM budgets WHERE user_id = ?1 AND category = ?2 AND year = ?3 AND month = ?4",
            params![
                budget.user_id,
                budget.category,
                budget.period.year,
                budget.period.month,
            ],
            |row| row.get::<_, i64>(0),
        );
        let write = match existing {
            Ok(id) => {
                tx.execute(
                    "UPDATE budgets SET amount = ?1 WHERE id = ?2",
                    params![budget.amount.to_string(), id],
                )?;
                BudgetWrite::Updated(id)
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                tx.execute(
                    "INSERT INTO budgets (user_id, category, year, month, amount)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        budget.user_id,
                        budget.category,
                        budget.period.year,
                        budget.period.month,
                        budget.amount.to_string(),
                    ],
                )?;
                BudgetWrite::Inserted(tx.last_insert_rowid())
            }
            Err(e) => return Err(e.into()),
        };
        tx.commit()?;
        debug!(?write, category = %budget.category, period = %budget.period, "wrote budget");
        Ok(write)
    }

    pub(crate) fn get_budgets(&self, user_id: i64, period: Period) -> Result<Vec<Budget>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, category, year, month, amount FROM budgets
             WHERE user_id = ?1 AND year = ?2 AND month = ?3
             ORDER BY category",
        )?;
        let rows = stmt.query_map(params![user_id, period.year, period.month], |row| {
            let amt_str: String = row.get(5)?;
            Ok(Budget {
                id: Some(row.get(0)?),
                user_id: row.get(1)?,
                category: row.get(2)?,
                period: Period::new(row.get(3)?, row.get(4)?),
                amount: stored_amount(&amt_str),
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Expenses ──────────────────────────────────────────────

    pub(crate) fn insert_expense(&mut self, expense: &Expense) -> Result<i64> {
        let tx = self.conn.transaction()?;
        ensure_user(&tx, expense.user_id)?;
        tx.execute(
            "INSERT INTO expenses (user_id, category, amount, note, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                expense.user_id,
                expense.category,
                expense.amount.to_string(),
                expense.note,
                expense.date.format(DATE_FORMAT).to_string(),
                expense.created_at,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        debug!(id, user_id = expense.user_id, amount = %expense.amount, "inserted expense");
        Ok(id)
    }

    // ── Analytics ─────────────────────────────────────────────

    /// Exact sum of a user's expenses in `period`, optionally for one category.
    pub(crate) fn get_total_spent(
        &self,
        user_id: i64,
        period: Period,
        category: Option<&str>,
    ) -> Result<Decimal> {
        let mut sql =
            String::from("SELECT amount FROM expenses WHERE user_id = ?1 AND date LIKE ?2");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = vec![
            Box::new(user_id),
            Box::new(format!("{}%", period.date_prefix())),
        ];
        if let Some(c) = category {
            sql.push_str(&format!(" AND category = ?{}", param_values.len() + 1));
            param_values.push(Box::new(c.to_string()));
        }

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let amounts = stmt
            .query_map(params_ref.as_slice(), |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(checked_sum(amounts.iter().map(|a| stored_amount(a)))?)
    }

    pub(crate) fn get_spending_by_category(
        &self,
        user_id: i64,
        period: Period,
    ) -> Result<BTreeMap<String, Decimal>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, amount FROM expenses WHERE user_id = ?1 AND date LIKE ?2",
        )?;
        let rows = stmt.query_map(
            params![user_id, format!("{}%", period.date_prefix())],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )?;

        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for row in rows {
            let (category, amount) = row?;
            let total = totals.entry(category).or_default();
            *total = total
                .checked_add(stored_amount(&amount))
                .ok_or(LedgerError::AmountOverflow)?;
        }
        Ok(totals)
    }

    /// Spending compared with the matching budget.
    ///
    /// Without a category the budget is the sum of every budget the user has
    /// for the period; `None` means no budget row matched at all.
    pub(crate) fn get_total_report(
        &self,
        user_id: i64,
        period: Period,
        category: Option<&str>,
    ) -> Result<TotalReport> {
        self.require_user(user_id)?;
        let spent = self.get_total_spent(user_id, period, category)?;
        let budgets: Vec<Budget> = self
            .get_budgets(user_id, period)?
            .into_iter()
            .filter(|b| category.map_or(true, |c| b.category == c))
            .collect();
        let budget = if budgets.is_empty() {
            None
        } else {
            Some(checked_sum(budgets.iter().map(|b| b.amount))?)
        };
        Ok(TotalReport {
            user_id,
            period,
            category: category.map(str::to_string),
            spent,
            budget,
        })
    }

    /// One line per category with spending or a budget in `period`, sorted by name.
    pub(crate) fn get_category_report(
        &self,
        user_id: i64,
        period: Period,
    ) -> Result<Vec<CategoryLine>> {
        self.require_user(user_id)?;
        let mut lines: BTreeMap<String, CategoryLine> = self
            .get_spending_by_category(user_id, period)?
            .into_iter()
            .map(|(category, spent)| {
                let line = CategoryLine {
                    category: category.clone(),
                    spent,
                    budget: None,
                };
                (category, line)
            })
            .collect();

        for budget in self.get_budgets(user_id, period)? {
            lines
                .entry(budget.category.clone())
                .or_insert_with(|| CategoryLine {
                    category: budget.category.clone(),
                    spent: Decimal::ZERO,
                    budget: None,
                })
                .budget = Some(budget.amount);
        }

        Ok(lines.into_values().collect())
    }
}

fn ensure_user(conn: &Connection, id: i64) -> Result<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
        params![id],
        |row| row.get(0),
    )?;
    if exists {
        Ok(())
    } else {
        Err(LedgerError::UnknownUser(id).into())
    }
}
