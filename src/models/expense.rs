use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::Period;

#[derive(Debug, Clone)]
pub struct Expense {
    pub id: Option<i64>,
    pub user_id: i64,
    pub category: String,
    pub amount: Decimal,
    pub note: String,
    /// Day the money was spent, stored as "YYYY-MM-DD"
    pub date: NaiveDate,
    pub created_at: String,
}

impl Expense {
    pub fn new(user_id: i64, category: String, amount: Decimal, date: NaiveDate) -> Self {
        Self {
            id: None,
            user_id,
            category,
            amount,
            note: String::new(),
            date,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.note = note;
        self
    }

    pub fn period(&self) -> Period {
        Period::of_date(self.date)
    }
}
