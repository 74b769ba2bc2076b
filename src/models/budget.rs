use rust_decimal::Decimal;

use super::Period;

#[derive(Debug, Clone)]
pub struct Budget {
    pub id: Option<i64>,
    pub user_id: i64,
    pub category: String,
    pub period: Period,
    pub amount: Decimal,
}

impl Budget {
    pub fn new(user_id: i64, category: String, period: Period, amount: Decimal) -> Self {
        Self {
            id: None,
            user_id,
            category,
            period,
            amount,
        }
    }
}

/// Outcome of writing a budget for a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetWrite {
    Inserted(i64),
    Updated(i64),
}

impl BudgetWrite {
    pub fn id(&self) -> i64 {
        match self {
            Self::Inserted(id) | Self::Updated(id) => *id,
        }
    }
}
