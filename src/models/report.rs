use rust_decimal::Decimal;

use super::Period;

/// Spending for one user over one period, next to what was budgeted for it.
#[derive(Debug, Clone)]
pub struct TotalReport {
    pub user_id: i64,
    pub period: Period,
    pub category: Option<String>,
    pub spent: Decimal,
    /// None when no budget row matches the scope
    pub budget: Option<Decimal>,
}

impl TotalReport {
    /// Budget left over; negative when overspent.
    pub fn remaining(&self) -> Option<Decimal> {
        self.budget.map(|b| b - self.spent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLine {
    pub category: String,
    pub spent: Decimal,
    pub budget: Option<Decimal>,
}
