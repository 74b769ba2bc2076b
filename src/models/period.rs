use chrono::{Datelike, NaiveDate};

/// A calendar month, the unit budgets and reports are scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period {
    pub year: i32,
    /// 1..=12
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Prefix shared by every `YYYY-MM-DD` date inside this period.
    pub fn date_prefix(&self) -> String {
        format!("{:04}-{:02}-", self.year, self.month)
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
