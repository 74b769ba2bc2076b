mod amount;
mod budget;
mod expense;
mod period;
mod report;
mod user;

pub use amount::{checked_sum, parse_amount, stored_amount};
pub use budget::{Budget, BudgetWrite};
pub use expense::Expense;
pub use period::Period;
pub use report::{CategoryLine, TotalReport};
pub use user::User;

#[cfg(test)]
mod tests;
