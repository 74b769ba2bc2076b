#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::error::LedgerError;

// ── Amounts ───────────────────────────────────────────────────

#[test]
fn test_parse_amount_plain() {
    assert_eq!(parse_amount("190").unwrap(), dec!(190));
    assert_eq!(parse_amount("12.50").unwrap(), dec!(12.5));
    assert_eq!(parse_amount(" 7.25 ").unwrap(), dec!(7.25));
}

#[test]
fn test_parse_amount_currency_formatting() {
    assert_eq!(parse_amount("$1,234.56").unwrap(), dec!(1234.56));
}

#[test]
fn test_parse_amount_zero_allowed() {
    assert_eq!(parse_amount("0").unwrap(), Decimal::ZERO);
    assert_eq!(parse_amount("-0").unwrap(), Decimal::ZERO);
}

#[test]
fn test_parse_amount_rejects_negative() {
    let err = parse_amount("-5").unwrap_err();
    assert!(matches!(err, LedgerError::NegativeAmount(a) if a == dec!(-5)));
}

#[test]
fn test_parse_amount_rejects_garbage() {
    assert!(matches!(
        parse_amount("ten"),
        Err(LedgerError::InvalidAmount(s)) if s == "ten"
    ));
    assert!(parse_amount("").is_err());
}

#[test]
fn test_checked_sum_is_exact() {
    let total = checked_sum([dec!(0.1), dec!(0.2)]).unwrap();
    assert_eq!(total, dec!(0.3));
}

#[test]
fn test_checked_sum_empty_is_zero() {
    assert_eq!(checked_sum(std::iter::empty()).unwrap(), Decimal::ZERO);
}

#[test]
fn test_checked_sum_overflow_is_an_error() {
    let err = checked_sum([Decimal::MAX, dec!(1)]).unwrap_err();
    assert!(matches!(err, LedgerError::AmountOverflow));
}

#[test]
fn test_stored_amount_parses_or_zero() {
    assert_eq!(stored_amount("19.99"), dec!(19.99));
    assert_eq!(stored_amount("garbage"), Decimal::ZERO);
}

// ── Period ────────────────────────────────────────────────────

#[test]
fn test_period_display_pads() {
    assert_eq!(Period::new(2025, 3).to_string(), "2025-03");
    assert_eq!(Period::new(2025, 12).to_string(), "2025-12");
}

#[test]
fn test_period_date_prefix() {
    assert_eq!(Period::new(2025, 1).date_prefix(), "2025-01-");
}

#[test]
fn test_period_of_date() {
    let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    assert_eq!(Period::of_date(date), Period::new(2024, 2));
}

// ── User ──────────────────────────────────────────────────────

#[test]
fn test_user_new() {
    let user = User::new("Ishan".into(), "ishan@example.com".into());
    assert!(user.id.is_none());
    assert!(!user.created_at.is_empty());
    assert_eq!(format!("{user}"), "Ishan <ishan@example.com>");
}

// ── Budget ────────────────────────────────────────────────────

#[test]
fn test_budget_new() {
    let budget = Budget::new(1, "Food".into(), Period::new(2025, 12), dec!(200));
    assert!(budget.id.is_none());
    assert_eq!(budget.period.to_string(), "2025-12");
    assert_eq!(budget.amount, dec!(200));
}

#[test]
fn test_budget_write_id() {
    assert_eq!(BudgetWrite::Inserted(3).id(), 3);
    assert_eq!(BudgetWrite::Updated(4).id(), 4);
}

// ── Expense ───────────────────────────────────────────────────

#[test]
fn test_expense_new_has_empty_note() {
    let date = NaiveDate::from_ymd_opt(2025, 12, 24).unwrap();
    let expense = Expense::new(1, "Food".into(), dec!(19), date);
    assert!(expense.note.is_empty());
    assert_eq!(expense.period(), Period::new(2025, 12));

    let expense = expense.with_note("dinner".into());
    assert_eq!(expense.note, "dinner");
}

// ── Reports ───────────────────────────────────────────────────

#[test]
fn test_total_report_remaining() {
    let mut report = TotalReport {
        user_id: 1,
        period: Period::new(2025, 12),
        category: None,
        spent: dec!(190),
        budget: Some(dec!(200)),
    };
    assert_eq!(report.remaining(), Some(dec!(10)));

    report.spent = dec!(250);
    assert_eq!(report.remaining(), Some(dec!(-50)));

    report.budget = None;
    assert_eq!(report.remaining(), None);
}
