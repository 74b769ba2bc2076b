#![allow(clippy::unwrap_used)]

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use rust_decimal_macros::dec;

use super::*;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("expense").chain(args.iter().copied()))
}

#[test]
fn test_command_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_init_with_db() {
    let cli = parse(&["--db", "/tmp/x.db", "init"]).unwrap();
    assert!(matches!(cli.command, Command::Init));
    assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
}

#[test]
fn test_db_flag_is_global() {
    let cli = parse(&["init", "--db", "books.db"]).unwrap();
    assert_eq!(cli.db, Some(PathBuf::from("books.db")));
}

#[test]
fn test_parse_add_user() {
    let cli = parse(&["add-user", "--name", "Ishan", "--email", "ishan@example.com"]).unwrap();
    match cli.command {
        Command::AddUser { name, email } => {
            assert_eq!(name, "Ishan");
            assert_eq!(email, "ishan@example.com");
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_add_user_requires_email() {
    let err = parse(&["add-user", "--name", "Ishan"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
}

#[test]
fn test_add_user_rejects_blank_name() {
    let err = parse(&["add-user", "--name", "  ", "--email", "a@x.com"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueValidation);
}

#[test]
fn test_parse_set_budget() {
    let cli = parse(&[
        "set-budget",
        "--user",
        "1",
        "--category",
        "Food",
        "--year",
        "2025",
        "--month",
        "12",
        "--amount",
        "200",
    ])
    .unwrap();
    match cli.command {
        Command::SetBudget {
            scope,
            category,
            amount,
        } => {
            assert_eq!(scope.user, 1);
            assert_eq!(scope.period(), Period::new(2025, 12));
            assert_eq!(category, "Food");
            assert_eq!(amount, dec!(200));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_month_out_of_range() {
    for month in ["0", "13"] {
        let err = parse(&[
            "report-total",
            "--user",
            "1",
            "--year",
            "2025",
            "--month",
            month,
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation, "month {month}");
    }
}

#[test]
fn test_user_must_be_integer() {
    let err = parse(&[
        "report-total",
        "--user",
        "one",
        "--year",
        "2025",
        "--month",
        "1",
    ])
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueValidation);
}

#[test]
fn test_parse_add_expense_defaults() {
    let cli = parse(&[
        "add-expense",
        "--user",
        "1",
        "--category",
        "Food",
        "--amount",
        "190",
    ])
    .unwrap();
    match cli.command {
        Command::AddExpense {
            note, date, amount, ..
        } => {
            assert!(note.is_none());
            assert!(date.is_none());
            assert_eq!(amount, dec!(190));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_add_expense_with_note_and_date() {
    let cli = parse(&[
        "add-expense",
        "--user",
        "1",
        "--category",
        "Food",
        "--amount",
        "19.99",
        "--note",
        "dinner",
        "--date",
        "2025-12-24",
    ])
    .unwrap();
    match cli.command {
        Command::AddExpense { note, date, .. } => {
            assert_eq!(note.as_deref(), Some("dinner"));
            assert_eq!(date, NaiveDate::from_ymd_opt(2025, 12, 24));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_add_expense_rejects_negative_amount() {
    let err = parse(&[
        "add-expense",
        "--user",
        "1",
        "--category",
        "Food",
        "--amount=-5",
    ])
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueValidation);
    assert!(err.to_string().contains("must not be negative"));
}

#[test]
fn test_add_expense_rejects_bad_date() {
    let err = parse(&[
        "add-expense",
        "--user",
        "1",
        "--category",
        "Food",
        "--amount",
        "5",
        "--date",
        "2025-02-30",
    ])
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueValidation);
}

#[test]
fn test_report_total_category_is_optional() {
    let cli = parse(&[
        "report-total",
        "--user",
        "1",
        "--year",
        "2025",
        "--month",
        "12",
        "--category",
        "Food",
    ])
    .unwrap();
    match cli.command {
        Command::ReportTotal { category, .. } => assert_eq!(category.as_deref(), Some("Food")),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_unknown_subcommand() {
    let err = parse(&["delete-user"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
}
