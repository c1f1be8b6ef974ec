use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Month};

use budget_tracker::{
    CategoryName, Email, MonthlyBudget, NewCategory, NewTransaction, NewUser, PasswordHash,
    TransactionKind, ValidatedPassword, create_category, create_transaction, create_user,
    initialize_db,
};

/// A utility for creating a test database for the REST API server of budget_tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
///
/// The database holds one user, `test@example.com` with the password
/// `test`, a few categories and a month of transactions.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    if output_path.extension().is_none_or(|extension| extension.is_empty()) {
        eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
        exit(1);
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let connection = Connection::open(output_path)?;

    initialize_db(&connection)?;

    println!("Creating test user...");
    let user = create_user(
        NewUser {
            name: "Test User".to_owned(),
            email: Email::new("test@example.com")?,
            password_hash: PasswordHash::new(
                ValidatedPassword::new_unchecked("test"),
                PasswordHash::DEFAULT_COST,
            )?,
        },
        &connection,
    )?;

    println!("Creating categories...");
    let categories = [
        ("Salary", TransactionKind::Income, 0.0),
        ("Food", TransactionKind::Expense, 400.0),
        ("Rent", TransactionKind::Expense, 1200.0),
    ];
    for (name, kind, budget) in categories {
        create_category(
            user.id,
            NewCategory {
                name: CategoryName::new(name)?,
                kind,
                monthly_budget: MonthlyBudget::new(budget)?,
            },
            &connection,
        )?;
    }

    println!("Creating transactions...");
    let transactions = [
        (TransactionKind::Income, "March pay", 3200.0, "Salary", 1),
        (TransactionKind::Expense, "Rent", 1200.0, "Rent", 2),
        (TransactionKind::Expense, "Groceries", 84.3, "Food", 5),
        (TransactionKind::Expense, "Lunch", 20.0, "Food", 12),
        (TransactionKind::Expense, "Groceries", 96.75, "Food", 19),
    ];
    for (kind, title, amount, category, day) in transactions {
        create_transaction(
            kind,
            user.id,
            NewTransaction {
                title: title.to_owned(),
                amount,
                description: format!("{title} ({category})"),
                date: Date::from_calendar_date(2024, Month::March, day)?,
                category: category.to_owned(),
            },
            &connection,
        )?;
    }

    println!("Success!");

    Ok(())
}
