//! Keeps the income and expense tables consistent with the category list.
//!
//! Transactions refer to their category by name and the database does not
//! enforce that reference. Every write that could break it goes through this
//! module instead of the stores directly:
//! - new transactions must name an existing category of the same kind,
//! - renaming a category renames it on every transaction that uses it,
//! - a category that is still in use cannot be deleted.
//!
//! Callers hold the database lock for the whole call, and the multi-row
//! operations run inside one SQLite transaction, so they are atomic and
//! serialized against each other.

use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error,
    auth::UserID,
    category::{self, Category, NewCategory},
    database_id::CategoryId,
    transaction::{self, NewTransaction, Transaction, TransactionKind},
};

/// Create a category for `owner`.
///
/// # Errors
///
/// Returns [Error::DuplicateCategoryName] if `owner` already has a category
/// with the same name.
pub fn create_category(
    owner: UserID,
    new_category: NewCategory,
    connection: &Connection,
) -> Result<Category, Error> {
    if category::get_category_by_name(owner, new_category.name.as_ref(), connection)?.is_some() {
        return Err(Error::DuplicateCategoryName(new_category.name.to_string()));
    }

    category::create_category(owner, new_category, OffsetDateTime::now_utc(), connection)
}

/// Overwrite the fields of one of `owner`'s categories.
///
/// If the name changes, every income and expense of `owner` filed under the
/// old name is moved to the new name. Either all of these writes happen or
/// none do.
///
/// # Errors
///
/// Returns [Error::CategoryNotFound] if the category does not exist or
/// belongs to another user, [Error::DuplicateCategoryName] if another of
/// `owner`'s categories already has the new name, or [Error::SqlError] if any
/// write fails, in which case nothing is changed.
pub fn update_category(
    owner: UserID,
    category_id: CategoryId,
    changes: NewCategory,
    connection: &mut Connection,
) -> Result<Category, Error> {
    let db_transaction = connection.transaction()?;

    let current = category::get_category(owner, category_id, &db_transaction)?;

    let name_owner = category::get_category_by_name(owner, changes.name.as_ref(), &db_transaction)?;
    if name_owner.is_some_and(|existing| existing.id != category_id) {
        return Err(Error::DuplicateCategoryName(changes.name.to_string()));
    }

    let updated = category::update_category(owner, category_id, &changes, &db_transaction)?;

    if current.name != updated.name {
        let old_name = current.name.as_ref();
        let new_name = updated.name.as_ref();
        let incomes_renamed = transaction::rename_category(
            TransactionKind::Income,
            owner,
            old_name,
            new_name,
            &db_transaction,
        )?;
        let expenses_renamed = transaction::rename_category(
            TransactionKind::Expense,
            owner,
            old_name,
            new_name,
            &db_transaction,
        )?;

        tracing::info!(
            "renamed category \"{old_name}\" to \"{new_name}\" for user {owner}: \
            updated {incomes_renamed} incomes and {expenses_renamed} expenses"
        );
    }

    db_transaction.commit()?;

    Ok(updated)
}

/// Delete one of `owner`'s categories if no income or expense refers to it.
///
/// # Errors
///
/// Returns [Error::CategoryNotFound] if the category does not exist or
/// belongs to another user, or [Error::CategoryHasTransactions] if it is
/// still in use.
pub fn delete_category(
    owner: UserID,
    category_id: CategoryId,
    connection: &mut Connection,
) -> Result<(), Error> {
    let db_transaction = connection.transaction()?;

    let category = category::get_category(owner, category_id, &db_transaction)?;

    let mut reference_count = 0;
    for kind in TransactionKind::ALL {
        reference_count += transaction::count_transactions_in_category(
            kind,
            owner,
            category.name.as_ref(),
            &db_transaction,
        )?;
    }

    if reference_count > 0 {
        tracing::debug!(
            "refusing to delete category {category_id}: {reference_count} transactions refer to it"
        );
        return Err(Error::CategoryHasTransactions);
    }

    category::delete_category(owner, category_id, &db_transaction)?;
    db_transaction.commit()?;

    Ok(())
}

/// Store an income or expense for `owner`.
///
/// # Errors
///
/// Returns [Error::Validation] if `owner` has no category of type `kind`
/// with the name given in `new_transaction`.
pub fn create_transaction(
    kind: TransactionKind,
    owner: UserID,
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    match category::get_category_by_name(owner, &new_transaction.category, connection)? {
        Some(category) if category.kind == kind => {}
        _ => {
            return Err(Error::Validation(format!(
                "No {} category named \"{}\"",
                kind.as_str(),
                new_transaction.category
            )));
        }
    }

    transaction::create_transaction(
        kind,
        owner,
        new_transaction,
        OffsetDateTime::now_utc(),
        connection,
    )
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        Error,
        auth::UserID,
        category::{CategoryName, MonthlyBudget, NewCategory, get_categories, get_category},
        db::initialize,
        transaction::{
            NewTransaction, TransactionKind, count_transactions_in_category, get_transactions,
        },
    };

    use super::{create_category, create_transaction, delete_category, update_category};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn new_category(name: &str, kind: TransactionKind) -> NewCategory {
        NewCategory {
            name: CategoryName::new(name).unwrap(),
            kind,
            monthly_budget: MonthlyBudget::new(100.0).unwrap(),
        }
    }

    fn new_transaction(category: &str, amount: f64, date: Date) -> NewTransaction {
        NewTransaction {
            title: "Test".to_owned(),
            amount,
            description: "A test transaction".to_owned(),
            date,
            category: category.to_owned(),
        }
    }

    #[test]
    fn create_category_rejects_duplicate_name() {
        let connection = get_test_connection();
        let owner = UserID::new(1);
        create_category(owner, new_category("Food", TransactionKind::Expense), &connection)
            .unwrap();

        let result = create_category(owner, new_category("Food", TransactionKind::Income), &connection);

        assert_eq!(result, Err(Error::DuplicateCategoryName("Food".to_owned())));
    }

    #[test]
    fn create_transaction_requires_existing_category() {
        let connection = get_test_connection();
        let owner = UserID::new(1);

        let result = create_transaction(
            TransactionKind::Expense,
            owner,
            new_transaction("Food", 20.0, date!(2024 - 03 - 05)),
            &connection,
        );

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn create_transaction_requires_matching_category_type() {
        let connection = get_test_connection();
        let owner = UserID::new(1);
        create_category(owner, new_category("Salary", TransactionKind::Income), &connection)
            .unwrap();

        let result = create_transaction(
            TransactionKind::Expense,
            owner,
            new_transaction("Salary", 20.0, date!(2024 - 03 - 05)),
            &connection,
        );

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn create_transaction_ignores_other_users_categories() {
        let connection = get_test_connection();
        create_category(
            UserID::new(1),
            new_category("Food", TransactionKind::Expense),
            &connection,
        )
        .unwrap();

        let result = create_transaction(
            TransactionKind::Expense,
            UserID::new(2),
            new_transaction("Food", 20.0, date!(2024 - 03 - 05)),
            &connection,
        );

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn rename_cascades_to_both_tables_for_owner_only() {
        let mut connection = get_test_connection();
        let owner = UserID::new(1);
        let other = UserID::new(2);
        let food =
            create_category(owner, new_category("Food", TransactionKind::Expense), &connection)
                .unwrap();
        create_category(other, new_category("Food", TransactionKind::Expense), &connection)
            .unwrap();
        for user in [owner, other] {
            create_transaction(
                TransactionKind::Expense,
                user,
                new_transaction("Food", 20.0, date!(2024 - 03 - 05)),
                &connection,
            )
            .unwrap();
        }
        // An income filed under an expense category's name, e.g. after a type change.
        crate::transaction::create_transaction(
            TransactionKind::Income,
            owner,
            new_transaction("Food", 5.0, date!(2024 - 03 - 06)),
            time::OffsetDateTime::now_utc(),
            &connection,
        )
        .unwrap();

        let renamed = update_category(
            owner,
            food.id,
            new_category("Groceries", TransactionKind::Expense),
            &mut connection,
        )
        .unwrap();

        assert_eq!(renamed.name.as_ref(), "Groceries");
        for kind in TransactionKind::ALL {
            assert_eq!(
                count_transactions_in_category(kind, owner, "Food", &connection),
                Ok(0)
            );
            assert_eq!(
                count_transactions_in_category(kind, owner, "Groceries", &connection),
                Ok(1)
            );
        }
        let other_expenses = get_transactions(TransactionKind::Expense, other, &connection).unwrap();
        assert_eq!(other_expenses[0].category, "Food");
    }

    #[test]
    fn update_keeping_name_changes_budget_only() {
        let mut connection = get_test_connection();
        let owner = UserID::new(1);
        let food =
            create_category(owner, new_category("Food", TransactionKind::Expense), &connection)
                .unwrap();

        let updated = update_category(
            owner,
            food.id,
            NewCategory {
                monthly_budget: MonthlyBudget::new(250.0).unwrap(),
                ..new_category("Food", TransactionKind::Expense)
            },
            &mut connection,
        )
        .unwrap();

        assert_eq!(updated.name, food.name);
        assert_eq!(updated.monthly_budget.as_f64(), 250.0);
    }

    #[test]
    fn rename_to_taken_name_changes_nothing() {
        let mut connection = get_test_connection();
        let owner = UserID::new(1);
        let food =
            create_category(owner, new_category("Food", TransactionKind::Expense), &connection)
                .unwrap();
        create_category(owner, new_category("Rent", TransactionKind::Expense), &connection)
            .unwrap();

        let result = update_category(
            owner,
            food.id,
            new_category("Rent", TransactionKind::Expense),
            &mut connection,
        );

        assert_eq!(result, Err(Error::DuplicateCategoryName("Rent".to_owned())));
        assert_eq!(get_category(owner, food.id, &connection), Ok(food));
    }

    #[test]
    fn rename_of_other_users_category_is_not_found() {
        let mut connection = get_test_connection();
        let food = create_category(
            UserID::new(1),
            new_category("Food", TransactionKind::Expense),
            &connection,
        )
        .unwrap();

        let result = update_category(
            UserID::new(2),
            food.id,
            new_category("Mine", TransactionKind::Expense),
            &mut connection,
        );

        assert_eq!(result, Err(Error::CategoryNotFound));
    }

    #[test]
    fn failed_cascade_rolls_back_rename() {
        let mut connection = get_test_connection();
        let owner = UserID::new(1);
        let food =
            create_category(owner, new_category("Food", TransactionKind::Expense), &connection)
                .unwrap();
        create_transaction(
            TransactionKind::Expense,
            owner,
            new_transaction("Food", 1.0, date!(2024 - 03 - 05)),
            &connection,
        )
        .unwrap();
        connection.execute("DROP TABLE income", ()).unwrap();

        let result = update_category(
            owner,
            food.id,
            new_category("Groceries", TransactionKind::Expense),
            &mut connection,
        );

        assert!(matches!(result, Err(Error::SqlError(_))));
        assert_eq!(get_category(owner, food.id, &connection), Ok(food));
        assert_eq!(
            count_transactions_in_category(TransactionKind::Expense, owner, "Food", &connection),
            Ok(1)
        );
    }

    #[test]
    fn delete_fails_iff_category_is_referenced() {
        let mut connection = get_test_connection();
        let owner = UserID::new(1);
        let food =
            create_category(owner, new_category("Food", TransactionKind::Expense), &connection)
                .unwrap();
        let rent =
            create_category(owner, new_category("Rent", TransactionKind::Expense), &connection)
                .unwrap();
        create_transaction(
            TransactionKind::Expense,
            owner,
            new_transaction("Food", 20.0, date!(2024 - 03 - 05)),
            &connection,
        )
        .unwrap();

        let referenced = delete_category(owner, food.id, &mut connection);
        let unreferenced = delete_category(owner, rent.id, &mut connection);

        assert_eq!(referenced, Err(Error::CategoryHasTransactions));
        assert_eq!(unreferenced, Ok(()));
        assert_eq!(get_categories(owner, &connection), Ok(vec![food]));
    }

    #[test]
    fn income_alone_blocks_delete() {
        let mut connection = get_test_connection();
        let owner = UserID::new(1);
        let salary =
            create_category(owner, new_category("Salary", TransactionKind::Income), &connection)
                .unwrap();
        create_transaction(
            TransactionKind::Income,
            owner,
            new_transaction("Salary", 2500.0, date!(2024 - 03 - 28)),
            &connection,
        )
        .unwrap();

        let result = delete_category(owner, salary.id, &mut connection);

        assert_eq!(result, Err(Error::CategoryHasTransactions));
        assert_eq!(get_categories(owner, &connection), Ok(vec![salary]));
    }

    #[test]
    fn delete_checks_both_tables_after_type_change() {
        let mut connection = get_test_connection();
        let owner = UserID::new(1);
        let bonus =
            create_category(owner, new_category("Bonus", TransactionKind::Income), &connection)
                .unwrap();
        create_transaction(
            TransactionKind::Income,
            owner,
            new_transaction("Bonus", 300.0, date!(2024 - 03 - 15)),
            &connection,
        )
        .unwrap();
        update_category(
            owner,
            bonus.id,
            new_category("Bonus", TransactionKind::Expense),
            &mut connection,
        )
        .unwrap();

        let result = delete_category(owner, bonus.id, &mut connection);

        assert_eq!(result, Err(Error::CategoryHasTransactions));
        assert_eq!(
            count_transactions_in_category(TransactionKind::Expense, owner, "Bonus", &connection),
            Ok(0)
        );
        assert_eq!(
            count_transactions_in_category(TransactionKind::Income, owner, "Bonus", &connection),
            Ok(1)
        );
    }

    #[test]
    fn delete_ignores_other_users_transactions() {
        let mut connection = get_test_connection();
        let owner = UserID::new(1);
        let other = UserID::new(2);
        let food =
            create_category(owner, new_category("Food", TransactionKind::Expense), &connection)
                .unwrap();
        create_category(other, new_category("Food", TransactionKind::Expense), &connection)
            .unwrap();
        create_transaction(
            TransactionKind::Expense,
            other,
            new_transaction("Food", 20.0, date!(2024 - 03 - 05)),
            &connection,
        )
        .unwrap();

        let result = delete_category(owner, food.id, &mut connection);

        assert_eq!(result, Ok(()));
    }

    #[test]
    fn delete_of_other_users_category_is_not_found() {
        let mut connection = get_test_connection();
        let food = create_category(
            UserID::new(1),
            new_category("Food", TransactionKind::Expense),
            &connection,
        )
        .unwrap();

        let result = delete_category(UserID::new(2), food.id, &mut connection);

        assert_eq!(result, Err(Error::CategoryNotFound));
    }
}
