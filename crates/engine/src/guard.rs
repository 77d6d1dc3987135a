//! Ownership checks.
//!
//! Pure predicates over already-loaded rows: they never touch the database and
//! every mutating engine operation runs the relevant one before writing.

use crate::{Account, Category, EngineError, Expense, ResultEngine};

pub fn assert_owns_account(account: &Account, user_id: &str) -> ResultEngine<()> {
    if account.user_id != user_id {
        return Err(EngineError::Forbidden(
            "account does not belong to this user".to_string(),
        ));
    }
    Ok(())
}

pub fn assert_owns_category_or_global(category: &Category, user_id: &str) -> ResultEngine<()> {
    if !category.is_accessible(user_id) {
        return Err(EngineError::Forbidden(
            "user does not have access to this category".to_string(),
        ));
    }
    Ok(())
}

pub fn assert_owns_expense(expense: &Expense, user_id: &str) -> ResultEngine<()> {
    if expense.user_id != user_id {
        return Err(EngineError::Forbidden(
            "expense does not belong to this user".to_string(),
        ));
    }
    Ok(())
}

/// The caller may only act on its own user identity.
pub fn assert_same_user(target_user_id: &str, caller_id: &str) -> ResultEngine<()> {
    if target_user_id != caller_id {
        return Err(EngineError::Forbidden(
            "cannot act on behalf of another user".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{CategoryScope, MoneyCents};

    fn account_of(user_id: &str) -> Account {
        Account::new(user_id.to_string(), Utc.timestamp_opt(0, 0).unwrap())
    }

    #[test]
    fn account_owner_passes() {
        assert!(assert_owns_account(&account_of("alice"), "alice").is_ok());
    }

    #[test]
    fn account_of_another_user_is_forbidden() {
        let err = assert_owns_account(&account_of("alice"), "bob").unwrap_err();
        assert!(matches!(err, EngineError::Forbidden(_)));
    }

    #[test]
    fn global_category_passes_for_anyone() {
        let category = Category::new(
            "Food".to_string(),
            CategoryScope::Global,
            Utc.timestamp_opt(0, 0).unwrap(),
        );
        assert!(assert_owns_category_or_global(&category, "bob").is_ok());
    }

    #[test]
    fn personal_category_of_another_user_is_forbidden() {
        let category = Category::new(
            "Pets".to_string(),
            CategoryScope::Personal("alice".to_string()),
            Utc.timestamp_opt(0, 0).unwrap(),
        );
        assert!(assert_owns_category_or_global(&category, "alice").is_ok());
        assert!(matches!(
            assert_owns_category_or_global(&category, "bob"),
            Err(EngineError::Forbidden(_))
        ));
    }

    #[test]
    fn expense_of_another_user_is_forbidden() {
        let expense = Expense::new(
            "alice".to_string(),
            "food".to_string(),
            "acc".to_string(),
            MoneyCents::new(100),
            None,
            Utc.timestamp_opt(0, 0).unwrap(),
        );
        assert!(assert_owns_expense(&expense, "alice").is_ok());
        assert!(matches!(
            assert_owns_expense(&expense, "bob"),
            Err(EngineError::Forbidden(_))
        ));
    }

    #[test]
    fn acting_as_someone_else_is_forbidden() {
        assert!(assert_same_user("alice", "alice").is_ok());
        assert!(matches!(
            assert_same_user("alice", "bob"),
            Err(EngineError::Forbidden(_))
        ));
    }
}
