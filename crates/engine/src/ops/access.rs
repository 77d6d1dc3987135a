use sea_orm::{DatabaseTransaction, prelude::*};

use crate::{
    Account, Category, EngineError, Expense, ResultEngine, accounts, categories, expenses, users,
};

use super::Engine;

impl Engine {
    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    pub(super) async fn require_account(
        &self,
        db: &DatabaseTransaction,
        account_id: &str,
    ) -> ResultEngine<Account> {
        accounts::Entity::find_by_id(account_id.to_string())
            .one(db)
            .await?
            .map(Account::from)
            .ok_or_else(|| EngineError::KeyNotFound("account not exists".to_string()))
    }

    pub(super) async fn require_category(
        &self,
        db: &DatabaseTransaction,
        category_id: &str,
    ) -> ResultEngine<Category> {
        categories::Entity::find_by_id(category_id.to_string())
            .one(db)
            .await?
            .map(Category::from)
            .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))
    }

    pub(super) async fn require_expense(
        &self,
        db: &DatabaseTransaction,
        expense_id: &str,
    ) -> ResultEngine<Expense> {
        expenses::Entity::find_by_id(expense_id.to_string())
            .one(db)
            .await?
            .map(Expense::from)
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))
    }
}
