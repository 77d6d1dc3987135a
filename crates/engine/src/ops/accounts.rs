use chrono::{DateTime, Utc};
use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Account, EngineError, Income, IncomeCmd, MoneyCents, ResultEngine, accounts, expenses, guard,
    incomes, util::normalize_description,
};

use super::{Engine, with_tx};

impl Engine {
    /// Opens an account for `user_id`. A user holds at most one account.
    pub async fn create_account(&self, user_id: &str, caller_id: &str) -> ResultEngine<Account> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            guard::assert_same_user(user_id, caller_id)?;

            let existing = accounts::Entity::find()
                .filter(accounts::Column::UserId.eq(user_id.to_string()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::Forbidden(
                    "user already has an account".to_string(),
                ));
            }

            let account = Account::new(user_id.to_string(), now);
            accounts::ActiveModel::from(&account).insert(&db_tx).await?;
            Ok(account)
        })
    }

    /// Return an account snapshot from DB.
    pub async fn account(&self, account_id: &str, caller_id: &str) -> ResultEngine<Account> {
        with_tx!(self, |db_tx| {
            let account = self.require_account(&db_tx, account_id).await?;
            guard::assert_owns_account(&account, caller_id)?;
            Ok(account)
        })
    }

    pub async fn list_accounts(&self, caller_id: &str) -> ResultEngine<Vec<Account>> {
        with_tx!(self, |db_tx| {
            let models: Vec<accounts::Model> = accounts::Entity::find()
                .filter(accounts::Column::UserId.eq(caller_id.to_string()))
                .order_by_asc(accounts::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Account::from).collect())
        })
    }

    /// Credits an account and records the income.
    pub async fn add_income(&self, cmd: IncomeCmd) -> ResultEngine<Income> {
        let description = normalize_description(cmd.description.as_deref())?;
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let mut account = self.require_account(&db_tx, &cmd.account_id).await?;
            guard::assert_owns_account(&account, &cmd.user_id)?;

            let income = account.credit(MoneyCents::new(cmd.amount_minor), description, now)?;
            incomes::ActiveModel::from(&income).insert(&db_tx).await?;
            accounts::balance_update(&account).update(&db_tx).await?;

            tracing::debug!(
                account_id = %account.id,
                "credited {}, balance {}",
                income.amount,
                account.balance
            );
            Ok(income)
        })
    }

    /// Incomes of an account, newest first. Both bounds are inclusive.
    pub async fn list_incomes(
        &self,
        account_id: &str,
        caller_id: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> ResultEngine<Vec<Income>> {
        with_tx!(self, |db_tx| {
            let account = self.require_account(&db_tx, account_id).await?;
            guard::assert_owns_account(&account, caller_id)?;

            let mut query =
                incomes::Entity::find().filter(incomes::Column::AccountId.eq(account.id.clone()));
            if let Some(from) = from {
                query = query.filter(incomes::Column::CreatedAt.gte(from));
            }
            if let Some(to) = to {
                query = query.filter(incomes::Column::CreatedAt.lte(to));
            }
            let models: Vec<incomes::Model> = query
                .order_by_desc(incomes::Column::CreatedAt)
                .order_by_desc(incomes::Column::Id)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Income::from).collect())
        })
    }

    /// Deletes an account with no history.
    pub async fn delete_account(&self, account_id: &str, caller_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let account = self.require_account(&db_tx, account_id).await?;
            guard::assert_owns_account(&account, caller_id)?;

            let incomes = incomes::Entity::find()
                .filter(incomes::Column::AccountId.eq(account.id.clone()))
                .count(&db_tx)
                .await?;
            let expenses = expenses::Entity::find()
                .filter(expenses::Column::AccountId.eq(account.id.clone()))
                .count(&db_tx)
                .await?;
            if incomes > 0 || expenses > 0 {
                return Err(EngineError::Conflict(format!(
                    "account has {incomes} incomes and {expenses} expenses"
                )));
            }

            accounts::Entity::delete_by_id(account.id.clone())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Deletes the incomes and expenses of an account, then the account.
    ///
    /// Runs inside the caller's transaction; no ownership check and no balance
    /// bookkeeping.
    pub async fn cascade_delete_account(
        db_tx: &DatabaseTransaction,
        account_id: &str,
    ) -> ResultEngine<()> {
        incomes::Entity::delete_many()
            .filter(incomes::Column::AccountId.eq(account_id.to_string()))
            .exec(db_tx)
            .await?;
        expenses::Entity::delete_many()
            .filter(expenses::Column::AccountId.eq(account_id.to_string()))
            .exec(db_tx)
            .await?;
        accounts::Entity::delete_by_id(account_id.to_string())
            .exec(db_tx)
            .await?;
        Ok(())
    }

    /// Rebuilds a balance as `sum(incomes) - sum(expenses)` and stores it.
    ///
    /// Operator path: no ownership check.
    pub async fn recompute_balance(&self, account_id: &str) -> ResultEngine<Account> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let mut account = self.require_account(&db_tx, account_id).await?;

            let credited: Vec<incomes::Model> = incomes::Entity::find()
                .filter(incomes::Column::AccountId.eq(account.id.clone()))
                .all(&db_tx)
                .await?;
            let debited: Vec<expenses::Model> = expenses::Entity::find()
                .filter(expenses::Column::AccountId.eq(account.id.clone()))
                .all(&db_tx)
                .await?;

            let mut balance = MoneyCents::ZERO;
            for income in &credited {
                balance = balance.try_add(MoneyCents::new(income.amount_minor))?;
            }
            for expense in &debited {
                balance = balance.try_sub(MoneyCents::new(expense.amount_minor))?;
            }
            if balance.is_negative() {
                return Err(EngineError::InsufficientFunds(format!(
                    "history of account {} yields a negative balance {balance}",
                    account.id
                )));
            }

            if balance != account.balance {
                tracing::info!(
                    account_id = %account.id,
                    "balance corrected from {} to {balance}",
                    account.balance
                );
            }
            account.balance = balance;
            account.updated_at = now;
            accounts::balance_update(&account).update(&db_tx).await?;
            Ok(account)
        })
    }
}
