use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, Expense, ExpenseNewCmd, ExpenseUpdateCmd, MoneyCents, ResultEngine, accounts,
    expenses, guard, util::normalize_description,
};

use super::{Engine, with_tx};

/// Filters for listing expenses.
///
/// `from` and `to` are both inclusive, in UTC.
#[derive(Clone, Debug, Default)]
pub struct ExpenseListFilter {
    pub category_id: Option<String>,
    pub account_id: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl Engine {
    /// Records an expense and debits its account.
    ///
    /// Checks run in order: amount, user, category, account, funds. Nothing
    /// is persisted unless all of them pass.
    pub async fn create_expense(&self, cmd: ExpenseNewCmd) -> ResultEngine<Expense> {
        let amount = MoneyCents::new(cmd.amount_minor).ensure_positive("expense")?;
        let description = normalize_description(cmd.description.as_deref())?;
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, &cmd.user_id).await?;
            guard::assert_same_user(&cmd.user_id, &cmd.caller_id)?;

            let category = self.require_category(&db_tx, &cmd.category_id).await?;
            guard::assert_owns_category_or_global(&category, &cmd.user_id)?;

            let mut account = self.require_account(&db_tx, &cmd.account_id).await?;
            guard::assert_owns_account(&account, &cmd.user_id)?;

            account.debit(amount)?;
            account.updated_at = now;
            accounts::balance_update(&account).update(&db_tx).await?;

            let expense = Expense::new(
                cmd.user_id.clone(),
                category.id,
                account.id.clone(),
                amount,
                description,
                now,
            );
            expenses::ActiveModel::from(&expense).insert(&db_tx).await?;

            tracing::info!(
                expense_id = %expense.id,
                account_id = %account.id,
                "expense of {amount} recorded, balance {}",
                account.balance
            );
            Ok(expense)
        })
    }

    pub async fn expense(&self, expense_id: &str, caller_id: &str) -> ResultEngine<Expense> {
        with_tx!(self, |db_tx| {
            let expense = self.require_expense(&db_tx, expense_id).await?;
            guard::assert_owns_expense(&expense, caller_id)?;
            Ok(expense)
        })
    }

    /// Expenses of the caller, newest first.
    pub async fn list_expenses(
        &self,
        caller_id: &str,
        filter: &ExpenseListFilter,
    ) -> ResultEngine<Vec<Expense>> {
        with_tx!(self, |db_tx| {
            let mut query =
                expenses::Entity::find().filter(expenses::Column::UserId.eq(caller_id.to_string()));

            if let Some(category_id) = &filter.category_id {
                let category = self.require_category(&db_tx, category_id).await?;
                guard::assert_owns_category_or_global(&category, caller_id)?;
                query = query.filter(expenses::Column::CategoryId.eq(category.id));
            }
            if let Some(account_id) = &filter.account_id {
                let account = self.require_account(&db_tx, account_id).await?;
                guard::assert_owns_account(&account, caller_id)?;
                query = query.filter(expenses::Column::AccountId.eq(account.id));
            }
            if let Some(from) = filter.from {
                query = query.filter(expenses::Column::CreatedAt.gte(from));
            }
            if let Some(to) = filter.to {
                query = query.filter(expenses::Column::CreatedAt.lte(to));
            }

            let models: Vec<expenses::Model> = query
                .order_by_desc(expenses::Column::CreatedAt)
                .order_by_desc(expenses::Column::Id)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Expense::from).collect())
        })
    }

    /// Applies a partial update to an expense.
    ///
    /// When the amount or the account changes, the old amount goes back to the
    /// old account and the new amount is debited from the (possibly new)
    /// account. A failed debit aborts the whole update.
    pub async fn update_expense(&self, cmd: ExpenseUpdateCmd) -> ResultEngine<Expense> {
        let new_amount = cmd
            .amount_minor
            .map(|value| MoneyCents::new(value).ensure_positive("expense"))
            .transpose()?;
        let new_description = cmd
            .description
            .as_deref()
            .map(|value| normalize_description(Some(value)))
            .transpose()?;
        let now = Utc::now();

        with_tx!(self, |db_tx| {
            let mut expense = self.require_expense(&db_tx, &cmd.expense_id).await?;
            guard::assert_owns_expense(&expense, &cmd.user_id)?;

            if let Some(category_id) = cmd
                .category_id
                .as_deref()
                .filter(|id| *id != expense.category_id)
            {
                let category = self.require_category(&db_tx, category_id).await?;
                guard::assert_owns_category_or_global(&category, &cmd.user_id)?;
                expense.category_id = category.id;
            }

            let target_account = match cmd
                .account_id
                .as_deref()
                .filter(|id| *id != expense.account_id)
            {
                Some(account_id) => {
                    let account = self.require_account(&db_tx, account_id).await?;
                    guard::assert_owns_account(&account, &cmd.user_id)?;
                    Some(account)
                }
                None => None,
            };

            let amount = new_amount.unwrap_or(expense.amount);
            if amount != expense.amount || target_account.is_some() {
                let mut current = self.require_account(&db_tx, &expense.account_id).await?;
                current.refund(expense.amount)?;
                current.updated_at = now;

                match target_account {
                    Some(mut target) => {
                        target.debit(amount)?;
                        target.updated_at = now;
                        accounts::balance_update(&current).update(&db_tx).await?;
                        accounts::balance_update(&target).update(&db_tx).await?;
                        tracing::debug!(
                            expense_id = %expense.id,
                            "moved from account {} to {}",
                            current.id,
                            target.id
                        );
                        expense.account_id = target.id;
                    }
                    None => {
                        current.debit(amount)?;
                        accounts::balance_update(&current).update(&db_tx).await?;
                    }
                }
                expense.amount = amount;
            }

            if let Some(description) = new_description {
                expense.description = description;
            }

            let active = expenses::ActiveModel {
                id: ActiveValue::Set(expense.id.clone()),
                category_id: ActiveValue::Set(expense.category_id.clone()),
                account_id: ActiveValue::Set(expense.account_id.clone()),
                amount_minor: ActiveValue::Set(expense.amount.cents()),
                description: ActiveValue::Set(expense.description.clone()),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(expense)
        })
    }

    /// Deletes an expense, giving its amount back to the account.
    pub async fn delete_expense(&self, expense_id: &str, caller_id: &str) -> ResultEngine<()> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let expense = self.require_expense(&db_tx, expense_id).await?;
            guard::assert_owns_expense(&expense, caller_id)?;

            let mut account = self.require_account(&db_tx, &expense.account_id).await?;
            account.refund(expense.amount)?;
            account.updated_at = now;
            accounts::balance_update(&account).update(&db_tx).await?;

            expenses::Entity::delete_by_id(expense.id.clone())
                .exec(&db_tx)
                .await?;

            tracing::info!(
                expense_id = %expense.id,
                account_id = %account.id,
                "expense deleted, balance {}",
                account.balance
            );
            Ok(())
        })
    }
}
