//! The module contains the `Account` struct, the balance-bearing ledger of a
//! user.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Income, MoneyCents, ResultEngine};

/// An account.
///
/// Every user holds one account. Incomes credit it, expenses debit it, and its
/// balance can never go below zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub user_id: String,
    pub balance: MoneyCents,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates an empty account for `user_id`.
    pub fn new(user_id: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            balance: MoneyCents::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    /// Credits the account and returns the `Income` recording it.
    pub fn credit(
        &mut self,
        amount: MoneyCents,
        description: Option<String>,
        at: DateTime<Utc>,
    ) -> ResultEngine<Income> {
        let amount = amount.ensure_positive("income")?;
        self.balance = self.balance.try_add(amount)?;
        self.updated_at = at;
        Ok(Income::new(self.id.clone(), amount, description, at))
    }

    pub fn can_debit(&self, amount: MoneyCents) -> bool {
        self.balance >= amount
    }

    pub fn debit(&mut self, amount: MoneyCents) -> ResultEngine<()> {
        let amount = amount.ensure_positive("debit")?;
        if !self.can_debit(amount) {
            return Err(EngineError::InsufficientFunds(format!(
                "balance {} is lower than {}",
                self.balance, amount
            )));
        }
        self.balance = self.balance.try_sub(amount)?;
        Ok(())
    }

    /// Gives back an amount previously taken by `debit`.
    ///
    /// No income is recorded: the money is the refund of a deleted or edited
    /// expense.
    pub fn refund(&mut self, amount: MoneyCents) -> ResultEngine<()> {
        self.balance = self.balance.try_add(amount)?;
        Ok(())
    }
}

impl From<Model> for Account {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            balance: MoneyCents::new(model.balance_minor),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub balance_minor: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    User,
    #[sea_orm(has_many = "super::incomes::Entity")]
    Incomes,
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::incomes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Incomes.def()
    }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Account> for ActiveModel {
    fn from(value: &Account) -> Self {
        Self {
            id: ActiveValue::Set(value.id.clone()),
            user_id: ActiveValue::Set(value.user_id.clone()),
            balance_minor: ActiveValue::Set(value.balance.cents()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

/// Partial model persisting only the balance (and its update time).
pub(crate) fn balance_update(account: &Account) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::Set(account.id.clone()),
        balance_minor: ActiveValue::Set(account.balance.cents()),
        updated_at: ActiveValue::Set(account.updated_at),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn at() -> DateTime<Utc> {
        Utc.timestamp_opt(0, 0).unwrap()
    }

    fn account(balance: i64) -> Account {
        let mut account = Account::new("alice".to_string(), at());
        account.balance = MoneyCents::new(balance);
        account
    }

    #[test]
    fn credit_adds_amount_and_returns_income() {
        let mut account = account(0);
        let income = account
            .credit(MoneyCents::new(100_000), Some("Salary".to_string()), at())
            .unwrap();

        assert_eq!(account.balance, MoneyCents::new(100_000));
        assert_eq!(income.account_id, account.id);
        assert_eq!(income.amount, MoneyCents::new(100_000));
        assert_eq!(income.description.as_deref(), Some("Salary"));
    }

    #[test]
    fn credit_rejects_non_positive_amount() {
        let mut account = account(500);
        let err = account.credit(MoneyCents::new(0), None, at()).unwrap_err();

        assert!(matches!(err, EngineError::InvalidAmount(_)));
        assert_eq!(account.balance, MoneyCents::new(500));
    }

    #[test]
    fn debit_within_balance() {
        let mut account = account(500);
        account.debit(MoneyCents::new(500)).unwrap();

        assert_eq!(account.balance, MoneyCents::ZERO);
    }

    #[test]
    fn debit_over_balance_leaves_it_unchanged() {
        let mut account = account(5_000);
        let err = account.debit(MoneyCents::new(10_000)).unwrap_err();

        assert!(matches!(err, EngineError::InsufficientFunds(_)));
        assert_eq!(account.balance, MoneyCents::new(5_000));
    }

    #[test]
    fn debit_rejects_negative_amount() {
        let mut account = account(5_000);
        let err = account.debit(MoneyCents::new(-1)).unwrap_err();

        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }

    #[test]
    fn can_debit_is_inclusive() {
        let account = account(100);

        assert!(account.can_debit(MoneyCents::new(100)));
        assert!(!account.can_debit(MoneyCents::new(101)));
    }

    #[test]
    fn refund_then_debit_round_trip() {
        let mut account = account(90_000);
        account.refund(MoneyCents::new(10_000)).unwrap();
        account.debit(MoneyCents::new(10_000)).unwrap();

        assert_eq!(account.balance, MoneyCents::new(90_000));
    }
}
