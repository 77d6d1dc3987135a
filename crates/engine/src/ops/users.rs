use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Account, EngineError, RegisterCmd, ResultEngine, User, accounts, categories, expenses, guard,
    password::{hash_password, verify_password},
    users,
    util::{USER_NAME_MAX, normalize_email, normalize_required_name, validate_password},
};

use super::{Engine, with_tx};

impl Engine {
    /// Registers a user together with its (empty) account.
    ///
    /// The default global categories are created on the first registration
    /// and left untouched afterwards.
    pub async fn register_user(&self, cmd: RegisterCmd) -> ResultEngine<(User, Account)> {
        let name = normalize_required_name(&cmd.name, "user", USER_NAME_MAX)?;
        let email = normalize_email(&cmd.email)?;
        validate_password(&cmd.password)?;
        let password_hash = hash_password(&cmd.password)?;
        let now = Utc::now();

        with_tx!(self, |db_tx| {
            let email_taken = users::Entity::find()
                .filter(users::Column::Email.eq(email.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if email_taken {
                return Err(EngineError::ExistingKey(email));
            }
            let name_taken = users::Entity::find()
                .filter(users::Column::Name.eq(name.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if name_taken {
                return Err(EngineError::ExistingKey(name));
            }

            let model = users::new_active(
                Uuid::new_v4().to_string(),
                name.clone(),
                email.clone(),
                password_hash,
                now,
            )
            .insert(&db_tx)
            .await?;

            let account = Account::new(model.id.clone(), now);
            accounts::ActiveModel::from(&account).insert(&db_tx).await?;

            self.ensure_default_categories(&db_tx, now).await?;

            tracing::info!(user_id = %model.id, "registered user {}", model.name);
            Ok((User::from(model), account))
        })
    }

    /// Resolves Basic credentials to a user.
    ///
    /// Unknown email and wrong password both yield `Unauthorized`.
    pub async fn authenticate(&self, email: &str, password: &str) -> ResultEngine<User> {
        let model = with_tx!(self, |db_tx| {
            users::Entity::find()
                .filter(users::Column::Email.eq(email.trim().to_string()))
                .one(&db_tx)
                .await
                .map_err(EngineError::from)
        })?;
        let Some(model) = model else {
            return Err(EngineError::Unauthorized);
        };
        if !verify_password(password, &model.password_hash)? {
            return Err(EngineError::Unauthorized);
        }
        Ok(User::from(model))
    }

    pub async fn user(&self, user_id: &str) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, user_id).await?;
            Ok(User::from(model))
        })
    }

    /// Renames the caller. The name stays unique across users.
    pub async fn rename_user(
        &self,
        user_id: &str,
        new_name: &str,
        caller_id: &str,
    ) -> ResultEngine<User> {
        let new_name = normalize_required_name(new_name, "user", USER_NAME_MAX)?;
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            guard::assert_same_user(user_id, caller_id)?;

            let taken = users::Entity::find()
                .filter(users::Column::Name.eq(new_name.clone()))
                .filter(users::Column::Id.ne(user_id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            if taken {
                return Err(EngineError::ExistingKey(new_name));
            }

            let active = users::ActiveModel {
                id: ActiveValue::Set(user_id.to_string()),
                name: ActiveValue::Set(new_name),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;
            Ok(User::from(model))
        })
    }

    /// Deletes the caller and everything it owns.
    ///
    /// Order: the user's expenses, then each account with its history, then
    /// the personal categories, then the user row. Global categories stay.
    pub async fn delete_user(&self, user_id: &str, caller_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            guard::assert_same_user(user_id, caller_id)?;

            expenses::Entity::delete_many()
                .filter(expenses::Column::UserId.eq(user_id.to_string()))
                .exec(&db_tx)
                .await?;

            let owned: Vec<accounts::Model> = accounts::Entity::find()
                .filter(accounts::Column::UserId.eq(user_id.to_string()))
                .all(&db_tx)
                .await?;
            for account in owned {
                Self::cascade_delete_account(&db_tx, &account.id).await?;
            }

            categories::Entity::delete_many()
                .filter(categories::Column::IsGlobal.eq(false))
                .filter(categories::Column::UserId.eq(user_id.to_string()))
                .exec(&db_tx)
                .await?;

            users::Entity::delete_by_id(user_id.to_string())
                .exec(&db_tx)
                .await?;
            tracing::info!(user_id, "deleted user");
            Ok(())
        })
    }
}
