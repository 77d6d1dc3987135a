use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, Condition, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};

use crate::{
    Category, CategoryScope, DEFAULT_GLOBAL_CATEGORIES, EngineError, ResultEngine, categories,
    expenses, guard,
    util::{CATEGORY_NAME_MAX, normalize_required_name},
};

use super::{Engine, with_tx};

/// Filters for listing categories.
#[derive(Clone, Debug, Default)]
pub struct CategoryListFilter {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    pub is_global: Option<bool>,
}

fn scope_condition(scope: &CategoryScope) -> Condition {
    match scope {
        CategoryScope::Global => Condition::all().add(categories::Column::IsGlobal.eq(true)),
        CategoryScope::Personal(user_id) => Condition::all()
            .add(categories::Column::IsGlobal.eq(false))
            .add(categories::Column::UserId.eq(user_id.clone())),
    }
}

impl Engine {
    async fn category_name_taken(
        &self,
        db: &DatabaseTransaction,
        name: &str,
        scope: &CategoryScope,
        except_id: Option<&str>,
    ) -> ResultEngine<bool> {
        let mut query = categories::Entity::find()
            .filter(scope_condition(scope))
            .filter(categories::Column::Name.eq(name.to_string()));
        if let Some(id) = except_id {
            query = query.filter(categories::Column::Id.ne(id.to_string()));
        }
        Ok(query.one(db).await?.is_some())
    }

    async fn require_category_unreferenced(
        &self,
        db: &DatabaseTransaction,
        category: &Category,
    ) -> ResultEngine<()> {
        let used = expenses::Entity::find()
            .filter(expenses::Column::CategoryId.eq(category.id.clone()))
            .count(db)
            .await?;
        if used > 0 {
            return Err(EngineError::Conflict(format!(
                "category '{}' is used by {used} expenses",
                category.name
            )));
        }
        Ok(())
    }

    pub(super) async fn ensure_default_categories(
        &self,
        db: &DatabaseTransaction,
        now: DateTime<Utc>,
    ) -> ResultEngine<()> {
        for name in DEFAULT_GLOBAL_CATEGORIES {
            if self
                .category_name_taken(db, name, &CategoryScope::Global, None)
                .await?
            {
                continue;
            }
            let category = Category::new(name.to_string(), CategoryScope::Global, now);
            categories::ActiveModel::from(&category).insert(db).await?;
            tracing::debug!("created default category {name}");
        }
        Ok(())
    }

    /// Creates a category in `scope`.
    ///
    /// Only a privileged caller may create global categories. Names are unique
    /// within their scope, compared exactly after trimming.
    pub async fn create_category(
        &self,
        name: &str,
        scope: CategoryScope,
        privileged: bool,
    ) -> ResultEngine<Category> {
        let name = normalize_required_name(name, "category", CATEGORY_NAME_MAX)?;
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            match &scope {
                CategoryScope::Global if !privileged => {
                    return Err(EngineError::Forbidden(
                        "only an operator can create global categories".to_string(),
                    ));
                }
                CategoryScope::Global => {}
                CategoryScope::Personal(user_id) => {
                    self.require_user(&db_tx, user_id).await?;
                }
            }

            if self
                .category_name_taken(&db_tx, &name, &scope, None)
                .await?
            {
                return Err(EngineError::ExistingKey(name));
            }

            let category = Category::new(name, scope, now);
            categories::ActiveModel::from(&category)
                .insert(&db_tx)
                .await?;
            Ok(category)
        })
    }

    pub async fn category(&self, category_id: &str, user_id: &str) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let category = self.require_category(&db_tx, category_id).await?;
            guard::assert_owns_category_or_global(&category, user_id)?;
            Ok(category)
        })
    }

    /// Global categories plus the personal ones of `user_id`, newest first.
    pub async fn list_categories(
        &self,
        user_id: &str,
        filter: &CategoryListFilter,
    ) -> ResultEngine<Vec<Category>> {
        with_tx!(self, |db_tx| {
            let mut query = categories::Entity::find().filter(
                Condition::any()
                    .add(categories::Column::IsGlobal.eq(true))
                    .add(categories::Column::UserId.eq(user_id.to_string())),
            );
            if let Some(is_global) = filter.is_global {
                query = query.filter(categories::Column::IsGlobal.eq(is_global));
            }
            if let Some(name) = filter.name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                query = query.filter(
                    Expr::expr(Expr::cust("LOWER(name)"))
                        .like(format!("%{}%", name.to_lowercase())),
                );
            }
            let models: Vec<categories::Model> = query
                .order_by_desc(categories::Column::CreatedAt)
                .order_by_asc(categories::Column::Name)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Category::from).collect())
        })
    }

    /// Renames a personal category of `user_id`.
    pub async fn rename_category(
        &self,
        category_id: &str,
        new_name: &str,
        user_id: &str,
    ) -> ResultEngine<Category> {
        let new_name = normalize_required_name(new_name, "category", CATEGORY_NAME_MAX)?;
        with_tx!(self, |db_tx| {
            let category = self.require_category(&db_tx, category_id).await?;
            if category.is_global {
                return Err(EngineError::Forbidden(
                    "global categories cannot be renamed".to_string(),
                ));
            }
            guard::assert_owns_category_or_global(&category, user_id)?;

            if self
                .category_name_taken(&db_tx, &new_name, &category.scope(), Some(&category.id))
                .await?
            {
                return Err(EngineError::ExistingKey(new_name));
            }

            let active = categories::ActiveModel {
                id: ActiveValue::Set(category.id.clone()),
                name: ActiveValue::Set(new_name),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;
            Ok(Category::from(model))
        })
    }

    /// Deletes a category no expense references.
    ///
    /// Global categories need `privileged`; personal ones must belong to
    /// `caller_id`.
    pub async fn delete_category(
        &self,
        category_id: &str,
        caller_id: &str,
        privileged: bool,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let category = self.require_category(&db_tx, category_id).await?;
            if category.is_global {
                if !privileged {
                    return Err(EngineError::Forbidden(
                        "global categories cannot be deleted".to_string(),
                    ));
                }
            } else {
                guard::assert_owns_category_or_global(&category, caller_id)?;
            }
            self.require_category_unreferenced(&db_tx, &category)
                .await?;

            categories::Entity::delete_by_id(category.id.clone())
                .exec(&db_tx)
                .await?;
            tracing::info!(category_id = %category.id, "deleted category {}", category.name);
            Ok(())
        })
    }

    /// Operator path: deletes an unreferenced global category.
    pub async fn delete_global_category(&self, category_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let category = self.require_category(&db_tx, category_id).await?;
            if !category.is_global {
                return Err(EngineError::Forbidden(format!(
                    "category '{}' is not global",
                    category.name
                )));
            }
            self.require_category_unreferenced(&db_tx, &category)
                .await?;

            categories::Entity::delete_by_id(category.id.clone())
                .exec(&db_tx)
                .await?;
            tracing::info!(category_id = %category.id, "deleted global category {}", category.name);
            Ok(())
        })
    }
}
