//! Expense categories, either global or owned by a single user.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Categories every registered user finds available.
pub const DEFAULT_GLOBAL_CATEGORIES: [&str; 5] =
    ["Food", "Transportation", "Entertainment", "Utilities", "Shopping"];

/// Where a category lives for name-uniqueness purposes.
///
/// The two scopes are never merged: a personal "Food" does not collide with
/// the global "Food".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CategoryScope {
    Global,
    Personal(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub is_global: bool,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: String, scope: CategoryScope, created_at: DateTime<Utc>) -> Self {
        let (is_global, user_id) = match scope {
            CategoryScope::Global => (true, None),
            CategoryScope::Personal(user_id) => (false, Some(user_id)),
        };
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            is_global,
            user_id,
            created_at,
        }
    }

    /// True if `user_id` may reference this category.
    pub fn is_accessible(&self, user_id: &str) -> bool {
        self.is_global || self.user_id.as_deref() == Some(user_id)
    }

    pub fn scope(&self) -> CategoryScope {
        match (&self.user_id, self.is_global) {
            (Some(user_id), false) => CategoryScope::Personal(user_id.clone()),
            _ => CategoryScope::Global,
        }
    }
}

impl From<Model> for Category {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            is_global: model.is_global,
            user_id: model.user_id,
            created_at: model.created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub is_global: bool,
    pub user_id: Option<String>,
    pub created_at: DateTimeUtc,
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
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Category> for ActiveModel {
    fn from(value: &Category) -> Self {
        Self {
            id: ActiveValue::Set(value.id.clone()),
            name: ActiveValue::Set(value.name.clone()),
            is_global: ActiveValue::Set(value.is_global),
            user_id: ActiveValue::Set(value.user_id.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn at() -> DateTime<Utc> {
        Utc.timestamp_opt(0, 0).unwrap()
    }

    #[test]
    fn global_category_is_accessible_to_everyone() {
        let category = Category::new("Food".to_string(), CategoryScope::Global, at());

        assert!(category.is_accessible("alice"));
        assert!(category.is_accessible("bob"));
        assert_eq!(category.user_id, None);
    }

    #[test]
    fn personal_category_is_accessible_to_owner_only() {
        let category = Category::new(
            "Pets".to_string(),
            CategoryScope::Personal("alice".to_string()),
            at(),
        );

        assert!(!category.is_global);
        assert!(category.is_accessible("alice"));
        assert!(!category.is_accessible("bob"));
        assert_eq!(category.scope(), CategoryScope::Personal("alice".to_string()));
    }
}
