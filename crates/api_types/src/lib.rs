use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod health {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Welcome {
        pub message: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Health {
        pub date: DateTime<Utc>,
        pub status: String,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Register {
        pub name: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: String,
        pub name: String,
        pub email: String,
        pub created_at: DateTime<Utc>,
    }

    /// Response of a successful registration: the user and its new account.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Registered {
        pub user: UserView,
        pub account: super::account::AccountView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserRename {
        pub name: String,
    }
}

pub mod account {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: String,
        pub user_id: String,
        pub balance_minor: i64,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Balance {
        pub account_id: String,
        pub balance_minor: i64,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeNew {
        pub amount_minor: i64,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeView {
        pub id: String,
        pub account_id: String,
        pub amount_minor: i64,
        pub description: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    /// Query of `GET /api/accounts/{id}/income`. Both bounds are inclusive.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct IncomeList {
        pub from: Option<DateTime<Utc>>,
        pub to: Option<DateTime<Utc>>,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        /// Only operators may create global categories.
        #[serde(default)]
        pub is_global: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryRename {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: String,
        pub name: String,
        pub is_global: bool,
        pub user_id: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryList {
        /// Case-insensitive substring of the name.
        pub name: Option<String>,
        pub is_global: Option<bool>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        /// Defaults to the authenticated user; any other value is rejected.
        pub user_id: Option<String>,
        pub category_id: String,
        pub account_id: String,
        pub amount_minor: i64,
        pub description: Option<String>,
    }

    /// Partial update; absent fields are left untouched and an empty
    /// `description` clears it.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub amount_minor: Option<i64>,
        pub category_id: Option<String>,
        pub account_id: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: String,
        pub user_id: String,
        pub category_id: String,
        pub account_id: String,
        pub amount_minor: i64,
        pub description: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseList {
        pub category_id: Option<String>,
        pub account_id: Option<String>,
        pub from: Option<DateTime<Utc>>,
        pub to: Option<DateTime<Utc>>,
    }
}

pub mod summary {
    use std::collections::BTreeMap;

    use super::*;

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BucketView {
        pub total_minor: i64,
        pub count: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryView {
        pub total_minor: i64,
        pub count: u64,
        pub average_minor: i64,
        pub by_category: BTreeMap<String, BucketView>,
        /// Keyed by `YYYY-MM`.
        pub by_month: BTreeMap<String, BucketView>,
    }
}
