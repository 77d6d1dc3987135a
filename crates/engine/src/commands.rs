//! Command structs for engine write operations.
//!
//! These types group parameters for registration, income and expense writes,
//! keeping call sites readable and avoiding long argument lists.

/// Register a new user.
#[derive(Clone, Debug)]
pub struct RegisterCmd {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterCmd {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Credit an account.
#[derive(Clone, Debug)]
pub struct IncomeCmd {
    pub account_id: String,
    pub amount_minor: i64,
    pub description: Option<String>,
    /// Authenticated caller.
    pub user_id: String,
}

impl IncomeCmd {
    #[must_use]
    pub fn new(
        account_id: impl Into<String>,
        user_id: impl Into<String>,
        amount_minor: i64,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            amount_minor,
            description: None,
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Record a new expense, debiting `account_id`.
#[derive(Clone, Debug)]
pub struct ExpenseNewCmd {
    /// User the expense is recorded for; must be the caller.
    pub user_id: String,
    pub category_id: String,
    pub account_id: String,
    pub amount_minor: i64,
    pub description: Option<String>,
    /// Authenticated caller.
    pub caller_id: String,
}

impl ExpenseNewCmd {
    /// Expense recorded by `caller_id` for itself.
    #[must_use]
    pub fn new(
        caller_id: impl Into<String>,
        category_id: impl Into<String>,
        account_id: impl Into<String>,
        amount_minor: i64,
    ) -> Self {
        let caller_id = caller_id.into();
        Self {
            user_id: caller_id.clone(),
            category_id: category_id.into(),
            account_id: account_id.into(),
            amount_minor,
            description: None,
            caller_id,
        }
    }

    #[must_use]
    pub fn for_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update of an expense. `None` fields are left untouched.
///
/// `description: Some("")` clears the description.
#[derive(Clone, Debug, Default)]
pub struct ExpenseUpdateCmd {
    pub expense_id: String,
    pub amount_minor: Option<i64>,
    pub category_id: Option<String>,
    pub account_id: Option<String>,
    pub description: Option<String>,
    /// Authenticated caller.
    pub user_id: String,
}

impl ExpenseUpdateCmd {
    #[must_use]
    pub fn new(expense_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            expense_id: expense_id.into(),
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn amount_minor(mut self, amount_minor: i64) -> Self {
        self.amount_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    #[must_use]
    pub fn account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
