//! Expensa engine: users, accounts, categories, incomes and expenses over a
//! SeaORM connection.
//!
//! Every mutating operation runs inside a single database transaction and
//! checks ownership before touching state.

pub use accounts::Account;
pub use categories::{Category, CategoryScope, DEFAULT_GLOBAL_CATEGORIES};
pub use commands::{ExpenseNewCmd, ExpenseUpdateCmd, IncomeCmd, RegisterCmd};
pub use error::EngineError;
pub use expenses::Expense;
pub use incomes::Income;
pub use money::MoneyCents;
pub use ops::{CategoryListFilter, Engine, EngineBuilder, ExpenseListFilter};
pub use summary::{Bucket, Summary, UNKNOWN_CATEGORY, summarize};
pub use users::User;

mod accounts;
mod categories;
mod commands;
mod error;
mod expenses;
pub mod guard;
mod incomes;
mod money;
mod ops;
pub mod password;
mod summary;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
