use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run, run_with_listener};

mod accounts;
mod categories;
mod expenses;
mod health;
mod server;
mod summary;
mod user;

pub mod types {
    pub mod health {
        pub use api_types::health::{Health, Welcome};
    }

    pub mod user {
        pub use api_types::user::{Register, Registered, UserRename, UserView};
    }

    pub mod account {
        pub use api_types::account::{AccountView, Balance, IncomeList, IncomeNew, IncomeView};
    }

    pub mod category {
        pub use api_types::category::{CategoryList, CategoryNew, CategoryRename, CategoryView};
    }

    pub mod expense {
        pub use api_types::expense::{ExpenseList, ExpenseNew, ExpenseUpdate, ExpenseView};
    }

    pub mod summary {
        pub use api_types::summary::{BucketView, SummaryView};
    }
}

pub enum ServerError {
    Engine(EngineError),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) | EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::Unauthorized => StatusCode::UNAUTHORIZED,
        EngineError::Database(_) | EngineError::Password(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InsufficientFunds(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidName(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::Password(detail) => {
            tracing::error!("password hashing error: {detail}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
