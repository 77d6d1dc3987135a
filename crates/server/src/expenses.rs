//! Expense endpoints.

use api_types::expense::{ExpenseList, ExpenseNew, ExpenseUpdate, ExpenseView};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Expense, ExpenseListFilter, ExpenseNewCmd, ExpenseUpdateCmd, User};

use crate::{ServerError, server::ServerState};

fn expense_view(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        user_id: expense.user_id,
        category_id: expense.category_id,
        account_id: expense.account_id,
        amount_minor: expense.amount.cents(),
        description: expense.description,
        created_at: expense.created_at,
    }
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<ExpenseList>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let filter = ExpenseListFilter {
        category_id: query.category_id,
        account_id: query.account_id,
        from: query.from,
        to: query.to,
    };
    let expenses = state.engine.list_expenses(&user.id, &filter).await?;
    Ok(Json(expenses.into_iter().map(expense_view).collect()))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let mut cmd = ExpenseNewCmd::new(
        &user.id,
        payload.category_id,
        payload.account_id,
        payload.amount_minor,
    );
    if let Some(user_id) = payload.user_id {
        cmd = cmd.for_user(user_id);
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }

    let expense = state.engine.create_expense(cmd).await?;
    Ok((StatusCode::CREATED, Json(expense_view(expense))))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state.engine.expense(&id, &user.id).await?;
    Ok(Json(expense_view(expense)))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<ExpenseView>, ServerError> {
    let mut cmd = ExpenseUpdateCmd::new(id, &user.id);
    if let Some(amount_minor) = payload.amount_minor {
        cmd = cmd.amount_minor(amount_minor);
    }
    if let Some(category_id) = payload.category_id {
        cmd = cmd.category_id(category_id);
    }
    if let Some(account_id) = payload.account_id {
        cmd = cmd.account_id(account_id);
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }

    let expense = state.engine.update_expense(cmd).await?;
    Ok(Json(expense_view(expense)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(&id, &user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
