//! Account and income endpoints.

use api_types::account::{AccountView, Balance, IncomeList, IncomeNew, IncomeView};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Account, Income, IncomeCmd, User};

use crate::{ServerError, server::ServerState};

pub(crate) fn account_view(account: Account) -> AccountView {
    AccountView {
        id: account.id,
        user_id: account.user_id,
        balance_minor: account.balance.cents(),
        created_at: account.created_at,
        updated_at: account.updated_at,
    }
}

fn income_view(income: Income) -> IncomeView {
    IncomeView {
        id: income.id,
        account_id: income.account_id,
        amount_minor: income.amount.cents(),
        description: income.description,
        created_at: income.created_at,
    }
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<AccountView>>, ServerError> {
    let accounts = state.engine.list_accounts(&user.id).await?;
    Ok(Json(accounts.into_iter().map(account_view).collect()))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<(StatusCode, Json<AccountView>), ServerError> {
    let account = state.engine.create_account(&user.id, &user.id).await?;
    Ok((StatusCode::CREATED, Json(account_view(account))))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state.engine.account(&id, &user.id).await?;
    Ok(Json(account_view(account)))
}

pub async fn balance(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Balance>, ServerError> {
    let account = state.engine.account(&id, &user.id).await?;
    Ok(Json(Balance {
        account_id: account.id,
        balance_minor: account.balance.cents(),
        updated_at: account.updated_at,
    }))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_account(&id, &user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn income_new(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<IncomeNew>,
) -> Result<(StatusCode, Json<IncomeView>), ServerError> {
    let mut cmd = IncomeCmd::new(id, user.id, payload.amount_minor);
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    let income = state.engine.add_income(cmd).await?;
    Ok((StatusCode::CREATED, Json(income_view(income))))
}

pub async fn income_list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<IncomeList>,
) -> Result<Json<Vec<IncomeView>>, ServerError> {
    let incomes = state
        .engine
        .list_incomes(&id, &user.id, query.from, query.to)
        .await?;
    Ok(Json(incomes.into_iter().map(income_view).collect()))
}
