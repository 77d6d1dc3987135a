//! Registration and the authenticated user's own profile.

use api_types::user::{Register, Registered, UserRename, UserView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::{RegisterCmd, User};

use crate::{ServerError, accounts::account_view, server::ServerState};

pub(crate) fn user_view(user: User) -> UserView {
    UserView {
        id: user.id,
        name: user.name,
        email: user.email,
        created_at: user.created_at,
    }
}

/// Registers a user; the response carries its new, empty account.
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<Register>,
) -> Result<(StatusCode, Json<Registered>), ServerError> {
    let (user, account) = state
        .engine
        .register_user(RegisterCmd::new(
            payload.name,
            payload.email,
            payload.password,
        ))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Registered {
            user: user_view(user),
            account: account_view(account),
        }),
    ))
}

pub async fn me(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<UserView>, ServerError> {
    let user = state.engine.user(&user.id).await?;
    Ok(Json(user_view(user)))
}

pub async fn rename(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<UserRename>,
) -> Result<Json<UserView>, ServerError> {
    let user = state
        .engine
        .rename_user(&user.id, &payload.name, &user.id)
        .await?;
    Ok(Json(user_view(user)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_user(&user.id, &user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
