//! Category endpoints.
//!
//! Categories created over HTTP are personal to the caller; asking for a
//! global one is rejected by the engine since this path is never privileged.

use api_types::category::{CategoryList, CategoryNew, CategoryRename, CategoryView};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Category, CategoryListFilter, CategoryScope, User};

use crate::{ServerError, server::ServerState};

fn category_view(category: Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        is_global: category.is_global,
        user_id: category.user_id,
        created_at: category.created_at,
    }
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<CategoryList>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let filter = CategoryListFilter {
        name: query.name,
        is_global: query.is_global,
    };
    let categories = state.engine.list_categories(&user.id, &filter).await?;
    Ok(Json(categories.into_iter().map(category_view).collect()))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let scope = if payload.is_global {
        CategoryScope::Global
    } else {
        CategoryScope::Personal(user.id)
    };
    let category = state
        .engine
        .create_category(&payload.name, scope, false)
        .await?;
    Ok((StatusCode::CREATED, Json(category_view(category))))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state.engine.category(&id, &user.id).await?;
    Ok(Json(category_view(category)))
}

pub async fn rename(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryRename>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state
        .engine
        .rename_category(&id, &payload.name, &user.id)
        .await?;
    Ok(Json(category_view(category)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_category(&id, &user.id, false).await?;
    Ok(StatusCode::NO_CONTENT)
}
