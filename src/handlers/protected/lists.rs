// handlers/protected/lists.rs - /api/v1/lists[/:list_id]

use axum::{extract::State, Extension};

use crate::database::models::{List, ListDetail, ListPayload};
use crate::database::DatabaseError;
use crate::middleware::{ApiJson, ApiPath, ApiResponse, ApiResult, AuthUser};
use crate::services::list_service::list_detail;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<ListDetail>> {
    let owner = user.owner();
    let mut lists = Vec::new();
    for list in state.lists.select_any(&owner).await? {
        lists.push(list_detail(&state, &owner, list).await?);
    }
    Ok(ApiResponse::success(lists))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<ListPayload>,
) -> ApiResult<ListDetail> {
    let new = payload.into_new()?;
    let list = state.lists.insert(&user.owner(), new).await?;
    Ok(ApiResponse::created(ListDetail {
        list,
        tasks: Vec::new(),
    }))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(list_id): ApiPath<i64>,
) -> ApiResult<ListDetail> {
    let owner = user.owner();
    let list = state.lists.select_404(&owner, &list_id).await?;
    Ok(ApiResponse::success(list_detail(&state, &owner, list).await?))
}

/// Direct writes to `completed` are accepted; the next task change
/// recomputes it.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(list_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<ListPayload>,
) -> ApiResult<ListDetail> {
    let owner = user.owner();
    let patch = payload.into_patch()?;
    let list = state
        .lists
        .update(&owner, &list_id, patch)
        .await?
        .ok_or_else(DatabaseError::not_found::<List>)?;
    Ok(ApiResponse::success(list_detail(&state, &owner, list).await?))
}

pub async fn destroy(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(list_id): ApiPath<i64>,
) -> ApiResult<()> {
    if !state.lists.delete(&user.owner(), &list_id).await? {
        return Err(DatabaseError::not_found::<List>().into());
    }
    Ok(ApiResponse::no_content())
}
