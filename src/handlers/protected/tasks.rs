// handlers/protected/tasks.rs - /api/v1/lists/:list_id/tasks[/:task_id]
//
// Every write here is followed by sync_list_completion on the parent list.

use axum::{extract::State, Extension};

use crate::database::models::{List, Task, TaskPayload};
use crate::database::{DatabaseError, ListScope};
use crate::middleware::{ApiJson, ApiPath, ApiResponse, ApiResult, AuthUser};
use crate::services::list_service::sync_list_completion;
use crate::state::AppState;

async fn list_scope(
    state: &AppState,
    user: &AuthUser,
    list_id: i64,
) -> Result<ListScope, DatabaseError> {
    let owner = user.owner();
    let list: List = state.lists.select_404(&owner, &list_id).await?;
    Ok(owner.list(list.id))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(list_id): ApiPath<i64>,
) -> ApiResult<Vec<Task>> {
    let scope = list_scope(&state, &user, list_id).await?;
    Ok(ApiResponse::success(state.tasks.select_any(&scope).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(list_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<TaskPayload>,
) -> ApiResult<Task> {
    let scope = list_scope(&state, &user, list_id).await?;
    let new = payload.into_new()?;
    let task = state.tasks.insert(&scope, new).await?;
    sync_list_completion(&state, &scope).await?;
    Ok(ApiResponse::created(task))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath((list_id, task_id)): ApiPath<(i64, i64)>,
) -> ApiResult<Task> {
    let scope = user.owner().list(list_id);
    Ok(ApiResponse::success(state.tasks.select_404(&scope, &task_id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath((list_id, task_id)): ApiPath<(i64, i64)>,
    ApiJson(payload): ApiJson<TaskPayload>,
) -> ApiResult<Task> {
    let scope = user.owner().list(list_id);
    let patch = payload.into_patch()?;
    let task = state
        .tasks
        .update(&scope, &task_id, patch)
        .await?
        .ok_or_else(DatabaseError::not_found::<Task>)?;
    sync_list_completion(&state, &scope).await?;
    Ok(ApiResponse::success(task))
}

pub async fn destroy(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath((list_id, task_id)): ApiPath<(i64, i64)>,
) -> ApiResult<()> {
    let scope = user.owner().list(list_id);
    if !state.tasks.delete(&scope, &task_id).await? {
        return Err(DatabaseError::not_found::<Task>().into());
    }
    sync_list_completion(&state, &scope).await?;
    Ok(ApiResponse::no_content())
}
