// handlers/protected/account.rs - /api/v1/users (profile), /api/v1/users/logout

use axum::{extract::State, Extension};

use crate::database::models::{ProfilePayload, UserProfile};
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<UserProfile> {
    let account = state
        .users
        .find_by_id(user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(ApiResponse::success(account.into()))
}

/// PUT|PATCH /api/v1/users - names and display name only
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<ProfilePayload>,
) -> ApiResult<UserProfile> {
    let patch = payload.into_patch()?;
    let account = state
        .users
        .update_user(user.user_id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(ApiResponse::success(account.into()))
}

/// DELETE /api/v1/users - removes the account and everything it owns
pub async fn destroy(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<()> {
    if !state.users.delete_user(user.user_id).await? {
        return Err(ApiError::not_found("User not found"));
    }
    tracing::info!("Deleted account {} ({})", user.user_id, user.email);
    Ok(ApiResponse::no_content())
}

/// POST /api/v1/users/logout - revokes the presented token only
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<()> {
    state.tokens.revoke(&user.token_hash).await?;
    tracing::info!("Account {} logged out", user.user_id);
    Ok(ApiResponse::no_content())
}
