use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::auth::{hash_token, parse_token_header};
use crate::database::Owner;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user context attached to every protected request
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
    /// Hash of the presented token, so logout can revoke exactly this session
    pub token_hash: String,
}

impl AuthUser {
    pub fn owner(&self) -> Owner {
        Owner {
            user_id: self.user_id,
        }
    }
}

/// Token authentication middleware: resolves `Authorization: Token <key>`
/// to a live token and its user, or rejects the request with 401
pub async fn token_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = extract_token_from_headers(&headers).map_err(|msg| {
        tracing::warn!("Rejected request to {}: {}", request.uri().path(), msg);
        ApiError::unauthorized(msg)
    })?;

    let auth_user = authenticate(&state, key).await?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract the token key from the Authorization header
fn extract_token_from_headers(headers: &HeaderMap) -> Result<&str, &'static str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or("Authentication credentials were not provided.")?
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    parse_token_header(value).ok_or("Authorization header must use the Token scheme")
}

async fn authenticate(state: &AppState, key: &str) -> Result<AuthUser, ApiError> {
    let token_hash = hash_token(key);

    let Some(token) = state.tokens.find(&token_hash).await? else {
        tracing::warn!("Rejected unknown token");
        return Err(ApiError::unauthorized("Invalid token."));
    };

    if token.is_expired(state.config.security.token_ttl_hours, Utc::now()) {
        tracing::warn!("Rejected expired token for user {}", token.user_id);
        state.tokens.revoke(&token_hash).await?;
        return Err(ApiError::unauthorized("Token has expired."));
    }

    let Some(user) = state.users.find_by_id(token.user_id).await? else {
        tracing::warn!("Token refers to missing user {}", token.user_id);
        return Err(ApiError::unauthorized("Invalid token."));
    };

    Ok(AuthUser {
        user_id: user.id,
        email: user.email,
        token_hash,
    })
}
