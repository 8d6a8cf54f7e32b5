// handlers/public/auth.rs - POST /api/v1/users/signup, POST /api/v1/users/login
//
// Token acquisition. Both endpoints answer with the account profile and a
// freshly issued token; the token is shown once and only its hash is kept.

use axum::extract::State;

use crate::auth::{generate_token, hash_password, hash_token, verify_password};
use crate::database::models::{AuthSession, LoginPayload, SignupPayload, User};
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validators::FieldErrors;

const DUPLICATE_EMAIL: &str = "user with this email already exists.";
const BAD_CREDENTIALS: &str = "No user matching these credentials";

/// POST /api/v1/users/signup - create an account and log it in
pub async fn signup_post(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SignupPayload>,
) -> ApiResult<AuthSession> {
    let signup = payload.into_signup(state.config.security.min_password_length)?;

    if state.users.find_by_email(&signup.email).await?.is_some() {
        return Err(duplicate_email());
    }

    let password_hash = hash_password(&signup.password)?;
    let user = match state.users.insert_user(signup.into_new_user(password_hash)).await {
        Ok(user) => user,
        // Lost a race with a concurrent signup for the same address
        Err(DatabaseError::Integrity(_)) => return Err(duplicate_email()),
        Err(other) => return Err(other.into()),
    };

    tracing::info!("Created account {} ({})", user.id, user.email);
    let session = issue_session(&state, user).await?;
    Ok(ApiResponse::created(session))
}

/// POST /api/v1/users/login - exchange email and password for a token
pub async fn login_post(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginPayload>,
) -> ApiResult<AuthSession> {
    let (email, password) = payload.into_credentials()?;

    let Some(user) = state.users.find_by_email(&email).await? else {
        tracing::warn!("Login attempt for unknown account");
        return Err(ApiError::not_found(BAD_CREDENTIALS));
    };

    if !verify_password(&password, &user.password_hash)? {
        tracing::warn!("Failed login for account {}", user.id);
        return Err(ApiError::not_found(BAD_CREDENTIALS));
    }

    tracing::info!("Account {} logged in", user.id);
    let session = issue_session(&state, user).await?;
    Ok(ApiResponse::success(session))
}

async fn issue_session(state: &AppState, user: User) -> Result<AuthSession, ApiError> {
    let token = generate_token();
    state.tokens.issue(user.id, &hash_token(&token)).await?;
    Ok(AuthSession {
        profile: user.into(),
        token,
    })
}

fn duplicate_email() -> ApiError {
    let mut errors = FieldErrors::new();
    errors.add("email", DUPLICATE_EMAIL);
    errors.into()
}
