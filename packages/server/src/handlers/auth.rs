use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::instrument;

use crate::accounts::{Account, NewAccount};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::{
    AuthResponse, LoginRequest, RegisterRequest, validate_login_request,
    validate_register_request,
};
use crate::persistence::StoreError;
use crate::state::AppState;
use crate::utils::{hash, jwt};

#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    operation_id = "register",
    summary = "Register a new account",
    description = "Creates an account and returns it together with a bearer token.",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Email or username taken (EMAIL_TAKEN, USERNAME_TAKEN)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_register_request(&payload)?;

    let email = payload.email.trim().to_string();
    let username = payload.username.trim().to_string();

    if state.accounts.find_by_email(&email).await?.is_some() {
        return Err(AppError::EmailTaken);
    }
    if state.accounts.find_by_username(&username).await?.is_some() {
        return Err(AppError::UsernameTaken);
    }

    let password_hash = hash::hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

    let account = state
        .accounts
        .insert(NewAccount {
            email,
            username,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            StoreError::Conflict(detail) => {
                tracing::debug!("Registration race condition: unique constraint caught on insert");
                if detail.contains("email") {
                    AppError::EmailTaken
                } else {
                    AppError::UsernameTaken
                }
            }
            other => AppError::from(other),
        })?;

    Ok((StatusCode::CREATED, Json(issue_token(&state, account)?)))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Log in with email and password",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Wrong email or password (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    validate_login_request(&payload)?;

    let account = state
        .accounts
        .find_by_email(payload.email.trim())
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let is_valid = hash::verify_password(&payload.password, &account.password_hash)
        .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))?;

    if !is_valid {
        return Err(AppError::InvalidCredentials);
    }

    Ok(Json(issue_token(&state, account)?))
}

#[utoipa::path(
    get,
    path = "/profile",
    tag = "Auth",
    operation_id = "profile",
    summary = "Current account",
    description = "Returns the authenticated account and echoes the presented token.",
    responses(
        (status = 200, description = "Current account", body = AuthResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Account no longer exists (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn profile(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<AuthResponse>, AppError> {
    let account = state
        .accounts
        .find_by_id(auth_user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(Json(AuthResponse {
        user: account.into(),
        token: auth_user.token,
    }))
}

fn issue_token(state: &AppState, account: Account) -> Result<AuthResponse, AppError> {
    let token = jwt::sign(
        account.id,
        &account.username,
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_days,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    Ok(AuthResponse {
        user: account.into(),
        token,
    })
}
