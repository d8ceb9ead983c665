//! Handlers for the `/auth` resource (signup, login, refresh, logout,
//! password reset).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use b2gthr_core::CoreError;
use b2gthr_db::models::profile::{CreateProfile, Profile, ProfileResponse};
use b2gthr_db::repositories::{ProfileRepo, PrivacyRepo, ResetTokenRepo, SessionRepo};

use crate::auth::jwt::{generate_access_token, generate_opaque_token, hash_opaque_token};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 120, message = "Display name is required"))]
    pub full_name: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh` and `POST /auth/logout`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Request body for `POST /auth/forgot-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
}

/// Request body for `POST /auth/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

/// Successful authentication response returned by signup, login, and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: ProfileResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Create an account. Provisions the default profile and privacy settings
/// idempotently, then signs the new user in.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<Json<AuthResponse>> {
    // 1. Client-side-style validation before any database work.
    input.validate()?;
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    // 2. Reject duplicate emails with a specific message.
    if ProfileRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "An account with this email already exists".into(),
        )));
    }

    // 3. Hash the password and provision the profile + privacy settings.
    //    Both writes are idempotent: re-running them never overwrites an
    //    existing profile or its mood.
    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let profile_id = Uuid::new_v4();
    let create = CreateProfile {
        id: profile_id,
        email: input.email.clone(),
        full_name: input.full_name.clone(),
        password_hash,
    };
    let profile = match ProfileRepo::create(&state.pool, &create).await? {
        Some(profile) => profile,
        // The id already existed; keep the original row untouched.
        None => ProfileRepo::find_by_id(&state.pool, profile_id)
            .await?
            .ok_or_else(|| AppError::InternalError("Profile provisioning raced".into()))?,
    };
    PrivacyRepo::provision_default(&state.pool, profile.id).await?;

    // 4. Announce the new profile on the change feed.
    state.feed.publish(b2gthr_events::ChangeEvent::Insert {
        new: super::profile::to_profile_change(&profile)?,
    });

    tracing::info!(user_id = %profile.id, "New account provisioned");

    let response = create_auth_response(&state, profile).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let profile = ProfileRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    let password_valid = verify_password(&input.password, &profile.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    let response = create_auth_response(&state, profile).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_opaque_token(&input.refresh_token);

    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    // Rotate: the old session is gone before new tokens are issued.
    SessionRepo::delete(&state.pool, session.id).await?;

    let profile = ProfileRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Account no longer exists".into()))
        })?;

    let response = create_auth_response(&state, profile).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Revoke the presented refresh token and disconnect the viewer's WebSocket
/// sessions, which tears down their mood synchronizer and roster. No stale
/// roster data survives a session change.
pub async fn logout(
    State(state): State<AppState>,
    viewer: AuthUser,
    Json(input): Json<RefreshRequest>,
) -> AppResult<StatusCode> {
    let token_hash = hash_opaque_token(&input.refresh_token);
    if let Some(session) =
        SessionRepo::find_by_refresh_token_hash(&state.pool, &token_hash).await?
    {
        if session.user_id == viewer.user_id {
            SessionRepo::delete(&state.pool, session.id).await?;
        }
    }

    state.ws_manager.disconnect_user(viewer.user_id).await;
    tracing::info!(user_id = %viewer.user_id, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/forgot-password
///
/// Issue a single-use reset token. Always answers 202 so the endpoint does
/// not reveal whether an email is registered.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordRequest>,
) -> AppResult<StatusCode> {
    input.validate()?;

    if let Some(profile) = ProfileRepo::find_by_email(&state.pool, &input.email).await? {
        let (_plaintext, token_hash) = generate_opaque_token();
        let expires_at =
            Utc::now() + chrono::Duration::minutes(state.config.reset_token_expiry_mins);
        ResetTokenRepo::create(&state.pool, profile.id, &token_hash, expires_at).await?;
        // The plaintext token is handed to the mail delivery pipeline, never
        // logged and never returned in the response.
        tracing::info!(user_id = %profile.id, "Password reset token issued");
    }

    Ok(StatusCode::ACCEPTED)
}

/// POST /api/v1/auth/reset-password
///
/// Consume a reset token, set the new password, and revoke every session.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.new_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let token_hash = hash_opaque_token(&input.token);
    let user_id = ResetTokenRepo::consume(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired reset token".into(),
            ))
        })?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    ProfileRepo::update_password(&state.pool, user_id, &password_hash).await?;

    // Force every device to sign in again with the new credentials.
    SessionRepo::revoke_all_for_user(&state.pool, user_id).await?;
    state.ws_manager.disconnect_user(user_id).await;

    tracing::info!(user_id = %user_id, "Password reset completed");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate tokens, persist the session, and assemble the auth response.
async fn create_auth_response(
    state: &AppState,
    profile: Profile,
) -> Result<AuthResponse, AppError> {
    let access_token = generate_access_token(profile.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_token, refresh_token_hash) = generate_opaque_token();
    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);
    SessionRepo::create(&state.pool, profile.id, &refresh_token_hash, expires_at).await?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: profile.into(),
    })
}
