//! Handlers for the `/auth` resource (login, logout, whoami).

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use sitedesk_core::error::CoreError;

use crate::auth::directory;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Opaque bearer token for the `Authorization` header.
    pub token: String,
    pub user: UserInfo,
}

/// Public user info embedded in [`LoginResponse`].
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub username: String,
    pub display_name: String,
    pub role: String,
}

impl From<&AuthUser> for UserInfo {
    fn from(user: &AuthUser) -> Self {
        Self {
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            role: user.role.to_string(),
        }
    }
}

/// POST /api/v1/auth/login
///
/// Authenticate against the static directory and open a session.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let entry = directory::authenticate(&input.username, &input.password).ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        ))
    })?;

    let user = AuthUser {
        username: entry.username.to_string(),
        display_name: entry.display_name.to_string(),
        role: entry.role,
    };
    let info = UserInfo::from(&user);
    let token = state.sessions.create(user).await;

    tracing::info!(username = %input.username, role = %info.role, "User logged in");

    Ok(Json(LoginResponse { token, user: info }))
}

/// POST /api/v1/auth/logout
///
/// Revoke the session carried in the `Authorization` header.
pub async fn logout(
    _auth: AuthUser,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<DataResponse<bool>>> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default();

    let revoked = state.sessions.revoke(token).await;
    Ok(Json(DataResponse { data: revoked }))
}

/// GET /api/v1/auth/me
///
/// Return the authenticated user for the presented token.
pub async fn me(auth: AuthUser) -> Json<DataResponse<UserInfo>> {
    Json(DataResponse {
        data: UserInfo::from(&auth),
    })
}
