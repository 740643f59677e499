//! Auth API Handlers

use axum::{
    Json,
    extract::{Extension, State},
};
use shared::models::{LoginRequest, UserSession};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::validation::validate_login;
use crate::utils::{ApiResponse, AppResult, ok, ok_with_message};

/// POST /api/auth/login - 登录 (或注册)
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<UserSession>>> {
    validate_login(&payload)?;
    let session = state.session.write().await.login(payload)?;
    Ok(ok_with_message(session, "Logged in"))
}

/// POST /api/auth/logout - 登出 (只清除会话，记录保留)
pub async fn logout(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<bool>>> {
    let previous = state.session.write().await.logout()?;
    Ok(ok(previous.is_some()))
}

/// GET /api/auth/me - 当前用户
pub async fn me(Extension(user): Extension<CurrentUser>) -> AppResult<Json<ApiResponse<UserSession>>> {
    Ok(ok(user))
}
