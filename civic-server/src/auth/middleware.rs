//! 会话中间件
//!
//! 为受保护路由检查当前会话

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::models::UserSession;

use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// 已登录用户，由 [`require_session`] 注入请求扩展
pub type CurrentUser = UserSession;

/// 会话中间件 - 要求存在当前会话
///
/// 成功时将 [`CurrentUser`] 注入请求扩展 (`req.extensions_mut().insert(user)`)。
///
/// # 跳过检查的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径 (`/health` 等)
/// - `/api/auth/login` (登录接口)
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无当前会话 | 401 NotAuthenticated |
pub async fn require_session(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // 允许 CORS 预检的 OPTIONS 请求
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由跳过 (让它们正常返回 404)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if path == "/api/auth/login" {
        return Ok(next.run(req).await);
    }

    let current = state.session.read().await.current().cloned();
    match current {
        Some(user) => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        None => {
            security_log!("WARN", "session_missing", uri = format!("{:?}", req.uri()));
            Err(AppError::not_authenticated())
        }
    }
}
