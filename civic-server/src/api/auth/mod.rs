//! Auth API 模块
//!
//! | 路径 | 方法 | 认证 |
//! |------|------|------|
//! | /api/auth/login | POST | 无 |
//! | /api/auth/logout | POST | 会话 |
//! | /api/auth/me | GET | 会话 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/login", post(handler::login))
        .route("/logout", post(handler::logout))
        .route("/me", get(handler::me))
}
