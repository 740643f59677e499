//! Map / Analytics API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/map?lat=&lng= | GET | 地图标记 |
//! | /api/analytics | GET | 统计数据 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/map", get(handler::map))
        .route("/api/analytics", get(handler::analytics))
}
