//! Location API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/location/resolve | POST | 设备定位结果 → 定位状态 + 地址 |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/location/resolve", post(handler::resolve))
}
