//! Issue API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/issues?priority=&mode= | GET | 仪表盘列表 |
//! | /api/issues/{id} | GET | 单条记录 |
//! | /api/issues | POST | 新建报告 |
//! | /api/issues/{id} | PUT | 编辑报告 |
//! | /api/issues/{id}?confirm=true | DELETE | 删除 (必须确认) |
//! | /api/issues/{id}/advance | POST | 推进状态 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/issues", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/advance", post(handler::advance))
}
