//! Civic Pulse Server - 市政问题上报看板
//!
//! # 架构概述
//!
//! - **存储** (`store`): 问题记录列表与当前会话，JSON blob 持久化
//! - **报告编辑器** (`composer`): 定位状态机、输入校验、AI 分类
//! - **外部服务** (`services`): Gemini 分类、Google 逆地理编码
//! - **视图** (`views`): 仪表盘 / 地图 / 统计投影
//! - **HTTP API** (`api`): RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! civic-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # 会话中间件
//! ├── store/         # 记录 & 会话存储
//! ├── composer/      # 报告编辑器 + 定位状态机
//! ├── services/      # 分类、逆地理编码、axum 应用
//! ├── views/         # 只读投影
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误、日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod composer;
pub mod core;
pub mod services;
pub mod store;
pub mod utils;
pub mod views;

// Re-export 公共类型
pub use composer::{LocationState, ReportComposer};
pub use crate::core::{Config, Server, ServerState};
pub use store::{RecordStore, SessionStore};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境: .env → 工作目录 → 日志
pub fn setup_environment() -> anyhow::Result<Config> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;

    let json_format = config.is_production();
    if config.log_to_file {
        let log_dir = config.log_dir();
        init_logger_with_file(&config.log_level, json_format, log_dir.to_str())?;
    } else {
        init_logger(&config.log_level, json_format)?;
    }

    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
   _____ _       _        ____        _
  / ____(_)     (_)      |  _ \      | |
 | |     ___   ___  ___  | |_) |_   _| |___  ___
 | |    | \ \ / / |/ __| |  __/| | | | / __|/ _ \
 | |____| |\ V /| | (__  | |   | |_| | \__ \  __/
  \_____|_| \_/ |_|\___| |_|    \__,_|_|___/\___|
    "#
    );
}
