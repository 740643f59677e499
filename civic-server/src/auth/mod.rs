//! 会话认证
//!
//! 没有密码校验，只要求存在当前会话。

mod middleware;

pub use middleware::{CurrentUser, require_session};
