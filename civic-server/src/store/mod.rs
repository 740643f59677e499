//! 持久化层
//!
//! - [`Storage`] 键值 blob 存储 (文件 / 内存)
//! - [`RecordStore`] 问题记录列表 (`cp_issues`)
//! - [`SessionStore`] 当前登录身份 (`cp_user`)

pub mod records;
pub mod session;
pub mod storage;

pub use records::{RecordStore, UpsertOutcome};
pub use session::SessionStore;
pub use storage::{FileStorage, MemoryStorage, Storage};

/// Storage key of the issue list blob
pub const ISSUES_KEY: &str = "cp_issues";
/// Storage key of the session blob
pub const SESSION_KEY: &str = "cp_user";
