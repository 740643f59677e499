//! SessionStore - 当前登录身份
//!
//! 没有凭证校验：任何非空邮箱都能登录。会话持久化在 `cp_user`。

use std::sync::Arc;

use shared::models::{LoginRequest, UserSession};
use shared::util::short_id;

use super::SESSION_KEY;
use super::storage::Storage;
use crate::utils::{AppError, AppResult};

#[derive(Debug)]
pub struct SessionStore {
    current: Option<UserSession>,
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    /// 从存储加载会话 (损坏时视为未登录)
    pub fn load(storage: Arc<dyn Storage>) -> AppResult<Self> {
        let current = match storage.read(SESSION_KEY)? {
            None => None,
            Some(blob) => match serde_json::from_str::<UserSession>(&blob) {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::warn!(error = %e, key = SESSION_KEY, "Stored session is unreadable, ignoring");
                    None
                }
            },
        };
        Ok(Self { current, storage })
    }

    pub fn current(&self) -> Option<&UserSession> {
        self.current.as_ref()
    }

    /// 登录 (或注册)
    ///
    /// - email 必填
    /// - 注册模式下 name 必填
    /// - 否则 name 缺省为邮箱 `@` 之前的部分
    pub fn login(&mut self, request: LoginRequest) -> AppResult<UserSession> {
        let email = request.email.trim();
        if email.is_empty() {
            return Err(AppError::invalid_credentials("Email is required"));
        }

        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        let name = match name {
            Some(name) => name,
            None if request.register => return Err(AppError::required_field("name")),
            None => email.split('@').next().unwrap_or(email).to_string(),
        };

        let session = UserSession {
            id: short_id(),
            name,
            email: email.to_string(),
        };

        let blob = serde_json::to_string(&session)
            .map_err(|e| AppError::storage(format!("Failed to serialize session: {e}")))?;
        self.storage.write(SESSION_KEY, &blob)?;
        self.current = Some(session.clone());

        tracing::info!(target: "audit", user_id = %session.id, email = %session.email, "User logged in");
        Ok(session)
    }

    /// 登出：只删除 `cp_user`，问题记录保留
    pub fn logout(&mut self) -> AppResult<Option<UserSession>> {
        self.storage.remove(SESSION_KEY)?;
        let previous = self.current.take();
        if let Some(ref session) = previous {
            tracing::info!(target: "audit", user_id = %session.id, "User logged out");
        }
        Ok(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ISSUES_KEY;
    use crate::store::storage::MemoryStorage;
    use shared::error::ErrorCode;

    fn login(email: &str, name: Option<&str>, register: bool) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            name: name.map(Into::into),
            password: None,
            register,
        }
    }

    #[test]
    fn name_defaults_to_email_prefix() {
        let mut store = SessionStore::load(Arc::new(MemoryStorage::new())).unwrap();
        let session = store.login(login("jane.doe@example.com", None, false)).unwrap();
        assert_eq!(session.name, "jane.doe");
        assert_eq!(session.id.len(), shared::util::SHORT_ID_LEN);
        assert_eq!(store.current(), Some(&session));
    }

    #[test]
    fn blank_email_is_rejected() {
        let mut store = SessionStore::load(Arc::new(MemoryStorage::new())).unwrap();
        let err = store.login(login("   ", Some("Jane"), false)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
        assert!(store.current().is_none());
    }

    #[test]
    fn register_requires_name() {
        let mut store = SessionStore::load(Arc::new(MemoryStorage::new())).unwrap();
        let err = store.login(login("a@b.c", Some(" "), true)).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);

        let session = store.login(login("a@b.c", Some("Alice"), true)).unwrap();
        assert_eq!(session.name, "Alice");
    }

    #[test]
    fn session_survives_reload_and_logout_keeps_issues() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(ISSUES_KEY, "[]").unwrap();

        let mut store = SessionStore::load(storage.clone()).unwrap();
        let session = store.login(login("a@b.c", None, false)).unwrap();

        let reloaded = SessionStore::load(storage.clone()).unwrap();
        assert_eq!(reloaded.current(), Some(&session));

        store.logout().unwrap();
        assert!(store.current().is_none());
        assert_eq!(storage.read(SESSION_KEY).unwrap(), None);
        assert_eq!(storage.read(ISSUES_KEY).unwrap().as_deref(), Some("[]"));
    }
}
