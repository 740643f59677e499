//! HTTP API 路由和处理器
//!
//! | 模块 | 路径 |
//! |------|------|
//! | [`health`] | /health |
//! | [`auth`] | /api/auth/* |
//! | [`issues`] | /api/issues/* |
//! | [`location`] | /api/location/* |
//! | [`views`] | /api/map, /api/analytics |

pub mod auth;
pub mod health;
pub mod issues;
pub mod location;
pub mod views;
