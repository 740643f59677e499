//! Issue API Handlers
//!
//! 分类调用在锁外进行，只有最终 upsert 持有写锁。

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::models::{IssueRecord, IssueStatus, IssueSubmission};

use crate::auth::CurrentUser;
use crate::composer::ReportComposer;
use crate::core::ServerState;
use crate::utils::validation::validate_submission;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok, ok_with_message};
use crate::views::{DashboardView, PriorityFilter, ViewMode};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub mode: Option<ViewMode>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Serialize)]
pub struct DeleteResult {
    pub id: String,
    pub removed: bool,
}

#[derive(Debug, Serialize)]
pub struct AdvanceResult {
    pub id: String,
    pub status: IssueStatus,
}

/// GET /api/issues - 仪表盘 (过滤 + grid/table)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<DashboardView>>> {
    let filter = match query.priority.as_deref() {
        None => PriorityFilter::All,
        Some(raw) => raw
            .parse::<PriorityFilter>()
            .map_err(|e| AppError::invalid_format("priority", e).with_detail("value", raw))?,
    };
    let mode = query.mode.unwrap_or_default();

    let records = state.records.read().await;
    let view = DashboardView::build(records.list(), filter, mode, &chrono::Local);
    Ok(ok(view))
}

/// GET /api/issues/{id} - 单条记录
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<IssueRecord>>> {
    let records = state.records.read().await;
    let record = records
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::issue_not_found(&id))?;
    Ok(ok(record))
}

/// POST /api/issues - 新建报告
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<IssueSubmission>,
) -> AppResult<Json<ApiResponse<IssueRecord>>> {
    validate_submission(&payload)?;

    let mut composer = ReportComposer::new();
    composer.apply_submission(payload)?;
    let record = composer
        .compose(state.classifier.as_ref(), state.config.max_image_bytes)
        .await?;

    let record = state.records.write().await.create(record)?;

    tracing::info!(id = %record.id, user_id = %user.id, priority = %record.priority, "Report created");
    Ok(ok_with_message(record, "Report created"))
}

/// PUT /api/issues/{id} - 编辑报告
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<IssueSubmission>,
) -> AppResult<Json<ApiResponse<IssueRecord>>> {
    validate_submission(&payload)?;

    let existing = state
        .records
        .read()
        .await
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::issue_not_found(&id))?;

    let mut composer = ReportComposer::edit(existing);
    composer.apply_submission(payload)?;
    let record = composer
        .compose(state.classifier.as_ref(), state.config.max_image_bytes)
        .await?;

    let mut records = state.records.write().await;
    // 分类期间记录可能已被删除
    if records.get(&id).is_none() {
        return Err(AppError::issue_not_found(&id));
    }
    records.upsert(record)?;
    let saved = records
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::issue_not_found(&id))?;
    drop(records);

    tracing::info!(id = %id, user_id = %user.id, "Report updated");
    Ok(ok_with_message(saved, "Report updated"))
}

/// DELETE /api/issues/{id}?confirm=true - 删除 (必须确认)
pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> AppResult<Json<ApiResponse<DeleteResult>>> {
    if !query.confirm {
        return Err(AppError::new(ErrorCode::DeleteNotConfirmed).with_detail("id", id));
    }

    let removed = state.records.write().await.remove(&id)?;
    if removed {
        tracing::info!(id = %id, user_id = %user.id, "Report deleted");
    }
    Ok(ok(DeleteResult { id, removed }))
}

/// POST /api/issues/{id}/advance - 推进状态
pub async fn advance(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<AdvanceResult>>> {
    let status = state
        .records
        .write()
        .await
        .advance_status(&id)?
        .ok_or_else(|| AppError::issue_not_found(&id))?;
    Ok(ok(AdvanceResult { id, status }))
}
