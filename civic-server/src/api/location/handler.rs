//! Location API Handlers

use axum::{Json, extract::State};
use serde::Serialize;
use shared::models::{Address, Location};

use crate::composer::{
    ClientReportedPosition, LocationState, PositionOptions, PositionProvider, ReportComposer,
};
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, ok};

/// Location detection outcome
///
/// Failures are reported inline through `state` (HTTP 200).
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub state: LocationState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub address: Address,
}

/// POST /api/location/resolve - 运行定位状态机
///
/// 请求体是设备上报的定位结果 (坐标或浏览器定位错误码)；
/// 两者都缺失视为设备不支持定位。
pub async fn resolve(
    State(state): State<ServerState>,
    Json(position): Json<ClientReportedPosition>,
) -> AppResult<Json<ApiResponse<ResolveResponse>>> {
    let mut composer = ReportComposer::new();
    composer
        .detect_location(
            Some(&position as &dyn PositionProvider),
            state.geocoder(),
            PositionOptions::default(),
        )
        .await?;

    Ok(ok(ResolveResponse {
        state: composer.state().clone(),
        location: composer.last_fix(),
        address: composer.address().clone(),
    }))
}
