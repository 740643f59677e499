//! Map / Analytics API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use shared::models::Location;

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};
use crate::views::{AnalyticsView, MapView};

/// Viewer position (both or neither)
#[derive(Debug, Default, Deserialize)]
pub struct MapQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl MapQuery {
    fn viewer(&self) -> AppResult<Option<Location>> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => {
                let location = Location::new(lat, lng);
                if !location.is_valid() {
                    return Err(AppError::new(ErrorCode::InvalidCoordinates)
                        .with_detail("lat", lat)
                        .with_detail("lng", lng));
                }
                Ok(Some(location))
            }
            (None, None) => Ok(None),
            _ => Err(AppError::with_message(
                ErrorCode::InvalidCoordinates,
                "lat and lng must be given together",
            )),
        }
    }
}

/// GET /api/map - 地图中心 + 标记
pub async fn map(
    State(state): State<ServerState>,
    Query(query): Query<MapQuery>,
) -> AppResult<Json<ApiResponse<MapView>>> {
    let mut view = MapView::new(query.viewer()?);
    let records = state.records.read().await;
    view.update_markers(records.list(), &chrono::Local);
    Ok(ok(view))
}

/// GET /api/analytics - 优先级分布 / 7 日趋势 / 汇总
pub async fn analytics(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<AnalyticsView>>> {
    let records = state.records.read().await;
    Ok(ok(AnalyticsView::build(records.list(), &chrono::Local::now())))
}
