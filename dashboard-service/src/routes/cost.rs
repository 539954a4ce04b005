use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use telemetry_client::db::report_queries;
use telemetry_client::ZONE_METER_IDS;

use crate::{
    error::ApiError,
    reports,
    state::AppState,
    window::{ReportingWindow, WindowQuery},
};

#[derive(Debug, Serialize)]
pub struct TotalCostResponse {
    #[serde(rename = "totalCost")]
    pub total_cost: f64,
}

/// Billed cost of the window across all zone meters and tariff periods.
/// The only endpoint that reports an empty window as 404.
pub async fn window_cost(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<TotalCostResponse>, ApiError> {
    let window = ReportingWindow::from_query(&query)?;
    metrics::counter!("api_cost_requests_total").increment(1);

    let rows =
        report_queries::hour_of_day_counters(&state.pool, ZONE_METER_IDS, window.start, window.end)
            .await?;

    let total_cost = reports::total_cost(&rows, &state.config.tariff).ok_or(ApiError::NoData)?;

    Ok(Json(TotalCostResponse { total_cost }))
}
