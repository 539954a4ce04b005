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
    window::{format_label, ReportingWindow, WindowQuery},
};

#[derive(Debug, Serialize)]
pub struct PeakMinuteRow {
    pub id: usize,
    pub minute: String,
    #[serde(rename = "total_kVA")]
    pub total_kva: f64,
}

#[derive(Debug, Serialize)]
pub struct PeakAboveThresholdResponse {
    #[serde(rename = "peakDemandAboveThreshold")]
    pub peak_demand_above_threshold: Vec<PeakMinuteRow>,
}

/// Minutes whose facility-wide load crossed the alert threshold, newest
/// first. Feeds both the alert log table and the notification bell.
pub async fn peak_above_threshold(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<PeakAboveThresholdResponse>, ApiError> {
    let window = ReportingWindow::from_query(&query)?;
    metrics::counter!("api_peak_alert_requests_total").increment(1);

    let rows =
        report_queries::minute_load_totals(&state.pool, ZONE_METER_IDS, window.start, window.end)
            .await?;

    let peaks = reports::peak_minutes_above(rows, state.config.demand.alert_threshold_kva);
    let peak_demand_above_threshold = peaks
        .into_iter()
        .enumerate()
        .map(|(i, peak)| PeakMinuteRow {
            id: i + 1,
            minute: format_label(peak.minute),
            total_kva: peak.total_kva,
        })
        .collect();

    Ok(Json(PeakAboveThresholdResponse { peak_demand_above_threshold }))
}
