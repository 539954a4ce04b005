use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use telemetry_client::db::report_queries;
use telemetry_client::FACILITY_METER_ID;

use crate::{
    error::ApiError,
    reports::{self, round1},
    state::AppState,
    window::{format_label, ReportingWindow, WindowQuery},
};

#[derive(Debug, Serialize)]
pub struct FacilityPeakResponse {
    #[serde(rename = "peakDemand")]
    pub peak_demand: f64,
}

/// Highest apparent-power sample on the whole-facility feed, taken over the
/// same minute series the demand chart renders so the two reports cannot
/// disagree. An empty window reports zero, not an error.
pub async fn facility_peak(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<FacilityPeakResponse>, ApiError> {
    let window = ReportingWindow::from_query(&query)?;
    metrics::counter!("api_facility_peak_requests_total").increment(1);

    let rows =
        report_queries::minute_samples(&state.pool, FACILITY_METER_ID, window.start, window.end)
            .await?;

    Ok(Json(FacilityPeakResponse {
        peak_demand: reports::peak_of(&rows).unwrap_or(0.0),
    }))
}

#[derive(Debug, Serialize)]
pub struct PeakSampleRow {
    pub minute: String,
    #[serde(rename = "total_kVA")]
    pub total_kva: f64,
}

#[derive(Debug, Serialize)]
pub struct FacilitySeriesResponse {
    #[serde(rename = "peakDemandData")]
    pub peak_demand_data: Vec<PeakSampleRow>,
}

/// Unaggregated per-minute apparent-power series for the whole-facility
/// feed, ascending, for the demand chart.
pub async fn facility_series(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<FacilitySeriesResponse>, ApiError> {
    let window = ReportingWindow::from_query(&query)?;
    metrics::counter!("api_facility_series_requests_total").increment(1);

    let rows =
        report_queries::minute_samples(&state.pool, FACILITY_METER_ID, window.start, window.end)
            .await?;

    let peak_demand_data = rows
        .into_iter()
        .map(|row| PeakSampleRow {
            minute: format_label(row.minute),
            total_kva: round1(row.kva),
        })
        .collect();

    Ok(Json(FacilitySeriesResponse { peak_demand_data }))
}
