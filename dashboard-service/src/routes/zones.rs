use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use telemetry_client::db::report_queries::{self, ZoneMinuteSample};
use telemetry_client::{Zone, ZONES, ZONE_METER_IDS};

use crate::{
    error::ApiError,
    reports::round1,
    state::AppState,
    window::{format_label, ReportingWindow, WindowQuery},
};

#[derive(Debug, Serialize)]
pub struct ZoneSampleRow {
    pub minute: String,
    pub zone_id: i32,
    #[serde(rename = "total_kVA")]
    pub total_kva: f64,
}

#[derive(Debug, Serialize)]
pub struct AllZonesSeriesResponse {
    #[serde(rename = "kvaAllZonesData")]
    pub kva_all_zones_data: Vec<ZoneSampleRow>,
}

/// Raw per-minute power series for every zone meter, ordered by meter then
/// time; the clients group the rows into one series per zone.
pub async fn all_zone_series(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<AllZonesSeriesResponse>, ApiError> {
    let window = ReportingWindow::from_query(&query)?;
    metrics::counter!("api_zone_series_requests_total").increment(1);

    let rows =
        report_queries::zone_minute_samples(&state.pool, ZONE_METER_IDS, window.start, window.end)
            .await?;

    Ok(Json(AllZonesSeriesResponse { kva_all_zones_data: sample_rows(rows) }))
}

#[derive(Debug, Serialize)]
pub struct SingleZoneSeriesResponse {
    #[serde(rename = "kvaZoneData")]
    pub kva_zone_data: Vec<ZoneSampleRow>,
}

/// The same series restricted to one selected zone meter.
pub async fn single_zone_series(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<SingleZoneSeriesResponse>, ApiError> {
    let window = ReportingWindow::from_query(&query)?;
    let zone = query.zone()?;
    metrics::counter!("api_zone_series_requests_total").increment(1);

    let rows =
        report_queries::zone_minute_samples(&state.pool, zone..=zone, window.start, window.end)
            .await?;

    Ok(Json(SingleZoneSeriesResponse { kva_zone_data: sample_rows(rows) }))
}

fn sample_rows(rows: Vec<ZoneMinuteSample>) -> Vec<ZoneSampleRow> {
    rows.into_iter()
        .map(|row| ZoneSampleRow {
            minute: format_label(row.minute),
            zone_id: row.zone_id,
            total_kva: round1(row.kva),
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct ZoneMetadataResponse {
    pub zones: &'static [Zone],
}

/// The zone metadata table, served so clients stop carrying their own
/// copies.
pub async fn zone_metadata() -> Json<ZoneMetadataResponse> {
    Json(ZoneMetadataResponse { zones: &ZONES })
}
