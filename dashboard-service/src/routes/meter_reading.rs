use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use telemetry_client::db::report_queries;
use telemetry_client::{domain::zone_by_id, ZONE_METER_IDS};

use crate::{
    error::ApiError,
    state::AppState,
    window::{format_label, ReportingWindow, WindowQuery},
};

#[derive(Debug, Serialize)]
pub struct ReadingPoint {
    pub timestamp: String,
    #[serde(rename = "kVAh")]
    pub kvah: f64,
    #[serde(rename = "kWh")]
    pub kwh: f64,
}

#[derive(Debug, Serialize)]
pub struct MeterReadingRow {
    pub zone: i32,
    pub name: &'static str,
    pub category: &'static str,
    pub min: ReadingPoint,
    pub max: ReadingPoint,
}

#[derive(Debug, Serialize)]
pub struct MeterReadingResponse {
    pub data: Vec<MeterReadingRow>,
}

/// First and last counter readings per zone meter in the window, for the
/// meter-reading export view.
pub async fn window_edges(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<MeterReadingResponse>, ApiError> {
    let window = ReportingWindow::from_query(&query)?;
    metrics::counter!("api_meter_reading_requests_total").increment(1);

    let rows =
        report_queries::reading_edges(&state.pool, ZONE_METER_IDS, window.start, window.end)
            .await?;

    let data = rows
        .into_iter()
        .map(|row| {
            let meta = zone_by_id(row.zone_id);
            MeterReadingRow {
                zone: row.zone_id,
                name: meta.map(|z| z.name).unwrap_or("Unknown"),
                category: meta.map(|z| z.category).unwrap_or("Unknown"),
                min: ReadingPoint {
                    timestamp: format_label(row.first_ts),
                    kvah: row.first_kvah,
                    kwh: row.first_kwh,
                },
                max: ReadingPoint {
                    timestamp: format_label(row.last_ts),
                    kvah: row.last_kvah,
                    kwh: row.last_kwh,
                },
            }
        })
        .collect();

    Ok(Json(MeterReadingResponse { data }))
}
