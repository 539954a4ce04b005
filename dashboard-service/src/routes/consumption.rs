use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use telemetry_client::db::report_queries::{self, CounterKind};
use telemetry_client::ZONE_METER_IDS;

use crate::{
    error::ApiError,
    reports,
    state::AppState,
    window::{ReportingWindow, WindowQuery},
};

#[derive(Debug, Serialize)]
pub struct HourlyConsumptionResponse {
    #[serde(rename = "consumptionData")]
    pub consumption_data: BTreeMap<String, f64>,
}

/// Facility-wide hourly kVAh consumption, keyed by hour label in ascending
/// order.
pub async fn hourly_facility(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<HourlyConsumptionResponse>, ApiError> {
    let window = ReportingWindow::from_query(&query)?;
    metrics::counter!("api_hourly_consumption_requests_total").increment(1);

    let rows = report_queries::hourly_counters(
        &state.pool,
        CounterKind::Kvah,
        ZONE_METER_IDS,
        window.start,
        window.end,
    )
    .await?;

    Ok(Json(HourlyConsumptionResponse {
        consumption_data: reports::hourly_facility_consumption(&rows),
    }))
}

#[derive(Debug, Serialize)]
pub struct WindowTotalResponse {
    pub consumption: f64,
}

/// Single combined kWh total for the window across all zone meters.
pub async fn window_total(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<WindowTotalResponse>, ApiError> {
    window_counter_total(state, query, CounterKind::Kwh).await
}

/// The apparent-energy sibling of `window_total`: combined kVAh total for
/// the window.
pub async fn window_apparent_total(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<WindowTotalResponse>, ApiError> {
    window_counter_total(state, query, CounterKind::Kvah).await
}

async fn window_counter_total(
    state: AppState,
    query: WindowQuery,
    counter: CounterKind,
) -> Result<Json<WindowTotalResponse>, ApiError> {
    let window = ReportingWindow::from_query(&query)?;
    metrics::counter!("api_window_total_requests_total").increment(1);

    let rows = report_queries::meter_consumption_totals(
        &state.pool,
        counter,
        ZONE_METER_IDS,
        window.start,
        window.end,
    )
    .await?;

    Ok(Json(WindowTotalResponse {
        consumption: reports::total_consumption(&rows),
    }))
}

#[derive(Debug, Serialize)]
pub struct MeterConsumptionRow {
    pub energy_meter_id: i32,
    pub consumption: f64,
}

#[derive(Debug, Serialize)]
pub struct PerMeterResponse {
    #[serde(rename = "consumptionData")]
    pub consumption_data: Vec<MeterConsumptionRow>,
}

/// Per-meter kVAh consumption list for the zone usage cards.
pub async fn per_meter(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<PerMeterResponse>, ApiError> {
    let window = ReportingWindow::from_query(&query)?;
    metrics::counter!("api_per_meter_requests_total").increment(1);

    let rows = report_queries::meter_consumption_totals(
        &state.pool,
        CounterKind::Kvah,
        ZONE_METER_IDS,
        window.start,
        window.end,
    )
    .await?;

    Ok(Json(PerMeterResponse { consumption_data: meter_rows(&rows) }))
}

#[derive(Debug, Serialize)]
pub struct HighLowResponse {
    #[serde(rename = "consumptionData")]
    pub consumption_data: Vec<MeterConsumptionRow>,
    #[serde(rename = "highZone")]
    pub high_zone: Option<MeterConsumptionRow>,
    #[serde(rename = "lowZone")]
    pub low_zone: Option<MeterConsumptionRow>,
}

/// The per-meter list plus its highest- and lowest-consuming zones, for the
/// energy-sources summary.
pub async fn high_low(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<HighLowResponse>, ApiError> {
    let window = ReportingWindow::from_query(&query)?;
    metrics::counter!("api_high_low_requests_total").increment(1);

    let rows = report_queries::meter_consumption_totals(
        &state.pool,
        CounterKind::Kvah,
        ZONE_METER_IDS,
        window.start,
        window.end,
    )
    .await?;

    let extremes = reports::high_low(&rows);
    let (high_zone, low_zone) = match extremes {
        Some((high, low)) => (Some(meter_row(&high)), Some(meter_row(&low))),
        None => (None, None),
    };

    Ok(Json(HighLowResponse {
        consumption_data: meter_rows(&rows),
        high_zone,
        low_zone,
    }))
}

fn meter_rows(rows: &[report_queries::MeterConsumption]) -> Vec<MeterConsumptionRow> {
    rows.iter().map(meter_row).collect()
}

fn meter_row(row: &report_queries::MeterConsumption) -> MeterConsumptionRow {
    MeterConsumptionRow {
        energy_meter_id: row.meter_id,
        consumption: reports::round1(row.consumed),
    }
}

#[derive(Debug, Serialize)]
pub struct ZoneKwhRow {
    pub hour: String,
    #[serde(rename = "kWh_difference")]
    pub kwh_difference: f64,
}

#[derive(Debug, Serialize)]
pub struct ZoneKwhResponse {
    #[serde(rename = "consumptionData")]
    pub consumption_data: Vec<ZoneKwhRow>,
}

/// Hourly kWh delta series for one zone meter.
pub async fn zone_hourly_kwh(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<ZoneKwhResponse>, ApiError> {
    let window = ReportingWindow::from_query(&query)?;
    let zone = query.zone()?;
    metrics::counter!("api_zone_consumption_requests_total").increment(1);

    let rows = report_queries::hourly_counters(
        &state.pool,
        CounterKind::Kwh,
        zone..=zone,
        window.start,
        window.end,
    )
    .await?;

    let consumption_data = reports::zone_hourly_deltas(&rows)
        .into_iter()
        .map(|delta| ZoneKwhRow { hour: delta.hour, kwh_difference: delta.value })
        .collect();

    Ok(Json(ZoneKwhResponse { consumption_data }))
}

#[derive(Debug, Serialize)]
pub struct ZoneKvahRow {
    pub hour: String,
    #[serde(rename = "kVAh_difference")]
    pub kvah_difference: f64,
}

#[derive(Debug, Serialize)]
pub struct ZoneKvahResponse {
    #[serde(rename = "consumptionData")]
    pub consumption_data: Vec<ZoneKvahRow>,
}

/// Hourly kVAh delta series for one zone meter.
pub async fn zone_hourly_kvah(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<ZoneKvahResponse>, ApiError> {
    let window = ReportingWindow::from_query(&query)?;
    let zone = query.zone()?;
    metrics::counter!("api_zone_consumption_requests_total").increment(1);

    let rows = report_queries::hourly_counters(
        &state.pool,
        CounterKind::Kvah,
        zone..=zone,
        window.start,
        window.end,
    )
    .await?;

    let consumption_data = reports::zone_hourly_deltas(&rows)
        .into_iter()
        .map(|delta| ZoneKvahRow { hour: delta.hour, kvah_difference: delta.value })
        .collect();

    Ok(Json(ZoneKvahResponse { consumption_data }))
}
