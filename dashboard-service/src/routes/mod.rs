pub mod consumption;
pub mod cost;
pub mod meter_reading;
pub mod peak_demand;
pub mod peak_events;
pub mod zones;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Route names follow the dashboard clients' existing endpoint vocabulary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/apd", get(peak_events::peak_above_threshold))
        .route("/api/cc", get(cost::window_cost))
        .route("/api/hkVAhconsumption", get(consumption::hourly_facility))
        .route("/api/mccons", get(consumption::window_total))
        .route("/api/mcapcons", get(consumption::window_apparent_total))
        .route("/api/econsumption", get(consumption::per_meter))
        .route("/api/hlcons", get(consumption::high_low))
        .route("/api/zconsumption", get(consumption::zone_hourly_kwh))
        .route("/api/zkVAhconsumption", get(consumption::zone_hourly_kvah))
        .route("/api/mcpeak", get(peak_demand::facility_peak))
        .route("/api/opeakdemand", get(peak_demand::facility_series))
        .route("/api/zkVAaz", get(zones::all_zone_series))
        .route("/api/zkVA", get(zones::single_zone_series))
        .route("/api/meterreading", get(meter_reading::window_edges))
        .route("/api/zones", get(zones::zone_metadata))
        .with_state(state)
}
