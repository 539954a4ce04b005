pub mod db;
pub mod domain;

pub use domain::{TariffPeriod, TariffSchedule, Zone, FACILITY_METER_ID, ZONE_METER_IDS, ZONES};
