pub mod tariff;
pub mod zone;

pub use tariff::{TariffPeriod, TariffSchedule};
pub use zone::{zone_by_id, Zone, ZONES};

use std::ops::RangeInclusive;

/// Meter ids of the eleven production-zone sub-circuits.
pub const ZONE_METER_IDS: RangeInclusive<i32> = 1..=11;

/// Meter id of the whole-facility aggregate feed.
pub const FACILITY_METER_ID: i32 = 12;
