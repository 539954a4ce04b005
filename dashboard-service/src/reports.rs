//! Pure reshaping of query rows into report values. Everything here is
//! deterministic over in-memory rows so the aggregation rules stay testable
//! without a database.

use std::collections::BTreeMap;

use telemetry_client::db::report_queries::{
    HourOfDayCounters, HourlyCounters, MeterConsumption, MinuteLoad, MinuteSample,
};
use telemetry_client::{TariffPeriod, TariffSchedule};
use time::PrimitiveDateTime;

use crate::window::format_label;

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One minute whose facility-wide load exceeded the alert threshold. The
/// minute itself is the stable identity; `id` is only the display ordinal of
/// the newest-first listing.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakMinute {
    pub minute: PrimitiveDateTime,
    pub total_kva: f64,
}

pub fn peak_minutes_above(rows: Vec<MinuteLoad>, threshold_kva: f64) -> Vec<PeakMinute> {
    rows.into_iter()
        .filter(|row| row.total_kva > threshold_kva)
        .map(|row| PeakMinute {
            minute: row.minute,
            total_kva: round1(row.total_kva),
        })
        .collect()
}

/// Billed cost over the window: per meter and tariff period, consumption is
/// the spread of the cumulative kVAh counter over that period's rows, priced
/// at the period rate. `None` when the window produced no rows at all.
pub fn total_cost(rows: &[HourOfDayCounters], schedule: &TariffSchedule) -> Option<f64> {
    if rows.is_empty() {
        return None;
    }

    let mut spans: BTreeMap<(i32, TariffPeriod), (f64, f64)> = BTreeMap::new();
    for row in rows {
        let period = TariffPeriod::classify(row.hour_of_day as u8);
        let span = spans
            .entry((row.meter_id, period))
            .or_insert((row.max_kvah, row.min_kvah));
        span.0 = span.0.max(row.max_kvah);
        span.1 = span.1.min(row.min_kvah);
    }

    let cost: f64 = spans
        .iter()
        .map(|(&(_, period), &(max, min))| (max - min) * schedule.rate(period))
        .sum();

    Some(round2(cost))
}

/// Facility-wide hourly consumption: per meter, each hour bucket's delta is
/// its max counter minus the previous bucket's max (first bucket: max minus
/// min within the bucket). Per-meter deltas are rounded to one decimal before
/// summing across meters, matching the report the clients were built against.
/// Negative deltas from a counter reset pass through unchanged.
///
/// Input rows must be ordered by meter then hour, as `hourly_counters`
/// returns them.
pub fn hourly_facility_consumption(rows: &[HourlyCounters]) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    let mut previous: Option<(i32, f64)> = None;

    for row in rows {
        let delta = match previous {
            Some((meter_id, prior_max)) if meter_id == row.meter_id => row.max_value - prior_max,
            _ => row.max_value - row.min_value,
        };
        previous = Some((row.meter_id, row.max_value));

        *totals.entry(format_label(row.hour)).or_insert(0.0) += round1(delta);
    }

    for value in totals.values_mut() {
        *value = round1(*value);
    }

    totals
}

/// Hourly delta series for a single meter, same delta rule as the facility
/// report.
#[derive(Debug, Clone, PartialEq)]
pub struct HourDelta {
    pub hour: String,
    pub value: f64,
}

pub fn zone_hourly_deltas(rows: &[HourlyCounters]) -> Vec<HourDelta> {
    let mut previous_max: Option<f64> = None;

    rows.iter()
        .map(|row| {
            let delta = match previous_max {
                Some(prior_max) => row.max_value - prior_max,
                None => row.max_value - row.min_value,
            };
            previous_max = Some(row.max_value);

            HourDelta {
                hour: format_label(row.hour),
                value: round1(delta),
            }
        })
        .collect()
}

/// Combined counter consumption across meters for the whole window.
pub fn total_consumption(rows: &[MeterConsumption]) -> f64 {
    round1(rows.iter().map(|row| row.consumed).sum())
}

/// Peak of a minute power series. The single-value peak report is derived
/// from the same series the demand chart renders, so the two always agree.
pub fn peak_of(rows: &[MinuteSample]) -> Option<f64> {
    rows.iter().map(|row| row.kva).reduce(f64::max)
}

/// Highest- and lowest-consuming rows of a per-meter consumption report.
/// `None` when the window produced no rows.
pub fn high_low(rows: &[MeterConsumption]) -> Option<(MeterConsumption, MeterConsumption)> {
    let mut iter = rows.iter();
    let first = iter.next()?;
    let (mut high, mut low) = (first, first);

    for row in iter {
        if row.consumed > high.consumed {
            high = row;
        }
        if row.consumed < low.consumed {
            low = row;
        }
    }

    Some((high.clone(), low.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn minute_load(minute: PrimitiveDateTime, total_kva: f64) -> MinuteLoad {
        MinuteLoad { minute, total_kva }
    }

    fn hourly(meter_id: i32, hour: PrimitiveDateTime, min_value: f64, max_value: f64) -> HourlyCounters {
        HourlyCounters { meter_id, hour, max_value, min_value }
    }

    #[test]
    fn no_qualifying_minutes_yields_an_empty_report() {
        let rows = vec![
            minute_load(datetime!(2024-06-01 10:02:00), 540.0),
            minute_load(datetime!(2024-06-01 10:01:00), 596.0), // at threshold, not above
        ];
        assert!(peak_minutes_above(rows, 596.0).is_empty());
        assert!(peak_minutes_above(Vec::new(), 596.0).is_empty());
    }

    #[test]
    fn peak_minutes_keep_newest_first_order_and_round() {
        let rows = vec![
            minute_load(datetime!(2024-06-01 10:03:00), 601.46),
            minute_load(datetime!(2024-06-01 10:02:00), 540.0),
            minute_load(datetime!(2024-06-01 10:01:00), 612.04),
        ];

        let peaks = peak_minutes_above(rows, 596.0);
        assert_eq!(
            peaks,
            vec![
                PeakMinute { minute: datetime!(2024-06-01 10:03:00), total_kva: 601.5 },
                PeakMinute { minute: datetime!(2024-06-01 10:01:00), total_kva: 612.0 },
            ]
        );
    }

    #[test]
    fn empty_window_has_no_cost() {
        assert_eq!(total_cost(&[], &TariffSchedule::default()), None);
    }

    #[test]
    fn cost_prices_each_period_spread_at_its_rate() {
        // One meter: 20 units consumed across the off-peak hours, 10 across
        // normal hours. 20 * 6.035 + 10 * 7.10 = 191.70.
        let rows = vec![
            HourOfDayCounters { meter_id: 1, hour_of_day: 5, max_kvah: 110.0, min_kvah: 100.0 },
            HourOfDayCounters { meter_id: 1, hour_of_day: 9, max_kvah: 120.0, min_kvah: 112.0 },
            HourOfDayCounters { meter_id: 1, hour_of_day: 12, max_kvah: 130.0, min_kvah: 120.0 },
        ];

        let cost = total_cost(&rows, &TariffSchedule::default()).unwrap();
        assert_eq!(cost, round2(20.0 * 6.035 + 10.0 * 7.10));
    }

    #[test]
    fn cost_sums_across_meters() {
        let rows = vec![
            HourOfDayCounters { meter_id: 1, hour_of_day: 12, max_kvah: 105.0, min_kvah: 100.0 },
            HourOfDayCounters { meter_id: 2, hour_of_day: 20, max_kvah: 210.0, min_kvah: 200.0 },
        ];

        let cost = total_cost(&rows, &TariffSchedule::default()).unwrap();
        assert_eq!(cost, round2(5.0 * 7.10 + 10.0 * 8.165));
    }

    #[test]
    fn unclassified_early_hours_bill_at_the_normal_rate() {
        let rows = vec![HourOfDayCounters {
            meter_id: 4,
            hour_of_day: 3,
            max_kvah: 52.0,
            min_kvah: 50.0,
        }];

        let cost = total_cost(&rows, &TariffSchedule::default()).unwrap();
        assert_eq!(cost, round2(2.0 * 7.10));
    }

    #[test]
    fn hourly_deltas_match_hand_computed_fixture() {
        // Two meters, three hourly buckets each, known counter values.
        let rows = vec![
            hourly(1, datetime!(2024-06-01 10:00:00), 100.0, 102.0),
            hourly(1, datetime!(2024-06-01 11:00:00), 102.1, 105.5),
            hourly(1, datetime!(2024-06-01 12:00:00), 105.6, 109.0),
            hourly(2, datetime!(2024-06-01 10:00:00), 200.0, 201.0),
            hourly(2, datetime!(2024-06-01 11:00:00), 201.2, 203.2),
            hourly(2, datetime!(2024-06-01 12:00:00), 203.3, 206.7),
        ];

        let totals = hourly_facility_consumption(&rows);

        // 10:00 -> (102.0 - 100.0) + (201.0 - 200.0) = 3.0
        // 11:00 -> (105.5 - 102.0) + (203.2 - 201.0) = 5.7
        // 12:00 -> (109.0 - 105.5) + (206.7 - 203.2) = 7.0
        let expected: Vec<(&str, f64)> = vec![
            ("2024-06-01 10:00:00", 3.0),
            ("2024-06-01 11:00:00", 5.7),
            ("2024-06-01 12:00:00", 7.0),
        ];
        let got: Vec<(&str, f64)> = totals.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn first_bucket_uses_its_own_spread() {
        let rows = vec![hourly(7, datetime!(2024-06-01 08:00:00), 40.0, 43.5)];
        let totals = hourly_facility_consumption(&rows);
        assert_eq!(totals["2024-06-01 08:00:00"], 3.5);
    }

    #[test]
    fn counter_reset_produces_a_negative_delta() {
        let rows = vec![
            hourly(3, datetime!(2024-06-01 10:00:00), 500.0, 505.0),
            hourly(3, datetime!(2024-06-01 11:00:00), 0.0, 2.0), // meter replaced mid-window
        ];

        let totals = hourly_facility_consumption(&rows);
        assert_eq!(totals["2024-06-01 11:00:00"], -503.0);
    }

    #[test]
    fn zone_series_follows_the_same_delta_rule() {
        let rows = vec![
            hourly(5, datetime!(2024-06-01 10:00:00), 10.0, 12.0),
            hourly(5, datetime!(2024-06-01 11:00:00), 12.1, 15.0),
        ];

        let series = zone_hourly_deltas(&rows);
        assert_eq!(
            series,
            vec![
                HourDelta { hour: "2024-06-01 10:00:00".into(), value: 2.0 },
                HourDelta { hour: "2024-06-01 11:00:00".into(), value: 3.0 },
            ]
        );
    }

    #[test]
    fn single_value_peak_agrees_with_the_series_maximum() {
        let series = vec![
            MinuteSample { minute: datetime!(2024-06-01 10:00:00), kva: 588.2 },
            MinuteSample { minute: datetime!(2024-06-01 10:01:00), kva: 612.4 },
            MinuteSample { minute: datetime!(2024-06-01 10:02:00), kva: 604.9 },
        ];

        // The values the demand chart renders for the same window.
        let chart_values: Vec<f64> = series.iter().map(|row| round1(row.kva)).collect();
        let chart_max = chart_values.iter().copied().reduce(f64::max).unwrap();

        assert_eq!(peak_of(&series), Some(612.4));
        assert_eq!(peak_of(&series).unwrap(), chart_max);
    }

    #[test]
    fn empty_series_has_no_peak() {
        assert_eq!(peak_of(&[]), None);
    }

    #[test]
    fn high_low_picks_the_extremes() {
        let rows = vec![
            MeterConsumption { meter_id: 1, consumed: 40.0 },
            MeterConsumption { meter_id: 2, consumed: 75.5 },
            MeterConsumption { meter_id: 3, consumed: 12.25 },
        ];

        let (high, low) = high_low(&rows).unwrap();
        assert_eq!(high.meter_id, 2);
        assert_eq!(low.meter_id, 3);
    }

    #[test]
    fn high_low_over_one_row_returns_it_twice() {
        let rows = vec![MeterConsumption { meter_id: 9, consumed: 5.0 }];
        let (high, low) = high_low(&rows).unwrap();
        assert_eq!(high.meter_id, 9);
        assert_eq!(low.meter_id, 9);
        assert!(high_low(&[]).is_none());
    }

    #[test]
    fn window_total_sums_and_rounds() {
        let rows = vec![
            MeterConsumption { meter_id: 1, consumed: 10.04 },
            MeterConsumption { meter_id: 2, consumed: 20.02 },
        ];
        assert_eq!(total_consumption(&rows), 30.1);
        assert_eq!(total_consumption(&[]), 0.0);
    }
}
