use serde::Deserialize;

/// Time-of-day billing band. Classification is a total function over
/// hour-of-day; hours outside the named bands (03 and 04) fall back to
/// `Normal`, matching the billing-side boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TariffPeriod {
    OffPeak,
    Normal,
    Peak,
}

impl TariffPeriod {
    pub fn classify(hour: u8) -> Self {
        match hour {
            5..=9 => Self::OffPeak,
            10..=18 => Self::Normal,
            19..=23 | 0..=2 => Self::Peak,
            _ => Self::Normal,
        }
    }
}

/// Per-unit rates for the three bands, in currency per kVAh. Loaded from
/// configuration; the defaults are the deployed utility rates.
#[derive(Debug, Clone, Deserialize)]
pub struct TariffSchedule {
    #[serde(default = "default_off_peak_rate")]
    pub off_peak_rate: f64,
    #[serde(default = "default_normal_rate")]
    pub normal_rate: f64,
    #[serde(default = "default_peak_rate")]
    pub peak_rate: f64,
}

impl TariffSchedule {
    pub fn rate(&self, period: TariffPeriod) -> f64 {
        match period {
            TariffPeriod::OffPeak => self.off_peak_rate,
            TariffPeriod::Normal => self.normal_rate,
            TariffPeriod::Peak => self.peak_rate,
        }
    }
}

impl Default for TariffSchedule {
    fn default() -> Self {
        Self {
            off_peak_rate: default_off_peak_rate(),
            normal_rate: default_normal_rate(),
            peak_rate: default_peak_rate(),
        }
    }
}

fn default_off_peak_rate() -> f64 {
    6.035
}

fn default_normal_rate() -> f64 {
    7.10
}

fn default_peak_rate() -> f64 {
    8.165
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_total_over_the_day() {
        for hour in 0u8..24 {
            let expected = match hour {
                5..=9 => TariffPeriod::OffPeak,
                10..=18 => TariffPeriod::Normal,
                19..=23 | 0..=2 => TariffPeriod::Peak,
                _ => TariffPeriod::Normal,
            };
            assert_eq!(TariffPeriod::classify(hour), expected, "hour {hour}");
        }
    }

    #[test]
    fn early_morning_gap_falls_back_to_normal() {
        assert_eq!(TariffPeriod::classify(3), TariffPeriod::Normal);
        assert_eq!(TariffPeriod::classify(4), TariffPeriod::Normal);
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(TariffPeriod::classify(2), TariffPeriod::Peak);
        assert_eq!(TariffPeriod::classify(5), TariffPeriod::OffPeak);
        assert_eq!(TariffPeriod::classify(9), TariffPeriod::OffPeak);
        assert_eq!(TariffPeriod::classify(10), TariffPeriod::Normal);
        assert_eq!(TariffPeriod::classify(18), TariffPeriod::Normal);
        assert_eq!(TariffPeriod::classify(19), TariffPeriod::Peak);
        assert_eq!(TariffPeriod::classify(23), TariffPeriod::Peak);
        assert_eq!(TariffPeriod::classify(0), TariffPeriod::Peak);
    }

    #[test]
    fn default_schedule_rates() {
        let s = TariffSchedule::default();
        assert_eq!(s.rate(TariffPeriod::OffPeak), 6.035);
        assert_eq!(s.rate(TariffPeriod::Normal), 7.10);
        assert_eq!(s.rate(TariffPeriod::Peak), 8.165);
    }
}
