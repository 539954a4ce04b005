use serde::Deserialize;
use time::{
    format_description::FormatItem,
    macros::format_description,
    PrimitiveDateTime,
};

use crate::error::ApiError;

/// Timestamp format shared by the query parameters, the telemetry table and
/// every bucket label in the responses.
pub const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Raw query parameters accepted by the report endpoints. All fields are
/// optional at the serde level so missing parameters surface as the fixed
/// 400 response rather than an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    #[serde(rename = "startDateTime")]
    pub start_date_time: Option<String>,
    #[serde(rename = "endDateTime")]
    pub end_date_time: Option<String>,
    pub zone: Option<i32>,
}

impl WindowQuery {
    pub fn zone(&self) -> Result<i32, ApiError> {
        self.zone.ok_or(ApiError::MissingZone)
    }
}

/// Inclusive reporting window bound verbatim into every SQL statement.
#[derive(Debug, Clone, Copy)]
pub struct ReportingWindow {
    pub start: PrimitiveDateTime,
    pub end: PrimitiveDateTime,
}

impl ReportingWindow {
    pub fn from_query(query: &WindowQuery) -> Result<Self, ApiError> {
        let (Some(start), Some(end)) = (&query.start_date_time, &query.end_date_time) else {
            return Err(ApiError::MissingWindow);
        };

        Ok(Self {
            start: parse_timestamp(start)?,
            end: parse_timestamp(end)?,
        })
    }
}

pub fn parse_timestamp(raw: &str) -> Result<PrimitiveDateTime, ApiError> {
    PrimitiveDateTime::parse(raw, TIMESTAMP_FORMAT)
        .map_err(|_| ApiError::InvalidTimestamp(raw.to_string()))
}

/// Format a bucket timestamp the way the clients expect their labels,
/// e.g. `2024-06-01 14:05:00`.
pub fn format_label(ts: PrimitiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn query(start: Option<&str>, end: Option<&str>) -> WindowQuery {
        WindowQuery {
            start_date_time: start.map(str::to_string),
            end_date_time: end.map(str::to_string),
            zone: None,
        }
    }

    #[test]
    fn parses_a_complete_window() {
        let q = query(Some("2024-06-01 00:00:00"), Some("2024-06-01 23:59:59"));
        let w = ReportingWindow::from_query(&q).unwrap();
        assert_eq!(w.start, datetime!(2024-06-01 00:00:00));
        assert_eq!(w.end, datetime!(2024-06-01 23:59:59));
    }

    #[test]
    fn missing_either_bound_is_rejected() {
        let missing_end = query(Some("2024-06-01 00:00:00"), None);
        assert!(matches!(
            ReportingWindow::from_query(&missing_end),
            Err(ApiError::MissingWindow)
        ));

        let missing_start = query(None, Some("2024-06-01 23:59:59"));
        assert!(matches!(
            ReportingWindow::from_query(&missing_start),
            Err(ApiError::MissingWindow)
        ));
    }

    #[test]
    fn garbage_timestamps_are_rejected() {
        let q = query(Some("yesterday"), Some("2024-06-01 23:59:59"));
        assert!(matches!(
            ReportingWindow::from_query(&q),
            Err(ApiError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn labels_round_trip_the_wire_format() {
        let ts = datetime!(2024-06-01 14:05:00);
        assert_eq!(format_label(ts), "2024-06-01 14:05:00");
        assert_eq!(parse_timestamp("2024-06-01 14:05:00").unwrap(), ts);
    }

    #[test]
    fn missing_zone_is_rejected() {
        let q = query(Some("2024-06-01 00:00:00"), Some("2024-06-01 23:59:59"));
        assert!(matches!(q.zone(), Err(ApiError::MissingZone)));
    }
}
