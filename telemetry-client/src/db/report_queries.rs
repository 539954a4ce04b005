use std::ops::RangeInclusive;

use anyhow::Result;
use sqlx::PgPool;
use time::PrimitiveDateTime;

/// Per-minute sum of instantaneous apparent power across a meter range.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MinuteLoad {
    pub minute: PrimitiveDateTime,
    pub total_kva: f64,
}

/// Facility-wide minute load, newest first. Threshold filtering happens in
/// the reporting layer so the alert ceiling stays configurable.
pub async fn minute_load_totals(
    pool: &PgPool,
    meters: RangeInclusive<i32>,
    start: PrimitiveDateTime,
    end: PrimitiveDateTime,
) -> Result<Vec<MinuteLoad>> {
    let rows = sqlx::query_as::<_, MinuteLoad>(
        r#"
        SELECT
            date_trunc('minute', ts) AS minute,
            SUM(kva) AS total_kva
        FROM telemetry
        WHERE meter_id BETWEEN $1 AND $2
          AND ts BETWEEN $3 AND $4
        GROUP BY minute
        ORDER BY minute DESC
        "#,
    )
    .bind(*meters.start())
    .bind(*meters.end())
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Cumulative-counter extremes per meter per hour-of-day (0-23), pooling the
/// same clock hour across days. Tariff classification of the hours happens in
/// the reporting layer.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HourOfDayCounters {
    pub meter_id: i32,
    pub hour_of_day: i32,
    pub max_kvah: f64,
    pub min_kvah: f64,
}

pub async fn hour_of_day_counters(
    pool: &PgPool,
    meters: RangeInclusive<i32>,
    start: PrimitiveDateTime,
    end: PrimitiveDateTime,
) -> Result<Vec<HourOfDayCounters>> {
    let rows = sqlx::query_as::<_, HourOfDayCounters>(
        r#"
        SELECT
            meter_id,
            CAST(EXTRACT(HOUR FROM ts) AS INT4) AS hour_of_day,
            MAX(kvah) AS max_kvah,
            MIN(kvah) AS min_kvah
        FROM telemetry
        WHERE meter_id BETWEEN $1 AND $2
          AND ts BETWEEN $3 AND $4
        GROUP BY meter_id, hour_of_day
        "#,
    )
    .bind(*meters.start())
    .bind(*meters.end())
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Which cumulative counter an hourly query aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    Kvah,
    Kwh,
}

impl CounterKind {
    fn column(self) -> &'static str {
        match self {
            Self::Kvah => "kvah",
            Self::Kwh => "kwh",
        }
    }
}

/// Cumulative-counter extremes per meter per calendar-hour bucket, ordered by
/// meter then hour so the delta pass can walk each meter's buckets in order.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HourlyCounters {
    pub meter_id: i32,
    pub hour: PrimitiveDateTime,
    pub max_value: f64,
    pub min_value: f64,
}

pub async fn hourly_counters(
    pool: &PgPool,
    counter: CounterKind,
    meters: RangeInclusive<i32>,
    start: PrimitiveDateTime,
    end: PrimitiveDateTime,
) -> Result<Vec<HourlyCounters>> {
    // The column name comes from a closed enum, never from request input.
    let sql = format!(
        r#"
        SELECT
            meter_id,
            date_trunc('hour', ts) AS hour,
            MAX({col}) AS max_value,
            MIN({col}) AS min_value
        FROM telemetry
        WHERE meter_id BETWEEN $1 AND $2
          AND ts BETWEEN $3 AND $4
        GROUP BY meter_id, hour
        ORDER BY meter_id, hour
        "#,
        col = counter.column()
    );

    let rows = sqlx::query_as::<_, HourlyCounters>(&sql)
        .bind(*meters.start())
        .bind(*meters.end())
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Counter spread per meter over the whole window, ordered by meter.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MeterConsumption {
    pub meter_id: i32,
    pub consumed: f64,
}

pub async fn meter_consumption_totals(
    pool: &PgPool,
    counter: CounterKind,
    meters: RangeInclusive<i32>,
    start: PrimitiveDateTime,
    end: PrimitiveDateTime,
) -> Result<Vec<MeterConsumption>> {
    let sql = format!(
        r#"
        SELECT
            meter_id,
            MAX({col}) - MIN({col}) AS consumed
        FROM telemetry
        WHERE meter_id BETWEEN $1 AND $2
          AND ts BETWEEN $3 AND $4
        GROUP BY meter_id
        ORDER BY meter_id
        "#,
        col = counter.column()
    );

    let rows = sqlx::query_as::<_, MeterConsumption>(&sql)
        .bind(*meters.start())
        .bind(*meters.end())
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// One raw power sample tagged with its minute bucket.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MinuteSample {
    pub minute: PrimitiveDateTime,
    pub kva: f64,
}

pub async fn minute_samples(
    pool: &PgPool,
    meter_id: i32,
    start: PrimitiveDateTime,
    end: PrimitiveDateTime,
) -> Result<Vec<MinuteSample>> {
    let rows = sqlx::query_as::<_, MinuteSample>(
        r#"
        SELECT
            date_trunc('minute', ts) AS minute,
            kva
        FROM telemetry
        WHERE meter_id = $1
          AND ts BETWEEN $2 AND $3
        ORDER BY ts
        "#,
    )
    .bind(meter_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Raw power sample for one zone meter, ordered by meter then time for
/// client-side series grouping.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ZoneMinuteSample {
    pub minute: PrimitiveDateTime,
    pub zone_id: i32,
    pub kva: f64,
}

pub async fn zone_minute_samples(
    pool: &PgPool,
    meters: RangeInclusive<i32>,
    start: PrimitiveDateTime,
    end: PrimitiveDateTime,
) -> Result<Vec<ZoneMinuteSample>> {
    let rows = sqlx::query_as::<_, ZoneMinuteSample>(
        r#"
        SELECT
            date_trunc('minute', ts) AS minute,
            meter_id AS zone_id,
            kva
        FROM telemetry
        WHERE meter_id BETWEEN $1 AND $2
          AND ts BETWEEN $3 AND $4
        ORDER BY meter_id, ts
        "#,
    )
    .bind(*meters.start())
    .bind(*meters.end())
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// First and last counter readings per meter in the window. Cumulative
/// counters are non-decreasing, so MIN/MAX line up with the first and last
/// samples.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReadingEdges {
    pub zone_id: i32,
    pub first_ts: PrimitiveDateTime,
    pub last_ts: PrimitiveDateTime,
    pub first_kvah: f64,
    pub last_kvah: f64,
    pub first_kwh: f64,
    pub last_kwh: f64,
}

pub async fn reading_edges(
    pool: &PgPool,
    meters: RangeInclusive<i32>,
    start: PrimitiveDateTime,
    end: PrimitiveDateTime,
) -> Result<Vec<ReadingEdges>> {
    let rows = sqlx::query_as::<_, ReadingEdges>(
        r#"
        SELECT
            meter_id AS zone_id,
            MIN(ts) AS first_ts,
            MAX(ts) AS last_ts,
            MIN(kvah) AS first_kvah,
            MAX(kvah) AS last_kvah,
            MIN(kwh) AS first_kwh,
            MAX(kwh) AS last_kwh
        FROM telemetry
        WHERE meter_id BETWEEN $1 AND $2
          AND ts BETWEEN $3 AND $4
        GROUP BY meter_id
        ORDER BY meter_id
        "#,
    )
    .bind(*meters.start())
    .bind(*meters.end())
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
