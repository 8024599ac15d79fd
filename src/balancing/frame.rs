//! Minimal timestamp-indexed table used by the balancing analysis.
//!
//! Resampling follows the usual bucket approach: each timestamp is floored to
//! the period, values are averaged per bucket, and the bucket range is filled
//! contiguously so gaps surface as missing values.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;

use crate::core::error::{GridProbeError, Result};

/// One row of a frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub timestamp: NaiveDateTime,
    pub values: Vec<Option<f64>>,
}

/// Named columns of optional floats indexed by local timestamp
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSeriesFrame {
    columns: Vec<String>,
    rows: Vec<Row>,
}

#[derive(Debug, Default, Clone, Copy)]
struct BucketStats {
    sum: f64,
    count: usize,
}

impl TimeSeriesFrame {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating values to the column count
    pub fn push_row(&mut self, timestamp: NaiveDateTime, mut values: Vec<Option<f64>>) {
        values.resize(self.columns.len(), None);
        self.rows.push(Row { timestamp, values });
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> TimeSeriesFrame {
        TimeSeriesFrame {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Mean per column over fixed buckets of `period_minutes`.
    ///
    /// Output rows are sorted and contiguous from the first to the last
    /// occupied bucket. Buckets without any value for a column hold `None`.
    pub fn resample_mean(&self, period_minutes: u32) -> Result<TimeSeriesFrame> {
        if period_minutes == 0 {
            return Err(GridProbeError::InvalidArgument(
                "resample period must be positive".to_string(),
            ));
        }
        let period = i64::from(period_minutes) * 60;
        let width = self.columns.len();

        let mut buckets: BTreeMap<i64, Vec<BucketStats>> = BTreeMap::new();
        for row in &self.rows {
            let bucket = floor_bucket(row.timestamp.and_utc().timestamp(), period);
            let stats = buckets
                .entry(bucket)
                .or_insert_with(|| vec![BucketStats::default(); width]);
            for (slot, value) in stats.iter_mut().zip(&row.values) {
                if let Some(v) = value
                    && !v.is_nan()
                {
                    slot.sum += v;
                    slot.count += 1;
                }
            }
        }

        let mut out = TimeSeriesFrame::new(self.columns.clone());
        let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back())
        else {
            return Ok(out);
        };

        let mut bucket = first;
        while bucket <= last {
            let values = match buckets.get(&bucket) {
                Some(stats) => stats
                    .iter()
                    .map(|s| (s.count > 0).then(|| s.sum / s.count as f64))
                    .collect(),
                None => vec![None; width],
            };
            out.rows.push(Row {
                timestamp: from_epoch(bucket)?,
                values,
            });
            bucket += period;
        }

        Ok(out)
    }

    /// Values of column `index` keyed by timestamp
    pub fn column_series(&self, index: usize) -> Result<BTreeMap<NaiveDateTime, Option<f64>>> {
        if index >= self.columns.len() {
            return Err(GridProbeError::InvalidData(format!(
                "frame has {} column(s), column {index} requested",
                self.columns.len()
            )));
        }

        Ok(self
            .rows
            .iter()
            .map(|row| (row.timestamp, row.values[index]))
            .collect())
    }
}

fn floor_bucket(ts: i64, period: i64) -> i64 {
    ts.div_euclid(period) * period
}

fn from_epoch(secs: i64) -> Result<NaiveDateTime> {
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| GridProbeError::InvalidData(format!("timestamp {secs} out of range")))
}

/// One aligned interval of the two balancing series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlignedPoint {
    pub timestamp: NaiveDateTime,
    pub afrr_mw: Option<f64>,
    pub imbalance_mw: Option<f64>,
}

/// Outer-join the first column of each frame on timestamp.
///
/// Rows where both sides are missing are dropped.
pub fn align_first_columns(
    afrr: &TimeSeriesFrame,
    imbalance: &TimeSeriesFrame,
) -> Result<Vec<AlignedPoint>> {
    let afrr = afrr.column_series(0)?;
    let imbalance = imbalance.column_series(0)?;

    let mut joined: BTreeMap<NaiveDateTime, AlignedPoint> = BTreeMap::new();
    for (&timestamp, &value) in &afrr {
        joined.insert(
            timestamp,
            AlignedPoint {
                timestamp,
                afrr_mw: value,
                imbalance_mw: None,
            },
        );
    }
    for (&timestamp, &value) in &imbalance {
        joined
            .entry(timestamp)
            .or_insert(AlignedPoint {
                timestamp,
                afrr_mw: None,
                imbalance_mw: None,
            })
            .imbalance_mw = value;
    }

    Ok(joined
        .into_values()
        .filter(|p| p.afrr_mw.is_some() || p.imbalance_mw.is_some())
        .collect())
}
