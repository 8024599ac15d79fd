//! Decoding of the transparency dashboard JSON export format.

use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

use super::frame::TimeSeriesFrame;
use crate::core::error::{GridProbeError, Result};

#[derive(Debug, Deserialize)]
struct ExportData {
    #[serde(default)]
    timeseries: Vec<ExportRow>,
    #[serde(default)]
    columns: Vec<ExportColumn>,
}

#[derive(Debug, Deserialize)]
struct ExportRow {
    #[serde(rename = "_from")]
    from: String,
    #[serde(default)]
    values: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ExportColumn {
    group_level_0: String,
}

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse a `_from` timestamp into local wall-clock time.
///
/// Offsets are accepted but dropped: the API already renders timestamps in the
/// requested output time zone.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| GridProbeError::InvalidData(format!("unrecognised timestamp '{raw}'")))
}

/// Convert an export document into a frame indexed by timestamp.
pub fn parse_export_json(document: &Value) -> Result<TimeSeriesFrame> {
    let data = document
        .get("data")
        .ok_or_else(|| {
            GridProbeError::InvalidData("JSON does not contain 'data' key".to_string())
        })?;

    let data: ExportData = ExportData::deserialize(data)?;
    let columns: Vec<String> = data
        .columns
        .into_iter()
        .map(|column| column.group_level_0)
        .collect();

    let mut frame = TimeSeriesFrame::new(columns);
    for row in data.timeseries {
        let timestamp = parse_timestamp(&row.from)?;
        frame.push_row(timestamp, row.values);
    }

    Ok(frame)
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 22)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_export_json() {
        let document = json!({
            "data": {
                "columns": [
                    {"group_level_0": "Baltics"},
                    {"group_level_0": "Estonia"}
                ],
                "timeseries": [
                    {"_from": "2025-09-22T00:00:00", "_to": "2025-09-22T00:01:00", "values": [12.5, 3.0]},
                    {"_from": "2025-09-22T00:01:00", "values": [null, 4.0]}
                ]
            }
        });

        let frame = parse_export_json(&document).unwrap();
        assert_eq!(frame.columns(), ["Baltics", "Estonia"]);
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.rows()[0].timestamp, at(0, 0));
        assert_eq!(frame.rows()[0].values, vec![Some(12.5), Some(3.0)]);
        assert_eq!(frame.rows()[1].values, vec![None, Some(4.0)]);
    }

    #[test]
    fn test_parse_export_json__missing_data_key() {
        let err = parse_export_json(&json!({"error": "nope"})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid data: JSON does not contain 'data' key"
        );
    }

    #[test]
    fn test_parse_export_json__empty_data() {
        let frame = parse_export_json(&json!({"data": {}})).unwrap();
        assert!(frame.is_empty());
        assert!(frame.columns().is_empty());
    }

    #[test]
    fn test_parse_export_json__pads_short_rows() {
        let document = json!({
            "data": {
                "columns": [{"group_level_0": "A"}, {"group_level_0": "B"}],
                "timeseries": [{"_from": "2025-09-22T10:00:00", "values": [1.0]}]
            }
        });

        let frame = parse_export_json(&document).unwrap();
        assert_eq!(frame.rows()[0].values, vec![Some(1.0), None]);
    }

    #[test]
    fn test_parse_export_json__bad_timestamp() {
        let document = json!({
            "data": {
                "columns": [{"group_level_0": "A"}],
                "timeseries": [{"_from": "yesterday", "values": [1.0]}]
            }
        });

        assert!(matches!(
            parse_export_json(&document),
            Err(GridProbeError::InvalidData(_))
        ));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp("2025-09-22T10:15:00").unwrap(), at(10, 15));
        assert_eq!(parse_timestamp("2025-09-22 10:15:00").unwrap(), at(10, 15));
        assert_eq!(parse_timestamp("2025-09-22T10:15").unwrap(), at(10, 15));
        // Offset is dropped, wall-clock time kept
        assert_eq!(
            parse_timestamp("2025-09-22T10:15:00+03:00").unwrap(),
            at(10, 15)
        );
    }
}
