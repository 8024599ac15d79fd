//! Baltic balancing analysis
//!
//! Fetches aFRR activations and imbalance volumes for one day from the
//! transparency dashboard, aligns them on a fixed cadence, derives summary
//! metrics and renders a dual-axis chart.

pub mod chart;
pub mod client;
pub mod export;
pub mod frame;
pub mod metrics;

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Config;
use crate::core::constants::{balancing, datasets, export_api};
use crate::core::error::{GridProbeError, Result};
use crate::reporting::logging;
use crate::ui::progress::ProgressReporter;

pub use client::{ExportClient, ExportRequest, ExportSource};
pub use export::parse_export_json;
pub use frame::{AlignedPoint, TimeSeriesFrame, align_first_columns};
pub use metrics::DayMetrics;

/// Settings for one balancing run, resolved from [`Config`]
#[derive(Debug, Clone)]
pub struct BalancingOptions {
    pub timezone: String,
    pub afrr_dataset: String,
    pub imbalance_dataset: String,
    pub balancing_state_dataset: String,
    pub resample_minutes: u32,
    pub preview_rows: usize,
    /// Directory for the chart; `None` skips rendering
    pub chart_dir: Option<PathBuf>,
}

impl BalancingOptions {
    pub fn from_config(config: &Config) -> Self {
        let plot = config.plot.unwrap_or(true);
        Self {
            timezone: config
                .timezone
                .clone()
                .unwrap_or_else(|| export_api::DEFAULT_TIMEZONE.to_string()),
            afrr_dataset: config
                .afrr_dataset
                .clone()
                .unwrap_or_else(|| datasets::AFRR_ACTIVATIONS.to_string()),
            imbalance_dataset: config
                .imbalance_dataset
                .clone()
                .unwrap_or_else(|| datasets::IMBALANCE_VOLUMES.to_string()),
            balancing_state_dataset: config
                .balancing_state_dataset
                .clone()
                .unwrap_or_else(|| datasets::BALANCING_STATE.to_string()),
            resample_minutes: config.resample_minutes(),
            preview_rows: config
                .preview_rows
                .unwrap_or(balancing::DEFAULT_PREVIEW_ROWS),
            chart_dir: plot.then(|| {
                PathBuf::from(
                    config
                        .output_dir
                        .as_deref()
                        .unwrap_or(balancing::DEFAULT_OUTPUT_DIR),
                )
            }),
        }
    }
}

impl Default for BalancingOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Everything produced for an analysed day
#[derive(Debug, Clone, Serialize)]
pub struct DayReport {
    pub date: NaiveDate,
    pub metrics: DayMetrics,
    pub intervals: Vec<AlignedPoint>,
    pub chart_path: Option<PathBuf>,
    /// Head of the balancing state export; `None` when that fetch failed
    pub balancing_state: Option<TimeSeriesFrame>,
}

/// Result of [`analyze_day`]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DayOutcome {
    /// One of the two series came back without rows or columns
    NoData { date: NaiveDate },
    Analyzed(Box<DayReport>),
}

/// Parse a `YYYY-MM-DD` date argument
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        GridProbeError::InvalidArgument(format!("'{raw}' is not a date in YYYY-MM-DD form"))
    })
}

/// Inclusive local window covering the whole day
pub fn day_window(date: NaiveDate) -> (String, String) {
    let day = date.format("%Y-%m-%d");
    (format!("{day}T00:00:00"), format!("{day}T23:59:59"))
}

/// Chart file name for a day
pub fn chart_file_name(date: NaiveDate) -> String {
    format!(
        "{}{}.png",
        balancing::CHART_FILE_PREFIX,
        date.format("%Y-%m-%d")
    )
}

async fn fetch_frame<S>(
    source: &S,
    dataset: &str,
    date: NaiveDate,
    options: &BalancingOptions,
    progress: Option<&ProgressReporter>,
    label: &str,
) -> Result<TimeSeriesFrame>
where
    S: ExportSource + Sync + ?Sized,
{
    let (start, end) = day_window(date);
    let request = ExportRequest::new(dataset, &start, &end, &options.timezone);

    let spinner = progress.map(|p| p.start_fetch(label));
    let document = source.fetch_export(&request).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let frame = parse_export_json(&document?)?;
    logging::log_frame(dataset, frame.len(), frame.columns().len());
    Ok(frame)
}

/// Fetch, align and summarise one day of balancing data.
pub async fn analyze_day<S>(
    source: &S,
    date: NaiveDate,
    options: &BalancingOptions,
    progress: Option<&ProgressReporter>,
) -> Result<DayOutcome>
where
    S: ExportSource + Sync + ?Sized,
{
    let afrr = fetch_frame(
        source,
        &options.afrr_dataset,
        date,
        options,
        progress,
        "Fetching aFRR activation...",
    )
    .await?;
    let imbalance = fetch_frame(
        source,
        &options.imbalance_dataset,
        date,
        options,
        progress,
        "Fetching imbalance volumes...",
    )
    .await?;

    let afrr_q = afrr.resample_mean(options.resample_minutes)?;
    let imbalance_q = imbalance.resample_mean(options.resample_minutes)?;

    if !has_data(&afrr_q) || !has_data(&imbalance_q) {
        logging::log_warning(&format!("No data returned for aFRR or imbalance on {date}"));
        return Ok(DayOutcome::NoData { date });
    }

    let intervals = align_first_columns(&afrr_q, &imbalance_q)?;
    let metrics = DayMetrics::compute(&intervals, options.resample_minutes);

    // Chart and preview failures are reported as warnings; the metrics stand
    let chart_path = match options.chart_dir {
        Some(ref dir) if !intervals.is_empty() => {
            let path = dir.join(chart_file_name(date));
            let label = date.format("%Y-%m-%d").to_string();
            match chart::render_day_chart(&intervals, &label, &path) {
                Ok(()) => {
                    logging::log_chart(&path);
                    Some(path)
                }
                Err(e) => {
                    logging::log_warning(&format!(
                        "Could not render chart {}: {e}",
                        path.display()
                    ));
                    None
                }
            }
        }
        _ => None,
    };

    let balancing_state = match fetch_frame(
        source,
        &options.balancing_state_dataset,
        date,
        options,
        progress,
        "Fetching current balancing state...",
    )
    .await
    {
        Ok(state) => Some(state.head(options.preview_rows)),
        Err(e) => {
            logging::log_warning(&format!("Could not fetch balancing state: {e}"));
            None
        }
    };

    Ok(DayOutcome::Analyzed(Box::new(DayReport {
        date,
        metrics,
        intervals,
        chart_path,
        balancing_state,
    })))
}

/// A frame is usable when it has at least one row and one column
fn has_data(frame: &TimeSeriesFrame) -> bool {
    !frame.is_empty() && !frame.columns().is_empty()
}
