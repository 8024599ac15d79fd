//! Dual-axis PNG chart of imbalance against aFRR activation.
//!
//! Rendering uses the [`plotters`] bitmap backend, so no display is needed.
//! The X axis is seconds since the first interval, labelled as local `HH:MM`.

use std::path::Path;

use chrono::{NaiveDateTime, TimeDelta};
use plotters::prelude::*;

use super::frame::AlignedPoint;
use crate::core::error::{GridProbeError, Result};

/// 12 × 5 inches at 150 dpi
pub const CHART_SIZE: (u32, u32) = (1800, 750);

const IMBALANCE_COLOR: RGBColor = RGBColor(31, 119, 180);
const AFRR_COLOR: RGBColor = RGBColor(255, 127, 14);

fn plot_err<E: std::fmt::Display>(e: E) -> GridProbeError {
    GridProbeError::Plot(e.to_string())
}

/// Value range for an axis, padded so a flat series still gets a visible band.
pub fn axis_range(values: impl Iterator<Item = f64>, include_zero: bool) -> (f64, f64) {
    let (mut lo, mut hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return (-1.0, 1.0);
    }
    if lo == hi {
        return (lo - 1.0, hi + 1.0);
    }

    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

/// Split a series into runs of present values; gaps end a run.
pub fn segments<F>(points: &[AlignedPoint], origin: NaiveDateTime, pick: F) -> Vec<Vec<(f64, f64)>>
where
    F: Fn(&AlignedPoint) -> Option<f64>,
{
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for p in points {
        match pick(p) {
            Some(v) if v.is_finite() => {
                let x = (p.timestamp - origin).num_seconds() as f64;
                current.push((x, v));
            }
            _ => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Render the chart for one day to `output_path`.
pub fn render_day_chart(
    points: &[AlignedPoint],
    date_label: &str,
    output_path: &Path,
) -> Result<()> {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Err(GridProbeError::InvalidData(
            "no aligned intervals to plot".to_string(),
        ));
    };
    let origin = first.timestamp;
    let span = ((last.timestamp - origin).num_seconds() as f64).max(60.0);

    let imbalance_range = axis_range(points.iter().filter_map(|p| p.imbalance_mw), true);
    let afrr_range = axis_range(points.iter().filter_map(|p| p.afrr_mw), false);

    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("aFRR vs Imbalance — {date_label}"), ("sans-serif", 32))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .right_y_label_area_size(80)
        .build_cartesian_2d(0.0..span, imbalance_range.0..imbalance_range.1)
        .map_err(plot_err)?
        .set_secondary_coord(0.0..span, afrr_range.0..afrr_range.1);

    let time_label = |x: &f64| {
        (origin + TimeDelta::seconds(*x as i64))
            .format("%H:%M")
            .to_string()
    };

    chart
        .configure_mesh()
        .x_desc("Time")
        .y_desc("Imbalance (MW)")
        .x_label_formatter(&time_label)
        .label_style(("sans-serif", 18))
        .draw()
        .map_err(plot_err)?;

    chart
        .configure_secondary_axes()
        .y_desc("aFRR (MW)")
        .label_style(("sans-serif", 18))
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(DashedLineSeries::new(
            vec![(0.0, 0.0), (span, 0.0)],
            8,
            6,
            BLACK.stroke_width(1),
        ))
        .map_err(plot_err)?;

    // Empty series carry the legend entries; data is drawn per run below.
    chart
        .draw_series(LineSeries::new(std::iter::empty::<(f64, f64)>(), &IMBALANCE_COLOR))
        .map_err(plot_err)?
        .label("imbalance (MW)")
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], IMBALANCE_COLOR.stroke_width(2))
        });
    chart
        .draw_secondary_series(LineSeries::new(std::iter::empty::<(f64, f64)>(), &AFRR_COLOR))
        .map_err(plot_err)?
        .label("aFRR activation (MW)")
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], AFRR_COLOR.stroke_width(2))
        });

    for run in segments(points, origin, |p| p.imbalance_mw) {
        chart
            .draw_series(LineSeries::new(run, IMBALANCE_COLOR.stroke_width(2)))
            .map_err(plot_err)?;
    }
    for run in segments(points, origin, |p| p.afrr_mw) {
        chart
            .draw_secondary_series(LineSeries::new(run, AFRR_COLOR.stroke_width(2)))
            .map_err(plot_err)?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 18))
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}
