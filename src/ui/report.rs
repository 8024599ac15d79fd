//! Text and JSON rendering of analysis results.
//!
//! Render functions return strings so they can be tested; the `display_*`
//! functions print them to stdout.

use serde::Serialize;

use crate::balancing::{DayOutcome, DayReport, TimeSeriesFrame};
use crate::cgmes::analysis::LimitScope;
use crate::cgmes::{ModelReport, VerificationReport};
use crate::core::error::Result;

/// Compact float form: integral values keep one decimal, undefined prints `nan`.
///
/// Magnitudes from `1e16` up and non-zero ones below `1e-4` switch to
/// exponent form with a signed, two-digit exponent (`1e+16`, `1.5e-05`).
pub fn format_quantity(value: f64) -> String {
    let magnitude = value.abs();
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "inf" } else { "-inf" }.to_string()
    } else if magnitude >= 1e16 || (magnitude != 0.0 && magnitude < 1e-4) {
        format_exponent(value)
    } else if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn format_exponent(value: f64) -> String {
    let text = format!("{value:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => text,
    }
}

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "nan".to_string(), format_quantity)
}

/// Fixed-width table of a frame, `NaN` for missing cells
pub fn render_frame(frame: &TimeSeriesFrame) -> String {
    if frame.is_empty() {
        return format!("Empty frame\nColumns: [{}]", frame.columns().join(", "));
    }

    let mut header = vec!["timestamp".to_string()];
    header.extend(frame.columns().iter().cloned());

    let body: Vec<Vec<String>> = frame
        .rows()
        .iter()
        .map(|row| {
            let mut cells = vec![row.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()];
            cells.extend(
                row.values
                    .iter()
                    .map(|v| v.map_or_else(|| "NaN".to_string(), format_quantity)),
            );
            cells
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|i| {
            body.iter()
                .map(|cells| cells[i].len())
                .chain(std::iter::once(header[i].len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, &w))| {
                if i == 0 {
                    format!("{cell:<w$}")
                } else {
                    format!("{cell:>w$}")
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    std::iter::once(line(header.as_slice()))
        .chain(body.iter().map(|cells| line(cells.as_slice())))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_day_report(report: &DayReport) -> Vec<String> {
    let m = &report.metrics;
    let mut lines = vec![
        format!("Metrics for {}", report.date),
        format!("  total imbalance (MWh): {}", format_quantity(m.total_imbalance_mwh)),
        format!("  total aFRR (MWh): {}", format_quantity(m.total_afrr_mwh)),
        format!("  ratio aFRR / imbalance: {}", format_optional(m.ratio)),
        format!("  corr( aFRR , |imbalance| ):  {}", format_optional(m.correlation)),
    ];
    if let Some(ref path) = report.chart_path {
        lines.push(format!("Saved plot to file: {}", path.display()));
    }
    match report.balancing_state {
        Some(ref state) => lines.push(render_frame(state)),
        None => lines.push("Balancing state preview unavailable".to_string()),
    }
    lines
}

pub fn render_day_outcome(outcome: &DayOutcome) -> String {
    match outcome {
        DayOutcome::NoData { date } => {
            format!("No data returned for aFRR or imbalance on {date}")
        }
        DayOutcome::Analyzed(report) => render_day_report(report).join("\n"),
    }
}

fn render_counts(counts: &[(String, usize)]) -> String {
    if counts.is_empty() {
        return "none".to_string();
    }
    counts
        .iter()
        .map(|(value, n)| format!("{value} ({n}x)"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_model_report(report: &ModelReport) -> String {
    let mut lines = vec![
        "DEFINITIVE CGMES MODEL ANALYSIS".to_string(),
        "=".repeat(50),
        String::new(),
        "1. TOTAL PRODUCTION CAPACITY".to_string(),
    ];
    for unit in &report.generators {
        lines.push(format!(
            "   {}: {} MW",
            unit.name,
            format_quantity(unit.max_operating_p_mw)
        ));
    }
    let total = if report.generators.is_empty() {
        "0".to_string()
    } else {
        format_quantity(report.total_capacity_mw)
    };
    lines.push(format!("   TOTAL CAPACITY: {total} MW"));

    lines.push(String::new());
    lines.push(format!(
        "2. TRANSFORMER {} WINDING VOLTAGES",
        report.transformer_label
    ));
    for w in &report.windings {
        lines.push(format!(
            "   Winding {} ({}): {} kV",
            w.end_number, w.name, w.rated_u_kv
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "3. LINE {} OPERATIONAL LIMITS",
        report.line_name.to_uppercase()
    ));
    if report.limits.scope == LimitScope::WholeFile {
        lines.push(format!(
            "   (no limit sets name {}; using every CurrentLimit in the file)",
            report.line_name
        ));
    }
    if let Some(patl) = report.limits.patl {
        lines.push(format!(
            "   PATL (Permanent Admissible Transfer Limit): {} A",
            format_quantity(patl)
        ));
    }
    if let Some(tatl) = report.limits.tatl {
        lines.push(format!(
            "   TATL (Temporary Admissible Transfer Limit): {} A",
            format_quantity(tatl)
        ));
    }
    lines.push(
        "   Difference: PATL is for continuous operation, TATL allows temporary overload (10 minutes)"
            .to_string(),
    );

    lines.push(String::new());
    lines.push("4. SLACK GENERATOR IDENTIFICATION".to_string());
    for name in &report.slack.regulated_generators {
        lines.push(format!("   Generator with voltage regulation: {name}"));
    }
    match report.slack.slack {
        Some(ref slack) => lines.push(format!("   → Likely slack generator: {slack}")),
        None => lines.push("   No explicit slack generator identified".to_string()),
    }
    lines.push(
        "   Why slack node needed: Provides voltage reference and balances active power in load flow calculations"
            .to_string(),
    );

    lines.push(String::new());
    lines.push("5. MODEL ISSUES DETECTED".to_string());
    for (i, issue) in report.issues.iter().enumerate() {
        lines.push(format!("   {}. {issue}", i + 1));
    }

    lines.join("\n")
}

pub fn render_verification(report: &VerificationReport) -> String {
    let rule = "=".repeat(60);
    let mut lines = vec![
        String::new(),
        rule.clone(),
        "VERIFICATION OF SPECIFIC VALUES".to_string(),
        rule,
        String::new(),
        format!(
            "VERIFYING TRANSFORMER {} WINDINGS:",
            report.transformer_label
        ),
        format!(
            "   Found {} PowerTransformerEnd references for transformer {}",
            report.transformer_end_refs, report.transformer_label
        ),
        String::new(),
        format!("VERIFYING LINE {} LIMITS:", report.line_name.to_uppercase()),
    ];
    if !report.line_limit_values.is_empty() {
        lines.push(format!(
            "   Directly found limit values for {}: {} A",
            report.line_name,
            report.line_limit_values.join(", ")
        ));
    }
    lines.push(format!(
        "   Total PATL values in file: {}",
        render_counts(&report.patl_counts)
    ));
    lines.push(format!(
        "   Total TATL values in file: {}",
        render_counts(&report.tatl_counts)
    ));
    lines.join("\n")
}

/// Combined JSON document for the `cgmes` command
#[derive(Debug, Serialize)]
pub struct CgmesOutput<'a> {
    pub analysis: &'a ModelReport,
    pub verification: Option<&'a VerificationReport>,
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn display_day_outcome(outcome: &DayOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", to_json(outcome)?);
    } else {
        println!("{}", render_day_outcome(outcome));
    }
    Ok(())
}

pub fn display_cgmes(
    report: &ModelReport,
    verification: Option<&VerificationReport>,
    json: bool,
) -> Result<()> {
    if json {
        let output = CgmesOutput {
            analysis: report,
            verification,
        };
        println!("{}", to_json(&output)?);
        return Ok(());
    }

    println!("{}", render_model_report(report));
    if let Some(verification) = verification {
        println!("{}", render_verification(verification));
    }
    Ok(())
}
