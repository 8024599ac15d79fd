use serde::Serialize;

use super::frame::AlignedPoint;

/// Summary statistics for one analysed day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayMetrics {
    /// Aligned intervals that went into the metrics
    pub intervals: usize,
    /// Σ |imbalance| × interval hours
    pub total_imbalance_mwh: f64,
    /// Σ aFRR × interval hours
    pub total_afrr_mwh: f64,
    /// aFRR energy over imbalance energy; undefined without imbalance
    pub ratio: Option<f64>,
    /// Pearson correlation of aFRR against |imbalance|
    pub correlation: Option<f64>,
}

impl DayMetrics {
    /// Compute metrics from aligned intervals of `period_minutes` each.
    pub fn compute(points: &[AlignedPoint], period_minutes: u32) -> Self {
        let hours = f64::from(period_minutes) / 60.0;

        let total_imbalance_mwh: f64 = points
            .iter()
            .filter_map(|p| p.imbalance_mw)
            .map(|mw| mw.abs() * hours)
            .sum();
        let total_afrr_mwh: f64 = points
            .iter()
            .filter_map(|p| p.afrr_mw)
            .map(|mw| mw * hours)
            .sum();

        let ratio = (total_imbalance_mwh > 0.0).then(|| total_afrr_mwh / total_imbalance_mwh);

        let pairs: Vec<(f64, f64)> = points
            .iter()
            .filter_map(|p| Some((p.afrr_mw?, p.imbalance_mw?.abs())))
            .collect();

        Self {
            intervals: points.len(),
            total_imbalance_mwh,
            total_afrr_mwh,
            ratio,
            correlation: pearson(&pairs),
        }
    }
}

/// Pearson correlation; `None` for fewer than two pairs or a constant side.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(i: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 22)
            .unwrap()
            .and_hms_opt(i / 4, (i % 4) * 15, 0)
            .unwrap()
    }

    fn point(i: u32, afrr: Option<f64>, imbalance: Option<f64>) -> AlignedPoint {
        AlignedPoint {
            timestamp: at(i),
            afrr_mw: afrr,
            imbalance_mw: imbalance,
        }
    }

    #[test]
    fn test_totals_use_quarter_hours() {
        let points = vec![
            point(0, Some(40.0), Some(-100.0)),
            point(1, Some(20.0), Some(60.0)),
        ];

        let m = DayMetrics::compute(&points, 15);
        assert_eq!(m.intervals, 2);
        assert_eq!(m.total_imbalance_mwh, 40.0);
        assert_eq!(m.total_afrr_mwh, 15.0);
        assert_eq!(m.ratio, Some(0.375));
    }

    #[test]
    fn test_missing_values_are_skipped() {
        let points = vec![point(0, None, Some(8.0)), point(1, Some(4.0), None)];

        let m = DayMetrics::compute(&points, 15);
        assert_eq!(m.total_imbalance_mwh, 2.0);
        assert_eq!(m.total_afrr_mwh, 1.0);
        assert_eq!(m.correlation, None);
    }

    #[test]
    fn test_ratio_undefined_without_imbalance() {
        let points = vec![point(0, Some(5.0), Some(0.0)), point(1, Some(5.0), None)];

        let m = DayMetrics::compute(&points, 15);
        assert_eq!(m.total_imbalance_mwh, 0.0);
        assert_eq!(m.ratio, None);
    }

    #[test]
    fn test_correlation_against_absolute_imbalance() {
        // aFRR rises with |imbalance| even though imbalance changes sign
        let points = vec![
            point(0, Some(10.0), Some(-10.0)),
            point(1, Some(20.0), Some(20.0)),
            point(2, Some(30.0), Some(-30.0)),
        ];

        let corr = DayMetrics::compute(&points, 15).correlation.unwrap();
        assert!((corr - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_edge_cases() {
        assert_eq!(pearson(&[]), None);
        assert_eq!(pearson(&[(1.0, 2.0)]), None);
        assert_eq!(pearson(&[(1.0, 2.0), (1.0, 3.0)]), None);

        let anti = pearson(&[(1.0, 3.0), (2.0, 2.0), (3.0, 1.0)]).unwrap();
        assert!((anti + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_hourly_period() {
        let points = vec![point(0, Some(10.0), Some(10.0))];
        let m = DayMetrics::compute(&points, 60);
        assert_eq!(m.total_afrr_mwh, 10.0);
        assert_eq!(m.total_imbalance_mwh, 10.0);
    }
}
