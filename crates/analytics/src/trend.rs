//! Performance trend classification.
//!
//! Requires at least two chronologically ordered review scores; employees
//! below that are *excluded*, not defaulted. This is the one component where
//! absence of signal means absence of output.

use serde::{Deserialize, Serialize};

use talenthq_core::EmployeeId;

use crate::aggregate::FeatureSet;
use crate::stats::linear_fit;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

/// Trend of one employee's recent review scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceTrendEntry {
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub department: String,
    pub direction: TrendDirection,
    /// OLS slope per review step on the 1–5 review scale.
    pub slope: f64,
    /// The scores the slope was fitted over, chronological.
    pub scores: Vec<f64>,
}

/// Classify every employee with enough review history.
pub fn classify_all(features: &FeatureSet, dead_band: f64) -> Vec<PerformanceTrendEntry> {
    features
        .bundles
        .iter()
        .filter(|bundle| bundle.review_scores.len() >= 2)
        .map(|bundle| {
            let (slope, _) = linear_fit(&bundle.review_scores);
            PerformanceTrendEntry {
                employee_id: bundle.employee_id,
                employee_name: bundle.name.clone(),
                department: bundle.department.clone(),
                direction: direction_for(slope, dead_band),
                slope,
                scores: bundle.review_scores.clone(),
            }
        })
        .collect()
}

/// Only `Declining` entries feed alerts and recommendations.
pub fn declining<'a>(
    entries: &'a [PerformanceTrendEntry],
) -> impl Iterator<Item = &'a PerformanceTrendEntry> {
    entries
        .iter()
        .filter(|e| e.direction == TrendDirection::Declining)
}

fn direction_for(slope: f64, dead_band: f64) -> TrendDirection {
    if slope > dead_band {
        TrendDirection::Improving
    } else if slope < -dead_band {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::EmployeeFeatureBundle;
    use crate::snapshot::HrSnapshot;
    use chrono::NaiveDate;
    use talenthq_core::TimeWindow;

    fn features_with_scores(scores: Vec<Vec<f64>>) -> FeatureSet {
        let window =
            TimeWindow::default_at(NaiveDate::from_ymd_opt(2026, 8, 15).unwrap());
        let mut features = FeatureSet::build(&HrSnapshot::new(Vec::new()), window);
        features.bundles = scores
            .into_iter()
            .enumerate()
            .map(|(i, review_scores)| EmployeeFeatureBundle {
                employee_id: EmployeeId::new(),
                name: format!("Empleado {i}"),
                department: "TI".to_string(),
                position: "Analista".to_string(),
                tenure_months: 24,
                absence_count: 0,
                late_count: 0,
                absence_dates: Vec::new(),
                review_scores,
                months_since_last_review: Some(1),
                first_gross_pay: None,
                last_gross_pay: None,
                base_salary: 0,
                terminated: false,
            })
            .collect();
        features
    }

    #[test]
    fn single_review_produces_no_entry() {
        let features = features_with_scores(vec![vec![4.5]]);
        let entries = classify_all(&features, 0.15);
        assert!(entries.is_empty());
    }

    #[test]
    fn falling_scores_classify_as_declining() {
        let features = features_with_scores(vec![vec![4.5, 4.0, 3.2, 2.8]]);
        let entries = classify_all(&features, 0.15);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].direction, TrendDirection::Declining);
        assert!(entries[0].slope < 0.0);
    }

    #[test]
    fn dead_band_absorbs_small_wobble() {
        let features = features_with_scores(vec![vec![4.0, 3.9, 4.0, 3.95]]);
        let entries = classify_all(&features, 0.15);
        assert_eq!(entries[0].direction, TrendDirection::Stable);
    }

    #[test]
    fn rising_scores_classify_as_improving() {
        let features = features_with_scores(vec![vec![2.5, 3.0, 3.8, 4.2]]);
        let entries = classify_all(&features, 0.15);
        assert_eq!(entries[0].direction, TrendDirection::Improving);
    }

    #[test]
    fn declining_filter_only_passes_declining_entries() {
        let features = features_with_scores(vec![
            vec![4.5, 3.0, 2.0],
            vec![3.0, 3.0, 3.0],
            vec![2.0, 3.0, 4.0],
        ]);
        let entries = classify_all(&features, 0.15);
        assert_eq!(entries.len(), 3);
        assert_eq!(declining(&entries).count(), 1);
    }
}
