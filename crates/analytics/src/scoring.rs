//! Multi-dimension employee scoring (retention, performance, attendance,
//! engagement, growth) and the derived category label.
//!
//! All dimensions are on 0–100, higher is better; the overall score is their
//! plain mean. Unlike risk scoring, this surface is descriptive rather than
//! alarm-driven, so missing signals default to neutral midpoints.

use serde::{Deserialize, Serialize};

use talenthq_core::EmployeeId;

use crate::aggregate::{EmployeeFeatureBundle, FeatureSet};
use crate::risk::RiskAssessment;
use crate::stats::{clamp_score, mean};
use crate::trend::{PerformanceTrendEntry, TrendDirection};

/// Category label as rendered by the UI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmployeeCategory {
    #[serde(rename = "Top Performer")]
    TopPerformer,
    #[serde(rename = "Good Performer")]
    GoodPerformer,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
    #[serde(rename = "At Risk")]
    AtRisk,
}

impl EmployeeCategory {
    pub fn from_overall(overall: f64) -> Self {
        if overall >= 80.0 {
            EmployeeCategory::TopPerformer
        } else if overall >= 65.0 {
            EmployeeCategory::GoodPerformer
        } else if overall >= 50.0 {
            EmployeeCategory::NeedsImprovement
        } else {
            EmployeeCategory::AtRisk
        }
    }
}

/// Per-employee scoring across all dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeScore {
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub department: String,
    pub retention: f64,
    pub performance: f64,
    pub attendance: f64,
    pub engagement: f64,
    pub growth: f64,
    pub overall: f64,
    pub category: EmployeeCategory,
}

/// Score every employee. `assessments` and `trends` come from the risk and
/// trend components over the same feature set.
pub fn score_all(
    features: &FeatureSet,
    assessments: &[RiskAssessment],
    trends: &[PerformanceTrendEntry],
) -> Vec<EmployeeScore> {
    features
        .bundles
        .iter()
        .map(|bundle| {
            let risk_score = assessments
                .iter()
                .find(|a| a.employee_id == bundle.employee_id)
                .map(|a| a.score)
                .unwrap_or(50.0);
            let trend = trends
                .iter()
                .find(|t| t.employee_id == bundle.employee_id)
                .map(|t| t.direction);
            score_one(bundle, features, risk_score, trend)
        })
        .collect()
}

fn score_one(
    bundle: &EmployeeFeatureBundle,
    features: &FeatureSet,
    risk_score: f64,
    trend: Option<TrendDirection>,
) -> EmployeeScore {
    let retention = clamp_score(100.0 - risk_score);

    // 1–5 review scale rescaled to 0–100; no reviews → neutral midpoint.
    let performance = if bundle.review_scores.is_empty() {
        50.0
    } else {
        clamp_score((mean(&bundle.review_scores) - 1.0) / 4.0 * 100.0)
    };

    // Two combined incidents per month zero out the attendance dimension.
    let incident_ratio =
        (bundle.attendance_incidents_per_month(&features.window) / 2.0).clamp(0.0, 1.0);
    let attendance = clamp_score(100.0 * (1.0 - incident_ratio));

    let engagement = match bundle.months_since_last_review {
        // Never reviewed: low but not zero (new hires land here too).
        None => 30.0,
        Some(months) => clamp_score(100.0 - 10.0 * f64::from(months)),
    };

    let growth = match trend {
        Some(TrendDirection::Improving) => 85.0,
        Some(TrendDirection::Stable) => 60.0,
        Some(TrendDirection::Declining) => 25.0,
        None => 50.0,
    };

    let overall = clamp_score(mean(&[retention, performance, attendance, engagement, growth]));

    EmployeeScore {
        employee_id: bundle.employee_id,
        employee_name: bundle.name.clone(),
        department: bundle.department.clone(),
        retention,
        performance,
        attendance,
        engagement,
        growth,
        overall,
        category: EmployeeCategory::from_overall(overall),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::snapshot::HrSnapshot;
    use crate::{risk, trend};
    use chrono::NaiveDate;
    use talenthq_core::TimeWindow;

    fn bundle(name: &str) -> EmployeeFeatureBundle {
        EmployeeFeatureBundle {
            employee_id: EmployeeId::new(),
            name: name.to_string(),
            department: "TI".to_string(),
            position: "Analista".to_string(),
            tenure_months: 30,
            absence_count: 0,
            late_count: 0,
            absence_dates: Vec::new(),
            review_scores: vec![4.6, 4.8, 4.9],
            months_since_last_review: Some(1),
            first_gross_pay: Some(100),
            last_gross_pay: Some(120),
            base_salary: 100,
            terminated: false,
        }
    }

    fn features_of(bundles: Vec<EmployeeFeatureBundle>) -> FeatureSet {
        let window =
            TimeWindow::default_at(NaiveDate::from_ymd_opt(2026, 8, 15).unwrap());
        let mut features = FeatureSet::build(&HrSnapshot::new(Vec::new()), window);
        features.bundles = bundles;
        features
    }

    #[test]
    fn strong_employee_is_a_top_performer() {
        let config = EngineConfig::default();
        let features = features_of(vec![bundle("Nora Quiroga")]);
        let assessments = risk::assess_all(&features, &config.risk);
        let trends = trend::classify_all(&features, config.trend_dead_band);
        let scores = score_all(&features, &assessments, &trends);

        assert_eq!(scores.len(), 1);
        let score = &scores[0];
        assert!(score.overall >= 80.0, "overall was {}", score.overall);
        assert_eq!(score.category, EmployeeCategory::TopPerformer);
        for dim in [
            score.retention,
            score.performance,
            score.attendance,
            score.engagement,
            score.growth,
        ] {
            assert!((0.0..=100.0).contains(&dim));
        }
    }

    #[test]
    fn struggling_employee_lands_at_risk() {
        let mut b = bundle("Óscar Rivas");
        b.tenure_months = 1;
        b.review_scores = vec![3.0, 2.0, 1.2];
        b.months_since_last_review = Some(8);
        b.absence_count = 20;
        b.first_gross_pay = None;
        b.last_gross_pay = None;

        let config = EngineConfig::default();
        let features = features_of(vec![b]);
        let assessments = risk::assess_all(&features, &config.risk);
        let trends = trend::classify_all(&features, config.trend_dead_band);
        let scores = score_all(&features, &assessments, &trends);

        assert_eq!(scores[0].category, EmployeeCategory::AtRisk);
        assert_eq!(scores[0].growth, 25.0);
    }

    #[test]
    fn category_boundaries_are_exact() {
        assert_eq!(EmployeeCategory::from_overall(80.0), EmployeeCategory::TopPerformer);
        assert_eq!(EmployeeCategory::from_overall(79.99), EmployeeCategory::GoodPerformer);
        assert_eq!(EmployeeCategory::from_overall(65.0), EmployeeCategory::GoodPerformer);
        assert_eq!(EmployeeCategory::from_overall(50.0), EmployeeCategory::NeedsImprovement);
        assert_eq!(EmployeeCategory::from_overall(49.99), EmployeeCategory::AtRisk);
    }

    #[test]
    fn no_signals_defaults_to_neutral_dimensions() {
        let mut b = bundle("Paula Soto");
        b.review_scores = Vec::new();
        b.months_since_last_review = None;

        let features = features_of(vec![b]);
        let scores = score_all(&features, &[], &[]);
        let score = &scores[0];
        assert_eq!(score.performance, 50.0);
        assert_eq!(score.engagement, 30.0);
        assert_eq!(score.growth, 50.0);
        // Risk assessment missing entirely: neutral retention.
        assert_eq!(score.retention, 50.0);
    }
}
