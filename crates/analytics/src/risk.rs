//! Retention-risk scoring.
//!
//! Model:
//! - Each factor contributes a bounded sub-score (ratio in [0, 1] × factor cap).
//! - Sub-scores are summed and clamped to [0, 100].
//! - The tier is a pure function of the score against the configured
//!   boundaries (70 and 40, both inclusive lower bounds).
//!
//! An employee with no history still gets a score: factors without signal
//! contribute zero instead of failing.

use serde::{Deserialize, Serialize};

use talenthq_core::{EmployeeId, TimeWindow};

use crate::aggregate::{EmployeeFeatureBundle, FeatureSet};
use crate::config::RiskWeights;
use crate::stats::{clamp_score, linear_fit};

/// Discrete retention-risk classification.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    LowRisk,
    MediumRisk,
    HighRisk,
}

impl RiskTier {
    /// Display label as rendered by the UI.
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::LowRisk => "Riesgo Bajo",
            RiskTier::MediumRisk => "Riesgo Medio",
            RiskTier::HighRisk => "Alto Riesgo",
        }
    }

    pub fn from_score(score: f64, weights: &RiskWeights) -> Self {
        if score >= weights.high_risk_threshold {
            RiskTier::HighRisk
        } else if score >= weights.medium_risk_threshold {
            RiskTier::MediumRisk
        } else {
            RiskTier::LowRisk
        }
    }
}

/// One contributing factor, for explainability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub reason: String,
    pub magnitude: f64,
}

/// Derived, immutable risk assessment for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub department: String,
    /// Clamped to [0, 100].
    pub score: f64,
    pub tier: RiskTier,
    /// Non-zero contributing factors, largest first.
    pub factors: Vec<RiskFactor>,
}

/// Score every employee in the feature set.
pub fn assess_all(features: &FeatureSet, weights: &RiskWeights) -> Vec<RiskAssessment> {
    features
        .bundles
        .iter()
        .map(|bundle| assess(bundle, &features.window, weights))
        .collect()
}

/// Score one employee.
pub fn assess(
    bundle: &EmployeeFeatureBundle,
    window: &TimeWindow,
    weights: &RiskWeights,
) -> RiskAssessment {
    let mut factors: Vec<RiskFactor> = Vec::new();
    let mut push = |reason: &str, ratio: f64, cap: f64| {
        let magnitude = ratio.clamp(0.0, 1.0) * cap;
        if magnitude > 0.0 {
            factors.push(RiskFactor {
                reason: reason.to_string(),
                magnitude,
            });
        }
    };

    push("Antigüedad atípica", tenure_ratio(bundle.tenure_months), weights.tenure_max);
    push(
        "Compensación estancada",
        if bundle.compensation_stagnant() { 1.0 } else { 0.0 },
        weights.compensation_max,
    );
    push(
        "Ausentismo elevado",
        attendance_ratio(bundle, window),
        weights.attendance_max,
    );
    push(
        "Desempeño en declive",
        performance_decline_ratio(&bundle.review_scores),
        weights.performance_max,
    );
    push(
        "Poca interacción reciente",
        engagement_ratio(bundle.months_since_last_review),
        weights.engagement_max,
    );

    factors.sort_by(|a, b| b.magnitude.total_cmp(&a.magnitude));

    let score = clamp_score(factors.iter().map(|f| f.magnitude).sum());
    RiskAssessment {
        employee_id: bundle.employee_id,
        employee_name: bundle.name.clone(),
        department: bundle.department.clone(),
        score,
        tier: RiskTier::from_score(score, weights),
        factors,
    }
}

/// Very short tenure ramps from 1.0 at month zero to 0.0 at six months;
/// very long tenure ramps back up from ten years, saturating at twenty.
fn tenure_ratio(tenure_months: u32) -> f64 {
    let t = f64::from(tenure_months);
    let short = ((6.0 - t) / 6.0).clamp(0.0, 1.0);
    let long = ((t - 120.0) / 120.0).clamp(0.0, 1.0);
    short.max(long)
}

/// Two combined incidents per month saturates the attendance factor.
fn attendance_ratio(bundle: &EmployeeFeatureBundle, window: &TimeWindow) -> f64 {
    (bundle.attendance_incidents_per_month(window) / 2.0).clamp(0.0, 1.0)
}

/// A drop of 0.5 review points per review saturates the decline factor.
/// Fewer than two reviews → no signal → zero.
fn performance_decline_ratio(scores: &[f64]) -> f64 {
    if scores.len() < 2 {
        return 0.0;
    }
    let (slope, _) = linear_fit(scores);
    if slope >= 0.0 {
        return 0.0;
    }
    (-slope / 0.5).clamp(0.0, 1.0)
}

/// No review interaction for a year saturates the engagement proxy; an
/// employee never reviewed at all is treated as fully disengaged.
fn engagement_ratio(months_since_last_review: Option<u32>) -> f64 {
    match months_since_last_review {
        None => 1.0,
        Some(months) => (f64::from(months) / 12.0).clamp(0.0, 1.0),
    }
}

/// Aggregate retention statistics over one assessment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionStats {
    pub assessed: usize,
    pub average_score: f64,
    pub high_risk: usize,
    pub medium_risk: usize,
    pub low_risk: usize,
}

impl RetentionStats {
    pub fn from_assessments(assessments: &[RiskAssessment]) -> Self {
        let mut stats = Self {
            assessed: assessments.len(),
            average_score: 0.0,
            high_risk: 0,
            medium_risk: 0,
            low_risk: 0,
        };
        for assessment in assessments {
            stats.average_score += assessment.score;
            match assessment.tier {
                RiskTier::HighRisk => stats.high_risk += 1,
                RiskTier::MediumRisk => stats.medium_risk += 1,
                RiskTier::LowRisk => stats.low_risk += 1,
            }
        }
        if !assessments.is_empty() {
            stats.average_score /= assessments.len() as f64;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn window() -> TimeWindow {
        TimeWindow::default_at(NaiveDate::from_ymd_opt(2026, 8, 15).unwrap())
    }

    fn bundle() -> EmployeeFeatureBundle {
        EmployeeFeatureBundle {
            employee_id: EmployeeId::new(),
            name: "Hugo Ibarra".to_string(),
            department: "Ventas".to_string(),
            position: "Ejecutivo".to_string(),
            tenure_months: 36,
            absence_count: 0,
            late_count: 0,
            absence_dates: Vec::new(),
            review_scores: vec![4.0, 4.2],
            months_since_last_review: Some(1),
            first_gross_pay: Some(30_000_00),
            last_gross_pay: Some(32_000_00),
            base_salary: 30_000_00,
            terminated: false,
        }
    }

    #[test]
    fn healthy_mid_tenure_employee_is_low_risk() {
        let assessment = assess(&bundle(), &window(), &RiskWeights::default());
        assert!(assessment.score < 40.0, "score was {}", assessment.score);
        assert_eq!(assessment.tier, RiskTier::LowRisk);
    }

    #[test]
    fn new_hire_with_absence_spike_is_high_risk() {
        // Tenure 1 month, no compensation history, recent unexplained
        // absence spike: must land at score >= 70 and HighRisk.
        let mut b = bundle();
        b.tenure_months = 1;
        b.first_gross_pay = None;
        b.last_gross_pay = None;
        b.review_scores.clear();
        b.months_since_last_review = None;
        b.absence_count = 24;
        let assessment = assess(&b, &window(), &RiskWeights::default());
        assert!(assessment.score >= 70.0, "score was {}", assessment.score);
        assert_eq!(assessment.tier, RiskTier::HighRisk);
    }

    #[test]
    fn factors_are_ordered_largest_first_and_nonzero() {
        let mut b = bundle();
        b.tenure_months = 2;
        b.first_gross_pay = None;
        b.last_gross_pay = None;
        b.absence_count = 6;
        let assessment = assess(&b, &window(), &RiskWeights::default());

        assert!(!assessment.factors.is_empty());
        for pair in assessment.factors.windows(2) {
            assert!(pair[0].magnitude >= pair[1].magnitude);
        }
        for factor in &assessment.factors {
            assert!(factor.magnitude > 0.0);
        }
    }

    #[test]
    fn no_history_still_yields_a_score() {
        let b = EmployeeFeatureBundle {
            review_scores: Vec::new(),
            months_since_last_review: None,
            first_gross_pay: None,
            last_gross_pay: None,
            absence_count: 0,
            late_count: 0,
            absence_dates: Vec::new(),
            ..bundle()
        };
        let assessment = assess(&b, &window(), &RiskWeights::default());
        assert!((0.0..=100.0).contains(&assessment.score));
    }

    #[test]
    fn tier_boundaries_are_exact() {
        let weights = RiskWeights::default();
        assert_eq!(RiskTier::from_score(70.0, &weights), RiskTier::HighRisk);
        assert_eq!(RiskTier::from_score(69.999, &weights), RiskTier::MediumRisk);
        assert_eq!(RiskTier::from_score(40.0, &weights), RiskTier::MediumRisk);
        assert_eq!(RiskTier::from_score(39.999, &weights), RiskTier::LowRisk);
        assert_eq!(RiskTier::from_score(0.0, &weights), RiskTier::LowRisk);
        assert_eq!(RiskTier::from_score(100.0, &weights), RiskTier::HighRisk);
    }

    #[test]
    fn retention_stats_match_the_assessment_list() {
        let weights = RiskWeights::default();
        let mut low = bundle();
        low.name = "Iris Juárez".to_string();
        let mut spike = bundle();
        spike.tenure_months = 1;
        spike.first_gross_pay = None;
        spike.last_gross_pay = None;
        spike.review_scores.clear();
        spike.months_since_last_review = None;
        spike.absence_count = 24;

        let assessments = vec![
            assess(&low, &window(), &weights),
            assess(&spike, &window(), &weights),
        ];
        let stats = RetentionStats::from_assessments(&assessments);
        assert_eq!(stats.assessed, 2);
        assert_eq!(stats.high_risk, 1);
        assert_eq!(stats.low_risk, 1);
        let expected = (assessments[0].score + assessments[1].score) / 2.0;
        assert!((stats.average_score - expected).abs() < 1e-9);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: scores stay in [0, 100] and the tier always matches the
        /// fixed thresholds, whatever the features.
        #[test]
        fn score_is_clamped_and_tier_is_consistent(
            tenure in 0u32..480,
            absences in 0u32..60,
            lates in 0u32..60,
            months_since in proptest::option::of(0u32..36),
            scores in proptest::collection::vec(1.0f64..=5.0, 0..8),
            stagnant in proptest::bool::ANY,
        ) {
            let weights = RiskWeights::default();
            let b = EmployeeFeatureBundle {
                tenure_months: tenure,
                absence_count: absences,
                late_count: lates,
                months_since_last_review: months_since,
                review_scores: scores,
                first_gross_pay: Some(100),
                last_gross_pay: Some(if stagnant { 100 } else { 200 }),
                ..bundle()
            };
            let assessment = assess(&b, &window(), &weights);
            prop_assert!((0.0..=100.0).contains(&assessment.score));
            prop_assert_eq!(assessment.tier, RiskTier::from_score(assessment.score, &weights));
        }
    }
}
