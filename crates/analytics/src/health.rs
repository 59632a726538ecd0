//! Organizational health composition.
//!
//! The composite here is **higher-is-better** on 0–100 — the opposite
//! polarity of the department composite in [`crate::department`]. Both are
//! contractual; see DESIGN.md for why the split is preserved.

use serde::{Deserialize, Serialize};

use crate::aggregate::FeatureSet;
use crate::attendance::AttendanceAnomaly;
use crate::config::OrganizationWeights;
use crate::department::{DepartmentHealth, HealthLabel};
use crate::risk::RiskAssessment;
use crate::stats::{clamp_score, mean};
use crate::trend::{self, PerformanceTrendEntry};

/// Placeholder until an engagement survey feeds a real satisfaction signal.
const SATISFACTION_PLACEHOLDER: f64 = 75.0;

/// Named sub-component scores, each independently clamped to [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthComponents {
    pub retention: f64,
    pub performance: f64,
    pub attendance: f64,
    pub departments: f64,
}

/// Headline KPI snapshot rendered next to the gauge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    pub headcount: usize,
    pub average_tenure_months: f64,
    /// Departures over the rotation window, as % of (headcount + departures).
    pub rotation_rate_pct: f64,
    pub satisfaction_index: f64,
}

/// The one 0–100 higher-is-better organizational score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationalHealth {
    pub overall_score: f64,
    pub level: HealthLabel,
    pub components: HealthComponents,
    pub kpis: KpiSnapshot,
}

/// Combine the upstream signals into one organizational score.
pub fn compose(
    features: &FeatureSet,
    assessments: &[RiskAssessment],
    trends: &[PerformanceTrendEntry],
    anomalies: &[AttendanceAnomaly],
    departments: &[DepartmentHealth],
    weights: &OrganizationWeights,
) -> OrganizationalHealth {
    let headcount = features.headcount();

    // Retention: inverse of the average risk score.
    let retention = if assessments.is_empty() {
        50.0
    } else {
        let avg_risk = mean(&assessments.iter().map(|a| a.score).collect::<Vec<_>>());
        clamp_score(100.0 - avg_risk)
    };

    // Performance: mean review score rescaled from the 1–5 review scale,
    // penalized by the share of employees on a declining trajectory.
    let all_scores: Vec<f64> = features
        .bundles
        .iter()
        .flat_map(|b| b.review_scores.iter().copied())
        .collect();
    let performance = if all_scores.is_empty() {
        50.0
    } else {
        let base = (mean(&all_scores) - 1.0) / 4.0 * 100.0;
        let declining_share = if headcount == 0 {
            0.0
        } else {
            trend::declining(trends).count() as f64 / headcount as f64
        };
        clamp_score(base - 20.0 * declining_share)
    };

    // Attendance: share of employees with a detected anomaly, inverted.
    let attendance = if headcount == 0 {
        50.0
    } else {
        let anomalous_share = anomalies.len() as f64 / headcount as f64;
        clamp_score(100.0 * (1.0 - anomalous_share))
    };

    // Departments: inverse of the mean department composite (which is
    // lower-is-better, so zero problems maps to the maximum here).
    let department_component = if departments.is_empty() {
        50.0
    } else {
        let avg = mean(&departments.iter().map(|d| d.overall_score).collect::<Vec<_>>());
        clamp_score(100.0 - avg)
    };

    let overall_score = clamp_score(
        weights.retention * retention
            + weights.performance * performance
            + weights.attendance * attendance
            + weights.departments * department_component,
    );

    let departures = features.departures();
    let separations_base = headcount as f64 + f64::from(departures);
    let rotation_rate_pct = if separations_base == 0.0 {
        0.0
    } else {
        f64::from(departures) / separations_base * 100.0
    };

    let average_tenure_months = mean(
        &features
            .bundles
            .iter()
            .map(|b| f64::from(b.tenure_months))
            .collect::<Vec<_>>(),
    );

    OrganizationalHealth {
        overall_score,
        level: HealthLabel::for_organization_score(overall_score),
        components: HealthComponents {
            retention,
            performance,
            attendance,
            departments: department_component,
        },
        kpis: KpiSnapshot {
            headcount,
            average_tenure_months,
            rotation_rate_pct,
            satisfaction_index: SATISFACTION_PLACEHOLDER,
        },
    }
}
