//! Department-level composition and ranking.
//!
//! The composite here is **lower-is-better** (it aggregates problem
//! percentages). The organizational composite in [`crate::health`] is
//! higher-is-better. Both polarities are contractual for downstream
//! consumers; do not unify them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use talenthq_core::EmployeeId;

use crate::aggregate::FeatureSet;
use crate::attendance::AttendanceAnomaly;
use crate::config::DepartmentWeights;
use crate::risk::{RiskAssessment, RiskTier};
use crate::scoring::{EmployeeCategory, EmployeeScore};
use crate::stats::clamp_score;
use crate::trend::{self, PerformanceTrendEntry};

/// Health label shared by the department and organizational composites
/// (different thresholds, same label set).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthLabel {
    Excelente,
    Bueno,
    Regular,
    #[serde(rename = "Crítico")]
    Critico,
}

impl HealthLabel {
    /// Department thresholds: lower score = healthier.
    pub fn for_department_score(score: f64) -> Self {
        if score < 20.0 {
            HealthLabel::Excelente
        } else if score < 40.0 {
            HealthLabel::Bueno
        } else if score < 60.0 {
            HealthLabel::Regular
        } else {
            HealthLabel::Critico
        }
    }

    /// Organizational thresholds: higher score = healthier.
    pub fn for_organization_score(score: f64) -> Self {
        if score >= 80.0 {
            HealthLabel::Excelente
        } else if score >= 60.0 {
            HealthLabel::Bueno
        } else if score >= 40.0 {
            HealthLabel::Regular
        } else {
            HealthLabel::Critico
        }
    }
}

/// Composite health of one department. `overall_score` is lower-is-better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentHealth {
    pub department: String,
    pub employee_count: usize,
    pub high_risk_count: usize,
    pub high_risk_pct: f64,
    pub top_performer_count: usize,
    pub top_performer_pct: f64,
    /// 0.4×high-risk% + 0.3×declining% + 0.3×attendance-problem%.
    pub overall_score: f64,
    pub health_label: HealthLabel,
    /// 1 = healthiest; a permutation of 1..=N.
    pub rank: u32,
}

/// Roll employee-level signals up into ranked department health.
pub fn compose(
    features: &FeatureSet,
    assessments: &[RiskAssessment],
    scores: &[EmployeeScore],
    trends: &[PerformanceTrendEntry],
    anomalies: &[AttendanceAnomaly],
    weights: &DepartmentWeights,
) -> Vec<DepartmentHealth> {
    let mut members: BTreeMap<&str, Vec<EmployeeId>> = BTreeMap::new();
    for bundle in &features.bundles {
        members
            .entry(bundle.department.as_str())
            .or_default()
            .push(bundle.employee_id);
    }

    let mut departments: Vec<DepartmentHealth> = members
        .into_iter()
        .map(|(department, employees)| {
            let count = employees.len();
            let pct = |n: usize| {
                if count == 0 {
                    0.0
                } else {
                    n as f64 / count as f64 * 100.0
                }
            };

            let high_risk_count = assessments
                .iter()
                .filter(|a| a.tier == RiskTier::HighRisk && employees.contains(&a.employee_id))
                .count();
            let top_performer_count = scores
                .iter()
                .filter(|s| {
                    s.category == EmployeeCategory::TopPerformer
                        && employees.contains(&s.employee_id)
                })
                .count();
            let declining_count = trend::declining(trends)
                .filter(|t| employees.contains(&t.employee_id))
                .count();
            let anomaly_count = anomalies
                .iter()
                .filter(|a| employees.contains(&a.employee_id))
                .count();

            let overall_score = clamp_score(
                weights.high_risk * pct(high_risk_count)
                    + weights.declining * pct(declining_count)
                    + weights.attendance * pct(anomaly_count),
            );

            DepartmentHealth {
                department: department.to_string(),
                employee_count: count,
                high_risk_count,
                high_risk_pct: pct(high_risk_count),
                top_performer_count,
                top_performer_pct: pct(top_performer_count),
                overall_score,
                health_label: HealthLabel::for_department_score(overall_score),
                rank: 0,
            }
        })
        .collect();

    // Rank 1 = lowest score = healthiest; ties broken by name for determinism.
    departments.sort_by(|a, b| {
        a.overall_score
            .total_cmp(&b.overall_score)
            .then_with(|| a.department.cmp(&b.department))
    });
    for (i, department) in departments.iter_mut().enumerate() {
        department.rank = (i + 1) as u32;
    }
    departments
}

/// Cross-department summary for the comparison query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentComparisonSummary {
    pub best: Option<String>,
    pub worst: Option<String>,
    pub excelente: usize,
    pub bueno: usize,
    pub regular: usize,
    pub critico: usize,
}

impl DepartmentComparisonSummary {
    pub fn from_departments(departments: &[DepartmentHealth]) -> Self {
        let mut summary = Self {
            best: departments.first().map(|d| d.department.clone()),
            worst: departments.last().map(|d| d.department.clone()),
            excelente: 0,
            bueno: 0,
            regular: 0,
            critico: 0,
        };
        for department in departments {
            match department.health_label {
                HealthLabel::Excelente => summary.excelente += 1,
                HealthLabel::Bueno => summary.bueno += 1,
                HealthLabel::Regular => summary.regular += 1,
                HealthLabel::Critico => summary.critico += 1,
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::EmployeeFeatureBundle;
    use crate::config::EngineConfig;
    use crate::snapshot::HrSnapshot;
    use crate::{attendance, risk, scoring};
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use talenthq_core::TimeWindow;

    fn bundle(name: &str, department: &str) -> EmployeeFeatureBundle {
        EmployeeFeatureBundle {
            employee_id: EmployeeId::new(),
            name: name.to_string(),
            department: department.to_string(),
            position: "Analista".to_string(),
            tenure_months: 30,
            absence_count: 0,
            late_count: 0,
            absence_dates: Vec::new(),
            review_scores: vec![4.0, 4.1],
            months_since_last_review: Some(1),
            first_gross_pay: Some(100),
            last_gross_pay: Some(120),
            base_salary: 100,
            terminated: false,
        }
    }

    fn troubled(name: &str, department: &str) -> EmployeeFeatureBundle {
        let mut b = bundle(name, department);
        b.tenure_months = 1;
        b.first_gross_pay = None;
        b.last_gross_pay = None;
        b.review_scores = vec![4.0, 3.0, 2.0];
        b.months_since_last_review = None;
        b.absence_count = 24;
        b
    }

    fn compose_for(bundles: Vec<EmployeeFeatureBundle>) -> Vec<DepartmentHealth> {
        let config = EngineConfig::default();
        let window =
            TimeWindow::default_at(NaiveDate::from_ymd_opt(2026, 8, 15).unwrap());
        let mut features = FeatureSet::build(&HrSnapshot::new(Vec::new()), window);
        features.bundles = bundles;

        let assessments = risk::assess_all(&features, &config.risk);
        let trends = crate::trend::classify_all(&features, config.trend_dead_band);
        let anomalies = attendance::detect_all(&features, &config.attendance);
        let scores = scoring::score_all(&features, &assessments, &trends);
        compose(&features, &assessments, &scores, &trends, &anomalies, &config.department)
    }

    #[test]
    fn zero_problem_department_scores_zero_and_excelente() {
        let departments = compose_for(vec![
            bundle("Ana Solís", "Ventas"),
            bundle("Bruno Vega", "Ventas"),
        ]);
        assert_eq!(departments.len(), 1);
        let ventas = &departments[0];
        assert_eq!(ventas.overall_score, 0.0);
        assert_eq!(ventas.health_label, HealthLabel::Excelente);
        assert_eq!(ventas.rank, 1);
    }

    #[test]
    fn troubled_department_ranks_below_healthy_one() {
        let departments = compose_for(vec![
            bundle("Ana Solís", "Ventas"),
            troubled("Caos Uno", "Soporte"),
            troubled("Caos Dos", "Soporte"),
        ]);
        assert_eq!(departments.len(), 2);
        assert_eq!(departments[0].department, "Ventas");
        assert_eq!(departments[0].rank, 1);
        assert_eq!(departments[1].department, "Soporte");
        assert_eq!(departments[1].rank, 2);
        assert!(departments[1].overall_score > departments[0].overall_score);
        assert_eq!(departments[1].high_risk_count, 2);
    }

    #[test]
    fn equal_scores_break_ties_by_name() {
        let departments = compose_for(vec![
            bundle("Ana Solís", "Ventas"),
            bundle("Bruno Vega", "Compras"),
        ]);
        assert_eq!(departments[0].department, "Compras");
        assert_eq!(departments[1].department, "Ventas");
    }

    #[test]
    fn summary_counts_labels_and_edges() {
        let departments = compose_for(vec![
            bundle("Ana Solís", "Ventas"),
            troubled("Caos Uno", "Soporte"),
            troubled("Caos Dos", "Soporte"),
        ]);
        let summary = DepartmentComparisonSummary::from_departments(&departments);
        assert_eq!(summary.best.as_deref(), Some("Ventas"));
        assert_eq!(summary.worst.as_deref(), Some("Soporte"));
        assert_eq!(
            summary.excelente + summary.bueno + summary.regular + summary.critico,
            departments.len()
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Property: ranks are a permutation of 1..=N, non-decreasing in score.
        #[test]
        fn ranks_are_a_gapless_permutation(
            layout in proptest::collection::vec((0usize..4, 1usize..5), 1..6)
        ) {
            let mut bundles = Vec::new();
            for (i, (kind, size)) in layout.iter().enumerate() {
                let dept = format!("Depto {i}");
                for j in 0..*size {
                    let name = format!("Empleado {i}-{j}");
                    bundles.push(if kind % 2 == 0 {
                        bundle(&name, &dept)
                    } else {
                        troubled(&name, &dept)
                    });
                }
            }
            let departments = compose_for(bundles);

            let mut ranks: Vec<u32> = departments.iter().map(|d| d.rank).collect();
            ranks.sort_unstable();
            let expected: Vec<u32> = (1..=departments.len() as u32).collect();
            prop_assert_eq!(ranks, expected);

            for pair in departments.windows(2) {
                prop_assert!(pair[0].overall_score <= pair[1].overall_score);
                prop_assert!(pair[0].rank < pair[1].rank);
            }
        }
    }
}
