//! Proactive alert generation.
//!
//! A deterministic rule scan over the upstream signals. Every emitted alert
//! carries at least one factor and one recommended action; an alert that
//! would carry none is simply not emitted. Summary counts are derived from
//! the returned list, never tracked separately.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use talenthq_core::{AlertId, EmployeeId};

use crate::attendance::AttendanceAnomaly;
use crate::config::AlertThresholds;
use crate::department::{DepartmentHealth, HealthLabel};
use crate::risk::{RiskAssessment, RiskTier};
use crate::trend::{self, PerformanceTrendEntry};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertCategory {
    Retention,
    Performance,
    Attendance,
    Department,
}

/// Ordered most severe first, so the derived `Ord` doubles as sort order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Monotonic mapping from how far a count exceeds its threshold.
    fn from_excess(count: usize, threshold: u32) -> Self {
        let ratio = count as f64 / f64::from(threshold.max(1));
        if ratio >= 3.0 {
            Severity::Critical
        } else if ratio >= 2.0 {
            Severity::High
        } else if ratio >= 1.5 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

/// One severity-tagged alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub category: AlertCategory,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<EmployeeId>,
    /// Non-empty by construction.
    pub factors: Vec<String>,
    /// Non-empty by construction.
    pub recommended_actions: Vec<String>,
    pub detected_at: DateTime<Utc>,
    /// 1-based position after severity/category ordering.
    pub priority_rank: u32,
}

/// Counts by severity, derived from the alert list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Counts by category, derived from the alert list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub retention: usize,
    pub performance: usize,
    pub attendance: usize,
    pub department: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSummary {
    pub total: usize,
    pub by_severity: SeverityCounts,
    pub by_category: CategoryCounts,
}

/// Alerts plus their derived summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertBundle {
    pub alerts: Vec<Alert>,
    pub summary: AlertSummary,
}

/// Scan all upstream outputs for threshold breaches.
///
/// `detected_at` is stamped by the caller once per cycle so a whole run
/// shares one detection timestamp.
pub fn generate(
    assessments: &[RiskAssessment],
    trends: &[PerformanceTrendEntry],
    anomalies: &[AttendanceAnomaly],
    departments: &[DepartmentHealth],
    thresholds: &AlertThresholds,
    detected_at: DateTime<Utc>,
) -> AlertBundle {
    let mut alerts: Vec<Alert> = Vec::new();

    let high_risk: Vec<&RiskAssessment> = assessments
        .iter()
        .filter(|a| a.tier == RiskTier::HighRisk)
        .collect();
    if high_risk.len() >= thresholds.high_risk_count as usize {
        let factors = high_risk
            .iter()
            .map(|a| format!("{} con puntaje de riesgo {:.0}", a.employee_name, a.score))
            .collect();
        alerts.push(Alert {
            id: AlertId::new(),
            category: AlertCategory::Retention,
            severity: Severity::from_excess(high_risk.len(), thresholds.high_risk_count),
            title: "Riesgo de rotación elevado".to_string(),
            description: format!(
                "{} empleados se encuentran en Alto Riesgo de salida.",
                high_risk.len()
            ),
            employee_id: None,
            factors,
            recommended_actions: vec![
                "Agendar entrevistas de permanencia con los empleados en Alto Riesgo".to_string(),
                "Revisar compensación y carga de trabajo de los casos señalados".to_string(),
            ],
            detected_at,
            priority_rank: 0,
        });
    }

    let declining: Vec<&PerformanceTrendEntry> = trend::declining(trends).collect();
    if declining.len() >= thresholds.declining_count as usize {
        let factors = declining
            .iter()
            .map(|t| format!("{} con pendiente {:.2}", t.employee_name, t.slope))
            .collect();
        alerts.push(Alert {
            id: AlertId::new(),
            category: AlertCategory::Performance,
            severity: Severity::from_excess(declining.len(), thresholds.declining_count),
            title: "Desempeño en declive generalizado".to_string(),
            description: format!(
                "{} empleados muestran una trayectoria de desempeño descendente.",
                declining.len()
            ),
            employee_id: None,
            factors,
            recommended_actions: vec![
                "Iniciar planes de mejora con seguimiento mensual".to_string(),
                "Verificar cambios recientes de equipo o de responsabilidades".to_string(),
            ],
            detected_at,
            priority_rank: 0,
        });
    }

    if anomalies.len() >= thresholds.anomaly_count as usize {
        let factors = anomalies
            .iter()
            .map(|a| format!("{} ({})", a.employee_name, a.department))
            .collect();
        alerts.push(Alert {
            id: AlertId::new(),
            category: AlertCategory::Attendance,
            severity: Severity::from_excess(anomalies.len(), thresholds.anomaly_count),
            title: "Patrones de ausencia sospechosos".to_string(),
            description: format!(
                "{} empleados presentan patrones de ausencia irregulares.",
                anomalies.len()
            ),
            employee_id: None,
            factors,
            recommended_actions: vec![
                "Revisar los registros de asistencia con cada supervisor".to_string(),
                "Confirmar si existen causas justificadas antes de escalar".to_string(),
            ],
            detected_at,
            priority_rank: 0,
        });
    }

    for department in departments {
        if department.health_label != HealthLabel::Critico {
            continue;
        }
        // A department already past the critical boundary is at least HIGH.
        let severity = if department.overall_score >= 80.0 {
            Severity::Critical
        } else {
            Severity::High
        };
        alerts.push(Alert {
            id: AlertId::new(),
            category: AlertCategory::Department,
            severity,
            title: format!("Departamento {} en estado crítico", department.department),
            description: format!(
                "El departamento {} tiene un índice compuesto de {:.1} (umbral crítico: 60).",
                department.department, department.overall_score
            ),
            employee_id: None,
            factors: vec![
                format!(
                    "{:.0}% de los empleados en Alto Riesgo",
                    department.high_risk_pct
                ),
                format!("{} empleados evaluados", department.employee_count),
            ],
            recommended_actions: vec![
                "Priorizar una revisión integral del departamento con dirección".to_string(),
            ],
            detected_at,
            priority_rank: 0,
        });
    }

    alerts.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| a.title.cmp(&b.title))
    });
    for (i, alert) in alerts.iter_mut().enumerate() {
        alert.priority_rank = (i + 1) as u32;
    }

    debug_assert!(alerts
        .iter()
        .all(|a| !a.factors.is_empty() && !a.recommended_actions.is_empty()));

    let summary = summarize(&alerts);
    AlertBundle { alerts, summary }
}

/// Summary counts are always the exact tallies of the list.
pub fn summarize(alerts: &[Alert]) -> AlertSummary {
    let mut by_severity = SeverityCounts::default();
    let mut by_category = CategoryCounts::default();
    for alert in alerts {
        match alert.severity {
            Severity::Critical => by_severity.critical += 1,
            Severity::High => by_severity.high += 1,
            Severity::Medium => by_severity.medium += 1,
            Severity::Low => by_severity.low += 1,
        }
        match alert.category {
            AlertCategory::Retention => by_category.retention += 1,
            AlertCategory::Performance => by_category.performance += 1,
            AlertCategory::Attendance => by_category.attendance += 1,
            AlertCategory::Department => by_category.department += 1,
        }
    }
    AlertSummary {
        total: alerts.len(),
        by_severity,
        by_category,
    }
}
