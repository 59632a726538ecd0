//! Prioritized recommendations derived from alerts and aggregates.
//!
//! Deduplicated by (category, title), sorted by priority. The full
//! affected-employee list is retained on the value; presentation gets a
//! capped preview plus a remainder count.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::alerts::{Alert, AlertCategory, Severity};
use crate::department::{DepartmentHealth, HealthLabel};

/// Display cap for affected employees; the rest is a remainder count.
const AFFECTED_PREVIEW_CAP: usize = 3;

/// Ordered highest first, so the derived `Ord` doubles as sort order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "ALTA")]
    Alta,
    #[serde(rename = "MEDIA")]
    Media,
    #[serde(rename = "BAJA")]
    Baja,
}

impl Priority {
    /// Monotonic with alert severity.
    pub fn from_severity(severity: Severity) -> Self {
        match severity {
            Severity::Critical | Severity::High => Priority::Alta,
            Severity::Medium => Priority::Media,
            Severity::Low => Priority::Baja,
        }
    }

    fn impact(self) -> Impact {
        match self {
            Priority::Alta => Impact::Alto,
            Priority::Media => Impact::Medio,
            Priority::Baja => Impact::Bajo,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    Alto,
    Medio,
    Bajo,
}

/// One prioritized action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub category: AlertCategory,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Full list, kept for downstream computation; not rendered directly.
    #[serde(skip)]
    pub affected_employees: Vec<String>,
    /// First few affected employees, for display.
    pub affected_preview: Vec<String>,
    /// How many affected employees the preview omits.
    pub additional_affected: usize,
    pub impact: Impact,
}

impl Recommendation {
    fn new(
        priority: Priority,
        category: AlertCategory,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let title = title.into();
        let description = description.into();
        debug_assert!(!title.is_empty() && !description.is_empty());
        Self {
            priority,
            category,
            title,
            description,
            action: None,
            affected_employees: Vec::new(),
            affected_preview: Vec::new(),
            additional_affected: 0,
            impact: priority.impact(),
        }
    }

    fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    fn with_affected(mut self, affected: Vec<String>) -> Self {
        self.affected_preview = affected.iter().take(AFFECTED_PREVIEW_CAP).cloned().collect();
        self.additional_affected = affected.len().saturating_sub(AFFECTED_PREVIEW_CAP);
        self.affected_employees = affected;
        self
    }
}

/// Derive the deduplicated, priority-sorted recommendation list.
pub fn derive(alerts: &[Alert], departments: &[DepartmentHealth]) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = Vec::new();

    for alert in alerts {
        let mut recommendation = Recommendation::new(
            Priority::from_severity(alert.severity),
            alert.category,
            recommendation_title(alert.category),
            alert.description.clone(),
        )
        .with_affected(alert.factors.clone());
        if let Some(action) = alert.recommended_actions.first() {
            recommendation = recommendation.with_action(action.clone());
        }
        recommendations.push(recommendation);
    }

    // Departments slipping toward critical get a preventive recommendation
    // even before they breach the alert rule.
    for department in departments {
        if department.health_label == HealthLabel::Regular {
            recommendations.push(
                Recommendation::new(
                    Priority::Media,
                    AlertCategory::Department,
                    format!("Plan preventivo para {}", department.department),
                    format!(
                        "El departamento {} está en nivel Regular (índice {:.1}); conviene actuar antes de que sea crítico.",
                        department.department, department.overall_score
                    ),
                )
                .with_action("Definir un plan de acción trimestral con el responsable del área"),
            );
        }
    }

    recommendations.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| a.title.cmp(&b.title))
    });
    // Priority-first sort order means duplicates of one (category, title) are
    // not necessarily adjacent; keep the first (highest-priority) occurrence.
    let mut seen: BTreeSet<(AlertCategory, String)> = BTreeSet::new();
    recommendations.retain(|r| seen.insert((r.category, r.title.clone())));
    recommendations
}

fn recommendation_title(category: AlertCategory) -> &'static str {
    match category {
        AlertCategory::Retention => "Reforzar retención de empleados en riesgo",
        AlertCategory::Performance => "Atender la caída de desempeño",
        AlertCategory::Attendance => "Corregir patrones de ausentismo",
        AlertCategory::Department => "Intervenir departamento crítico",
    }
}
