//! Response envelopes and dashboard payload shapes.

use axum::{http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use talenthq_analytics::{
    AttendanceAnomaly, DepartmentComparisonSummary, DepartmentHealth, DepartmentImpact,
    PayrollSummary, PerformanceTrendEntry, Recommendation, RetentionStats, RiskAssessment,
    RotationForecast,
};
use talenthq_core::TimeWindow;

/// `{ success: true, data: ... }` — the envelope every query responds with.
pub fn envelope_ok(data: &impl Serialize) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": data,
        })),
    )
        .into_response()
}

/// One dashboard section. A failed upstream source degrades its section to
/// `success:false` without touching the rest of the payload.
#[derive(Debug, Clone, Serialize)]
pub struct SectionResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> SectionResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Successful section with nothing to report (insufficient data is not
    /// an error).
    pub fn empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RetentionSection {
    pub stats: RetentionStats,
    pub assessments: Vec<RiskAssessment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceSection {
    /// Employees on a declining review trajectory.
    pub declining: Vec<PerformanceTrendEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceSection {
    pub anomalies: Vec<AttendanceAnomaly>,
    pub department_impact: Vec<DepartmentImpact>,
}

/// The assembled dashboard: every section independently degradable.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub window: TimeWindow,
    pub generated_at: DateTime<Utc>,
    pub retention: SectionResult<RetentionSection>,
    pub performance: SectionResult<PerformanceSection>,
    pub attendance: SectionResult<AttendanceSection>,
    pub payroll: SectionResult<PayrollSummary>,
    pub predictive: SectionResult<RotationForecast>,
    pub recommendations: SectionResult<Vec<Recommendation>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DepartmentComparisonData {
    pub departments: Vec<DepartmentHealth>,
    pub summary: DepartmentComparisonSummary,
}

/// Predictive query payload; `forecast` is absent when the history is too
/// short for the minimum-history guard.
#[derive(Debug, Clone, Serialize)]
pub struct PredictiveData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<RotationForecast>,
}
