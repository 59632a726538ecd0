//! Raw record contracts consumed by the engine.
//!
//! These are the data contracts of the external record store, parsed and
//! validated once at the aggregation boundary. The engine never talks to the
//! store itself; callers assemble an [`HrSnapshot`] and hand it over.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use talenthq_core::{EmployeeId, YearMonth};

/// One employee master record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: EmployeeId,
    pub name: String,
    pub department: String,
    pub position: String,
    pub hired_at: NaiveDate,
    /// Set for departed employees; drives the rotation series.
    pub terminated_at: Option<NaiveDate>,
    /// Monthly base salary in the smallest currency unit.
    pub base_salary: i64,
}

impl EmployeeRecord {
    pub fn is_active(&self) -> bool {
        self.terminated_at.is_none()
    }
}

/// Kind of attendance incident.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceKind {
    Absence,
    Late,
}

/// One attendance incident (absence or late arrival) on a calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceEvent {
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub kind: AttendanceKind,
}

/// One performance review outcome on the 1.0–5.0 review scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReview {
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub score: f64,
}

/// One monthly payroll aggregate. The engine only consumes these; it never
/// computes wages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRecord {
    pub employee_id: EmployeeId,
    pub period: YearMonth,
    /// Gross pay in the smallest currency unit.
    pub gross_pay: i64,
}

/// Availability of one upstream source for this snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "state", content = "error")]
pub enum SourceState {
    Available,
    Failed(String),
}

impl SourceState {
    pub fn is_available(&self) -> bool {
        matches!(self, SourceState::Available)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SourceState::Available => None,
            SourceState::Failed(msg) => Some(msg),
        }
    }
}

/// Per-source health of the snapshot.
///
/// A failed source degrades only the sections derived from it; the employee
/// roster itself has no entry here because without it there is nothing to
/// compute at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceHealth {
    pub attendance: SourceState,
    pub performance: SourceState,
    pub payroll: SourceState,
}

impl Default for SourceHealth {
    fn default() -> Self {
        Self {
            attendance: SourceState::Available,
            performance: SourceState::Available,
            payroll: SourceState::Available,
        }
    }
}

/// Immutable per-request snapshot of the record store.
///
/// Built once per computation cycle; every analytical component reads it and
/// none mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HrSnapshot {
    pub employees: Vec<EmployeeRecord>,
    pub attendance: Vec<AttendanceEvent>,
    pub reviews: Vec<PerformanceReview>,
    pub payroll: Vec<PayrollRecord>,
    pub sources: SourceHealth,
}

impl HrSnapshot {
    pub fn new(employees: Vec<EmployeeRecord>) -> Self {
        Self {
            employees,
            attendance: Vec::new(),
            reviews: Vec::new(),
            payroll: Vec::new(),
            sources: SourceHealth::default(),
        }
    }

    pub fn with_attendance(mut self, attendance: Vec<AttendanceEvent>) -> Self {
        self.attendance = attendance;
        self
    }

    pub fn with_reviews(mut self, reviews: Vec<PerformanceReview>) -> Self {
        self.reviews = reviews;
        self
    }

    pub fn with_payroll(mut self, payroll: Vec<PayrollRecord>) -> Self {
        self.payroll = payroll;
        self
    }

    /// Mark the attendance source as failed; its events are discarded and the
    /// attendance-derived sections will degrade.
    pub fn with_failed_attendance(mut self, error: impl Into<String>) -> Self {
        self.attendance.clear();
        self.sources.attendance = SourceState::Failed(error.into());
        self
    }

    pub fn with_failed_performance(mut self, error: impl Into<String>) -> Self {
        self.reviews.clear();
        self.sources.performance = SourceState::Failed(error.into());
        self
    }

    pub fn with_failed_payroll(mut self, error: impl Into<String>) -> Self {
        self.payroll.clear();
        self.sources.payroll = SourceState::Failed(error.into());
        self
    }
}
