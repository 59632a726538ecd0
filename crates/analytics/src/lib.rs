//! `talenthq-analytics`
//!
//! **Responsibility:** the organizational intelligence engine.
//!
//! This crate is intentionally **not** part of the operational HR model:
//! - It must not depend on the record store (inputs are snapshots provided by callers).
//! - It must not mutate operational state.
//! - It emits **derived signals** (scores, trends, forecasts, alerts), not records.
//!
//! Every computation here is pure and deterministic given an [`HrSnapshot`],
//! a [`TimeWindow`](talenthq_core::TimeWindow) and an [`EngineConfig`]:
//! running the engine twice over the same snapshot yields identical output.
//! Insufficient data is a *value* (an absent section, an excluded employee),
//! never an error.

pub mod aggregate;
pub mod alerts;
pub mod attendance;
pub mod config;
pub mod department;
pub mod forecast;
pub mod health;
pub mod recommend;
pub mod risk;
pub mod scoring;
pub mod snapshot;
pub mod stats;
pub mod trend;

pub use aggregate::{EmployeeFeatureBundle, FeatureSet, PayrollSummary};
pub use alerts::{Alert, AlertBundle, AlertCategory, AlertSummary, Severity};
pub use attendance::{AnomalyPattern, AttendanceAnomaly, DepartmentImpact};
pub use config::EngineConfig;
pub use department::{DepartmentComparisonSummary, DepartmentHealth, HealthLabel};
pub use forecast::{MonthlyRotationPoint, RotationForecast, RotationTrend};
pub use health::{HealthComponents, KpiSnapshot, OrganizationalHealth};
pub use recommend::{Impact, Priority, Recommendation};
pub use risk::{RetentionStats, RiskAssessment, RiskFactor, RiskTier};
pub use scoring::{EmployeeCategory, EmployeeScore};
pub use snapshot::{
    AttendanceEvent, AttendanceKind, EmployeeRecord, HrSnapshot, PayrollRecord,
    PerformanceReview, SourceHealth, SourceState,
};
pub use trend::{PerformanceTrendEntry, TrendDirection};
