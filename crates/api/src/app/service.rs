//! Dashboard assembler: fetches the four sources, runs one engine pass, and
//! shapes the per-section dashboard payload.
//!
//! Orchestration contract:
//! - the window is validated synchronously, before any store call;
//! - the employee roster is the backbone: if it cannot be read the whole
//!   query degrades, while a failed attendance/performance/payroll source
//!   degrades only its own sections;
//! - every derived entity is recomputed wholesale per pass; the TTL cache is
//!   advisory and never a correctness requirement.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::Utc;
use thiserror::Error;

use talenthq_analytics::{
    alerts, attendance, department, forecast, health, recommend, risk, scoring, trend,
    AlertBundle, AttendanceAnomaly, DepartmentComparisonSummary, DepartmentHealth,
    DepartmentImpact, EmployeeScore, EngineConfig, FeatureSet, HrSnapshot, OrganizationalHealth,
    PerformanceTrendEntry, Recommendation, RetentionStats, RiskAssessment, RotationForecast,
};
use talenthq_core::{DomainError, TimeWindow};
use talenthq_store::{HrStore, StoreError};

use crate::app::dto::{
    AttendanceSection, DashboardData, DepartmentComparisonData, PerformanceSection,
    PredictiveData, RetentionSection, SectionResult,
};

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("{0}")]
    InvalidWindow(#[from] DomainError),
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("analysis task failed: {0}")]
    Task(String),
}

/// Everything one engine pass produced, strictly upward data flow.
struct EnginePass {
    features: Arc<FeatureSet>,
    assessments: Vec<RiskAssessment>,
    trends: Vec<PerformanceTrendEntry>,
    anomalies: Vec<AttendanceAnomaly>,
    department_impact: Vec<DepartmentImpact>,
    scores: Vec<EmployeeScore>,
    departments: Vec<DepartmentHealth>,
    organization: OrganizationalHealth,
    alerts: AlertBundle,
    recommendations: Vec<Recommendation>,
    forecast: Option<RotationForecast>,
}

struct CacheEntry {
    window: TimeWindow,
    stored_at: Instant,
    data: Arc<DashboardData>,
}

pub struct AppServices {
    store: Arc<dyn HrStore>,
    config: EngineConfig,
    cache: Mutex<Option<CacheEntry>>,
}

impl AppServices {
    pub fn new(store: Arc<dyn HrStore>, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            cache: Mutex::new(None),
        }
    }

    /// Assemble the full dashboard for a trailing window of `months`
    /// (engine defaults when absent).
    pub async fn dashboard(&self, months: Option<u32>) -> Result<Arc<DashboardData>, QueryError> {
        let window = self.resolve_window(months)?;
        if let Some(cached) = self.cached(&window) {
            return Ok(cached);
        }

        let pass = self.run_pass(window).await?;
        tracing::info!(
            headcount = pass.features.headcount(),
            alerts = pass.alerts.alerts.len(),
            "dashboard assembled"
        );
        let data = Arc::new(assemble_dashboard(&pass));
        self.store_cached(window, Arc::clone(&data));
        Ok(data)
    }

    pub async fn department_comparison(&self) -> Result<DepartmentComparisonData, QueryError> {
        let pass = self.run_pass(self.resolve_window(None)?).await?;
        Ok(DepartmentComparisonData {
            summary: DepartmentComparisonSummary::from_departments(&pass.departments),
            departments: pass.departments,
        })
    }

    pub async fn alerts(&self) -> Result<AlertBundle, QueryError> {
        let pass = self.run_pass(self.resolve_window(None)?).await?;
        Ok(pass.alerts)
    }

    pub async fn organizational_health(&self) -> Result<OrganizationalHealth, QueryError> {
        let pass = self.run_pass(self.resolve_window(None)?).await?;
        Ok(pass.organization)
    }

    pub async fn employee_scoring(&self) -> Result<Vec<EmployeeScore>, QueryError> {
        let pass = self.run_pass(self.resolve_window(None)?).await?;
        Ok(pass.scores)
    }

    pub async fn predictive(&self) -> Result<PredictiveData, QueryError> {
        let pass = self.run_pass(self.resolve_window(None)?).await?;
        Ok(PredictiveData {
            forecast: pass.forecast,
        })
    }

    fn resolve_window(&self, months: Option<u32>) -> Result<TimeWindow, QueryError> {
        let reference = Utc::now().date_naive();
        let window = match months {
            Some(months) => TimeWindow::trailing(reference, months)?,
            None => TimeWindow::default_at(reference),
        };
        Ok(window)
    }

    /// One full engine pass: snapshot, feature aggregation, then the
    /// independent analytical components fanned out as tasks.
    async fn run_pass(&self, window: TimeWindow) -> Result<EnginePass, QueryError> {
        let snapshot = self.load_snapshot(&window).await?;
        let features = Arc::new(FeatureSet::build(&snapshot, window));

        let risk_features = Arc::clone(&features);
        let risk_weights = self.config.risk.clone();
        let risk_task =
            tokio::spawn(async move { risk::assess_all(&risk_features, &risk_weights) });

        let trend_features = Arc::clone(&features);
        let dead_band = self.config.trend_dead_band;
        let trend_task =
            tokio::spawn(async move { trend::classify_all(&trend_features, dead_band) });

        let attendance_features = Arc::clone(&features);
        let attendance_rules = self.config.attendance.clone();
        let attendance_task = tokio::spawn(async move {
            (
                attendance::detect_all(&attendance_features, &attendance_rules),
                attendance::department_impact(&attendance_features),
            )
        });

        let forecast_features = Arc::clone(&features);
        let forecast_config = self.config.forecast.clone();
        let forecast_task = tokio::spawn(async move {
            forecast::forecast(&forecast_features.rotation_history, &forecast_config)
        });

        let (assessments, trends, (anomalies, department_impact), rotation_forecast) =
            tokio::try_join!(risk_task, trend_task, attendance_task, forecast_task)
                .map_err(|e| QueryError::Task(e.to_string()))?;

        // The roll-ups consume everything above; strictly sequential.
        let scores = scoring::score_all(&features, &assessments, &trends);
        let departments = department::compose(
            &features,
            &assessments,
            &scores,
            &trends,
            &anomalies,
            &self.config.department,
        );
        let organization = health::compose(
            &features,
            &assessments,
            &trends,
            &anomalies,
            &departments,
            &self.config.organization,
        );
        let alerts = alerts::generate(
            &assessments,
            &trends,
            &anomalies,
            &departments,
            &self.config.alerts,
            Utc::now(),
        );
        let recommendations = recommend::derive(&alerts.alerts, &departments);

        Ok(EnginePass {
            features,
            assessments,
            trends,
            anomalies,
            department_impact,
            scores,
            departments,
            organization,
            alerts,
            recommendations,
            forecast: rotation_forecast,
        })
    }

    /// Fetch the roster, then the three signal sources concurrently. Only a
    /// roster failure is fatal; everything else degrades per-source.
    async fn load_snapshot(&self, window: &TimeWindow) -> Result<HrSnapshot, StoreError> {
        let employees = self.store.employees().await?;

        let (attendance, reviews, payroll) = tokio::join!(
            self.store.attendance_events(window),
            self.store.performance_reviews(window),
            self.store.payroll_records(window),
        );

        let mut snapshot = HrSnapshot::new(employees);
        snapshot = match attendance {
            Ok(events) => snapshot.with_attendance(events),
            Err(e) => {
                tracing::warn!(error = %e, "attendance source failed; degrading section");
                snapshot.with_failed_attendance(e.to_string())
            }
        };
        snapshot = match reviews {
            Ok(reviews) => snapshot.with_reviews(reviews),
            Err(e) => {
                tracing::warn!(error = %e, "performance source failed; degrading section");
                snapshot.with_failed_performance(e.to_string())
            }
        };
        snapshot = match payroll {
            Ok(records) => snapshot.with_payroll(records),
            Err(e) => {
                tracing::warn!(error = %e, "payroll source failed; degrading section");
                snapshot.with_failed_payroll(e.to_string())
            }
        };
        Ok(snapshot)
    }

    fn cached(&self, window: &TimeWindow) -> Option<Arc<DashboardData>> {
        let guard = self.cache.lock().ok()?;
        let entry = guard.as_ref()?;
        let ttl = Duration::from_secs(self.config.cache_ttl_secs);
        if entry.window == *window && entry.stored_at.elapsed() < ttl {
            return Some(Arc::clone(&entry.data));
        }
        None
    }

    fn store_cached(&self, window: TimeWindow, data: Arc<DashboardData>) {
        // A poisoned cache lock just means serving uncached.
        if let Ok(mut guard) = self.cache.lock() {
            *guard = Some(CacheEntry {
                window,
                stored_at: Instant::now(),
                data,
            });
        }
    }
}

/// Shape a pass into per-section results, degrading the sections whose
/// upstream source failed.
fn assemble_dashboard(pass: &EnginePass) -> DashboardData {
    let sources = &pass.features.sources;

    let retention = SectionResult::ok(RetentionSection {
        stats: RetentionStats::from_assessments(&pass.assessments),
        assessments: pass.assessments.clone(),
    });

    let performance = match sources.performance.error() {
        None => SectionResult::ok(PerformanceSection {
            declining: trend::declining(&pass.trends).cloned().collect(),
        }),
        Some(error) => SectionResult::failed(error),
    };

    let attendance = match sources.attendance.error() {
        None => SectionResult::ok(AttendanceSection {
            anomalies: pass.anomalies.clone(),
            department_impact: pass.department_impact.clone(),
        }),
        Some(error) => SectionResult::failed(error),
    };

    let payroll = match sources.payroll.error() {
        None => SectionResult::ok(pass.features.payroll.clone()),
        Some(error) => SectionResult::failed(error),
    };

    // Insufficient rotation history is an empty section, not a failed one.
    let predictive = match &pass.forecast {
        Some(forecast) => SectionResult::ok(forecast.clone()),
        None => SectionResult::empty(),
    };

    DashboardData {
        window: pass.features.window,
        generated_at: Utc::now(),
        retention,
        performance,
        attendance,
        payroll,
        predictive,
        recommendations: SectionResult::ok(pass.recommendations.clone()),
    }
}
