//! Engine configuration: every heuristic weight, threshold and dead-band in
//! one validated structure.
//!
//! The tier and label boundaries here are contractual: UI color coding and the
//! cross-component tests rely on the exact values, so they are configuration
//! (inspectable, testable) rather than inline constants.

use talenthq_core::{DomainError, DomainResult};

/// Maximum contribution of each retention-risk factor, plus tier boundaries.
///
/// Factor maxima sum to 100 so a fully saturated employee hits the score cap
/// without clamping doing the work.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskWeights {
    pub tenure_max: f64,
    pub compensation_max: f64,
    pub attendance_max: f64,
    pub performance_max: f64,
    pub engagement_max: f64,
    /// Inclusive lower bound of `HighRisk` ("Alto Riesgo").
    pub high_risk_threshold: f64,
    /// Inclusive lower bound of `MediumRisk` ("Riesgo Medio").
    pub medium_risk_threshold: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            tenure_max: 25.0,
            compensation_max: 20.0,
            attendance_max: 25.0,
            performance_max: 20.0,
            engagement_max: 10.0,
            high_risk_threshold: 70.0,
            medium_risk_threshold: 40.0,
        }
    }
}

/// Detection thresholds for attendance pattern rules.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceRules {
    /// Minimum absences before the recurring-weekday rule applies.
    pub weekday_min_absences: u32,
    /// Share of absences on one weekday that counts as recurring.
    pub weekday_share: f64,
    /// Minimum absences before the weekend-adjacency rule applies.
    pub weekend_min_absences: u32,
    /// Share of absences on Monday/Friday that counts as weekend-adjacent.
    pub weekend_share: f64,
    /// Minimum absences in the trailing 30 days for a spike.
    pub spike_min_recent: u32,
    /// Recent count must exceed the monthly baseline by this factor.
    pub spike_factor: f64,
}

impl Default for AttendanceRules {
    fn default() -> Self {
        Self {
            weekday_min_absences: 3,
            weekday_share: 0.5,
            weekend_min_absences: 4,
            weekend_share: 0.6,
            spike_min_recent: 3,
            spike_factor: 2.0,
        }
    }
}

/// Rotation forecaster parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    /// Fewer historical points than this and the forecaster fails closed.
    pub min_history: usize,
    /// Future months to project.
    pub horizon: u32,
    /// Dead-band on the fitted slope for the stable/increasing/decreasing label.
    pub slope_epsilon: f64,
    /// Per-month confidence decay, in (0, 1).
    pub confidence_decay: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            min_history: 3,
            horizon: 3,
            slope_epsilon: 0.1,
            confidence_decay: 0.85,
        }
    }
}

/// Department composite weights (lower composite = healthier department).
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentWeights {
    pub high_risk: f64,
    pub declining: f64,
    pub attendance: f64,
}

impl Default for DepartmentWeights {
    fn default() -> Self {
        Self {
            high_risk: 0.4,
            declining: 0.3,
            attendance: 0.3,
        }
    }
}

/// Organizational health composite weights (higher composite = healthier).
///
/// Must sum to 1.0; [`EngineConfig::validate`] enforces it.
#[derive(Debug, Clone, PartialEq)]
pub struct OrganizationWeights {
    pub retention: f64,
    pub performance: f64,
    pub attendance: f64,
    pub departments: f64,
}

impl OrganizationWeights {
    pub fn sum(&self) -> f64 {
        self.retention + self.performance + self.attendance + self.departments
    }
}

impl Default for OrganizationWeights {
    fn default() -> Self {
        Self {
            retention: 0.35,
            performance: 0.25,
            attendance: 0.20,
            departments: 0.20,
        }
    }
}

/// Minimum counts before the alert generator raises each alert category.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertThresholds {
    pub high_risk_count: u32,
    pub declining_count: u32,
    pub anomaly_count: u32,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            high_risk_count: 3,
            declining_count: 3,
            anomaly_count: 3,
        }
    }
}

/// Full engine configuration, passed into every analytical component.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub risk: RiskWeights,
    /// Dead-band on the review-score slope (1–5 scale) for trend labels.
    pub trend_dead_band: f64,
    pub attendance: AttendanceRules,
    pub forecast: ForecastConfig,
    pub department: DepartmentWeights,
    pub organization: OrganizationWeights,
    pub alerts: AlertThresholds,
    /// Advisory dashboard cache TTL, seconds. Never a correctness requirement.
    pub cache_ttl_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            risk: RiskWeights::default(),
            trend_dead_band: 0.15,
            attendance: AttendanceRules::default(),
            forecast: ForecastConfig::default(),
            department: DepartmentWeights::default(),
            organization: OrganizationWeights::default(),
            alerts: AlertThresholds::default(),
            cache_ttl_secs: 120,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> DomainResult<()> {
        let weights_sum = self.organization.sum();
        if (weights_sum - 1.0).abs() > 1e-9 {
            return Err(DomainError::invariant(format!(
                "organization weights must sum to 1.0, got {weights_sum}"
            )));
        }

        if self.risk.medium_risk_threshold >= self.risk.high_risk_threshold {
            return Err(DomainError::invariant(
                "medium risk threshold must be below high risk threshold".to_string(),
            ));
        }

        if self.forecast.min_history < 3 {
            return Err(DomainError::invariant(
                "forecaster needs at least 3 historical points".to_string(),
            ));
        }

        if !(self.forecast.confidence_decay > 0.0 && self.forecast.confidence_decay < 1.0) {
            return Err(DomainError::invariant(
                "confidence decay must be in (0, 1)".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn organization_weights_must_sum_to_one() {
        let mut config = EngineConfig::default();
        config.organization.retention = 0.9;
        let err = config.validate().unwrap_err();
        match err {
            DomainError::InvariantViolation(msg) => assert!(msg.contains("sum to 1.0")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn forecast_guard_cannot_be_weakened_below_three() {
        let mut config = EngineConfig::default();
        config.forecast.min_history = 2;
        assert!(config.validate().is_err());
    }
}
