//! Rotation forecasting: OLS trend over monthly departure counts.
//!
//! Fails closed: fewer than [`ForecastConfig::min_history`] historical points
//! and there is *no* forecast, never a best-effort guess. Confidence is a
//! heuristic in (0, 1], strictly decreasing with horizon and lower when the
//! history fits the line poorly; it is not a statistical p-value.

use serde::{Deserialize, Serialize};

use talenthq_core::YearMonth;

use crate::config::ForecastConfig;
use crate::stats::{linear_fit, mean, residual_rms};

/// Direction of the fitted rotation trend.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationTrend {
    Increasing,
    Decreasing,
    Stable,
}

/// One point of the rotation chart. Historical points carry `actual`;
/// projected points carry `predicted` + `confidence`. The single connecting
/// month appears in both series as an actual point for chart continuity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRotationPoint {
    pub month: YearMonth,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl MonthlyRotationPoint {
    fn actual(month: YearMonth, count: u32) -> Self {
        Self {
            month,
            actual: Some(count),
            predicted: None,
            confidence: None,
        }
    }

    fn predicted(month: YearMonth, count: u32, confidence: f64) -> Self {
        Self {
            month,
            actual: None,
            predicted: Some(count),
            confidence: Some(confidence),
        }
    }
}

/// Full forecaster output for the predictive-analytics query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationForecast {
    pub historical: Vec<MonthlyRotationPoint>,
    /// Connecting month first, then the projected months.
    pub predicted: Vec<MonthlyRotationPoint>,
    pub trend: RotationTrend,
    /// Simple mean of the historical counts, not the fitted value.
    pub average_monthly: f64,
    pub insights: Vec<String>,
}

/// Fit and project. `None` when history is too short (required guard).
pub fn forecast(
    history: &[(YearMonth, u32)],
    config: &ForecastConfig,
) -> Option<RotationForecast> {
    if history.len() < config.min_history {
        return None;
    }

    let counts: Vec<f64> = history.iter().map(|(_, c)| f64::from(*c)).collect();
    let (slope, intercept) = linear_fit(&counts);
    let average_monthly = mean(&counts);

    let rms = residual_rms(&counts, slope, intercept);
    // Residual spread relative to the series scale; max(mean, 1) keeps the
    // ratio meaningful for near-zero series.
    let base_confidence = 1.0 / (1.0 + rms / average_monthly.max(1.0));

    let trend = if slope > config.slope_epsilon {
        RotationTrend::Increasing
    } else if slope < -config.slope_epsilon {
        RotationTrend::Decreasing
    } else {
        RotationTrend::Stable
    };

    let historical: Vec<MonthlyRotationPoint> = history
        .iter()
        .map(|(month, count)| MonthlyRotationPoint::actual(*month, *count))
        .collect();

    let (last_month, last_count) = *history.last()?;
    let mut predicted = vec![MonthlyRotationPoint::actual(last_month, last_count)];
    let mut month = last_month;
    for h in 1..=config.horizon {
        month = month.next();
        let x = (history.len() - 1 + h as usize) as f64;
        let fitted = slope * x + intercept;
        // Departure counts are never negative.
        let count = fitted.round().max(0.0) as u32;
        let confidence = base_confidence * config.confidence_decay.powi(h as i32);
        predicted.push(MonthlyRotationPoint::predicted(month, count, confidence));
    }

    let insights = build_insights(trend, average_monthly, history);

    Some(RotationForecast {
        historical,
        predicted,
        trend,
        average_monthly,
        insights,
    })
}

fn build_insights(
    trend: RotationTrend,
    average_monthly: f64,
    history: &[(YearMonth, u32)],
) -> Vec<String> {
    let mut insights = Vec::new();

    insights.push(match trend {
        RotationTrend::Increasing => {
            "La rotación muestra una tendencia creciente; conviene revisar las acciones de retención.".to_string()
        }
        RotationTrend::Decreasing => {
            "La rotación muestra una tendencia decreciente; las acciones de retención están funcionando.".to_string()
        }
        RotationTrend::Stable => {
            "La rotación se mantiene estable en el periodo analizado.".to_string()
        }
    });

    insights.push(format!(
        "Promedio de {average_monthly:.1} bajas por mes en los últimos {} meses.",
        history.len()
    ));

    if let Some((month, count)) = history.iter().max_by_key(|(m, c)| (*c, *m)) {
        if f64::from(*count) > average_monthly {
            insights.push(format!("El mes con más bajas fue {month} ({count})."));
        }
    }

    insights
}
