//! Data aggregation: raw records in, per-employee feature bundles out.
//!
//! All default-value policy lives here. Every active employee gets a bundle
//! even with zero history (neutral features), so downstream components never
//! re-invent "or 0" fallbacks. The one deliberate exception is the trend
//! classifier, which excludes employees instead of defaulting (see
//! [`crate::trend`]).

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use talenthq_core::{EmployeeId, TimeWindow, YearMonth};

use crate::snapshot::{AttendanceKind, HrSnapshot, SourceHealth};

/// Per-employee features for one computation cycle.
///
/// Owned by the [`FeatureSet`] that built it; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeFeatureBundle {
    pub employee_id: EmployeeId,
    pub name: String,
    pub department: String,
    pub position: String,
    /// Whole months since hire, relative to the window reference date.
    pub tenure_months: u32,
    pub absence_count: u32,
    pub late_count: u32,
    /// Dates of absences inside the attendance window, ascending.
    pub absence_dates: Vec<NaiveDate>,
    /// Review scores inside the performance window, chronological.
    pub review_scores: Vec<f64>,
    /// Months since the most recent review on record, if any ever happened.
    pub months_since_last_review: Option<u32>,
    /// Earliest observed gross pay inside the window, by period.
    pub first_gross_pay: Option<i64>,
    /// Latest observed gross pay inside the window, by period.
    pub last_gross_pay: Option<i64>,
    pub base_salary: i64,
    pub terminated: bool,
}

impl EmployeeFeatureBundle {
    /// Absences plus half-weighted lates, per month of attendance window.
    pub fn attendance_incidents_per_month(&self, window: &TimeWindow) -> f64 {
        let combined = f64::from(self.absence_count) + 0.5 * f64::from(self.late_count);
        combined / f64::from(window.attendance_months.max(1))
    }

    /// True when no gross-pay increase was observed inside the window.
    ///
    /// Absence of payroll history counts as stagnation: the signal is the
    /// absence of an increase, not the presence of data.
    pub fn compensation_stagnant(&self) -> bool {
        match (self.first_gross_pay, self.last_gross_pay) {
            (Some(first), Some(last)) => last <= first,
            _ => true,
        }
    }
}

/// Payroll pass-through summary for the dashboard. The engine does not
/// compute wages; this is a restatement of what the store reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollSummary {
    /// Most recent payroll period observed, if any.
    pub latest_period: Option<YearMonth>,
    /// Total gross pay of the latest period.
    pub latest_total_gross: i64,
    /// Mean gross pay per record in the latest period.
    pub latest_average_gross: f64,
    pub record_count: usize,
}

/// Immutable output of one aggregation pass: the input of every analytical
/// component downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub window: TimeWindow,
    /// One bundle per active employee, sorted by name then id.
    pub bundles: Vec<EmployeeFeatureBundle>,
    /// Departures per calendar month over the rotation lookback, oldest
    /// first, zero-filled. Always `window.rotation_months` entries.
    pub rotation_history: Vec<(YearMonth, u32)>,
    pub payroll: PayrollSummary,
    pub sources: SourceHealth,
}

impl FeatureSet {
    /// Aggregate one snapshot over one window. Read-only, deterministic.
    pub fn build(snapshot: &HrSnapshot, window: TimeWindow) -> Self {
        let attendance_cutoff = window.attendance_cutoff();
        let performance_cutoff = window.performance_cutoff();
        let reference_month = YearMonth::from_date(window.reference);

        let mut absences: HashMap<EmployeeId, Vec<NaiveDate>> = HashMap::new();
        let mut lates: HashMap<EmployeeId, u32> = HashMap::new();
        for event in &snapshot.attendance {
            if event.date < attendance_cutoff || event.date > window.reference {
                continue;
            }
            match event.kind {
                AttendanceKind::Absence => {
                    absences.entry(event.employee_id).or_default().push(event.date)
                }
                AttendanceKind::Late => *lates.entry(event.employee_id).or_default() += 1,
            }
        }
        for dates in absences.values_mut() {
            dates.sort();
        }

        let mut windowed_reviews: HashMap<EmployeeId, Vec<(NaiveDate, f64)>> = HashMap::new();
        let mut last_review: HashMap<EmployeeId, NaiveDate> = HashMap::new();
        for review in &snapshot.reviews {
            if review.date > window.reference {
                continue;
            }
            last_review
                .entry(review.employee_id)
                .and_modify(|d| *d = (*d).max(review.date))
                .or_insert(review.date);
            if review.date >= performance_cutoff {
                windowed_reviews
                    .entry(review.employee_id)
                    .or_default()
                    .push((review.date, review.score));
            }
        }
        for scores in windowed_reviews.values_mut() {
            scores.sort_by(|a, b| a.0.cmp(&b.0));
        }

        let payroll_start_index =
            reference_month.index() - i64::from(window.attendance_months) + 1;
        let mut pay_by_employee: HashMap<EmployeeId, Vec<(YearMonth, i64)>> = HashMap::new();
        for record in &snapshot.payroll {
            let idx = record.period.index();
            if idx < payroll_start_index || idx > reference_month.index() {
                continue;
            }
            pay_by_employee
                .entry(record.employee_id)
                .or_default()
                .push((record.period, record.gross_pay));
        }
        for periods in pay_by_employee.values_mut() {
            periods.sort_by(|a, b| a.0.cmp(&b.0));
        }

        let mut bundles: Vec<EmployeeFeatureBundle> = snapshot
            .employees
            .iter()
            .filter(|e| e.is_active())
            .map(|employee| {
                let absence_dates = absences.remove(&employee.id).unwrap_or_default();
                let scores: Vec<f64> = windowed_reviews
                    .remove(&employee.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(_, s)| s)
                    .collect();
                let pay = pay_by_employee.remove(&employee.id).unwrap_or_default();

                let hired_month = YearMonth::from_date(employee.hired_at);
                let tenure_months = hired_month.months_until(reference_month).max(0) as u32;

                let months_since_last_review = last_review.get(&employee.id).map(|date| {
                    YearMonth::from_date(*date)
                        .months_until(reference_month)
                        .max(0) as u32
                });

                EmployeeFeatureBundle {
                    employee_id: employee.id,
                    name: employee.name.clone(),
                    department: employee.department.clone(),
                    position: employee.position.clone(),
                    tenure_months,
                    absence_count: absence_dates.len() as u32,
                    late_count: lates.remove(&employee.id).unwrap_or(0),
                    absence_dates,
                    review_scores: scores,
                    months_since_last_review,
                    first_gross_pay: pay.first().map(|(_, g)| *g),
                    last_gross_pay: pay.last().map(|(_, g)| *g),
                    base_salary: employee.base_salary,
                    terminated: false,
                }
            })
            .collect();
        bundles.sort_by(|a, b| a.name.cmp(&b.name).then(a.employee_id.cmp(&b.employee_id)));

        let rotation_history = rotation_series(snapshot, &window);
        let payroll = payroll_summary(snapshot, reference_month, payroll_start_index);

        Self {
            window,
            bundles,
            rotation_history,
            payroll,
            sources: snapshot.sources.clone(),
        }
    }

    pub fn headcount(&self) -> usize {
        self.bundles.len()
    }

    /// Total departures inside the rotation lookback.
    pub fn departures(&self) -> u32 {
        self.rotation_history.iter().map(|(_, c)| c).sum()
    }
}

fn rotation_series(snapshot: &HrSnapshot, window: &TimeWindow) -> Vec<(YearMonth, u32)> {
    let span = window.rotation_span();
    let mut counts: BTreeMap<YearMonth, u32> = span.iter().map(|m| (*m, 0)).collect();

    for employee in &snapshot.employees {
        if let Some(terminated_at) = employee.terminated_at {
            let month = YearMonth::from_date(terminated_at);
            if let Some(count) = counts.get_mut(&month) {
                *count += 1;
            }
        }
    }

    span.into_iter()
        .map(|month| (month, counts[&month]))
        .collect()
}

fn payroll_summary(
    snapshot: &HrSnapshot,
    reference_month: YearMonth,
    start_index: i64,
) -> PayrollSummary {
    let in_window: Vec<_> = snapshot
        .payroll
        .iter()
        .filter(|r| r.period.index() >= start_index && r.period.index() <= reference_month.index())
        .collect();

    let latest_period = in_window.iter().map(|r| r.period).max();
    let (latest_total, latest_count) = match latest_period {
        Some(period) => {
            let latest: Vec<_> = in_window.iter().filter(|r| r.period == period).collect();
            (latest.iter().map(|r| r.gross_pay).sum::<i64>(), latest.len())
        }
        None => (0, 0),
    };

    PayrollSummary {
        latest_period,
        latest_total_gross: latest_total,
        latest_average_gross: if latest_count == 0 {
            0.0
        } else {
            latest_total as f64 / latest_count as f64
        },
        record_count: in_window.len(),
    }
}
