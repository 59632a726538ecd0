//! Attendance pattern detection and department impact aggregation.
//!
//! Detection emits at most one anomaly per employee (rules checked in order,
//! first match wins). Department impact is aggregated for every department
//! regardless of anomaly status; the impact chart and the anomaly list are
//! distinct outputs.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Weekday};
use serde::{Deserialize, Serialize};

use talenthq_core::EmployeeId;

use crate::aggregate::{EmployeeFeatureBundle, FeatureSet};
use crate::config::AttendanceRules;

/// Detected absence pattern, with supporting counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum AnomalyPattern {
    /// Absences concentrate on one weekday (e.g. repeated Mondays).
    RecurringWeekday {
        weekday: String,
        matching: u32,
        total: u32,
    },
    /// Absences cluster on Mondays/Fridays, stretching weekends.
    WeekendAdjacent { matching: u32, total: u32 },
    /// Recent absence frequency well above the employee's own baseline.
    FrequencySpike {
        recent_30_days: u32,
        monthly_baseline: f64,
    },
}

/// One employee flagged by a detection rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceAnomaly {
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub department: String,
    pub pattern: AnomalyPattern,
}

/// Raw absence/late impact per department (chart input).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentImpact {
    pub department: String,
    pub absence_count: u32,
    pub late_count: u32,
}

/// Scan every employee for suspicious absence clustering.
pub fn detect_all(features: &FeatureSet, rules: &AttendanceRules) -> Vec<AttendanceAnomaly> {
    features
        .bundles
        .iter()
        .filter_map(|bundle| {
            detect(bundle, features, rules).map(|pattern| AttendanceAnomaly {
                employee_id: bundle.employee_id,
                employee_name: bundle.name.clone(),
                department: bundle.department.clone(),
                pattern,
            })
        })
        .collect()
}

fn detect(
    bundle: &EmployeeFeatureBundle,
    features: &FeatureSet,
    rules: &AttendanceRules,
) -> Option<AnomalyPattern> {
    let total = bundle.absence_dates.len() as u32;
    if total == 0 {
        return None;
    }

    // Rule 1: recurring weekday. The repeated weekday itself must reach the
    // minimum count, not just the overall absence total.
    {
        let mut by_weekday: BTreeMap<u32, u32> = BTreeMap::new();
        for date in &bundle.absence_dates {
            *by_weekday.entry(date.weekday().num_days_from_monday()).or_default() += 1;
        }
        if let Some((weekday, count)) = by_weekday
            .into_iter()
            .max_by_key(|(weekday, count)| (*count, u32::MAX - *weekday))
        {
            if count >= rules.weekday_min_absences
                && f64::from(count) / f64::from(total) >= rules.weekday_share
            {
                return Some(AnomalyPattern::RecurringWeekday {
                    weekday: weekday_name(weekday).to_string(),
                    matching: count,
                    total,
                });
            }
        }
    }


    // Rule 2: weekend adjacency.
    if total >= rules.weekend_min_absences {
        let matching = bundle
            .absence_dates
            .iter()
            .filter(|d| matches!(d.weekday(), Weekday::Mon | Weekday::Fri))
            .count() as u32;
        if f64::from(matching) / f64::from(total) >= rules.weekend_share {
            return Some(AnomalyPattern::WeekendAdjacent { matching, total });
        }
    }

    // Rule 3: frequency spike vs the employee's own monthly baseline.
    let spike_cutoff = features
        .window
        .reference
        .checked_sub_days(Days::new(30))
        .unwrap_or(features.window.reference);
    let recent = bundle
        .absence_dates
        .iter()
        .filter(|d| **d > spike_cutoff)
        .count() as u32;
    let monthly_baseline =
        f64::from(total) / f64::from(features.window.attendance_months.max(1));
    if recent >= rules.spike_min_recent
        && f64::from(recent) >= monthly_baseline * rules.spike_factor
    {
        return Some(AnomalyPattern::FrequencySpike {
            recent_30_days: recent,
            monthly_baseline,
        });
    }

    None
}

/// Aggregate raw absence/late counts per department, sorted by absence count
/// descending then name (chart order).
pub fn department_impact(features: &FeatureSet) -> Vec<DepartmentImpact> {
    let mut by_department: BTreeMap<&str, (u32, u32)> = BTreeMap::new();
    for bundle in &features.bundles {
        let entry = by_department.entry(bundle.department.as_str()).or_default();
        entry.0 += bundle.absence_count;
        entry.1 += bundle.late_count;
    }

    let mut impact: Vec<DepartmentImpact> = by_department
        .into_iter()
        .map(|(department, (absence_count, late_count))| DepartmentImpact {
            department: department.to_string(),
            absence_count,
            late_count,
        })
        .collect();
    impact.sort_by(|a, b| {
        b.absence_count
            .cmp(&a.absence_count)
            .then_with(|| a.department.cmp(&b.department))
    });
    impact
}

fn weekday_name(num_from_monday: u32) -> &'static str {
    match num_from_monday {
        0 => "lunes",
        1 => "martes",
        2 => "miércoles",
        3 => "jueves",
        4 => "viernes",
        5 => "sábado",
        _ => "domingo",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{AttendanceEvent, AttendanceKind, EmployeeRecord, HrSnapshot};
    use chrono::NaiveDate;
    use talenthq_core::TimeWindow;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn features_for(absence_dates: Vec<NaiveDate>) -> FeatureSet {
        let employee = EmployeeRecord {
            id: EmployeeId::new(),
            name: "Marta Nieto".to_string(),
            department: "Operaciones".to_string(),
            position: "Supervisora".to_string(),
            hired_at: date(2023, 1, 1),
            terminated_at: None,
            base_salary: 0,
        };
        let events = absence_dates
            .into_iter()
            .map(|d| AttendanceEvent {
                employee_id: employee.id,
                date: d,
                kind: AttendanceKind::Absence,
            })
            .collect();
        let snapshot = HrSnapshot::new(vec![employee]).with_attendance(events);
        FeatureSet::build(&snapshot, TimeWindow::default_at(date(2026, 8, 15)))
    }

    #[test]
    fn repeated_mondays_trigger_recurring_weekday() {
        // 2026-06-01, -08, -15 are Mondays; one Wednesday as noise.
        let features = features_for(vec![
            date(2026, 6, 1),
            date(2026, 6, 8),
            date(2026, 6, 15),
            date(2026, 6, 10),
        ]);
        let anomalies = detect_all(&features, &AttendanceRules::default());
        assert_eq!(anomalies.len(), 1);
        match &anomalies[0].pattern {
            AnomalyPattern::RecurringWeekday { weekday, matching, total } => {
                assert_eq!(weekday, "lunes");
                assert_eq!(*matching, 3);
                assert_eq!(*total, 4);
            }
            other => panic!("expected recurring weekday, got {other:?}"),
        }
    }

    #[test]
    fn monday_friday_mix_triggers_weekend_adjacency() {
        // Two Mondays + two Fridays, spread out so no single weekday reaches
        // the recurring share.
        let features = features_for(vec![
            date(2026, 5, 4),  // Monday
            date(2026, 6, 8),  // Monday
            date(2026, 5, 22), // Friday
            date(2026, 7, 3),  // Friday
        ]);
        let anomalies = detect_all(&features, &AttendanceRules::default());
        assert_eq!(anomalies.len(), 1);
        match &anomalies[0].pattern {
            AnomalyPattern::WeekendAdjacent { matching, total } => {
                assert_eq!(*matching, 4);
                assert_eq!(*total, 4);
            }
            other => panic!("expected weekend adjacency, got {other:?}"),
        }
    }

    #[test]
    fn recent_burst_triggers_frequency_spike() {
        // Three absences inside the trailing 30 days, nothing before:
        // baseline is 3/12 per month, recent count far above it.
        let features = features_for(vec![
            date(2026, 8, 4),  // Tuesday
            date(2026, 8, 12), // Wednesday
            date(2026, 7, 23), // Thursday
        ]);
        let anomalies = detect_all(&features, &AttendanceRules::default());
        assert_eq!(anomalies.len(), 1);
        match &anomalies[0].pattern {
            AnomalyPattern::FrequencySpike { recent_30_days, monthly_baseline } => {
                assert_eq!(*recent_30_days, 3);
                assert!((monthly_baseline - 0.25).abs() < 1e-9);
            }
            other => panic!("expected frequency spike, got {other:?}"),
        }
    }

    #[test]
    fn sparse_absences_are_not_anomalous() {
        let features = features_for(vec![date(2026, 2, 3), date(2026, 5, 20)]);
        let anomalies = detect_all(&features, &AttendanceRules::default());
        assert!(anomalies.is_empty());
    }

    #[test]
    fn impact_is_aggregated_even_without_anomalies() {
        let features = features_for(vec![date(2026, 2, 3)]);
        let impact = department_impact(&features);
        assert_eq!(impact.len(), 1);
        assert_eq!(impact[0].department, "Operaciones");
        assert_eq!(impact[0].absence_count, 1);
        assert_eq!(impact[0].late_count, 0);
    }
}
