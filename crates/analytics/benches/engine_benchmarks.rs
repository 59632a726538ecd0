use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::{Days, NaiveDate, Utc};
use talenthq_analytics::{
    alerts, attendance, department, forecast, health, recommend, risk, scoring, trend,
    AttendanceEvent, AttendanceKind, EmployeeRecord, EngineConfig, FeatureSet, HrSnapshot,
    PerformanceReview,
};
use talenthq_core::{EmployeeId, TimeWindow};

/// Deterministic synthetic roster: no RNG so runs are comparable.
fn synthetic_snapshot(employees: usize) -> HrSnapshot {
    let departments = ["Ventas", "TI", "Operaciones", "Finanzas", "RRHH"];
    let hired_base = NaiveDate::from_ymd_opt(2020, 1, 15).unwrap();

    let mut roster = Vec::with_capacity(employees);
    let mut events = Vec::new();
    let mut reviews = Vec::new();

    for i in 0..employees {
        let id = EmployeeId::new();
        let hired_at = hired_base
            .checked_add_days(Days::new((i as u64 * 37) % 2000))
            .unwrap();
        let terminated_at = if i % 17 == 0 {
            hired_at.checked_add_days(Days::new(400))
        } else {
            None
        };
        roster.push(EmployeeRecord {
            id,
            name: format!("Empleado {i}"),
            department: departments[i % departments.len()].to_string(),
            position: "Analista".to_string(),
            hired_at,
            terminated_at,
            base_salary: 28_000_00 + (i as i64 % 7) * 1_000_00,
        });

        for k in 0..(i % 6) {
            events.push(AttendanceEvent {
                employee_id: id,
                date: NaiveDate::from_ymd_opt(2026, 1 + (k as u32 % 7), 1 + (i as u32 % 27))
                    .unwrap(),
                kind: if k % 3 == 0 {
                    AttendanceKind::Late
                } else {
                    AttendanceKind::Absence
                },
            });
        }

        for k in 0..(i % 4) {
            reviews.push(PerformanceReview {
                employee_id: id,
                date: NaiveDate::from_ymd_opt(2026, 2 + k as u32, 10).unwrap(),
                score: 2.0 + ((i + k) % 30) as f64 / 10.0,
            });
        }
    }

    HrSnapshot::new(roster)
        .with_attendance(events)
        .with_reviews(reviews)
}

fn full_engine_pass(snapshot: &HrSnapshot, config: &EngineConfig) -> usize {
    let window = TimeWindow::default_at(NaiveDate::from_ymd_opt(2026, 8, 15).unwrap());
    let features = FeatureSet::build(snapshot, window);

    let assessments = risk::assess_all(&features, &config.risk);
    let trends = trend::classify_all(&features, config.trend_dead_band);
    let anomalies = attendance::detect_all(&features, &config.attendance);
    let scores = scoring::score_all(&features, &assessments, &trends);
    let departments = department::compose(
        &features,
        &assessments,
        &scores,
        &trends,
        &anomalies,
        &config.department,
    );
    let org = health::compose(
        &features,
        &assessments,
        &trends,
        &anomalies,
        &departments,
        &config.organization,
    );
    let bundle = alerts::generate(
        &assessments,
        &trends,
        &anomalies,
        &departments,
        &config.alerts,
        Utc::now(),
    );
    let recommendations = recommend::derive(&bundle.alerts, &departments);
    let rotation = forecast::forecast(&features.rotation_history, &config.forecast);

    assessments.len()
        + scores.len()
        + recommendations.len()
        + rotation.map(|f| f.predicted.len()).unwrap_or(0)
        + (org.overall_score as usize)
}

fn bench_full_engine(c: &mut Criterion) {
    let config = EngineConfig::default();
    let mut group = c.benchmark_group("engine_full_pass");

    for size in [50usize, 250, 1000] {
        let snapshot = synthetic_snapshot(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &snapshot, |b, snapshot| {
            b.iter(|| full_engine_pass(black_box(snapshot), &config));
        });
    }
    group.finish();
}

fn bench_risk_scoring(c: &mut Criterion) {
    let config = EngineConfig::default();
    let snapshot = synthetic_snapshot(1000);
    let window = TimeWindow::default_at(NaiveDate::from_ymd_opt(2026, 8, 15).unwrap());
    let features = FeatureSet::build(&snapshot, window);

    c.bench_function("risk_scoring_1000", |b| {
        b.iter(|| risk::assess_all(black_box(&features), &config.risk));
    });
}

criterion_group!(benches, bench_full_engine, bench_risk_scoring);
criterion_main!(benches);
