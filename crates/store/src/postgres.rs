//! Postgres-backed store implementation.
//!
//! Reads the operational schema owned by the HR platform; this crate never
//! creates or migrates tables. Every query is windowed server-side so large
//! histories do not cross the wire, and the aggregator re-filters anyway.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};

use talenthq_analytics::{
    AttendanceEvent, AttendanceKind, EmployeeRecord, PayrollRecord, PerformanceReview,
};
use talenthq_core::{EmployeeId, TimeWindow, YearMonth};

use crate::error::StoreError;
use crate::traits::HrStore;

/// Postgres `HrStore` over the platform's operational schema.
#[derive(Debug, Clone)]
pub struct PostgresHrStore {
    pool: PgPool,
}

impl PostgresHrStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HrStore for PostgresHrStore {
    async fn employees(&self) -> Result<Vec<EmployeeRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, department, position, hired_at, terminated_at, base_salary
            FROM employees
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::query("employees", e.to_string()))?;

        rows.iter()
            .map(|row| {
                Ok(EmployeeRecord {
                    id: EmployeeId::from_uuid(get(row, "id", "employees")?),
                    name: get(row, "name", "employees")?,
                    department: get(row, "department", "employees")?,
                    position: get(row, "position", "employees")?,
                    hired_at: get(row, "hired_at", "employees")?,
                    terminated_at: get::<Option<NaiveDate>>(row, "terminated_at", "employees")?,
                    base_salary: get(row, "base_salary", "employees")?,
                })
            })
            .collect()
    }

    async fn attendance_events(
        &self,
        window: &TimeWindow,
    ) -> Result<Vec<AttendanceEvent>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT employee_id, event_date, kind
            FROM attendance_events
            WHERE event_date >= $1 AND event_date <= $2
            "#,
        )
        .bind(window.attendance_cutoff())
        .bind(window.reference)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::query("attendance", e.to_string()))?;

        rows.iter()
            .map(|row| {
                let kind: String = get(row, "kind", "attendance")?;
                let kind = match kind.as_str() {
                    "absence" => AttendanceKind::Absence,
                    "late" => AttendanceKind::Late,
                    other => {
                        return Err(StoreError::query(
                            "attendance",
                            format!("unknown attendance kind {other:?}"),
                        ));
                    }
                };
                Ok(AttendanceEvent {
                    employee_id: EmployeeId::from_uuid(get(row, "employee_id", "attendance")?),
                    date: get(row, "event_date", "attendance")?,
                    kind,
                })
            })
            .collect()
    }

    async fn performance_reviews(
        &self,
        window: &TimeWindow,
    ) -> Result<Vec<PerformanceReview>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT employee_id, review_date, score
            FROM performance_reviews
            WHERE review_date <= $1
            ORDER BY review_date
            "#,
        )
        .bind(window.reference)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::query("performance", e.to_string()))?;

        rows.iter()
            .map(|row| {
                Ok(PerformanceReview {
                    employee_id: EmployeeId::from_uuid(get(row, "employee_id", "performance")?),
                    date: get(row, "review_date", "performance")?,
                    score: get(row, "score", "performance")?,
                })
            })
            .collect()
    }

    async fn payroll_records(&self, window: &TimeWindow) -> Result<Vec<PayrollRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT employee_id, period_start, gross_pay
            FROM payroll_records
            WHERE period_start >= $1 AND period_start <= $2
            "#,
        )
        .bind(window.attendance_cutoff())
        .bind(window.reference)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::query("payroll", e.to_string()))?;

        rows.iter()
            .map(|row| {
                let period_start: NaiveDate = get(row, "period_start", "payroll")?;
                Ok(PayrollRecord {
                    employee_id: EmployeeId::from_uuid(get(row, "employee_id", "payroll")?),
                    period: YearMonth::from_date(period_start),
                    gross_pay: get(row, "gross_pay", "payroll")?,
                })
            })
            .collect()
    }
}

fn get<'r, T>(
    row: &'r sqlx::postgres::PgRow,
    column: &str,
    source: &'static str,
) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get::<T, _>(column)
        .map_err(|e| StoreError::query(source, format!("column {column}: {e}")))
}
