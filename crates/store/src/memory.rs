//! In-memory store for tests and development.

use std::sync::RwLock;

use async_trait::async_trait;

use talenthq_analytics::{AttendanceEvent, EmployeeRecord, PayrollRecord, PerformanceReview};
use talenthq_core::TimeWindow;

use crate::error::StoreError;
use crate::traits::HrStore;

/// In-memory `HrStore` seeded with fixture records.
#[derive(Debug, Default)]
pub struct InMemoryHrStore {
    inner: RwLock<Records>,
}

#[derive(Debug, Default)]
struct Records {
    employees: Vec<EmployeeRecord>,
    attendance: Vec<AttendanceEvent>,
    reviews: Vec<PerformanceReview>,
    payroll: Vec<PayrollRecord>,
}

impl InMemoryHrStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_employees(&self, employees: Vec<EmployeeRecord>) {
        self.write(|r| r.employees = employees);
    }

    pub fn seed_attendance(&self, attendance: Vec<AttendanceEvent>) {
        self.write(|r| r.attendance = attendance);
    }

    pub fn seed_reviews(&self, reviews: Vec<PerformanceReview>) {
        self.write(|r| r.reviews = reviews);
    }

    pub fn seed_payroll(&self, payroll: Vec<PayrollRecord>) {
        self.write(|r| r.payroll = payroll);
    }

    fn write(&self, f: impl FnOnce(&mut Records)) {
        if let Ok(mut records) = self.inner.write() {
            f(&mut records);
        }
    }

    fn read<T>(&self, f: impl FnOnce(&Records) -> T) -> Result<T, StoreError> {
        self.inner
            .read()
            .map(|records| f(&records))
            .map_err(|_| StoreError::Unavailable("in-memory store poisoned".to_string()))
    }
}

#[async_trait]
impl HrStore for InMemoryHrStore {
    async fn employees(&self) -> Result<Vec<EmployeeRecord>, StoreError> {
        self.read(|r| r.employees.clone())
    }

    async fn attendance_events(
        &self,
        _window: &TimeWindow,
    ) -> Result<Vec<AttendanceEvent>, StoreError> {
        self.read(|r| r.attendance.clone())
    }

    async fn performance_reviews(
        &self,
        _window: &TimeWindow,
    ) -> Result<Vec<PerformanceReview>, StoreError> {
        self.read(|r| r.reviews.clone())
    }

    async fn payroll_records(
        &self,
        _window: &TimeWindow,
    ) -> Result<Vec<PayrollRecord>, StoreError> {
        self.read(|r| r.payroll.clone())
    }
}
