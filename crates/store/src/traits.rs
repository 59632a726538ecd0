//! The read contract between the engine and the record store.

use async_trait::async_trait;

use talenthq_analytics::{AttendanceEvent, EmployeeRecord, PayrollRecord, PerformanceReview};
use talenthq_core::TimeWindow;

use crate::error::StoreError;

/// Read-only access to the four record sources the engine consumes.
///
/// Each source is fetched separately so one failing source degrades only the
/// sections derived from it. Implementations may over-fetch (returning
/// records outside the window); the aggregator re-filters at its boundary.
#[async_trait]
pub trait HrStore: Send + Sync {
    /// Full roster, active and terminated (terminations feed rotation).
    async fn employees(&self) -> Result<Vec<EmployeeRecord>, StoreError>;

    async fn attendance_events(
        &self,
        window: &TimeWindow,
    ) -> Result<Vec<AttendanceEvent>, StoreError>;

    async fn performance_reviews(
        &self,
        window: &TimeWindow,
    ) -> Result<Vec<PerformanceReview>, StoreError>;

    async fn payroll_records(&self, window: &TimeWindow) -> Result<Vec<PayrollRecord>, StoreError>;
}
