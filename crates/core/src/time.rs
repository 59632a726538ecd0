//! Calendar types for the analytical lookback window.
//!
//! Every analytical component works over a bounded trailing window anchored
//! at a caller-supplied reference date, so a whole computation cycle is a
//! pure function of (records, window).

use core::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DomainError, DomainResult};

/// A calendar month key (`"YYYY-MM"` on the wire).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    /// 1-based calendar month.
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> DomainResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::validation(format!(
                "month must be in 1..=12, got {month}"
            )));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Zero-based month index on a continuous axis (regression input).
    pub fn index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    pub fn from_index(index: i64) -> Self {
        let year = index.div_euclid(12);
        let month = index.rem_euclid(12) + 1;
        Self {
            year: year as i32,
            month: month as u32,
        }
    }

    pub fn next(&self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Months from `self` to `other` (negative when `other` is earlier).
    pub fn months_until(&self, other: YearMonth) -> i64 {
        other.index() - self.index()
    }
}

impl core::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (y, m) = s
            .split_once('-')
            .ok_or_else(|| DomainError::validation(format!("expected YYYY-MM, got {s:?}")))?;
        let year: i32 = y
            .parse()
            .map_err(|_| DomainError::validation(format!("invalid year in {s:?}")))?;
        let month: u32 = m
            .parse()
            .map_err(|_| DomainError::validation(format!("invalid month in {s:?}")))?;
        Self::new(year, month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Validated trailing lookback window for one computation cycle.
///
/// Each signal family has its own depth because they converge at different
/// rates: reviews are sparse, attendance is dense, rotation needs enough
/// monthly points for the forecaster's minimum-history guard.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Anchor date; "today" for live requests, fixed in tests.
    pub reference: NaiveDate,
    pub performance_months: u32,
    pub attendance_months: u32,
    pub rotation_months: u32,
}

/// Hard bound on any lookback depth; longer windows stop being "recent".
pub const MAX_LOOKBACK_MONTHS: u32 = 24;

impl TimeWindow {
    pub const DEFAULT_PERFORMANCE_MONTHS: u32 = 6;
    pub const DEFAULT_ATTENDANCE_MONTHS: u32 = 12;
    pub const DEFAULT_ROTATION_MONTHS: u32 = 12;

    /// Default window anchored at `reference`.
    pub fn default_at(reference: NaiveDate) -> Self {
        Self {
            reference,
            performance_months: Self::DEFAULT_PERFORMANCE_MONTHS,
            attendance_months: Self::DEFAULT_ATTENDANCE_MONTHS,
            rotation_months: Self::DEFAULT_ROTATION_MONTHS,
        }
    }

    /// Uniform window: one caller-supplied depth for every signal family.
    pub fn trailing(reference: NaiveDate, months: u32) -> DomainResult<Self> {
        let window = Self {
            reference,
            performance_months: months,
            attendance_months: months,
            rotation_months: months,
        };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> DomainResult<()> {
        for (name, months) in [
            ("performance_months", self.performance_months),
            ("attendance_months", self.attendance_months),
            ("rotation_months", self.rotation_months),
        ] {
            if months == 0 || months > MAX_LOOKBACK_MONTHS {
                return Err(DomainError::validation(format!(
                    "{name} must be in 1..={MAX_LOOKBACK_MONTHS}, got {months}"
                )));
            }
        }
        Ok(())
    }

    pub fn performance_cutoff(&self) -> NaiveDate {
        self.cutoff(self.performance_months)
    }

    pub fn attendance_cutoff(&self) -> NaiveDate {
        self.cutoff(self.attendance_months)
    }

    /// Calendar months of the rotation lookback, oldest first, ending at the
    /// reference month. Always exactly `rotation_months` entries.
    pub fn rotation_span(&self) -> Vec<YearMonth> {
        let end = YearMonth::from_date(self.reference);
        let start_index = end.index() - i64::from(self.rotation_months) + 1;
        (start_index..=end.index()).map(YearMonth::from_index).collect()
    }

    fn cutoff(&self, months: u32) -> NaiveDate {
        self.reference
            .checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDate::MIN)
    }
}
