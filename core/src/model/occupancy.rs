use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::Serialize;

use crate::error::{ReportError, ReportResult};
use crate::time::days_in_month;

pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Morning,
    Afternoon,
    Night,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Morning, Period::Afternoon, Period::Night];

    pub fn label(self) -> &'static str {
        match self {
            Period::Morning => "Morning",
            Period::Afternoon => "Afternoon",
            Period::Night => "Night",
        }
    }
}

/// Month/year key of a report. Always a valid calendar month.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReportPeriod {
    // Field order gives chronological ordering.
    year: i32,
    month: u32,
}

impl ReportPeriod {
    pub fn new(month: u32, year: i32) -> ReportResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(ReportError::invalid_input(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(ReportError::invalid_input(format!(
                "year must be between {MIN_YEAR} and {MAX_YEAR}, got {year}"
            )));
        }
        Ok(Self { year, month })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn days(&self) -> u32 {
        // Month and year are range-checked on construction.
        days_in_month(self.month, self.year).unwrap_or(0)
    }
}

impl Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month, self.year)
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OccupancyRecord {
    pub morning: u32,
    pub afternoon: u32,
    pub night: u32,
}

impl OccupancyRecord {
    pub fn new(morning: u32, afternoon: u32, night: u32) -> Self {
        Self {
            morning,
            afternoon,
            night,
        }
    }

    pub fn get(&self, period: Period) -> u32 {
        match period {
            Period::Morning => self.morning,
            Period::Afternoon => self.afternoon,
            Period::Night => self.night,
        }
    }

    pub fn peak(&self) -> u32 {
        self.morning.max(self.afternoon).max(self.night)
    }
}

/// One month of occupancy data, ordered by day of month.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MonthlyReport {
    pub period: ReportPeriod,
    pub days: BTreeMap<u32, OccupancyRecord>,
}

impl MonthlyReport {
    pub fn new(period: ReportPeriod, days: BTreeMap<u32, OccupancyRecord>) -> Self {
        Self { period, days }
    }

    pub fn empty(period: ReportPeriod) -> Self {
        Self::new(period, BTreeMap::new())
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &OccupancyRecord)> {
        self.days.iter().map(|(day, record)| (*day, record))
    }

    pub fn series(&self, period: Period) -> Vec<(u32, u32)> {
        self.iter().map(|(day, r)| (day, r.get(period))).collect()
    }

    pub fn peaks(&self) -> Vec<(u32, u32)> {
        self.iter().map(|(day, r)| (day, r.peak())).collect()
    }
}
