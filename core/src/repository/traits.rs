use std::path::PathBuf;

use crate::error::ReportResult;
use crate::model::occupancy::{MonthlyReport, ReportPeriod};

pub trait ReportRepository {
    fn exists(&self, period: ReportPeriod) -> bool;
    fn load(&self, period: ReportPeriod) -> ReportResult<MonthlyReport>;
    /// Writes the whole report, replacing any previous file. Returns its location.
    fn save(&self, report: &MonthlyReport) -> ReportResult<PathBuf>;
    fn list(&self) -> ReportResult<Vec<ReportPeriod>>;
}
