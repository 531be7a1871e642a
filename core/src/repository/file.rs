use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

use calamine::{open_workbook, Data, Range, Reader, Xlsx, XlsxError};
use rust_xlsxwriter::Workbook;
use tracing::{info, warn};

use crate::error::{ReportError, ReportResult};
use crate::model::occupancy::{MonthlyReport, OccupancyRecord, ReportPeriod};
use crate::repository::traits::ReportRepository;

const FILE_PREFIX: &str = "relatorio_ocupacao_vagas_";
const FILE_EXTENSION: &str = "xlsx";

pub const DATA_SHEET: &str = "Occupancy";
pub const INFO_SHEET: &str = "Info";
const HEADERS: [&str; 4] = ["day", "morning", "afternoon", "night"];

// Accepted header labels per column; the second set is the legacy layout.
const DAY_LABELS: &[&str] = &["day", "dia"];
const MORNING_LABELS: &[&str] = &["morning", "manha", "manhã"];
const AFTERNOON_LABELS: &[&str] = &["afternoon", "tarde"];
const NIGHT_LABELS: &[&str] = &["night", "noite"];

pub fn report_file_name(period: ReportPeriod) -> String {
    format!(
        "{FILE_PREFIX}{}_{}.{FILE_EXTENSION}",
        period.month(),
        period.year()
    )
}

fn parse_file_name(name: &str) -> Option<ReportPeriod> {
    let stem = name
        .strip_prefix(FILE_PREFIX)?
        .strip_suffix(FILE_EXTENSION)?
        .strip_suffix('.')?;
    let (month, year) = stem.split_once('_')?;
    ReportPeriod::new(month.parse().ok()?, year.parse().ok()?).ok()
}

/// Stores one `.xlsx` workbook per month in a single directory.
#[derive(Clone, Debug)]
pub struct FileReportRepository {
    base_dir: PathBuf,
}

impl FileReportRepository {
    pub fn new(base_dir: impl Into<PathBuf>) -> ReportResult<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)
            .map_err(|err| ReportError::persistence(&base_dir, err))?;
        Ok(Self { base_dir })
    }

    pub fn path_for(&self, period: ReportPeriod) -> PathBuf {
        self.base_dir.join(report_file_name(period))
    }
}

impl ReportRepository for FileReportRepository {
    fn exists(&self, period: ReportPeriod) -> bool {
        self.path_for(period).is_file()
    }

    fn load(&self, period: ReportPeriod) -> ReportResult<MonthlyReport> {
        let path = self.path_for(period);
        let mut workbook: Xlsx<BufReader<File>> =
            open_workbook(&path).map_err(|err| match err {
                XlsxError::Io(io) => ReportError::persistence(&path, io),
                other => ReportError::corrupt(&path, other.to_string()),
            })?;

        let range = match workbook.worksheet_range_at(0) {
            Some(Ok(range)) => range,
            Some(Err(err)) => return Err(ReportError::corrupt(&path, err.to_string())),
            None => return Err(ReportError::corrupt(&path, "workbook has no sheets")),
        };

        let days = parse_data_sheet(&range).map_err(|reason| {
            warn!(path = %path.display(), %reason, "report file is corrupt");
            ReportError::corrupt(&path, reason)
        })?;

        info!(path = %path.display(), days = days.len(), "report loaded");
        Ok(MonthlyReport::new(period, days))
    }

    fn save(&self, report: &MonthlyReport) -> ReportResult<PathBuf> {
        let path = self.path_for(report.period);
        let buffer = build_workbook(report)
            .map_err(|err| ReportError::persistence(&path, err.to_string()))?;

        // Written beside the target and renamed, so a failed write never
        // leaves a truncated report behind.
        let staging = path.with_extension("xlsx.tmp");
        fs::write(&staging, &buffer).map_err(|err| ReportError::persistence(&path, err))?;
        if let Err(err) = fs::rename(&staging, &path) {
            let _ = fs::remove_file(&staging);
            return Err(ReportError::persistence(&path, err));
        }

        info!(path = %path.display(), days = report.len(), "report saved");
        Ok(path)
    }

    fn list(&self) -> ReportResult<Vec<ReportPeriod>> {
        let entries = fs::read_dir(&self.base_dir)
            .map_err(|err| ReportError::persistence(&self.base_dir, err))?;

        let mut periods = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| ReportError::persistence(&self.base_dir, err))?;
            if let Some(period) = entry.file_name().to_str().and_then(parse_file_name) {
                periods.push(period);
            }
        }
        periods.sort();
        Ok(periods)
    }
}

fn build_workbook(report: &MonthlyReport) -> Result<Vec<u8>, rust_xlsxwriter::XlsxError> {
    let mut workbook = Workbook::new();

    let data = workbook.add_worksheet();
    data.set_name(DATA_SHEET)?;
    for (col, header) in HEADERS.iter().enumerate() {
        data.write_string(0, col as u16, *header)?;
    }
    for (index, (day, record)) in report.iter().enumerate() {
        let row = index as u32 + 1;
        data.write_number(row, 0, day)?;
        data.write_number(row, 1, record.morning)?;
        data.write_number(row, 2, record.afternoon)?;
        data.write_number(row, 3, record.night)?;
    }

    let info = workbook.add_worksheet();
    info.set_name(INFO_SHEET)?;
    info.write_string(0, 0, format!("Month: {}", report.period.month()))?;
    info.write_string(1, 0, format!("Year: {}", report.period.year()))?;

    workbook.save_to_buffer()
}

struct Columns {
    day: usize,
    morning: usize,
    afternoon: usize,
    night: usize,
}

impl Columns {
    fn locate(header: &[Data]) -> Result<Self, String> {
        let find = |labels: &[&str], name: &str| {
            header
                .iter()
                .position(|cell| match cell {
                    Data::String(s) => labels.contains(&s.trim().to_lowercase().as_str()),
                    _ => false,
                })
                .ok_or_else(|| format!("missing `{name}` column"))
        };
        Ok(Self {
            day: find(DAY_LABELS, "Day")?,
            morning: find(MORNING_LABELS, "Morning")?,
            afternoon: find(AFTERNOON_LABELS, "Afternoon")?,
            night: find(NIGHT_LABELS, "Night")?,
        })
    }
}

fn cell_count(row: &[Data], col: usize, row_no: usize, name: &str) -> Result<u32, String> {
    let value = match row.get(col) {
        Some(Data::Int(i)) => u32::try_from(*i).ok(),
        Some(Data::Float(f)) if f.fract() == 0.0 && *f >= 0.0 && *f <= f64::from(u32::MAX) => {
            Some(*f as u32)
        }
        Some(Data::String(s)) => s.trim().parse::<u32>().ok(),
        Some(Data::Empty) | None => return Err(format!("row {row_no}: `{name}` is empty")),
        Some(_) => None,
    };
    value.ok_or_else(|| format!("row {row_no}: `{name}` is not a non-negative integer"))
}

fn parse_data_sheet(range: &Range<Data>) -> Result<BTreeMap<u32, OccupancyRecord>, String> {
    let mut rows = range.rows();
    let header = rows.next().ok_or_else(|| "data sheet is empty".to_string())?;
    let columns = Columns::locate(header)?;

    let mut days = BTreeMap::new();
    for (offset, row) in rows.enumerate() {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        let row_no = offset + 2;
        let day = cell_count(row, columns.day, row_no, "Day")?;
        let record = OccupancyRecord::new(
            cell_count(row, columns.morning, row_no, "Morning")?,
            cell_count(row, columns.afternoon, row_no, "Afternoon")?,
            cell_count(row, columns.night, row_no, "Night")?,
        );
        if days.insert(day, record).is_some() {
            return Err(format!("row {row_no}: day {day} appears more than once"));
        }
    }
    Ok(days)
}
