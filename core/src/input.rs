use crate::error::{ReportError, ReportResult};
use crate::model::occupancy::{MAX_YEAR, MIN_YEAR};
use crate::service::chart::ChartKind;

/// First year reachable through the 1..=4 shortcut of the analysis prompt.
const SHORTCUT_BASE_YEAR: i32 = 2020;
const SHORTCUT_MAX: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainChoice {
    AnalyzeMonth,
    LiveView,
    GenerateReport,
    Exit,
}

impl MainChoice {
    pub const ALL: [MainChoice; 4] = [
        MainChoice::AnalyzeMonth,
        MainChoice::LiveView,
        MainChoice::GenerateReport,
        MainChoice::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MainChoice::AnalyzeMonth => "Analyze a specific month",
            MainChoice::LiveView => "View the parking lot in real time",
            MainChoice::GenerateReport => "Generate a monthly report",
            MainChoice::Exit => "Exit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisChoice {
    Chart(ChartKind),
    Back,
    Exit,
}

impl AnalysisChoice {
    pub const ALL: [AnalysisChoice; 5] = [
        AnalysisChoice::Chart(ChartKind::PeriodComparison),
        AnalysisChoice::Chart(ChartKind::PeakOccupancy),
        AnalysisChoice::Chart(ChartKind::CapacityFill),
        AnalysisChoice::Back,
        AnalysisChoice::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AnalysisChoice::Chart(kind) => kind.menu_label(),
            AnalysisChoice::Back => "Return to the previous menu",
            AnalysisChoice::Exit => "Exit",
        }
    }
}

fn parse_number(input: &str, what: &str) -> ReportResult<i64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ReportError::invalid_input(format!("{what} is required")));
    }
    trimmed
        .parse::<i64>()
        .map_err(|_| ReportError::invalid_input(format!("'{trimmed}' is not a valid {what}")))
}

fn pick<T: Copy>(input: &str, options: &[T], what: &str) -> ReportResult<T> {
    let n = parse_number(input, what)?;
    usize::try_from(n)
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| options.get(i).copied())
        .ok_or_else(|| {
            ReportError::invalid_input(format!(
                "{what} must be between 1 and {}, got {n}",
                options.len()
            ))
        })
}

pub fn parse_main_choice(input: &str) -> ReportResult<MainChoice> {
    pick(input, &MainChoice::ALL, "menu option")
}

pub fn parse_analysis_choice(input: &str) -> ReportResult<AnalysisChoice> {
    pick(input, &AnalysisChoice::ALL, "analysis option")
}

pub fn parse_month(input: &str) -> ReportResult<u32> {
    let n = parse_number(input, "month")?;
    match u32::try_from(n) {
        Ok(month) if (1..=12).contains(&month) => Ok(month),
        _ => Err(ReportError::invalid_input(format!(
            "month must be between 1 and 12, got {n}"
        ))),
    }
}

/// Parses a calendar year. With `allow_shortcut`, 1..=4 stand for 2021..=2024.
pub fn parse_year(input: &str, allow_shortcut: bool) -> ReportResult<i32> {
    let n = parse_number(input, "year")?;
    let year = i32::try_from(n)
        .map_err(|_| ReportError::invalid_input(format!("year {n} is out of range")))?;
    if allow_shortcut && (1..=SHORTCUT_MAX).contains(&year) {
        return Ok(SHORTCUT_BASE_YEAR + year);
    }
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(ReportError::invalid_input(format!(
            "year must be between {MIN_YEAR} and {MAX_YEAR}, got {year}"
        )))
    }
}
