use parkstat_core::{MonthlyReport, ReportPeriod};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "Day")]
    day: u32,
    #[tabled(rename = "Morning")]
    morning: u32,
    #[tabled(rename = "Afternoon")]
    afternoon: u32,
    #[tabled(rename = "Night")]
    night: u32,
    #[tabled(rename = "Peak")]
    peak: u32,
}

#[derive(Tabled)]
struct PeriodRow {
    #[tabled(rename = "Month")]
    month: u32,
    #[tabled(rename = "Year")]
    year: i32,
}

fn styled(mut table: Table) -> String {
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table.to_string()
}

pub fn render_report(report: &MonthlyReport) -> String {
    let rows: Vec<DayRow> = report
        .iter()
        .map(|(day, record)| DayRow {
            day,
            morning: record.morning,
            afternoon: record.afternoon,
            night: record.night,
            peak: record.peak(),
        })
        .collect();
    styled(Table::new(rows))
}

pub fn render_periods(periods: &[ReportPeriod]) -> String {
    let rows = periods.iter().map(|p| PeriodRow {
        month: p.month(),
        year: p.year(),
    });
    styled(Table::new(rows))
}
