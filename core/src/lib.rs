pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use config::Config;
pub use error::{ReportError, ReportResult};
pub use input::{
    parse_analysis_choice, parse_main_choice, parse_month, parse_year, AnalysisChoice, MainChoice,
};
pub use model::lot::{ParkingLotState, DEFAULT_CAPACITY};
pub use model::occupancy::{MonthlyReport, OccupancyRecord, Period, ReportPeriod};
pub use repository::{FileReportRepository, ReportRepository};
pub use service::chart::{
    build_chart, AreaLayer, ChartKind, ChartSeries, ChartSpec, SeriesColor, SeriesStyle,
};
pub use service::generator::OccupancyGenerator;
pub use service::report_service::{GeneratedReport, ObtainedReport, ReportOrigin, ReportService};
pub use service::simulator::{LiveSimulator, SimulatorState};
pub use time::days_in_month;
pub use usecase::menu::{MenuController, Request, Response, Screen};
