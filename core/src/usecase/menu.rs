use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

use crate::error::{ReportError, ReportResult};
use crate::model::occupancy::{MonthlyReport, ReportPeriod};
use crate::repository::ReportRepository;
use crate::service::chart::{build_chart, ChartKind, ChartSpec};
use crate::service::report_service::{GeneratedReport, ReportOrigin, ReportService};
use crate::service::simulator::LiveSimulator;

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Main,
    Analysis { report: MonthlyReport },
    Exited,
}

impl Screen {
    fn name(&self) -> &'static str {
        match self {
            Screen::Main => "main",
            Screen::Analysis { .. } => "analysis",
            Screen::Exited => "exited",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Request {
    AnalyzeMonth(ReportPeriod),
    ShowChart(ChartKind),
    Back,
    StartLiveView,
    GenerateReport(ReportPeriod),
    Exit,
}

pub enum Response {
    ReportReady {
        period: ReportPeriod,
        origin: ReportOrigin,
    },
    Chart(ChartSpec),
    MainMenu,
    LiveView(LiveSimulator<StdRng>),
    ReportGenerated(GeneratedReport),
    Exited,
}

/// Menu flow as a state machine over structured requests. Presentation
/// (prompts, dialogs, drawing) stays with the caller.
pub struct MenuController<R: ReportRepository, G: Rng = StdRng> {
    service: ReportService<R, G>,
    screen: Screen,
    capacity: u32,
    tick_interval: Duration,
}

impl<R: ReportRepository, G: Rng> MenuController<R, G> {
    pub fn new(service: ReportService<R, G>, capacity: u32, tick_interval: Duration) -> Self {
        Self {
            service,
            screen: Screen::Main,
            capacity,
            tick_interval,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn is_exited(&self) -> bool {
        self.screen == Screen::Exited
    }

    pub fn current_report(&self) -> Option<&MonthlyReport> {
        match &self.screen {
            Screen::Analysis { report } => Some(report),
            _ => None,
        }
    }

    pub fn service(&self) -> &ReportService<R, G> {
        &self.service
    }

    /// Invalid requests for the current screen fail with `InvalidInput`
    /// and leave the state unchanged.
    pub fn handle(&mut self, request: Request) -> ReportResult<Response> {
        debug!(screen = self.screen.name(), ?request, "menu request");
        match (&self.screen, request) {
            (Screen::Main, Request::AnalyzeMonth(period)) => {
                let obtained = self.service.get_or_create(period)?;
                self.screen = Screen::Analysis {
                    report: obtained.report,
                };
                Ok(Response::ReportReady {
                    period,
                    origin: obtained.origin,
                })
            }
            (Screen::Main, Request::StartLiveView) => Ok(Response::LiveView(
                LiveSimulator::from_entropy(self.capacity, self.tick_interval),
            )),
            (Screen::Main, Request::GenerateReport(period)) => {
                Ok(Response::ReportGenerated(self.service.regenerate(period)?))
            }
            (Screen::Analysis { report }, Request::ShowChart(kind)) => {
                Ok(Response::Chart(build_chart(report, kind)))
            }
            (Screen::Analysis { .. }, Request::Back) => {
                self.screen = Screen::Main;
                Ok(Response::MainMenu)
            }
            (Screen::Main | Screen::Analysis { .. }, Request::Exit) => {
                self.screen = Screen::Exited;
                Ok(Response::Exited)
            }
            (screen, request) => Err(ReportError::invalid_input(format!(
                "{request:?} is not available from the {} menu",
                screen.name()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::occupancy::OccupancyRecord;
    use crate::service::generator::OccupancyGenerator;
    use crate::service::simulator::SimulatorState;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::collections::{BTreeMap, HashMap};
    use std::io;
    use std::path::PathBuf;

    #[derive(Default)]
    struct MemoryRepo {
        stored: RefCell<HashMap<ReportPeriod, MonthlyReport>>,
        corrupt: Option<ReportPeriod>,
    }

    impl ReportRepository for MemoryRepo {
        fn exists(&self, period: ReportPeriod) -> bool {
            self.corrupt == Some(period) || self.stored.borrow().contains_key(&period)
        }

        fn load(&self, period: ReportPeriod) -> ReportResult<MonthlyReport> {
            if self.corrupt == Some(period) {
                return Err(ReportError::corrupt("memory", "bad header"));
            }
            self.stored
                .borrow()
                .get(&period)
                .cloned()
                .ok_or_else(|| {
                    ReportError::persistence("memory", io::Error::from(io::ErrorKind::NotFound))
                })
        }

        fn save(&self, report: &MonthlyReport) -> ReportResult<PathBuf> {
            self.stored.borrow_mut().insert(report.period, report.clone());
            Ok(PathBuf::from("memory"))
        }

        fn list(&self) -> ReportResult<Vec<ReportPeriod>> {
            Ok(self.stored.borrow().keys().copied().collect())
        }
    }

    fn controller(repo: MemoryRepo) -> MenuController<MemoryRepo, StdRng> {
        let service =
            ReportService::with_generator(repo, OccupancyGenerator::new(StdRng::seed_from_u64(8)));
        MenuController::new(service, 50, Duration::from_secs(1))
    }

    fn period(month: u32, year: i32) -> ReportPeriod {
        ReportPeriod::new(month, year).unwrap()
    }

    #[test]
    fn test_analysis_flow() {
        let mut menu = controller(MemoryRepo::default());

        let response = menu.handle(Request::AnalyzeMonth(period(4, 2024))).unwrap();
        assert!(matches!(
            response,
            Response::ReportReady { origin: ReportOrigin::Generated { saved: Ok(_) }, .. }
        ));
        assert_eq!(menu.current_report().unwrap().len(), 30);

        match menu.handle(Request::ShowChart(ChartKind::PeakOccupancy)).unwrap() {
            Response::Chart(chart) => assert_eq!(chart.x_ticks.len(), 30),
            _ => panic!("expected a chart"),
        }

        assert!(matches!(menu.handle(Request::Back).unwrap(), Response::MainMenu));
        assert_eq!(menu.screen(), &Screen::Main);
        assert!(menu.current_report().is_none());
    }

    #[test]
    fn test_repeated_query_returns_same_data() {
        let mut menu = controller(MemoryRepo::default());
        menu.handle(Request::AnalyzeMonth(period(9, 2023))).unwrap();
        let first = menu.current_report().cloned().unwrap();
        menu.handle(Request::Back).unwrap();

        let response = menu.handle(Request::AnalyzeMonth(period(9, 2023))).unwrap();
        assert!(matches!(response, Response::ReportReady { origin: ReportOrigin::Loaded, .. }));
        assert_eq!(menu.current_report(), Some(&first));
    }

    #[test]
    fn test_chart_requires_analysis_screen() {
        let mut menu = controller(MemoryRepo::default());
        let err = menu.handle(Request::ShowChart(ChartKind::CapacityFill)).err().unwrap();
        assert!(err.is_invalid_input());
        assert_eq!(menu.screen(), &Screen::Main);

        assert!(menu.handle(Request::Back).is_err());
    }

    #[test]
    fn test_main_only_requests_rejected_in_analysis() {
        let mut menu = controller(MemoryRepo::default());
        menu.handle(Request::AnalyzeMonth(period(1, 2022))).unwrap();

        assert!(menu.handle(Request::StartLiveView).is_err());
        assert!(menu.handle(Request::GenerateReport(period(1, 2022))).is_err());
        assert!(matches!(menu.screen(), Screen::Analysis { .. }));
    }

    #[test]
    fn test_corrupt_report_keeps_main_screen() {
        let repo = MemoryRepo {
            corrupt: Some(period(5, 2021)),
            ..MemoryRepo::default()
        };
        let mut menu = controller(repo);

        let err = menu.handle(Request::AnalyzeMonth(period(5, 2021))).err().unwrap();
        assert!(matches!(err, ReportError::CorruptReport { .. }));
        assert_eq!(menu.screen(), &Screen::Main);
    }

    #[test]
    fn test_generate_report_overwrites_stored_data() {
        let repo = MemoryRepo::default();
        let mut days = BTreeMap::new();
        days.insert(1, OccupancyRecord::new(1, 1, 1));
        repo.stored
            .borrow_mut()
            .insert(period(2, 2023), MonthlyReport::new(period(2, 2023), days));
        let mut menu = controller(repo);

        match menu.handle(Request::GenerateReport(period(2, 2023))).unwrap() {
            Response::ReportGenerated(generated) => assert_eq!(generated.report.len(), 28),
            _ => panic!("expected a generated report"),
        }
        assert_eq!(menu.service().repository().stored.borrow()[&period(2, 2023)].len(), 28);
    }

    #[test]
    fn test_live_view_starts_running() {
        let mut menu = controller(MemoryRepo::default());
        match menu.handle(Request::StartLiveView).unwrap() {
            Response::LiveView(sim) => {
                assert_eq!(sim.state(), SimulatorState::Running);
                assert_eq!(sim.lot().capacity(), 50);
            }
            _ => panic!("expected a live view"),
        }
        assert_eq!(menu.screen(), &Screen::Main);
    }

    #[test]
    fn test_exit_from_either_menu() {
        let mut menu = controller(MemoryRepo::default());
        assert!(matches!(menu.handle(Request::Exit).unwrap(), Response::Exited));
        assert!(menu.is_exited());
        assert!(menu.handle(Request::AnalyzeMonth(period(1, 2024))).is_err());

        let mut menu = controller(MemoryRepo::default());
        menu.handle(Request::AnalyzeMonth(period(1, 2024))).unwrap();
        menu.handle(Request::Exit).unwrap();
        assert!(menu.is_exited());
    }
}
