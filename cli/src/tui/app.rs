use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use parkstat_core::{
    parse_analysis_choice, parse_main_choice, parse_month, parse_year, AnalysisChoice, ChartSpec,
    LiveSimulator, MainChoice, MenuController, ReportError, ReportOrigin, ReportPeriod,
    ReportRepository, Request, Response,
};
use rand::rngs::StdRng;
use tracing::{debug, info};

const INPUT_POLL: Duration = Duration::from_millis(250);

const WELCOME_MESSAGE: &str = "Occupancy data for the parking lot is meant to come from ultrasonic \
sensors wired to a microcontroller and sent over Wi-Fi to a server that stores and analyses it. \
Drivers would see free spaces from their phones. This demo simulates that data: it keeps monthly \
reports as spreadsheets and charts them by period, occupancy peak and capacity.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Analyze,
    Generate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptField {
    Month,
    Year { month: u32 },
}

pub enum View {
    MainMenu,
    Prompt { flow: Flow, field: PromptField },
    AnalysisMenu { period: ReportPeriod },
    Chart { period: ReportPeriod, spec: ChartSpec },
    Live(LiveSimulator<StdRng>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
}

impl Dialog {
    fn new(kind: DialogKind, title: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message: message.into(),
        }
    }
}

pub struct App<R: ReportRepository> {
    pub menu: MenuController<R>,
    pub view: View,
    pub dialogs: VecDeque<Dialog>,
    pub input: String,
    pub cursor_position: usize,
    pub selected: usize,
    pub should_quit: bool,
}

impl<R: ReportRepository> App<R> {
    pub fn new(menu: MenuController<R>) -> Self {
        let mut dialogs = VecDeque::new();
        dialogs.push_back(Dialog::new(DialogKind::Info, "Welcome", WELCOME_MESSAGE));
        App {
            menu,
            view: View::MainMenu,
            dialogs,
            input: String::new(),
            cursor_position: 0,
            selected: 0,
            should_quit: false,
        }
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialogs.front()
    }

    pub fn on_tick(&mut self, now: Instant) {
        if let View::Live(sim) = &mut self.view {
            sim.tick_if_due(now);
        }
    }

    /// How long the event loop may block waiting for input.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        match &self.view {
            View::Live(sim) => sim.time_until_tick(now).min(INPUT_POLL),
            _ => INPUT_POLL,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return;
        }

        if self.dialogs.front().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.dialogs.pop_front();
            }
            return;
        }

        match &self.view {
            View::MainMenu | View::AnalysisMenu { .. } => self.handle_menu_key(key.code),
            View::Prompt { .. } => self.handle_prompt_key(key.code),
            View::Chart { period, .. } => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                    let period = *period;
                    self.set_view(View::AnalysisMenu { period });
                }
            }
            View::Live(_) => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                    self.close_live_view();
                }
            }
        }
    }

    pub fn menu_labels(&self) -> Vec<&'static str> {
        match self.view {
            View::AnalysisMenu { .. } => AnalysisChoice::ALL.iter().map(|c| c.label()).collect(),
            _ => MainChoice::ALL.iter().map(|c| c.label()).collect(),
        }
    }

    fn handle_menu_key(&mut self, code: KeyCode) {
        let count = self.menu_labels().len();
        match code {
            KeyCode::Down | KeyCode::Char('j') => self.selected = (self.selected + 1) % count,
            KeyCode::Up | KeyCode::Char('k') => self.selected = (self.selected + count - 1) % count,
            KeyCode::Char(c) if c.is_ascii_digit() => self.input_char(c),
            KeyCode::Backspace => self.delete_char(),
            KeyCode::Enter => {
                let answer = if self.input.trim().is_empty() {
                    (self.selected + 1).to_string()
                } else {
                    self.input.clone()
                };
                self.clear_input();
                if matches!(self.view, View::AnalysisMenu { .. }) {
                    self.submit_analysis_choice(&answer);
                } else {
                    self.submit_main_choice(&answer);
                }
            }
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => self.submit_prompt(),
            KeyCode::Esc => self.set_view(View::MainMenu),
            KeyCode::Char(c) => self.input_char(c),
            KeyCode::Backspace => self.delete_char(),
            KeyCode::Left => self.move_cursor_left(),
            KeyCode::Right => self.move_cursor_right(),
            _ => {}
        }
    }

    fn submit_main_choice(&mut self, answer: &str) {
        match parse_main_choice(answer) {
            Ok(MainChoice::AnalyzeMonth) => self.set_view(View::Prompt {
                flow: Flow::Analyze,
                field: PromptField::Month,
            }),
            Ok(MainChoice::GenerateReport) => self.set_view(View::Prompt {
                flow: Flow::Generate,
                field: PromptField::Month,
            }),
            Ok(MainChoice::LiveView) => {
                if let Ok(Response::LiveView(sim)) = self.menu.handle(Request::StartLiveView) {
                    self.set_view(View::Live(sim));
                }
            }
            Ok(MainChoice::Exit) => self.quit(),
            Err(err) => self.warn("Invalid option", &err),
        }
    }

    fn submit_analysis_choice(&mut self, answer: &str) {
        let View::AnalysisMenu { period } = self.view else {
            return;
        };
        match parse_analysis_choice(answer) {
            Ok(AnalysisChoice::Chart(kind)) => match self.menu.handle(Request::ShowChart(kind)) {
                Ok(Response::Chart(spec)) => self.set_view(View::Chart { period, spec }),
                Ok(_) => {}
                Err(err) => self.warn("Invalid option", &err),
            },
            Ok(AnalysisChoice::Back) => {
                if self.menu.handle(Request::Back).is_ok() {
                    self.set_view(View::MainMenu);
                }
            }
            Ok(AnalysisChoice::Exit) => self.quit(),
            Err(err) => self.warn("Invalid option", &err),
        }
    }

    fn submit_prompt(&mut self) {
        let View::Prompt { flow, field } = self.view else {
            return;
        };
        let answer = std::mem::take(&mut self.input);
        self.cursor_position = 0;

        match field {
            PromptField::Month => match parse_month(&answer) {
                Ok(month) => self.view = View::Prompt {
                    flow,
                    field: PromptField::Year { month },
                },
                Err(err) => self.warn("Invalid month", &err),
            },
            PromptField::Year { month } => {
                let period = parse_year(&answer, flow == Flow::Analyze)
                    .and_then(|year| ReportPeriod::new(month, year));
                match period {
                    Ok(period) => match flow {
                        Flow::Analyze => self.analyze(period),
                        Flow::Generate => self.generate(period),
                    },
                    Err(err) => self.warn("Invalid year", &err),
                }
            }
        }
    }

    fn analyze(&mut self, period: ReportPeriod) {
        match self.menu.handle(Request::AnalyzeMonth(period)) {
            Ok(Response::ReportReady { origin, .. }) => {
                match origin {
                    ReportOrigin::Loaded => self.inform(
                        "Report found",
                        "An existing report was found and will be used for the analysis.",
                    ),
                    ReportOrigin::Generated { saved } => {
                        self.inform(
                            "Report not found",
                            "No report was found for this month, generating random data.",
                        );
                        match saved {
                            Ok(path) => self.inform(
                                "File saved",
                                format!("The data was saved to the file: {}", path.display()),
                            ),
                            Err(err) => self.fail("Error saving file", &err),
                        }
                    }
                    ReportOrigin::Unsaved => self.inform(
                        "Report not saved",
                        "Using the data generated earlier in this session; it could not be saved.",
                    ),
                }
                self.set_view(View::AnalysisMenu { period });
            }
            Ok(_) => {}
            Err(err) if err.is_invalid_input() => self.warn("Invalid input", &err),
            Err(err) => {
                self.fail("Could not open report", &err);
                self.set_view(View::MainMenu);
            }
        }
    }

    fn generate(&mut self, period: ReportPeriod) {
        match self.menu.handle(Request::GenerateReport(period)) {
            Ok(Response::ReportGenerated(generated)) => self.inform(
                "File saved",
                format!("The data was saved to the file: {}", generated.path.display()),
            ),
            Ok(_) => {}
            Err(err) => self.fail("Error saving file", &err),
        }
        self.set_view(View::MainMenu);
    }

    fn close_live_view(&mut self) {
        if let View::Live(sim) = &mut self.view {
            sim.stop();
        }
        self.set_view(View::MainMenu);
    }

    fn quit(&mut self) {
        if let View::Live(sim) = &mut self.view {
            sim.stop();
        }
        let _ = self.menu.handle(Request::Exit);
        self.should_quit = true;
    }

    fn set_view(&mut self, view: View) {
        debug!(view = view_name(&view), "switching view");
        self.view = view;
        self.selected = 0;
        self.clear_input();
    }

    fn inform(&mut self, title: &str, message: impl Into<String>) {
        self.dialogs.push_back(Dialog::new(DialogKind::Info, title, message));
    }

    fn warn(&mut self, title: &str, err: &ReportError) {
        self.dialogs.push_back(Dialog::new(DialogKind::Warning, title, err.to_string()));
    }

    fn fail(&mut self, title: &str, err: &ReportError) {
        info!(error = %err, "reported error to user");
        self.dialogs.push_back(Dialog::new(DialogKind::Error, title, err.to_string()));
    }

    fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.input.chars().take(self.cursor_position).map(|c| c.len_utf8()).sum();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self
                .input
                .chars()
                .take(self.cursor_position - 1)
                .map(|c| c.len_utf8())
                .sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }
}

fn view_name(view: &View) -> &'static str {
    match view {
        View::MainMenu => "main_menu",
        View::Prompt { .. } => "prompt",
        View::AnalysisMenu { .. } => "analysis_menu",
        View::Chart { .. } => "chart",
        View::Live(_) => "live",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkstat_core::{FileReportRepository, ReportService, SimulatorState};
    use tempfile::TempDir;

    fn app(dir: &TempDir) -> App<FileReportRepository> {
        let repo = FileReportRepository::new(dir.path()).unwrap();
        let menu = MenuController::new(ReportService::new(repo), 50, Duration::from_secs(1));
        let mut app = App::new(menu);
        assert_eq!(app.dialog().unwrap().title, "Welcome");
        press(&mut app, KeyCode::Enter);
        app
    }

    fn press(app: &mut App<FileReportRepository>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_line(app: &mut App<FileReportRepository>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
        press(app, KeyCode::Enter);
    }

    fn dismiss_all(app: &mut App<FileReportRepository>) -> Vec<Dialog> {
        let mut seen = Vec::new();
        while let Some(dialog) = app.dialog().cloned() {
            seen.push(dialog);
            press(app, KeyCode::Enter);
        }
        seen
    }

    #[test]
    fn test_analyze_flow_generates_then_loads() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);

        type_line(&mut app, "1");
        type_line(&mut app, "2");
        type_line(&mut app, "4");

        let titles: Vec<String> = dismiss_all(&mut app).into_iter().map(|d| d.title).collect();
        assert_eq!(titles, vec!["Report not found", "File saved"]);
        let february = ReportPeriod::new(2, 2024).unwrap();
        assert!(matches!(app.view, View::AnalysisMenu { period } if period == february));
        assert!(dir.path().join("relatorio_ocupacao_vagas_2_2024.xlsx").is_file());

        type_line(&mut app, "2");
        match &app.view {
            View::Chart { spec, .. } => assert_eq!(spec.x_ticks.len(), 29),
            _ => panic!("expected the chart view"),
        }
        press(&mut app, KeyCode::Esc);
        type_line(&mut app, "4");
        assert!(matches!(app.view, View::MainMenu));

        type_line(&mut app, "1");
        type_line(&mut app, "2");
        type_line(&mut app, "2024");
        let titles: Vec<String> = dismiss_all(&mut app).into_iter().map(|d| d.title).collect();
        assert_eq!(titles, vec!["Report found"]);
    }

    #[test]
    fn test_invalid_month_reprompts() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);

        type_line(&mut app, "1");
        type_line(&mut app, "13");

        let dialog = app.dialog().cloned().unwrap();
        assert_eq!(dialog.kind, DialogKind::Warning);
        press(&mut app, KeyCode::Enter);
        assert!(matches!(
            app.view,
            View::Prompt { flow: Flow::Analyze, field: PromptField::Month }
        ));

        type_line(&mut app, "abc");
        assert_eq!(app.dialog().unwrap().kind, DialogKind::Warning);
    }

    #[test]
    fn test_invalid_menu_option_warns() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        type_line(&mut app, "9");
        assert_eq!(app.dialog().unwrap().title, "Invalid option");
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.view, View::MainMenu));
    }

    #[test]
    fn test_generate_flow_saves_report() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);

        type_line(&mut app, "3");
        type_line(&mut app, "7");
        type_line(&mut app, "2023");

        assert_eq!(app.dialog().unwrap().title, "File saved");
        assert!(dir.path().join("relatorio_ocupacao_vagas_7_2023.xlsx").is_file());
        assert!(matches!(app.view, View::MainMenu));
    }

    #[test]
    fn test_live_view_ticks_and_closes() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        let before = match &app.view {
            View::Live(sim) => sim.lot().occupied(),
            _ => panic!("expected the live view"),
        };

        app.on_tick(Instant::now() + Duration::from_secs(2));
        match &app.view {
            View::Live(sim) => {
                assert_eq!(sim.ticks(), 1);
                assert_eq!(sim.lot().occupied().abs_diff(before), 1);
                assert_eq!(sim.state(), SimulatorState::Running);
            }
            _ => panic!("expected the live view"),
        }

        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.view, View::MainMenu));
    }

    #[test]
    fn test_exit_option_quits() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        type_line(&mut app, "4");
        assert!(app.should_quit);
        assert!(app.menu.is_exited());
    }
}
