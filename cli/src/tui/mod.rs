pub mod app;
pub mod chart;
pub mod ui;

use std::io;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use parkstat_core::{Config, MenuController, ReportRepository, ReportService};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{error, info};

use crate::tui::app::App;

pub fn run<R: ReportRepository>(repo: R, config: &Config) -> Result<()> {
    let menu = MenuController::new(
        ReportService::new(repo),
        config.capacity,
        config.tick_interval(),
    );
    let mut app = App::new(menu);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!("terminal interface started");
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = %err, "terminal interface failed");
        println!("{:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend, R: ReportRepository>(
    terminal: &mut Terminal<B>,
    app: &mut App<R>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if app.should_quit {
            return Ok(());
        }

        // Wakes up no later than the next simulation tick.
        if event::poll(app.poll_timeout(Instant::now()))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        app.on_tick(Instant::now());
    }
}
