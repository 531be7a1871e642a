mod logging;
mod table;
mod tui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use parkstat_core::{
    parse_month, parse_year, Config, FileReportRepository, ReportOrigin, ReportPeriod,
    ReportService,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "parkstat")]
#[command(
    version,
    about = "Parking occupancy reports, charts and a live lot simulation",
    long_about = None
)]
struct Cli {
    /// Directory where monthly reports are read and written
    #[arg(long, global = true)]
    reports_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Open the interactive terminal interface (default)
    Tui,
    /// Generate fresh data for a month and save it, replacing any existing report
    Report { month: String, year: String },
    /// Print a month's report, generating it first if it does not exist
    Show {
        month: String,
        year: String,
        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List the months that have a saved report
    List,
}

fn parse_period(month: &str, year: &str) -> Result<ReportPeriod> {
    let month = parse_month(month)?;
    let year = parse_year(year, false)?;
    Ok(ReportPeriod::new(month, year)?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.reports_dir {
        config.reports_dir = dir;
    }

    let repo = FileReportRepository::new(&config.reports_dir)
        .with_context(|| format!("cannot use reports directory {}", config.reports_dir.display()))?;

    if let Err(err) = logging::init(&config) {
        eprintln!("Warning: logging disabled: {err:#}");
    }
    info!(reports_dir = %config.reports_dir.display(), "parkstat started");

    match cli.command {
        Some(Commands::Tui) | None => {
            tui::run(repo, &config)?;
        }
        Some(Commands::Report { month, year }) => {
            let period = parse_period(&month, &year)?;
            let generated = ReportService::new(repo).regenerate(period)?;
            println!("Report for {} saved to {}", period, generated.path.display());
        }
        Some(Commands::Show { month, year, json }) => {
            let period = parse_period(&month, &year)?;
            let obtained = ReportService::new(repo).get_or_create(period)?;
            match &obtained.origin {
                ReportOrigin::Loaded => println!("Existing report found for {period}."),
                ReportOrigin::Generated { saved: Ok(path) } => {
                    println!("No report found for {period}, random data generated.");
                    println!("Saved to {}", path.display());
                }
                ReportOrigin::Generated { saved: Err(err) } => {
                    println!("No report found for {period}, random data generated.");
                    println!("Warning: {err}");
                }
                ReportOrigin::Unsaved => {}
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&obtained.report)?);
            } else {
                println!("{}", table::render_report(&obtained.report));
            }
        }
        Some(Commands::List) => {
            let periods = ReportService::new(repo).list()?;
            if periods.is_empty() {
                println!("No reports found in {}.", config.reports_dir.display());
            } else {
                println!("{}", table::render_periods(&periods));
            }
        }
    }

    info!("parkstat finished");
    Ok(())
}
