use std::collections::HashMap;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{info, warn};

use crate::error::{ReportError, ReportResult};
use crate::model::occupancy::{MonthlyReport, ReportPeriod};
use crate::repository::ReportRepository;
use crate::service::generator::OccupancyGenerator;

#[derive(Debug)]
pub enum ReportOrigin {
    /// Read back from an existing report file.
    Loaded,
    /// Freshly generated. Carries the outcome of persisting it.
    Generated { saved: ReportResult<PathBuf> },
    /// Generated earlier in this session; persisting it failed then.
    Unsaved,
}

#[derive(Debug)]
pub struct ObtainedReport {
    pub report: MonthlyReport,
    pub origin: ReportOrigin,
}

#[derive(Debug)]
pub struct GeneratedReport {
    pub report: MonthlyReport,
    pub path: PathBuf,
}

/// Cache-aside access to monthly reports: reuse the file when present,
/// otherwise generate and persist.
pub struct ReportService<R: ReportRepository, G: Rng = StdRng> {
    repo: R,
    generator: OccupancyGenerator<G>,
    unsaved: HashMap<ReportPeriod, MonthlyReport>,
}

impl<R: ReportRepository> ReportService<R, StdRng> {
    pub fn new(repo: R) -> Self {
        Self::with_generator(repo, OccupancyGenerator::from_entropy())
    }
}

impl<R: ReportRepository, G: Rng> ReportService<R, G> {
    pub fn with_generator(repo: R, generator: OccupancyGenerator<G>) -> Self {
        Self {
            repo,
            generator,
            unsaved: HashMap::new(),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn get_or_create(&mut self, period: ReportPeriod) -> ReportResult<ObtainedReport> {
        if self.repo.exists(period) {
            let report = self.repo.load(period)?;
            self.unsaved.remove(&period);
            return Ok(ObtainedReport {
                report,
                origin: ReportOrigin::Loaded,
            });
        }

        if let Some(report) = self.unsaved.get(&period) {
            return Ok(ObtainedReport {
                report: report.clone(),
                origin: ReportOrigin::Unsaved,
            });
        }

        info!(%period, "no report on disk, generating");
        let report = self.generator.generate(period);
        let saved = self.repo.save(&report);
        if let Err(err) = &saved {
            warn!(%period, error = %err, "generated report could not be saved");
            self.unsaved.insert(period, report.clone());
        }
        Ok(ObtainedReport {
            report,
            origin: ReportOrigin::Generated { saved },
        })
    }

    /// Fabricates a fresh report and overwrites whatever is stored for `period`.
    pub fn regenerate(&mut self, period: ReportPeriod) -> ReportResult<GeneratedReport> {
        let report = self.generator.generate(period);
        self.unsaved.remove(&period);
        match self.repo.save(&report) {
            Ok(path) => {
                info!(%period, path = %path.display(), "report regenerated");
                Ok(GeneratedReport { report, path })
            }
            Err(err) => {
                warn!(%period, error = %err, "regenerated report could not be saved");
                Err(err)
            }
        }
    }

    pub fn list(&self) -> ReportResult<Vec<ReportPeriod>> {
        self.repo.list()
    }
}

impl ObtainedReport {
    /// The persistence failure of a freshly generated report, if any.
    pub fn save_error(&self) -> Option<&ReportError> {
        match &self.origin {
            ReportOrigin::Generated { saved: Err(err) } => Some(err),
            _ => None,
        }
    }
}
