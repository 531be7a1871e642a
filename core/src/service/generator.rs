use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::lot::DEFAULT_CAPACITY;
use crate::model::occupancy::{MonthlyReport, OccupancyRecord, ReportPeriod};

pub const MIN_SAMPLE: u32 = 1;
pub const MAX_SAMPLE: u32 = DEFAULT_CAPACITY;

/// Fabricates synthetic occupancy data, one record per calendar day.
pub struct OccupancyGenerator<G: Rng> {
    rng: G,
}

impl OccupancyGenerator<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<G: Rng> OccupancyGenerator<G> {
    pub fn new(rng: G) -> Self {
        Self { rng }
    }

    pub fn generate(&mut self, period: ReportPeriod) -> MonthlyReport {
        let days: BTreeMap<u32, OccupancyRecord> = (1..=period.days())
            .map(|day| (day, self.sample()))
            .collect();
        MonthlyReport::new(period, days)
    }

    fn sample(&mut self) -> OccupancyRecord {
        OccupancyRecord::new(
            self.rng.gen_range(MIN_SAMPLE..=MAX_SAMPLE),
            self.rng.gen_range(MIN_SAMPLE..=MAX_SAMPLE),
            self.rng.gen_range(MIN_SAMPLE..=MAX_SAMPLE),
        )
    }
}
