use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::model::lot::ParkingLotState;

pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorState {
    Running,
    Stopped,
}

/// Live lot simulation: a reflecting ±1 random walk, one step per tick.
pub struct LiveSimulator<G: Rng> {
    lot: ParkingLotState,
    state: SimulatorState,
    rng: G,
    tick_interval: Duration,
    next_tick: Instant,
    ticks: u64,
}

impl LiveSimulator<StdRng> {
    pub fn from_entropy(capacity: u32, tick_interval: Duration) -> Self {
        Self::new(capacity, tick_interval, StdRng::from_entropy())
    }
}

impl<G: Rng> LiveSimulator<G> {
    pub fn new(capacity: u32, tick_interval: Duration, mut rng: G) -> Self {
        let occupied = rng.gen_range(0..=capacity);
        info!(capacity, occupied, "live simulation started");
        Self {
            lot: ParkingLotState::new(occupied, capacity),
            state: SimulatorState::Running,
            rng,
            tick_interval,
            next_tick: Instant::now() + tick_interval,
            ticks: 0,
        }
    }

    pub fn lot(&self) -> &ParkingLotState {
        &self.lot
    }

    pub fn state(&self) -> SimulatorState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn status_line(&self) -> String {
        self.lot.status_line()
    }

    /// Applies one step. Returns the new occupancy, or `None` once stopped.
    pub fn tick(&mut self) -> Option<u32> {
        if self.state == SimulatorState::Stopped {
            return None;
        }
        let towards_full = self.rng.gen_bool(0.5);
        self.lot.step(towards_full);
        self.ticks += 1;
        debug!(tick = self.ticks, occupied = self.lot.occupied(), "simulation tick");
        Some(self.lot.occupied())
    }

    /// Time left until the next scheduled tick.
    pub fn time_until_tick(&self, now: Instant) -> Duration {
        self.next_tick.saturating_duration_since(now)
    }

    /// Runs the tick if its deadline has passed and re-arms the deadline.
    pub fn tick_if_due(&mut self, now: Instant) -> Option<u32> {
        if self.state == SimulatorState::Stopped || now < self.next_tick {
            return None;
        }
        self.next_tick = now + self.tick_interval;
        self.tick()
    }

    pub fn stop(&mut self) {
        if self.state == SimulatorState::Running {
            info!(ticks = self.ticks, occupied = self.lot.occupied(), "live simulation stopped");
        }
        self.state = SimulatorState::Stopped;
    }
}
