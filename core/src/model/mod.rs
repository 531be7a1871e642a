pub mod lot;
pub mod occupancy;
