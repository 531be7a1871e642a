pub mod chart;
pub mod generator;
pub mod report_service;
pub mod simulator;
