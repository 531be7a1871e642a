pub mod file;
pub mod traits;

// Re-export
pub use file::{FileReportRepository, report_file_name};
pub use traits::ReportRepository;
