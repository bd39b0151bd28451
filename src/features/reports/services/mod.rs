mod intake_service;
mod report_service;

pub use intake_service::{IntakeService, PhotoUpload, RawReportSubmission};
pub use report_service::{ReportPage, ReportService};
