mod category;
mod report;

pub use category::{category_color, category_label, DEFAULT_CATEGORY_COLOR, KNOWN_CATEGORIES};
pub use report::{NewReport, Report, ReportCounts, ReportStatus};
