use chrono::Utc;
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::analytics::aggregation::{summarize, Summary, TimeWindow};
use crate::features::reports::ReportService;

/// Analytics over the public (verified) view
pub struct AnalyticsService {
    reports: Arc<ReportService>,
}

impl AnalyticsService {
    pub fn new(reports: Arc<ReportService>) -> Self {
        Self { reports }
    }

    pub async fn summary(&self, window: TimeWindow) -> Result<Summary> {
        let verified = self.reports.list_verified().await?;
        Ok(summarize(&verified, window, Utc::now()))
    }
}
