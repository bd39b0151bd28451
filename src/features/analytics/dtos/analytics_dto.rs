use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::analytics::aggregation::{Summary, TimeWindow};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalyticsQuery {
    /// 7d, 30d, 90d or all (default 30d)
    #[param(value_type = Option<String>, example = "30d")]
    pub range: Option<TimeWindow>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TimeSeriesPointDto {
    pub date: NaiveDate,
    pub reports: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryCountDto {
    /// Display label, e.g. "SUSPICIOUS ACTIVITY"
    pub category: String,
    pub count: usize,
}

/// Aggregates over verified reports for one time range
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummaryDto {
    pub range: TimeWindow,
    pub total_reports: usize,
    /// Change against the previous period of equal length; null for all time
    pub percentage_change: Option<f64>,
    pub most_common_category: Option<String>,
    pub most_common_count: usize,
    pub daily_average: f64,
    pub category_count: usize,
    pub time_series: Vec<TimeSeriesPointDto>,
    pub category_distribution: Vec<CategoryCountDto>,
}

impl From<Summary> for AnalyticsSummaryDto {
    fn from(s: Summary) -> Self {
        let (most_common_category, most_common_count) = match s.most_common {
            Some((label, count)) => (Some(label), count),
            None => (None, 0),
        };

        Self {
            range: s.window,
            total_reports: s.total,
            percentage_change: s.percentage_change,
            most_common_category,
            most_common_count,
            daily_average: s.daily_average,
            category_count: s.distribution.len(),
            time_series: s
                .time_series
                .into_iter()
                .map(|b| TimeSeriesPointDto {
                    date: b.date,
                    reports: b.count,
                })
                .collect(),
            category_distribution: s
                .distribution
                .into_iter()
                .map(|(category, count)| CategoryCountDto { category, count })
                .collect(),
        }
    }
}
