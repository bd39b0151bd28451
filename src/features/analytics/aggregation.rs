//! Summaries over a report list: time windows, daily buckets, category
//! distribution and period-over-period change.
//!
//! Every function takes `now` explicitly so results are reproducible.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::features::reports::models::{category_label, Report};

/// Analytics time range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TimeWindow {
    #[serde(rename = "7d")]
    Week,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "all")]
    All,
}

impl TimeWindow {
    /// Window length in days, `None` for all time
    pub fn days(self) -> Option<i64> {
        match self {
            TimeWindow::Week => Some(7),
            TimeWindow::Month => Some(30),
            TimeWindow::Quarter => Some(90),
            TimeWindow::All => None,
        }
    }

    /// Earliest `created_at` inside the window
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.days().map(|days| now - TimeDelta::days(days))
    }
}

/// Reports created at or after the window cutoff
pub fn in_window(reports: &[Report], window: TimeWindow, now: DateTime<Utc>) -> Vec<&Report> {
    match window.cutoff(now) {
        Some(cutoff) => reports.iter().filter(|r| r.created_at >= cutoff).collect(),
        None => reports.iter().collect(),
    }
}

/// Relative change between two counts, in percent.
///
/// A zero baseline yields 100 when anything happened and 0 otherwise.
pub fn percentage_change(current: usize, previous: usize) -> f64 {
    if previous == 0 {
        return if current > 0 { 100.0 } else { 0.0 };
    }
    (current as f64 - previous as f64) / previous as f64 * 100.0
}

/// Current window against the equally long window right before it.
/// `None` for all time.
pub fn period_change(reports: &[Report], window: TimeWindow, now: DateTime<Utc>) -> Option<f64> {
    let days = window.days()?;
    let period_start = now - TimeDelta::days(days);
    let previous_start = now - TimeDelta::days(2 * days);

    let current = reports
        .iter()
        .filter(|r| r.created_at >= period_start)
        .count();
    let previous = reports
        .iter()
        .filter(|r| r.created_at >= previous_start && r.created_at < period_start)
        .count();

    Some(percentage_change(current, previous))
}

/// Number of reports created on one UTC calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub count: usize,
}

/// Zero-filled daily counts, oldest first, ending today.
///
/// N-day windows get exactly N buckets. All time starts at the oldest
/// report's day and is empty when there are no reports.
pub fn daily_buckets(reports: &[Report], window: TimeWindow, now: DateTime<Utc>) -> Vec<DayBucket> {
    let today = now.date_naive();
    let first_day = match window.days() {
        Some(days) => today - TimeDelta::days(days - 1),
        None => match reports.iter().map(|r| r.created_at.date_naive()).min() {
            Some(oldest) => oldest.min(today),
            None => return Vec::new(),
        },
    };

    let mut per_day: HashMap<NaiveDate, usize> = HashMap::new();
    for report in reports {
        *per_day.entry(report.created_at.date_naive()).or_default() += 1;
    }

    first_day
        .iter_days()
        .take_while(|day| *day <= today)
        .map(|date| DayBucket {
            date,
            count: per_day.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

/// Count per display label, most frequent first (ties by label)
pub fn category_distribution<'a>(reports: impl IntoIterator<Item = &'a Report>) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for report in reports {
        *counts.entry(category_label(&report.category)).or_default() += 1;
    }

    let mut distribution: Vec<(String, usize)> = counts.into_iter().collect();
    distribution.sort_by(|(a_label, a_count), (b_label, b_count)| {
        b_count.cmp(a_count).then_with(|| a_label.cmp(b_label))
    });
    distribution
}

/// Reports per day across the window. All time divides by the whole days
/// elapsed since the oldest report, at least one.
pub fn daily_average(count: usize, window: TimeWindow, oldest: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let days = match window.days() {
        Some(days) => days,
        None => {
            let elapsed_ms = oldest.map_or(0, |oldest| (now - oldest).num_milliseconds());
            let day_ms = TimeDelta::days(1).num_milliseconds();
            // ceil for non-negative spans
            ((elapsed_ms + day_ms - 1) / day_ms).max(1)
        }
    };
    count as f64 / days as f64
}

/// Everything the analytics view shows for one window
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub window: TimeWindow,
    pub total: usize,
    pub percentage_change: Option<f64>,
    pub most_common: Option<(String, usize)>,
    pub daily_average: f64,
    pub time_series: Vec<DayBucket>,
    pub distribution: Vec<(String, usize)>,
}

pub fn summarize(reports: &[Report], window: TimeWindow, now: DateTime<Utc>) -> Summary {
    let windowed = in_window(reports, window, now);
    let distribution = category_distribution(windowed.iter().copied());
    let oldest = reports.iter().map(|r| r.created_at).min();

    Summary {
        window,
        total: windowed.len(),
        percentage_change: period_change(reports, window, now),
        most_common: distribution.first().cloned(),
        daily_average: daily_average(windowed.len(), window, oldest, now),
        time_series: daily_buckets(reports, window, now),
        distribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::report_at;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    fn days_ago(days: i64, category: &str) -> Report {
        let mut report = report_at(now() - TimeDelta::days(days));
        report.category = category.to_string();
        report
    }

    #[test]
    fn test_percentage_change() {
        assert_eq!(percentage_change(5, 0), 100.0);
        assert_eq!(percentage_change(0, 0), 0.0);
        assert_eq!(percentage_change(5, 10), -50.0);
        assert_eq!(percentage_change(15, 10), 50.0);
    }

    #[test]
    fn test_window_serde_names() {
        assert_eq!(serde_json::to_string(&TimeWindow::Week).unwrap(), "\"7d\"");
        assert_eq!(
            serde_json::from_str::<TimeWindow>("\"all\"").unwrap(),
            TimeWindow::All
        );
        assert_eq!(TimeWindow::default(), TimeWindow::Month);
    }

    #[test]
    fn test_in_window_uses_cutoff() {
        let reports = vec![days_ago(1, "theft"), days_ago(6, "theft"), days_ago(8, "theft")];

        assert_eq!(in_window(&reports, TimeWindow::Week, now()).len(), 2);
        assert_eq!(in_window(&reports, TimeWindow::All, now()).len(), 3);
    }

    #[test]
    fn test_period_change_compares_adjacent_windows() {
        // 1 in the last 7 days, 2 in the 7 days before
        let reports = vec![days_ago(2, "theft"), days_ago(9, "theft"), days_ago(10, "fraud")];

        assert_eq!(period_change(&reports, TimeWindow::Week, now()), Some(-50.0));
        assert_eq!(period_change(&reports, TimeWindow::All, now()), None);
    }

    #[test]
    fn test_daily_buckets_are_zero_filled() {
        let reports = vec![days_ago(0, "theft"), days_ago(0, "fraud"), days_ago(3, "theft")];

        let buckets = daily_buckets(&reports, TimeWindow::Week, now());

        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].date, NaiveDate::from_ymd_opt(2024, 6, 24).unwrap());
        assert_eq!(buckets[6].date, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        let counts: Vec<usize> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![0, 0, 0, 1, 0, 0, 2]);
    }

    #[test]
    fn test_all_time_buckets_start_at_oldest_report() {
        let reports = vec![days_ago(2, "theft")];
        let buckets = daily_buckets(&reports, TimeWindow::All, now());

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].count, 1);
        assert!(daily_buckets(&[], TimeWindow::All, now()).is_empty());
    }

    #[test]
    fn test_category_distribution_uses_labels() {
        let reports = vec![
            days_ago(1, "suspicious_activity"),
            days_ago(1, "Suspicious_Activity"),
            days_ago(1, "theft"),
        ];

        let distribution = category_distribution(&reports);

        assert_eq!(
            distribution,
            vec![
                ("SUSPICIOUS ACTIVITY".to_string(), 2),
                ("THEFT".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_daily_average() {
        assert_eq!(daily_average(14, TimeWindow::Week, None, now()), 2.0);
        assert_eq!(daily_average(3, TimeWindow::All, None, now()), 3.0);

        let oldest = now() - TimeDelta::hours(36);
        assert_eq!(daily_average(4, TimeWindow::All, Some(oldest), now()), 2.0);
    }

    #[test]
    fn test_summarize() {
        let reports = vec![
            days_ago(1, "theft"),
            days_ago(2, "theft"),
            days_ago(3, "fraud"),
            days_ago(40, "assault"),
        ];

        let summary = summarize(&reports, TimeWindow::Month, now());

        assert_eq!(summary.total, 3);
        assert_eq!(summary.most_common, Some(("THEFT".to_string(), 2)));
        assert_eq!(summary.distribution.len(), 2);
        assert_eq!(summary.time_series.len(), 30);
        assert_eq!(summary.percentage_change, Some(200.0));
        assert_eq!(summary.daily_average, 0.1);
    }
}
