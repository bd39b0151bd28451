//! Narrowing a report list by category, calendar dates and free text.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::features::reports::models::Report;

/// Whether the report's category is in `accepted` (case-insensitive).
/// An empty set accepts everything.
pub fn matches_categories(report: &Report, accepted: &[String]) -> bool {
    let mut accepted = accepted.iter().map(|c| c.trim()).filter(|c| !c.is_empty()).peekable();
    accepted.peek().is_none() || accepted.any(|c| c.eq_ignore_ascii_case(report.category.trim()))
}

/// Inclusive `created_at` bounds. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// From calendar dates: `start` at 00:00:00.000 UTC, `end` through
    /// 23:59:59.999 UTC of that day.
    pub fn from_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            start: start.map(start_of_day),
            end: end.and_then(end_of_day),
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| start <= at) && self.end.map_or(true, |end| at <= end)
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Last millisecond of the day. Built from the date itself so the
/// largest representable date cannot overflow.
fn end_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_milli_opt(23, 59, 59, 999).map(|dt| dt.and_utc())
}

/// Case-insensitive substring match over title, description and address.
/// A blank term matches everything.
pub fn matches_search(report: &Report, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }

    std::iter::once(Some(report.title.as_str()))
        .chain([report.description.as_deref(), report.address.as_deref()])
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
}

/// Every criterion of the public listing, applied together
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub categories: Vec<String>,
    pub range: DateRange,
    pub search: Option<String>,
}

impl ReportFilter {
    pub fn matches(&self, report: &Report) -> bool {
        matches_categories(report, &self.categories)
            && self.range.contains(report.created_at)
            && self
                .search
                .as_deref()
                .map_or(true, |term| matches_search(report, term))
    }

    /// Keeps matching reports, preserving order
    pub fn apply(&self, reports: Vec<Report>) -> Vec<Report> {
        reports.into_iter().filter(|r| self.matches(r)).collect()
    }
}
