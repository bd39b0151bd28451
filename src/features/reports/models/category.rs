//! Known report categories and how they are displayed.
//!
//! The vocabulary is open: unknown categories are stored as submitted and
//! rendered with the fallback colour.

/// Colour used for categories outside the known vocabulary
pub const DEFAULT_CATEGORY_COLOR: &str = "#6b7280";

/// (category, marker colour)
pub const KNOWN_CATEGORIES: &[(&str, &str)] = &[
    ("theft", "#ef4444"),
    ("vandalism", "#f97316"),
    ("assault", "#a855f7"),
    ("harassment", "#ec4899"),
    ("burglary", "#eab308"),
    ("fraud", "#3b82f6"),
    ("suspicious_activity", DEFAULT_CATEGORY_COLOR),
    ("drug_activity", DEFAULT_CATEGORY_COLOR),
    ("other", DEFAULT_CATEGORY_COLOR),
];

/// Marker colour for a category, case-insensitive
pub fn category_color(category: &str) -> &'static str {
    let category = category.trim().to_lowercase();
    KNOWN_CATEGORIES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_CATEGORY_COLOR)
}

/// Display label: underscores become spaces, upper-cased
pub fn category_label(category: &str) -> String {
    category.trim().replace('_', " ").to_uppercase()
}
