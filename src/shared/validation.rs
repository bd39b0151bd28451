use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating report categories (after lowercasing)
    /// Letters, digits, underscores, hyphens and spaces
    /// - Valid: "theft", "suspicious_activity", "drug-activity", "car break in"
    /// - Invalid: "", "theft!", "<script>", "a/b"
    pub static ref CATEGORY_REGEX: Regex = Regex::new(r"^[a-z0-9_\- ]+$").unwrap();

    /// Regex for file extensions kept on stored photos
    /// - Valid: "jpg", "PNG", "heic"
    /// - Invalid: "", "tar.gz", "../x", "verylongextension"
    pub static ref FILE_EXTENSION_REGEX: Regex = Regex::new(r"^[A-Za-z0-9]{1,10}$").unwrap();
}
