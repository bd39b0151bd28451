/// Maximum page size allowed on filtered listings
pub const MAX_PAGE_SIZE: i64 = 100;

/// URL prefix under which stored report photos are served
pub const UPLOADS_ROUTE: &str = "/uploads";

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Moderator role - can verify, reject and delete reports and read stats
pub const ROLE_ADMIN: &str = "ADMIN";

/// Default role for registered accounts
pub const ROLE_USER: &str = "USER";

// =============================================================================
// PHOTO UPLOADS
// =============================================================================

/// Content types accepted for report photos
pub const ALLOWED_PHOTO_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/heic",
];
