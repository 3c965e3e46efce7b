/// Default page size for loan listings
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Highest page number a list query may request
pub const MAX_PAGE: i64 = 1_000_000;

/// Upper bound for a single attachment upload (10MB)
pub const MAX_ATTACHMENT_SIZE: usize = 10 * 1024 * 1024;

/// MIME types accepted for loan documents
pub const ALLOWED_ATTACHMENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/heic",
    "application/pdf",
];
