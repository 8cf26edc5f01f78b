/// Server-assigned job identifiers are opaque strings (the backend uses
/// task queue IDs, which are UUID-shaped but not guaranteed to be).
pub type JobId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
