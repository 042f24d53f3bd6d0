use crate::error::Error as WebhoseErr;

/// Result type returned throughout the crate.
pub type Result<T> = std::result::Result<T, WebhoseErr>;
