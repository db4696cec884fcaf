use thiserror::Error;

/// Errors raised while normalizing backing-store timestamps
#[derive(Debug, Error)]
pub enum TimestampError {
    #[error("Unparseable timestamp: {raw}")]
    Unparseable { raw: String },
}

/// Errors raised by the backing record store
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("Query against '{collection}' failed: {reason}")]
    QueryFailed { collection: String, reason: String },

    #[error(transparent)]
    Timestamp(#[from] TimestampError),
}

/// Errors surfaced to callers of the analytics API
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The rep id has no directory record. Fatal for the call.
    #[error("Rep not found: {rep_id}")]
    RepNotFound { rep_id: String },

    /// The request is malformed, e.g. a custom period without a range.
    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// A metric-group query failed under the propagate policy.
    #[error(transparent)]
    DataSource(#[from] DataSourceError),
}
