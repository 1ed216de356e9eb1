use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Lookback window must be at least one day")]
    ZeroLookback,
    #[error("Unknown status filter: {0}")]
    UnknownStatusFilter(String),
    #[error("Unknown timestamp policy: {0}")]
    UnknownTimestampPolicy(String),
    #[error("Unparseable timestamp for upload {upload_id}: {created_at:?}")]
    UnparseableTimestamp { upload_id: i64, created_at: String },
}
