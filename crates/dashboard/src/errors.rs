use client::ApiError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("an upload is already in progress")]
    Busy,
    #[error("view has been closed")]
    Closed,
    #[error(transparent)]
    Api(#[from] ApiError),
}
