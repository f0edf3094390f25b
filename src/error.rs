use thiserror::Error;

use crate::services::store::StoreError;

/// Errors surfaced by the recommendation core
///
/// An empty recommendation list means "no opinion" and is not an error.
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Engine is not ready")]
    NotReady,

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

pub type RecommendResult<T> = Result<T, RecommendError>;
