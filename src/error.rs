use crate::fetch::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemptrendError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Moving-average window must be at least 1, got {0}")]
    InvalidWindow(usize),

    #[error("Failed to decode bundled sample dataset")]
    SampleDecode(#[source] serde_json::Error),
}
