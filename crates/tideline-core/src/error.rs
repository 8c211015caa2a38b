use crate::time::TimeError;
use crate::validate::ValidationError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("dataset JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Time(#[from] TimeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
