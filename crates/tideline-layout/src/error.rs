#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown period layout algorithm: {name} (available: {available})")]
    UnknownAlgorithm { name: String, available: String },

    #[error(transparent)]
    Core(#[from] tideline_core::Error),
}

impl From<tideline_core::TimeError> for Error {
    fn from(value: tideline_core::TimeError) -> Self {
        Self::Core(value.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
