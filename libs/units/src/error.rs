use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid unit definition: {0}")]
    Validation(String),

    #[error("unit '{unit}' has a {scale} scale, which cannot be composed here")]
    ScaleIncompatible { unit: String, scale: String },

    #[error("a unit with id '{id}' has already been registered in family '{family}'")]
    DuplicateId { family: String, id: String },

    #[error("invalid SI dimensions: {0}")]
    InvalidDimension(String),

    #[error("unknown unit family #{0}")]
    UnknownFamily(usize),

    #[error("incompatible units: '{from}' vs '{to}'")]
    Incompatible { from: String, to: String },

    #[error("registry is frozen; cannot declare unit '{0}'")]
    Frozen(String),
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}
