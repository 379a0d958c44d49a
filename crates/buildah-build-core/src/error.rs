use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Input required and not supplied: {0}")]
    MissingInput(&'static str),
}

pub type Result<T> = std::result::Result<T, InputError>;
