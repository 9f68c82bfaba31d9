use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid {kind} id: {value:?}")]
    InvalidId { kind: &'static str, value: String },
    #[error("invalid instance name: {0:?}")]
    InvalidInstanceName(String),
    #[error("duplicate instance name in match: {0}")]
    DuplicateInstance(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
