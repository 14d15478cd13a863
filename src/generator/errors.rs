use crate::{CircuitError, NodeError, UnknownGateKind};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Node(#[from] NodeError),
    #[error(transparent)]
    Circuit(#[from] CircuitError),
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error(transparent)]
    UnsupportedGateType(#[from] UnknownGateKind),
    #[error("invalid generator parameter {name}: {reason}")]
    InvalidParam { name: &'static str, reason: String },
    #[error("malformed input vector {0:?}, expected [<0|1>...]")]
    MalformedInput(String),
}
pub type GeneratorError = Error;

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParam {
            name,
            reason: reason.into(),
        }
    }
}
