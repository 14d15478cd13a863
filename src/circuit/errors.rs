use crate::NodeError;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Node(#[from] NodeError),
    #[error("Circuit has {expected} input wires, got {actual} input values")]
    InputLength { expected: usize, actual: usize },
}
pub type CircuitError = Error;
