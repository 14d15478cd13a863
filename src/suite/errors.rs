use std::path::PathBuf;

use crate::{CircuitError, ParseError, UnknownGateKind, generator::GeneratorError};

/// Why a single `config.txt` line was rejected
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("expected `key = value`, got {0:?}")]
    Shape(String),
    #[error("unknown setting {0:?}")]
    UnknownKey(String),
    #[error("{key}: cannot parse {value:?} as a number")]
    BadNumber { key: String, value: String },
    #[error("generate expects True or False, got {0:?}")]
    BadBool(String),
    #[error(transparent)]
    BadTestType(#[from] UnknownGateKind),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error("cannot read {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("config.txt line {line}: {source}")]
    Config { line: usize, source: ConfigError },
    #[error("setting {0} is required before generate = True")]
    MissingSetting(&'static str),
    #[error("unknown circuit family {0}, expected 1, 2 or 3")]
    UnknownFamily(u8),
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Circuit(#[from] CircuitError),
}
pub type SuiteError = Error;
