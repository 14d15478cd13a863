pub mod circuit;
mod core;
pub mod generator;
pub mod logging;
pub mod suite;

pub use crate::core::{
    arena::Arena,
    gate::{Gate, negation_from_flag, short_display},
    gate_kind::{GateKind, UnknownGateKind},
    node::{InputWire, Node, NodeError, NodeId},
    progress,
};

pub use circuit::{Circuit, CircuitError, ParseError};
pub use generator::{
    CircuitMaker, Family, GateChoice, GeneratedCircuit, GeneratorError, GeneratorParams,
    InputVector, Trimming,
};
pub use logging::init_tracing;
pub use suite::{SuiteError, generate_suite};
