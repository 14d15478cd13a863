use std::{fmt, ops::Deref};

use crate::core::gate::Gate;

/// Errors that can occur while building or evaluating nodes
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// Input wire was evaluated before any value was assigned
    #[error("Input wire {name} has no value assigned")]
    MissingValue { name: String },
    /// Gate built with fewer than two inputs or a negation count that does not match
    #[error("Gate needs at least two inputs and one negation per input, got {inputs} inputs and {negations} negations")]
    Arity { inputs: usize, negations: usize },
    /// Negation flag that is neither 0 nor 1
    #[error("Negation flag {0} is not boolean")]
    InvalidNegation(i64),
    /// Node id that is not (yet) part of the arena
    #[error("Node with id {0} not found")]
    UnknownNode(NodeId),
    #[error("Node with id {0} is not a gate")]
    NotAGate(NodeId),
    #[error("Node with id {0} is not an input wire")]
    NotAnInputWire(NodeId),
    #[error("Gate {0} is not calculated but already requested")]
    NotEvaluated(NodeId),
    /// Wires and gates are referenced by name in the circuit text, so a name cannot be empty
    #[error("Node name must not be empty")]
    EmptyName,
    #[error("Gate {gate} has {inputs} inputs, no input at position {index}")]
    NoSuchInput {
        gate: String,
        index: usize,
        inputs: usize,
    },
}
pub type NodeError = Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for NodeId {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<usize> for NodeId {
    fn from(v: usize) -> Self {
        NodeId(v)
    }
}

impl From<NodeId> for usize {
    fn from(n: NodeId) -> usize {
        n.0
    }
}

/// Checks that a node name can appear in the circuit text.
pub(crate) fn checked_name(name: impl Into<String>) -> Result<String, Error> {
    let name = name.into();
    if name.is_empty() {
        return Err(Error::EmptyName);
    }
    Ok(name)
}

/// Leaf of a circuit holding a caller-supplied bit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputWire {
    name: String,
    value: Option<bool>,
}

impl InputWire {
    pub const LEVEL: usize = 0;

    pub fn new(name: impl Into<String>, value: Option<bool>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<bool> {
        self.value
    }

    pub fn evaluate(&self) -> Result<bool, Error> {
        self.value.ok_or_else(|| Error::MissingValue {
            name: self.name.clone(),
        })
    }

    pub fn set_input(&mut self, value: bool) {
        self.value = Some(value);
    }

    pub fn wipe_input(&mut self) {
        self.value = None;
    }
}

/// A slot of the arena: either a leaf wire or a gate over earlier slots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Input(InputWire),
    Gate(Gate),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Input(wire) => &wire.name,
            Node::Gate(gate) => gate.name(),
        }
    }

    pub(crate) fn set_name(&mut self, name: String) {
        match self {
            Node::Input(wire) => wire.name = name,
            Node::Gate(gate) => gate.set_name(name),
        }
    }

    pub fn level(&self) -> usize {
        match self {
            Node::Input(_) => InputWire::LEVEL,
            Node::Gate(gate) => gate.level(),
        }
    }

    /// Value available without any computation: the wire value or the gate cache.
    pub fn settled_value(&self) -> Option<bool> {
        match self {
            Node::Input(wire) => wire.value(),
            Node::Gate(gate) => gate.cached_value(),
        }
    }

    pub fn as_gate(&self) -> Option<&Gate> {
        match self {
            Node::Gate(gate) => Some(gate),
            Node::Input(_) => None,
        }
    }

    pub fn is_input(&self) -> bool {
        matches!(self, Node::Input(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_wire_reports_missing_value() {
        let mut wire = InputWire::new("W0", None);
        assert_eq!(
            wire.evaluate(),
            Err(Error::MissingValue {
                name: "W0".to_owned()
            })
        );

        wire.set_input(true);
        assert_eq!(wire.evaluate(), Ok(true));

        wire.wipe_input();
        assert!(wire.evaluate().is_err());
    }

    #[test]
    fn wire_sits_on_level_zero() {
        let node = Node::Input(InputWire::new("W3", Some(false)));
        assert_eq!(node.level(), 0);
        assert_eq!(node.name(), "W3");
        assert!(node.is_input());
        assert_eq!(node.settled_value(), Some(false));
    }

    #[test]
    fn empty_names_are_rejected() {
        assert_eq!(checked_name(""), Err(Error::EmptyName));
        assert_eq!(checked_name("G7"), Ok("G7".to_owned()));
    }
}
