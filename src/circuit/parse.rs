use std::{collections::HashMap, path::Path};

use regex::{Captures, Regex};
use tracing::debug;

use crate::{Arena, Circuit, CircuitError, GateKind, NodeError, NodeId, UnknownGateKind};

static WIDTH_PATTERN: &str = r"\bW\s*=\s*(?P<width>\d+)";
static GATE_PATTERN: &str =
    r"(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*:\s*(?P<func>[A-Za-z]+)\s*\((?P<terms>(?:[^()]|\([^()]*\))*)\)";
static TERM_PATTERN: &str = r"^(?:N\(\s*(?P<negated>[A-Za-z_][A-Za-z0-9_]*)\s*\)|(?P<plain>[A-Za-z_][A-Za-z0-9_]*))$";

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error(transparent)]
    ParseIntError(#[from] std::num::ParseIntError),
    #[error(transparent)]
    Pattern(#[from] regex::Error),
    #[error("circuit header does not declare the number of input wires (W=<n>)")]
    MissingWidth,
    #[error(transparent)]
    UnsupportedGateType(#[from] UnknownGateKind),
    #[error("malformed gate input: {0:?}")]
    MalformedTerm(String),
    #[error("gate {gate} reads {name} before it is defined")]
    UndefinedName { gate: String, name: String },
    #[error("name defined twice: {0}")]
    DuplicateName(String),
    #[error("circuit has no gates")]
    NoGates,
    #[error(transparent)]
    NodeError(#[from] NodeError),
    #[error(transparent)]
    CircuitError(#[from] CircuitError),
}

impl Circuit {
    /// Parses a circuit in the stealth text format.
    ///
    /// The header declares the input width as `W=<n>`; wires are named `W0..W<n-1>`. Each gate
    /// reads `name:FUNC(term,...)` with `FUNC` one of `AND`, `OR`, `XOR` and every term either
    /// a wire, an earlier gate or `N(<name>)`. `L` level markers carry no information since
    /// levels follow from the inputs. The last gate is the output gate.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let width_pattern = Regex::new(WIDTH_PATTERN)?;
        let gate_pattern = Regex::new(GATE_PATTERN)?;
        let term_pattern = Regex::new(TERM_PATTERN)?;

        let width: usize = width_pattern
            .captures(text)
            .and_then(|cap| cap.name("width"))
            .ok_or(ParseError::MissingWidth)?
            .as_str()
            .parse()?;

        let mut arena = Arena::with_capacity(width);
        let mut names: HashMap<String, NodeId> = HashMap::with_capacity(width);

        let input_wires = (0..width)
            .map(|index| {
                let name = format!("W{index}");
                let id = arena.add_input_wire(name.clone(), None)?;
                names.insert(name, id);
                Ok(id)
            })
            .collect::<Result<Vec<_>, NodeError>>()?;

        let mut output_gate = None;
        for cap in gate_pattern.captures_iter(text) {
            let UncheckedGate {
                name,
                kind,
                inputs,
                negations,
            } = UncheckedGate::parse(&cap, &term_pattern, &names)?;

            if names.contains_key(&name) {
                return Err(ParseError::DuplicateName(name));
            }

            let id = arena.add_gate(kind, name.clone(), inputs, negations)?;
            names.insert(name, id);
            output_gate = Some(id);
        }

        let output_gate = output_gate.ok_or(ParseError::NoGates)?;
        debug!("parsed circuit: W={} nodes={}", width, arena.len());

        Ok(Circuit::new(arena, input_wires, output_gate)?)
    }

    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }
}

struct UncheckedGate {
    name: String,
    kind: GateKind,
    inputs: Vec<NodeId>,
    negations: Vec<bool>,
}

impl UncheckedGate {
    fn parse(
        captures: &Captures,
        term_pattern: &Regex,
        names: &HashMap<String, NodeId>,
    ) -> Result<Self, ParseError> {
        let name = captures["name"].to_owned();
        let kind: GateKind = captures["func"].parse()?;

        let mut inputs = vec![];
        let mut negations = vec![];
        for term in captures["terms"].split(',').map(str::trim) {
            let term_cap = term_pattern
                .captures(term)
                .ok_or_else(|| ParseError::MalformedTerm(term.to_owned()))?;

            let (input_name, negated) = match (term_cap.name("negated"), term_cap.name("plain")) {
                (Some(negated), _) => (negated.as_str(), true),
                (None, Some(plain)) => (plain.as_str(), false),
                (None, None) => return Err(ParseError::MalformedTerm(term.to_owned())),
            };

            let input = names
                .get(input_name)
                .copied()
                .ok_or_else(|| ParseError::UndefinedName {
                    gate: name.clone(),
                    name: input_name.to_owned(),
                })?;

            inputs.push(input);
            negations.push(negated);
        }

        Ok(Self {
            name,
            kind,
            inputs,
            negations,
        })
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn simple_circuit() {
        let mut circuit = Circuit::parse("W=2 output_gate: AND(W0,W1)").unwrap();

        assert_eq!(circuit.get_num_inputs(), 2);
        let output = circuit.arena().gate(circuit.output_gate()).unwrap();
        assert_eq!(output.kind(), GateKind::And);
        assert_eq!(output.num_inputs(), 2);
        assert_eq!(circuit.evaluate(&[true, true]).unwrap(), true);
        assert_eq!(circuit.evaluate(&[true, false]).unwrap(), false);
    }

    #[test]
    fn compound_circuit_shares_inputs() {
        let circuit = Circuit::parse(
            "W=3
             G0: OR(W0, W1, W2)
             G1: XOR(W1, W2)
             output_gate: AND(G0, G1)",
        )
        .unwrap();

        let arena = circuit.arena();
        let output = arena.gate(circuit.output_gate()).unwrap();
        let or = arena.gate(output.inputs()[0]).unwrap();
        let xor = arena.gate(output.inputs()[1]).unwrap();

        assert_eq!(or.kind(), GateKind::Or);
        assert_eq!(or.num_inputs(), 3);
        assert_eq!(xor.kind(), GateKind::Xor);
        assert_eq!(xor.inputs()[0], or.inputs()[1]);
        assert_eq!(xor.inputs()[1], or.inputs()[2]);
    }

    #[test]
    fn negated_terms_and_level_markers() {
        let text = "W=2,G=2,F=1\nL\nG2:XOR(W0,N(W1))\nG3:AND(N(W0),W1)\nL\noutput_gate:OR(W0,N(G2),G3)";
        let mut circuit = Circuit::parse(text).unwrap();

        let output = circuit.arena().gate(circuit.output_gate()).unwrap();
        assert_eq!(output.negations(), &[false, true, false]);
        assert_eq!(circuit.depth(), 2);

        // W0=0, W1=0: G2 = 0^1 = 1, G3 = 1&0 = 0, out = 0|0|0 = 0
        assert_eq!(circuit.evaluate(&[false, false]).unwrap(), false);
        // W0=0, W1=1: G2 = 0, G3 = 1, out = 1
        assert_eq!(circuit.evaluate(&[false, true]).unwrap(), true);
    }

    #[test]
    fn display_output_parses_back() {
        let text = "\nL\ng1:AND(N(W0),W1)\nL\ng2:OR(g1,W2)\nL\nog:XOR(g1,g2)";
        let circuit = Circuit::parse(&format!("W=3,D=3,F=3{text}")).unwrap();
        assert_eq!(circuit.display(), text);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            Circuit::parse("G0:AND(W0,W1)"),
            Err(ParseError::MissingWidth)
        ));
        assert!(matches!(
            Circuit::parse("W=2 G0:NAND(W0,W1)"),
            Err(ParseError::UnsupportedGateType(_))
        ));
        assert!(matches!(
            Circuit::parse("W=2 G0:AND(W0,G1) G1:OR(W0,W1)"),
            Err(ParseError::UndefinedName { .. })
        ));
        assert!(matches!(
            Circuit::parse("W=2 G0:AND(W0,W1) G0:OR(W0,W1)"),
            Err(ParseError::DuplicateName(_))
        ));
        assert!(matches!(
            Circuit::parse("W=2 G0:AND(W0)"),
            Err(ParseError::NodeError(NodeError::Arity { .. }))
        ));
        assert!(matches!(
            Circuit::parse("W=2 G0:AND(W0,N(W1)x)"),
            Err(ParseError::MalformedTerm(_))
        ));
        assert!(matches!(Circuit::parse("W=2"), Err(ParseError::NoGates)));
    }
}
