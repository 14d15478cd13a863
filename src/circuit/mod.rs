use std::{cell::OnceCell, iter};

use bitvec::prelude::*;
use itertools::Itertools;
use tracing::debug;

use crate::{Arena, Node, NodeError, NodeId};

pub mod errors;
pub mod parse;
pub use errors::CircuitError;
pub use parse::ParseError;

type Error = CircuitError;

/// Literal separating two levels in the circuit text format.
pub const LEVEL_SEPARATOR: &str = "\nL\n";

/// A boolean circuit: input wires and one output gate over a shared [`Arena`].
///
/// Only the gates that feed the output gate take part in [`Circuit::get_levels`] and
/// [`Circuit::display`]; anything else left in the arena is trimmed away.
#[derive(Clone, Debug)]
pub struct Circuit {
    arena: Arena,
    input_wires: Vec<NodeId>,
    output_gate: NodeId,
    levels: OnceCell<Vec<Vec<NodeId>>>,
}

impl Circuit {
    /// Gate values cached in `arena` beforehand are dropped, so every evaluation starts clean.
    pub fn new(
        mut arena: Arena,
        input_wires: Vec<NodeId>,
        output_gate: NodeId,
    ) -> Result<Self, Error> {
        for &wire in &input_wires {
            if !arena.get(wire)?.is_input() {
                return Err(NodeError::NotAnInputWire(wire).into());
            }
        }
        arena.gate(output_gate)?;
        arena.reset_caches();

        Ok(Self {
            arena,
            input_wires,
            output_gate,
            levels: OnceCell::new(),
        })
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn input_wires(&self) -> &[NodeId] {
        &self.input_wires
    }

    pub fn output_gate(&self) -> NodeId {
        self.output_gate
    }

    pub fn get_num_inputs(&self) -> usize {
        self.input_wires.len()
    }

    /// Level of the output gate.
    pub fn depth(&self) -> usize {
        self.arena
            .get(self.output_gate)
            .map(Node::level)
            .unwrap_or_default()
    }

    /// `levels[0]` holds the input wires, `levels[d]` every gate of level `d` that feeds the
    /// output gate. Computed on first use.
    pub fn get_levels(&self) -> &[Vec<NodeId>] {
        self.levels.get_or_init(|| self.init_levels())
    }

    fn init_levels(&self) -> Vec<Vec<NodeId>> {
        let mut levels = vec![Vec::new(); self.depth() + 1];
        levels[0] = self.input_wires.clone();

        let mut visited = bitvec![0; self.arena.len()];
        let mut stack = vec![self.output_gate];

        while let Some(current) = stack.pop() {
            if visited[current.0] {
                continue;
            }
            visited.set(current.0, true);

            // Wires are already listed on level 0.
            let Ok(gate) = self.arena.gate(current) else {
                continue;
            };
            levels[gate.level()].push(current);

            if gate.level() > 1 {
                stack.extend_from_slice(gate.inputs());
            }
        }

        debug!(
            "levels: depth={} gates={}",
            levels.len() - 1,
            levels[1..].iter().map(Vec::len).sum::<usize>()
        );
        levels
    }

    /// Number of gates that feed the output gate, the output gate included.
    pub fn num_gates(&self) -> usize {
        self.get_levels()[1..].iter().map(Vec::len).sum()
    }

    /// Circuit text: every level above the inputs preceded by an `L` line, one gate per line.
    pub fn display(&self) -> String {
        let levels = self.get_levels();

        iter::once(String::new())
            .chain(levels[1..].iter().map(|level| {
                level
                    .iter()
                    .filter_map(|&id| self.arena.get(id).ok().and_then(Node::as_gate))
                    .map(|gate| self.arena.gate_line(gate))
                    .join("\n")
            }))
            .join(LEVEL_SEPARATOR)
    }

    /// Evaluate on a fresh input vector. Nothing cached by an earlier call survives.
    pub fn evaluate(&mut self, input_values: &[bool]) -> Result<bool, Error> {
        if input_values.len() != self.input_wires.len() {
            return Err(Error::InputLength {
                expected: self.input_wires.len(),
                actual: input_values.len(),
            });
        }

        self.wipe_input()?;
        for (&wire, &value) in self.input_wires.iter().zip(input_values) {
            self.arena.set_input(wire, value)?;
        }

        Ok(self.arena.evaluate(self.output_gate)?)
    }

    fn wipe_input(&mut self) -> Result<(), Error> {
        Ok(self.arena.wipe(self.output_gate)?)
    }
}

#[cfg(test)]
mod test;
