use itertools::Itertools;
use rand::Rng;
use tracing::trace;

use crate::core::{
    gate::{Gate, GateKind, negation_from_flag, short_display},
    node::{InputWire, Node, NodeError, NodeId, checked_name},
};

type Error = NodeError;

/// Indexed store of wires and gates.
///
/// Gates only ever reference ids that already exist, so the stored graph is acyclic and the
/// insertion order is a valid evaluation order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add_input_wire(
        &mut self,
        name: impl Into<String>,
        value: Option<bool>,
    ) -> Result<NodeId, Error> {
        let name = checked_name(name)?;
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::Input(InputWire::new(name, value)));
        Ok(id)
    }

    /// Add a gate over existing nodes. Its level is one above the highest input level.
    pub fn add_gate(
        &mut self,
        kind: GateKind,
        name: impl Into<String>,
        inputs: Vec<NodeId>,
        negations: Vec<bool>,
    ) -> Result<NodeId, Error> {
        let mut level = 0;
        for &input in &inputs {
            level = level.max(self.get(input)?.level() + 1);
        }

        let gate = Gate::new(name, kind, inputs, negations, level)?;
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::Gate(gate));
        Ok(id)
    }

    /// Same as [`Arena::add_gate`] with integer negation flags, each of which must be 0 or 1.
    pub fn add_gate_with_flags(
        &mut self,
        kind: GateKind,
        name: impl Into<String>,
        inputs: Vec<NodeId>,
        flags: &[i64],
    ) -> Result<NodeId, Error> {
        let negations = flags
            .iter()
            .map(|&flag| negation_from_flag(flag))
            .collect::<Result<Vec<_>, _>>()?;
        self.add_gate(kind, name, inputs, negations)
    }

    pub fn get(&self, id: NodeId) -> Result<&Node, Error> {
        self.nodes.get(id.0).ok_or(Error::UnknownNode(id))
    }

    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, Error> {
        self.nodes.get_mut(id.0).ok_or(Error::UnknownNode(id))
    }

    pub fn gate(&self, id: NodeId) -> Result<&Gate, Error> {
        match self.get(id)? {
            Node::Gate(gate) => Ok(gate),
            Node::Input(_) => Err(Error::NotAGate(id)),
        }
    }

    fn gate_mut(&mut self, id: NodeId) -> Result<&mut Gate, Error> {
        match self.get_mut(id)? {
            Node::Gate(gate) => Ok(gate),
            Node::Input(_) => Err(Error::NotAGate(id)),
        }
    }

    fn wire_mut(&mut self, id: NodeId) -> Result<&mut InputWire, Error> {
        match self.get_mut(id)? {
            Node::Input(wire) => Ok(wire),
            Node::Gate(_) => Err(Error::NotAnInputWire(id)),
        }
    }

    pub fn name(&self, id: NodeId) -> Result<&str, Error> {
        Ok(self.get(id)?.name())
    }

    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> Result<(), Error> {
        let name = checked_name(name)?;
        self.get_mut(id)?.set_name(name);
        Ok(())
    }

    pub fn level(&self, id: NodeId) -> Result<usize, Error> {
        Ok(self.get(id)?.level())
    }

    pub fn set_input(&mut self, id: NodeId, value: bool) -> Result<(), Error> {
        self.wire_mut(id)?.set_input(value);
        Ok(())
    }

    /// Value of a node, computing and caching every gate below it that is not cached yet.
    ///
    /// Evaluation walks an explicit stack, so deep circuits do not grow the call stack.
    pub fn evaluate(&mut self, id: NodeId) -> Result<bool, Error> {
        self.get(id)?;

        let mut stack = vec![(id, false)];
        while let Some((current, expanded)) = stack.pop() {
            let gate = match &self.nodes[current.0] {
                Node::Input(wire) => {
                    wire.evaluate()?;
                    continue;
                }
                Node::Gate(gate) if gate.cached_value().is_some() => continue,
                Node::Gate(gate) => gate,
            };

            if expanded {
                let values = self.negated_input_values(gate)?;
                let value = gate.kind().combine(values);
                trace!("evaluate: {} -> {}", gate.name(), value);
                self.gate_mut(current)?.cache(value);
            } else {
                stack.push((current, true));
                stack.extend(
                    gate.inputs()
                        .iter()
                        .filter(|input| self.nodes[input.0].settled_value().is_none())
                        .map(|&input| (input, false)),
                );
            }
        }

        self.nodes[id.0]
            .settled_value()
            .ok_or(Error::NotEvaluated(id))
    }

    /// Input values of `gate` with its negations applied. All inputs must be settled.
    fn negated_input_values(&self, gate: &Gate) -> Result<Vec<bool>, Error> {
        gate.inputs()
            .iter()
            .zip(gate.negations())
            .map(|(&input, &negated)| match &self.nodes[input.0] {
                Node::Input(wire) => Ok(wire.evaluate()? ^ negated),
                Node::Gate(inner) => inner
                    .cached_value()
                    .map(|value| value ^ negated)
                    .ok_or(Error::NotEvaluated(input)),
            })
            .collect()
    }

    /// Drop the cached value of `id` and, only where something was cached, of its inputs.
    ///
    /// Input wires reached this way lose their value. A never evaluated gate stops the walk
    /// immediately.
    pub fn wipe(&mut self, id: NodeId) -> Result<(), Error> {
        self.get(id)?;

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            match &mut self.nodes[current.0] {
                Node::Input(wire) => wire.wipe_input(),
                Node::Gate(gate) => {
                    if gate.take_cached().is_some() {
                        stack.extend_from_slice(gate.inputs());
                    }
                }
            }
        }
        Ok(())
    }

    /// Drop the cached value of every gate. Wire values are kept.
    pub fn reset_caches(&mut self) {
        for node in &mut self.nodes {
            if let Node::Gate(gate) = node {
                gate.take_cached();
            }
        }
    }

    /// Flip negations of gate `id` so that it evaluates to `desired`.
    pub fn balance<R: Rng + ?Sized>(
        &mut self,
        id: NodeId,
        desired: bool,
        rng: &mut R,
    ) -> Result<(), Error> {
        self.evaluate(id)?;

        let gate = self.gate(id)?;
        let values = self.negated_input_values(gate)?;
        let flips = gate.balance_flips(&values, desired, rng);
        trace!(
            "balance: {} {} -> {} flips={:?}",
            gate.func_name(),
            gate.name(),
            desired,
            flips
        );

        self.gate_mut(id)?.apply_balance(&flips, desired);
        Ok(())
    }

    /// `name:FUNC(term,...)` line of a gate.
    pub fn full_display_string(&self, id: NodeId) -> Result<String, Error> {
        Ok(self.gate_line(self.gate(id)?))
    }

    pub(crate) fn gate_line(&self, gate: &Gate) -> String {
        let terms = gate
            .inputs()
            .iter()
            .zip(gate.negations())
            .map(|(&input, &negated)| short_display(self.nodes[input.0].name(), negated))
            .join(",");

        format!("{}:{}({})", gate.name(), gate.func_name(), terms)
    }

    pub fn short_display(&self, id: NodeId, negated: bool) -> Result<String, Error> {
        Ok(short_display(self.name(id)?, negated))
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }
}
