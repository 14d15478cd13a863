use std::io::Write;

use rand::{Rng, seq::SliceRandom};
use tracing::{debug, info};

use super::{
    errors::Error,
    gates::{make_ladder_gate, make_random_gate},
    input::InputVector,
    params::{Family, GeneratorParams, Layer, LayerKind},
    trimming::{Trimming, prob_needs_trimming},
};
use crate::{Arena, Circuit, GateKind, NodeError, NodeId, progress::maybe_log_progress};

pub const OUTPUT_GATE_NAME: &str = "output_gate";

/// What the maker wrote besides the circuit text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedCircuit {
    pub header: String,
    /// Input the circuit was balanced for.
    pub input: InputVector,
    /// Value of the output gate on `input`.
    pub output: bool,
    /// Whether dead gates were left out of the text.
    pub trimmed: bool,
    /// Gates created, the output gate included.
    pub gate_count: usize,
}

/// Builds one random circuit per [`CircuitMaker::generate`] call and writes its text artifact.
///
/// Every gate is balanced toward a random bit right after creation and the output gate toward a
/// random output bit, so the circuit evaluates to that bit on the generated input.
#[derive(Clone, Debug)]
pub struct CircuitMaker {
    params: GeneratorParams,
    trimming: Trimming,
}

impl CircuitMaker {
    pub fn new(params: GeneratorParams) -> Result<Self, Error> {
        params.validate()?;
        Ok(Self {
            params,
            trimming: Trimming::Auto,
        })
    }

    pub fn with_trimming(mut self, trimming: Trimming) -> Self {
        self.trimming = trimming;
        self
    }

    pub fn params(&self) -> &GeneratorParams {
        &self.params
    }

    /// Writes `header` followed by the level data to `out`.
    pub fn generate<R: Rng + ?Sized, W: Write>(
        &self,
        rng: &mut R,
        out: &mut W,
    ) -> Result<GeneratedCircuit, Error> {
        let header = self.params.header();
        out.write_all(header.as_bytes())?;

        let mut arena = Arena::new();
        let input = InputVector::random(self.params.width, rng);
        let input_wires = input
            .iter()
            .enumerate()
            .map(|(index, value)| arena.add_input_wire(format!("W{index}"), Some(value)))
            .collect::<Result<Vec<_>, _>>()?;

        let generated = match self.params.family {
            Family::Ladder { depth } => {
                self.generate_ladder(arena, input_wires, depth, rng, out)?
            }
            Family::Flat { .. } | Family::XorSandwich { .. } => {
                self.generate_layered(arena, input_wires, &self.params.family.layers(), rng, out)?
            }
        };
        out.flush()?;

        let (output, trimmed, gate_count) = generated;
        info!(
            "generated {}: F={} gates={} trimmed={} output={}",
            header,
            self.params.family.number(),
            gate_count,
            trimmed,
            u8::from(output)
        );

        Ok(GeneratedCircuit {
            header,
            input,
            output,
            trimmed,
            gate_count,
        })
    }

    /// Families 1 and 2. When not trimming, each gate is written as soon as it is balanced and
    /// every finished layer is frozen into wires holding the balanced values.
    fn generate_layered<R: Rng + ?Sized, W: Write>(
        &self,
        mut arena: Arena,
        input_wires: Vec<NodeId>,
        layers: &[Layer],
        rng: &mut R,
        out: &mut W,
    ) -> Result<(bool, bool, usize), Error> {
        let width = self.params.width;
        let prob = prob_needs_trimming(width, layers);
        let trimmed = self.trimming.resolve(prob);
        debug!("layered: pr(needs trimming)={prob:e} trimmed={trimmed}");

        let output: bool = rng.r#gen();
        let mut previous = input_wires.clone();
        let mut gate_count = 0;

        for layer in layers {
            if !trimmed {
                out.write_all(b"\nL")?;
            }

            let mut current = Vec::with_capacity(layer.size);
            for _ in 0..layer.size {
                let kind = match layer.kind {
                    LayerKind::Xor => GateKind::Xor,
                    LayerKind::Random => self.params.gate_choice.pick(rng),
                };
                let name = format!("G{}", width + gate_count);
                let gate = make_random_gate(&mut arena, &previous, layer.fanin, name, kind, rng)?;

                let target: bool = rng.r#gen();
                arena.balance(gate, target, rng)?;
                if !trimmed {
                    write!(out, "\n{}", arena.full_display_string(gate)?)?;
                }

                current.push(gate);
                gate_count += 1;
                maybe_log_progress("layered generation", gate_count);
            }

            if trimmed {
                previous = current;
            } else {
                (arena, previous) = freeze(&arena, &current)?;
            }
        }

        let kind = self.params.gate_choice.pick(rng);
        let output_gate = make_random_gate(&mut arena, &previous, 1.0, OUTPUT_GATE_NAME, kind, rng)?;
        arena.balance(output_gate, output, rng)?;
        gate_count += 1;

        if trimmed {
            let circuit = Circuit::new(arena, input_wires, output_gate)?;
            debug!("trimmed to {} of {} gates", circuit.num_gates(), gate_count);
            out.write_all(circuit.display().as_bytes())?;
        } else {
            write!(out, "\nL\n{}", arena.full_display_string(output_gate)?)?;
        }

        Ok((output, trimmed, gate_count))
    }

    /// Family 3: `depth` layers as wide as the input, output gate picked from the last layer.
    fn generate_ladder<R: Rng + ?Sized, W: Write>(
        &self,
        mut arena: Arena,
        input_wires: Vec<NodeId>,
        depth: usize,
        rng: &mut R,
        out: &mut W,
    ) -> Result<(bool, bool, usize), Error> {
        let width = self.params.width;
        let mut levels = Vec::with_capacity(depth + 1);
        levels.push(input_wires.clone());
        let mut gate_count = 0;

        for _ in 0..depth {
            let mut current = Vec::with_capacity(width);
            for _ in 0..width {
                let kind = self.params.gate_choice.pick(rng);
                let name = format!("G{gate_count}");
                let gate = make_ladder_gate(&mut arena, &levels, name, kind, rng)?;

                let target: bool = rng.r#gen();
                arena.balance(gate, target, rng)?;

                current.push(gate);
                gate_count += 1;
                maybe_log_progress("ladder generation", gate_count);
            }
            levels.push(current);
        }

        let output_gate = levels
            .last()
            .and_then(|last| last.choose(rng))
            .copied()
            .ok_or(NodeError::Arity {
                inputs: 0,
                negations: 0,
            })?;
        arena.set_name(output_gate, OUTPUT_GATE_NAME)?;

        let output: bool = rng.r#gen();
        arena.balance(output_gate, output, rng)?;

        let circuit = Circuit::new(arena, input_wires, output_gate)?;
        debug!("ladder: {} of {} gates feed the output", circuit.num_gates(), gate_count);
        out.write_all(circuit.display().as_bytes())?;

        Ok((output, true, gate_count))
    }
}

/// Replace a finished layer by input wires carrying the balanced gate values, dropping
/// everything below it.
fn freeze(arena: &Arena, layer: &[NodeId]) -> Result<(Arena, Vec<NodeId>), NodeError> {
    let mut frozen = Arena::with_capacity(layer.len());
    let wires = layer
        .iter()
        .map(|&id| {
            let gate = arena.gate(id)?;
            let value = gate.cached_value().ok_or(NodeError::NotEvaluated(id))?;
            frozen.add_input_wire(gate.name(), Some(value))
        })
        .collect::<Result<Vec<_>, NodeError>>()?;

    Ok((frozen, wires))
}
