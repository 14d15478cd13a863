use std::{fmt, str::FromStr};

use rand::Rng;

use super::errors::Error;
use crate::{GateKind, UnknownGateKind};

/// Gate kinds allowed in the random layers of a generated circuit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateChoice {
    And,
    Or,
    Xor,
    /// Kind drawn uniformly per gate.
    Random,
}

impl GateChoice {
    /// Kind of the next gate. Only [`GateChoice::Random`] draws from `rng`.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> GateKind {
        match self {
            GateChoice::And => GateKind::And,
            GateChoice::Or => GateKind::Or,
            GateChoice::Xor => GateKind::Xor,
            GateChoice::Random => GateKind::ALL[rng.gen_range(0..GateKind::ALL.len())],
        }
    }
}

impl fmt::Display for GateChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateChoice::And => f.write_str("AND"),
            GateChoice::Or => f.write_str("OR"),
            GateChoice::Xor => f.write_str("XOR"),
            GateChoice::Random => f.write_str("RANDOM"),
        }
    }
}

impl FromStr for GateChoice {
    type Err = UnknownGateKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RANDOM" => Ok(GateChoice::Random),
            other => Ok(match other.parse::<GateKind>()? {
                GateKind::And => GateChoice::And,
                GateKind::Or => GateChoice::Or,
                GateKind::Xor => GateChoice::Xor,
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    /// Gates follow the configured [`GateChoice`].
    Random,
    /// XOR gates only.
    Xor,
}

/// One layer of a layered family: `size` gates, each reading a `fanin` fraction of the layer
/// below.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layer {
    pub kind: LayerKind,
    pub size: usize,
    pub fanin: f64,
}

/// Topology of a generated circuit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Family {
    /// Family 1: one random layer of `gates` gates.
    Flat { gates: usize, fanin: f64 },
    /// Family 2: XOR layer, random layer, XOR layer.
    XorSandwich {
        gates: usize,
        fanin: f64,
        xor_gates: usize,
        xor_fanin: f64,
    },
    /// Family 3: `depth` layers of two-input gates, as wide as the input.
    Ladder { depth: usize },
}

impl Family {
    pub fn number(&self) -> u8 {
        match self {
            Family::Flat { .. } => 1,
            Family::XorSandwich { .. } => 2,
            Family::Ladder { .. } => 3,
        }
    }

    /// Layers between the input wires and the output gate. Empty for the ladder family, whose
    /// layers are not built from fan-in fractions.
    pub fn layers(&self) -> Vec<Layer> {
        match *self {
            Family::Flat { gates, fanin } => vec![Layer {
                kind: LayerKind::Random,
                size: gates,
                fanin,
            }],
            Family::XorSandwich {
                gates,
                fanin,
                xor_gates,
                xor_fanin,
            } => {
                let xor = Layer {
                    kind: LayerKind::Xor,
                    size: xor_gates,
                    fanin: xor_fanin,
                };
                vec![
                    xor,
                    Layer {
                        kind: LayerKind::Random,
                        size: gates,
                        fanin,
                    },
                    xor,
                ]
            }
            Family::Ladder { .. } => vec![],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeneratorParams {
    /// Number of input wires.
    pub width: usize,
    pub family: Family,
    pub gate_choice: GateChoice,
}

impl GeneratorParams {
    pub fn new(width: usize, family: Family, gate_choice: GateChoice) -> Self {
        Self {
            width,
            family,
            gate_choice,
        }
    }

    /// Every gate needs two inputs, so every layer a gate reads from needs two nodes.
    pub fn validate(&self) -> Result<(), Error> {
        if self.width < 2 {
            return Err(Error::invalid("W", format!("{} < 2", self.width)));
        }

        match self.family {
            Family::Ladder { depth } if depth == 0 => {
                return Err(Error::invalid("D", "depth must be positive"));
            }
            Family::Ladder { .. } => {}
            Family::Flat { .. } | Family::XorSandwich { .. } => {
                for layer in self.family.layers() {
                    let (size_name, fanin_name) = match layer.kind {
                        LayerKind::Random => ("G", "fg"),
                        LayerKind::Xor => ("X", "fx"),
                    };
                    if layer.size < 2 {
                        return Err(Error::invalid(size_name, format!("{} < 2", layer.size)));
                    }
                    if !(layer.fanin > 0.0 && layer.fanin <= 1.0) {
                        return Err(Error::invalid(
                            fanin_name,
                            format!("{} outside (0, 1]", layer.fanin),
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    /// First line of the circuit artifact.
    pub fn header(&self) -> String {
        match self.family {
            Family::Flat { gates, .. } => format!("W={},G={},F=1", self.width, gates),
            Family::XorSandwich {
                gates, xor_gates, ..
            } => format!("W={},G={},X={},F=2", self.width, gates, xor_gates),
            Family::Ladder { depth } => format!("W={},D={},F=3", self.width, depth),
        }
    }
}
