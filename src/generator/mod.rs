//! Random circuit generation for the three stealth circuit families.
//!
//! Families 1 and 2 stack layers of randomly wired gates with Gaussian fan-in and finish with a
//! single output gate reading the whole top layer. Family 3 is a ladder of two-input gates that
//! guarantees the requested depth.

pub mod errors;
pub mod gates;
pub mod input;
mod maker;
pub mod params;
pub mod trimming;

pub use errors::GeneratorError;
pub use gates::{make_ladder_gate, make_random_gate, sample_fanin};
pub use input::InputVector;
pub use maker::{CircuitMaker, GeneratedCircuit, OUTPUT_GATE_NAME};
pub use params::{Family, GateChoice, GeneratorParams, Layer, LayerKind};
pub use trimming::{TRIMMING_THRESHOLD, Trimming, prob_needs_trimming};
