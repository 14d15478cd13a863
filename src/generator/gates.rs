use std::f64::consts::PI;

use rand::{Rng, seq::index};

use crate::{Arena, GateKind, NodeError, NodeId};

fn next_gaussian<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // Box-Muller transform for Gaussian samples
    let u1 = rng.r#gen::<f64>().max(1e-10);
    let u2 = rng.r#gen::<f64>();
    let r = (-2.0 * u1.ln()).sqrt();
    let theta = 2.0 * PI * u2;
    r * theta.cos()
}

/// Fan-in of a gate reading `fraction` of a layer of `layer_len` nodes.
///
/// Normal around `fraction * layer_len` with standard deviation
/// `min(fraction, 1 - fraction) * layer_len / 3`, rounded and clipped to `[2, layer_len]`.
pub fn sample_fanin<R: Rng + ?Sized>(layer_len: usize, fraction: f64, rng: &mut R) -> usize {
    let n = layer_len as f64;
    let sigma = (n * (1.0 - fraction)).min(n * fraction) / 3.0;
    let sample = n * fraction + sigma * next_gaussian(rng);

    sample.round().min(n).max(2.0) as usize
}

/// Gate of a layered family over `previous`, the layer right below it.
///
/// A fraction of 1 takes the whole layer in order; anything else samples a Gaussian fan-in of
/// distinct inputs. Negations are uniform.
pub fn make_random_gate<R: Rng + ?Sized>(
    arena: &mut Arena,
    previous: &[NodeId],
    fraction: f64,
    name: impl Into<String>,
    kind: GateKind,
    rng: &mut R,
) -> Result<NodeId, NodeError> {
    if previous.len() < 2 {
        return Err(NodeError::Arity {
            inputs: previous.len(),
            negations: previous.len(),
        });
    }

    let inputs: Vec<NodeId> = if fraction >= 1.0 {
        previous.to_vec()
    } else {
        let fanin = sample_fanin(previous.len(), fraction, rng);
        index::sample(rng, previous.len(), fanin)
            .into_iter()
            .map(|i| previous[i])
            .collect()
    };
    let negations = (0..inputs.len()).map(|_| rng.r#gen()).collect();

    arena.add_gate(kind, name, inputs, negations)
}

/// Two-input gate of the ladder family.
///
/// `levels` holds every layer built so far, input wires first. The first input is uniform over
/// the last layer, the second uniform over all nodes of all layers except the first input.
pub fn make_ladder_gate<R: Rng + ?Sized>(
    arena: &mut Arena,
    levels: &[Vec<NodeId>],
    name: impl Into<String>,
    kind: GateKind,
    rng: &mut R,
) -> Result<NodeId, NodeError> {
    let total: usize = levels.iter().map(Vec::len).sum();
    let arity_error = NodeError::Arity {
        inputs: total.min(2),
        negations: 2,
    };
    let Some(previous) = levels.last().filter(|level| !level.is_empty()) else {
        return Err(arity_error);
    };
    if total < 2 {
        return Err(arity_error);
    }

    // Candidates are numbered newest layer first, so the first input keeps its index.
    let first_index = rng.gen_range(0..previous.len());
    let mut second_index = rng.gen_range(0..total - 1);
    if second_index >= first_index {
        second_index += 1;
    }

    let mut offset = second_index;
    let second = levels
        .iter()
        .rev()
        .find_map(|level| match level.get(offset) {
            Some(&id) => Some(id),
            None => {
                offset -= level.len();
                None
            }
        })
        .ok_or(arity_error)?;

    let inputs = vec![previous[first_index], second];
    let negations = (0..2).map(|_| rng.r#gen()).collect();

    arena.add_gate(kind, name, inputs, negations)
}
