use rand::Rng;

pub use crate::core::gate_kind::GateKind;
use crate::core::node::{NodeError, NodeId, checked_name};

pub type Error = NodeError;

/// Display form of an input term: `name` or `N(name)` when negated.
pub fn short_display(name: &str, negated: bool) -> String {
    if negated {
        format!("N({name})")
    } else {
        name.to_owned()
    }
}

/// Accepts the boolean-like flags `0` and `1`, everything else is rejected.
pub fn negation_from_flag(flag: i64) -> Result<bool, Error> {
    match flag {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(Error::InvalidNegation(other)),
    }
}

/// Internal circuit node: ordered inputs, one negation bit per input and a memoized value.
///
/// The level is fixed at construction, so inputs always exist before the gates reading them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gate {
    name: String,
    kind: GateKind,
    inputs: Vec<NodeId>,
    negations: Vec<bool>,
    level: usize,
    cached: Option<bool>,
}

impl Gate {
    pub(crate) fn new(
        name: impl Into<String>,
        kind: GateKind,
        inputs: Vec<NodeId>,
        negations: Vec<bool>,
        level: usize,
    ) -> Result<Self, Error> {
        if inputs.len() != negations.len() || inputs.len() < 2 {
            return Err(Error::Arity {
                inputs: inputs.len(),
                negations: negations.len(),
            });
        }

        Ok(Self {
            name: checked_name(name)?,
            kind,
            inputs,
            negations,
            level,
            cached: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn kind(&self) -> GateKind {
        self.kind
    }

    pub fn func_name(&self) -> &'static str {
        self.kind.func_name()
    }

    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    pub fn negations(&self) -> &[bool] {
        &self.negations
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn cached_value(&self) -> Option<bool> {
        self.cached
    }

    pub(crate) fn cache(&mut self, value: bool) {
        self.cached = Some(value);
    }

    pub(crate) fn take_cached(&mut self) -> Option<bool> {
        self.cached.take()
    }

    /// Flip the negation of one input. The cached value no longer holds and is dropped.
    pub fn negate(&mut self, index: usize) -> Result<(), Error> {
        let inputs = self.negations.len();
        let negation = self.negations.get_mut(index).ok_or_else(|| Error::NoSuchInput {
            gate: self.name.clone(),
            index,
            inputs,
        })?;
        *negation = !*negation;
        self.cached = None;
        Ok(())
    }

    /// Input positions whose negation has to flip so that the gate yields `desired`.
    ///
    /// `values` are the input values with the current negations already applied.
    /// - AND: one random flip forces `false`, every false input flips to force `true`
    /// - OR: one random flip forces `true`, every true input flips to force `false`
    /// - XOR: any single flip toggles the parity
    pub fn balance_flips<R: Rng + ?Sized>(
        &self,
        values: &[bool],
        desired: bool,
        rng: &mut R,
    ) -> Vec<usize> {
        if self.kind.combine(values.iter().copied()) == desired {
            return vec![];
        }

        match (self.kind, desired) {
            (GateKind::And, false) | (GateKind::Or, true) | (GateKind::Xor, _) => {
                vec![rng.gen_range(0..values.len())]
            }
            (GateKind::And, true) => positions(values, false),
            (GateKind::Or, false) => positions(values, true),
        }
    }

    /// Apply `flips` and store `desired` directly; the gate algebra guarantees the result.
    pub(crate) fn apply_balance(&mut self, flips: &[usize], desired: bool) {
        for &index in flips {
            self.negations[index] = !self.negations[index];
        }
        self.cached = Some(desired);
    }
}

fn positions(values: &[bool], needle: bool) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, &v)| (v == needle).then_some(index))
        .collect()
}
