use std::{fmt, str::FromStr};

use bitvec::prelude::*;
use rand::Rng;

use super::errors::Error;

/// Input assignment of a circuit, one bit per input wire. Written as `[0110...]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputVector(BitVec);

impl InputVector {
    pub fn random<R: Rng + ?Sized>(width: usize, rng: &mut R) -> Self {
        (0..width).map(|_| rng.r#gen::<bool>()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn bits(&self) -> &BitSlice {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().by_vals()
    }

    pub fn to_bools(&self) -> Vec<bool> {
        self.iter().collect()
    }
}

impl FromIterator<bool> for InputVector {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for InputVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        f.write_str("]")
    }
}

impl FromStr for InputVector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || Error::MalformedInput(s.to_owned());
        let digits = s
            .trim()
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(malformed)?;

        digits
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(malformed()),
            })
            .collect()
    }
}
