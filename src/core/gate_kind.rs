use std::{fmt, str::FromStr};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Unsupported gate function: {0}")]
pub struct UnknownGateKind(pub String);

/// Boolean function of a gate. Every kind owns its combining rule and its balancing policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateKind {
    And,
    Or,
    Xor,
}

impl GateKind {
    pub const ALL: [GateKind; 3] = [GateKind::And, GateKind::Or, GateKind::Xor];

    pub const fn func_name(&self) -> &'static str {
        match self {
            GateKind::And => "AND",
            GateKind::Or => "OR",
            GateKind::Xor => "XOR",
        }
    }

    /// Combine already negated input values.
    pub fn combine(&self, values: impl IntoIterator<Item = bool>) -> bool {
        let mut values = values.into_iter();
        match self {
            GateKind::And => values.all(|v| v),
            GateKind::Or => values.any(|v| v),
            GateKind::Xor => values.fold(false, |acc, v| acc ^ v),
        }
    }

    /// 4-bit truth table of the two-input gate (bit0=f(0,0), bit1=f(0,1), bit2=f(1,0), bit3=f(1,1))
    pub fn truth_table(&self) -> u8 {
        let mut tt = 0u8;
        for (bit, (a, b)) in [(false, false), (false, true), (true, false), (true, true)]
            .into_iter()
            .enumerate()
        {
            if self.combine([a, b]) {
                tt |= 1 << bit;
            }
        }
        tt
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.func_name())
    }
}

impl FromStr for GateKind {
    type Err = UnknownGateKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AND" => Ok(GateKind::And),
            "OR" => Ok(GateKind::Or),
            "XOR" => Ok(GateKind::Xor),
            other => Err(UnknownGateKind(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truth_tables() {
        // AND: f(0,0)=0, f(0,1)=0, f(1,0)=0, f(1,1)=1 -> 0b1000 = 8
        assert_eq!(GateKind::And.truth_table(), 8);

        // OR: f(0,0)=0, f(0,1)=1, f(1,0)=1, f(1,1)=1 -> 0b1110 = 14
        assert_eq!(GateKind::Or.truth_table(), 14);

        // XOR: f(0,0)=0, f(0,1)=1, f(1,0)=1, f(1,1)=0 -> 0b0110 = 6
        assert_eq!(GateKind::Xor.truth_table(), 6);
    }

    #[test]
    fn xor_is_parity_over_many_inputs() {
        assert!(GateKind::Xor.combine([true, true, true]));
        assert!(!GateKind::Xor.combine([true, false, true, false]));
        assert!(GateKind::And.combine([true; 5]));
        assert!(!GateKind::Or.combine([false; 5]));
    }

    #[test]
    fn func_names_round_trip() {
        for kind in GateKind::ALL {
            assert_eq!(kind.func_name().parse::<GateKind>(), Ok(kind));
        }
        assert_eq!(
            "NAND".parse::<GateKind>(),
            Err(UnknownGateKind("NAND".to_owned()))
        );
    }
}
